//! Campaign filtering and summary statistics.
//!
//! Everything here is pure: the same collection and filter always produce
//! the same subset and totals.

use crate::models::{Campaign, StatusFilter, SummaryStatistics};

/// The filtered subset of a collection together with its totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation<'a> {
    /// Filter that produced this aggregation.
    pub filter: StatusFilter,
    /// Campaigns passing the filter, in collection order.
    pub campaigns: Vec<&'a Campaign>,
    /// Totals over `campaigns`.
    pub summary: SummaryStatistics,
}

impl Aggregation<'_> {
    /// True when no campaign passed the filter.
    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }
}

/// Select the campaigns that pass `filter`, preserving order.
pub fn filter_campaigns(campaigns: &[Campaign], filter: StatusFilter) -> Vec<&Campaign> {
    campaigns.iter().filter(|c| filter.matches(c)).collect()
}

/// Compute totals over an already filtered set.
pub fn summarize(campaigns: &[&Campaign]) -> SummaryStatistics {
    SummaryStatistics::from_campaigns(campaigns.iter().copied())
}

/// Filter a collection and compute totals over the result.
pub fn aggregate(campaigns: &[Campaign], filter: StatusFilter) -> Aggregation<'_> {
    let filtered = filter_campaigns(campaigns, filter);
    let summary = summarize(&filtered);

    Aggregation {
        filter,
        campaigns: filtered,
        summary,
    }
}
