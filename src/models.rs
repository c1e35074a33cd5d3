//! Data models for the campaign dashboard.
//!
//! This module contains the campaign record as it arrives from the API,
//! the status filter chosen by the user, and the summary statistics
//! derived from a filtered collection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Delivery status of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignStatus {
    /// Campaign is currently serving.
    Active,
    /// Campaign is paused.
    Paused,
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CampaignStatus::Active => write!(f, "Active"),
            CampaignStatus::Paused => write!(f, "Paused"),
        }
    }
}

impl CampaignStatus {
    /// Returns an emoji badge for the status.
    pub fn emoji(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "🟢",
            CampaignStatus::Paused => "🟡",
        }
    }
}

/// One advertising campaign's tracked performance metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    /// Unique identifier, stable across fetches.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Delivery status.
    pub status: CampaignStatus,
    /// Number of clicks.
    pub clicks: u64,
    /// Spend in currency units.
    pub cost: Decimal,
    /// Number of impressions.
    pub impressions: u64,
}

/// Campaigns in the order the API returned them.
pub type CampaignCollection = Vec<Campaign>;

/// The status filter selected by the user. `All` is the no-op filter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Paused,
}

impl StatusFilter {
    /// Whether a campaign passes this filter.
    pub fn matches(&self, campaign: &Campaign) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => campaign.status == CampaignStatus::Active,
            StatusFilter::Paused => campaign.status == CampaignStatus::Paused,
        }
    }

    /// Label shown next to the filter control.
    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All Campaigns",
            StatusFilter::Active => "Active",
            StatusFilter::Paused => "Paused",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "All"),
            StatusFilter::Active => write!(f, "Active"),
            StatusFilter::Paused => write!(f, "Paused"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "paused" => Ok(StatusFilter::Paused),
            other => Err(format!(
                "Unknown status filter '{}' (expected all, active or paused)",
                other
            )),
        }
    }
}

/// Totals over a filtered set of campaigns.
///
/// Derived on demand, never stored alongside the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Number of campaigns in the filtered set.
    pub total: usize,
    /// Sum of clicks.
    pub clicks: u64,
    /// Sum of cost, unrounded.
    pub cost: Decimal,
    /// Sum of impressions.
    pub impressions: u64,
}

impl SummaryStatistics {
    /// Creates statistics from a list of campaigns.
    pub fn from_campaigns<'a, I>(campaigns: I) -> Self
    where
        I: IntoIterator<Item = &'a Campaign>,
    {
        let mut summary = Self::default();

        for campaign in campaigns {
            summary.total += 1;
            summary.clicks = summary.clicks.checked_add(campaign.clicks).unwrap_or_else(|| {
                warn!("Click total overflowed at campaign {}, capped", campaign.id);
                u64::MAX
            });
            summary.cost = summary.cost.checked_add(campaign.cost).unwrap_or_else(|| {
                warn!("Cost total overflowed at campaign {}, capped", campaign.id);
                Decimal::MAX
            });
            summary.impressions = summary
                .impressions
                .checked_add(campaign.impressions)
                .unwrap_or_else(|| {
                    warn!("Impression total overflowed at campaign {}, capped", campaign.id);
                    u64::MAX
                });
        }

        summary
    }
}
