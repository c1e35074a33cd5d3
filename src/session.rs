//! Dashboard session state.
//!
//! A session starts in `Loading`, moves once to `Ready` or `Failed`, and
//! owns the fetched collection together with the current filter selection.
//! Views are recomputed from scratch every time they are requested.

use crate::analysis::{aggregate, Aggregation};
use crate::models::{CampaignCollection, StatusFilter};
use crate::retriever::RetrievalError;
use tracing::{debug, info, warn};

/// Lifecycle of the single retrieval a session performs.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Retrieval has not completed yet.
    Loading,
    /// Retrieval succeeded.
    Ready { campaigns: CampaignCollection },
    /// Retrieval failed. Terminal for this session.
    Failed { message: String },
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        match self {
            SessionState::Loading => Phase::Loading,
            SessionState::Ready { .. } => Phase::Ready,
            SessionState::Failed { .. } => Phase::Failed,
        }
    }

    /// Short lowercase name used in logs and JSON output.
    pub fn name(&self) -> &'static str {
        self.phase().as_str()
    }
}

/// Session state without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Loading => "loading",
            Phase::Ready => "ready",
            Phase::Failed => "failed",
        }
    }
}

/// What the renderer gets to see.
#[derive(Debug, Clone, PartialEq)]
pub enum View<'a> {
    Loading,
    Failed {
        message: &'a str,
    },
    Ready {
        aggregation: Aggregation<'a>,
        /// No campaign passed the filter.
        no_results: bool,
    },
}

impl View<'_> {
    pub fn phase(&self) -> Phase {
        match self {
            View::Loading => Phase::Loading,
            View::Failed { .. } => Phase::Failed,
            View::Ready { .. } => Phase::Ready,
        }
    }
}

/// One dashboard session.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    filter: StatusFilter,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(StatusFilter::default())
    }
}

impl Session {
    /// Start a session in `Loading` with the given filter selection.
    pub fn new(filter: StatusFilter) -> Self {
        Self {
            state: SessionState::Loading,
            filter,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    /// Apply the outcome of the retrieval.
    ///
    /// Only the first outcome counts; later ones are ignored.
    pub fn complete(&mut self, result: Result<CampaignCollection, RetrievalError>) {
        if self.state != SessionState::Loading {
            warn!(
                "Ignoring retrieval result, session already {}",
                self.state.name()
            );
            return;
        }

        self.state = match result {
            Ok(campaigns) => {
                info!("Session ready with {} campaigns", campaigns.len());
                SessionState::Ready { campaigns }
            }
            Err(e) => {
                let mut message = e.to_string();
                if message.trim().is_empty() {
                    message = "Failed to fetch data from the API".to_string();
                }
                SessionState::Failed { message }
            }
        };
    }

    /// Change the filter selection.
    ///
    /// Accepted in every state. Outside `Ready` it only records the choice.
    pub fn set_filter(&mut self, filter: StatusFilter) {
        debug!("Filter changed {} -> {} ({})", self.filter, filter, self.state.name());
        self.filter = filter;
    }

    /// Derive the current view.
    pub fn view(&self) -> View<'_> {
        match &self.state {
            SessionState::Loading => View::Loading,
            SessionState::Failed { message } => View::Failed { message },
            SessionState::Ready { campaigns } => {
                let aggregation = aggregate(campaigns, self.filter);
                let no_results = aggregation.is_empty();
                View::Ready {
                    aggregation,
                    no_results,
                }
            }
        }
    }
}
