//! Campaign retrieval.
//!
//! This module fetches the campaign collection from the configured API.

pub mod client;

pub use client::{campaigns_endpoint, CampaignRetriever, RetrievalError, RetrieverConfig};
