//! Analysis modules.
//!
//! Filtering and totals over the fetched campaign collection.

pub mod aggregator;

pub use aggregator::*;
