//! Analysis modules.
//!
//! Group-by-count aggregation over cleaned catalog entries.

pub mod aggregator;

pub use aggregator::*;
