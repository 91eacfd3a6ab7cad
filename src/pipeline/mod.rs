//! Batch pipeline.
//!
//! - `run_batch`: search the configured terms and deliver fresh listings
//! - `filter_recent`: the recency window applied to extracted listings

pub mod batch;
pub mod recency;

pub use batch::{BatchOutcome, run_batch};
pub use recency::filter_recent;
