//! Reconciler.
//!
//! Merges the successful per-source records of one item into a
//! [`FinalRecord`](crate::record::FinalRecord) using field-level priority,
//! with special handling for tags, covers and the canonical identifier.

mod alias;
mod config;
mod error;
mod merge;
mod title;

pub use alias::AliasTable;
pub use config::{ReconcilerConfig, WatermarkedCover};
pub use error::AggregationError;
pub use merge::{Reconciler, HARD_SUB_TAG, UNCENSORED_TAG};
pub use title::strip_trailing_cast;
