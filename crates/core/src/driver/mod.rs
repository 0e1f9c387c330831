//! Batch driver.
//!
//! Processes items sequentially through the pipeline, hands finished items
//! to a [`Downstream`] consumer and reports outcomes to a [`Notifier`].

mod config;
mod log;
mod pipeline;
mod types;

pub use config::DriverConfig;
pub use log::{LogDownstream, LogNotifier};
pub use pipeline::Pipeline;
pub use types::{
    BatchSummary, Downstream, DownstreamError, FailureNotice, ItemError, Notifier, SuccessNotice,
};
