use thiserror::Error;

use crate::record::Field;

/// Terminal failures of the metadata phase for one item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    #[error("no source returned metadata for {0}")]
    NoSuccessfulSource(String),

    #[error("required field '{field}' is empty for {item}")]
    MissingField { item: String, field: Field },
}
