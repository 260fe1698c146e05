use thiserror::Error;

use crate::types::SourceId;

#[derive(Error, Debug)]
pub enum AdoptSignalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Source {source} unavailable: {reason}")]
    SourceUnavailable { source: SourceId, reason: String },

    #[error("Aggregation precondition violated: {0}")]
    Precondition(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
