use thiserror::Error;

use crate::api::ApiError;

/// Errors surfaced by the collection and report pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("The roster returned no entities; nothing to collect.")]
    EmptyRoster,

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
