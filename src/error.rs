use thiserror::Error;

use crate::catalog::CatalogError;

/// Failure results reported by every engine operation.
///
/// None of these is ever converted into a default urgency tier: a caller
/// that receives an error has no triage result, and must say so.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    #[error("Analysis exceeded its {deadline_ms}ms deadline")]
    AnalysisTimeout { deadline_ms: u64 },

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Stale result for request {generation} (current request is {current})")]
    StaleResult { generation: u64, current: u64 },

    #[error("Inference backend error: {0}")]
    Backend(String),

    #[error("Rule catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl EngineError {
    /// Whether a caller-side retry could plausibly succeed.
    ///
    /// The engine itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::AnalysisTimeout { .. } | Self::Backend(_))
    }
}
