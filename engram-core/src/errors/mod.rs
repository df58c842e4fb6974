//! Error taxonomy. Each subsystem has its own error enum; `EngramError`
//! is the umbrella every public API returns.

mod eval_error;
mod retrieval_error;
mod storage_error;
mod supersedence_error;

pub use eval_error::EvalError;
pub use retrieval_error::RetrievalError;
pub use storage_error::StorageError;
pub use supersedence_error::SupersedenceError;

/// Result alias used throughout the workspace.
pub type EngramResult<T> = Result<T, EngramError>;

/// Umbrella error for the Engram workspace.
#[derive(Debug, thiserror::Error)]
pub enum EngramError {
    /// Malformed input, rejected before any I/O.
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Supersedence(#[from] SupersedenceError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngramError {
    /// Shorthand for a validation rejection.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// True for data-integrity errors that must surface to the caller
    /// (never recovered by local degradation).
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            Self::Storage(StorageError::Conflict { .. })
                | Self::Supersedence(SupersedenceError::CycleDetected { .. })
                | Self::Supersedence(SupersedenceError::ChainTooDeep { .. })
        )
    }
}
