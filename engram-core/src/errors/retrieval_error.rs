/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    /// Every retrieval signal is down. Single-signal outages degrade
    /// locally instead of surfacing this.
    #[error("retrieval unavailable: {reason}")]
    Unavailable { reason: String },

    /// The caller deadline elapsed before any signal completed.
    #[error("retrieval timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("search failed: {reason}")]
    SearchFailed { reason: String },
}
