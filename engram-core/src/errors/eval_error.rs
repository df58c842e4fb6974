/// Evaluation harness errors.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("gold set is empty")]
    EmptyGoldSet,

    /// The gold set references decision ids the store does not know.
    /// Guards against mismatched id schemes between gold set and live data.
    #[error("gold set references unknown decision ids: {missing:?}")]
    UnknownExpectedIds { missing: Vec<String> },

    #[error("failed to load gold set from {path}: {reason}")]
    GoldSetLoadFailed { path: String, reason: String },
}
