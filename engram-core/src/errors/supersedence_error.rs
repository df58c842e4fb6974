/// Supersedence detector errors.
#[derive(Debug, thiserror::Error)]
pub enum SupersedenceError {
    /// Marking `old_id` superseded by `new_id` would close a loop in the
    /// supersedence forest. Surfaced, never silently resolved.
    #[error("supersedence cycle: {old_id} is an ancestor of {new_id}")]
    CycleDetected { old_id: String, new_id: String },

    /// A `superseded_by` walk exceeded the depth bound — corrupt chain.
    #[error("supersedence chain from {id} exceeds depth {depth}")]
    ChainTooDeep { id: String, depth: usize },
}
