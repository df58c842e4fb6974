use crate::decision::{Decision, DecisionStatus, StatusEvent};
use crate::errors::EngramResult;

/// Persistence and indexing of decision records. Implementations must be
/// safe to share across retrieval workers (reads are lock-free or pooled;
/// writes are serialized per decision via the Conflict contract).
pub trait IDecisionStore: Send + Sync {
    /// Persist a new decision: row, lexical index entry, embedding link,
    /// and a `created` status event, atomically.
    fn put(&self, decision: &Decision) -> EngramResult<()>;

    fn get(&self, id: &str) -> EngramResult<Option<Decision>>;

    fn get_bulk(&self, ids: &[String]) -> EngramResult<Vec<Decision>>;

    /// BM25-style term search over `head || context_value`. Scores are
    /// normalized to 0..1; ties break newest-first.
    fn lexical_search(&self, text: &str, k: usize) -> EngramResult<Vec<(String, f64)>>;

    /// Cosine similarity over stored head embeddings.
    fn vector_search(&self, embedding: &[f32], k: usize) -> EngramResult<Vec<(String, f64)>>;

    /// Flip `old_id` to superseded-by-`new_id`. Idempotent for the same
    /// pair; `Conflict` when a different successor is already set
    /// (first-writer-wins) or the old decision is retracted.
    fn mark_superseded(&self, old_id: &str, new_id: &str) -> EngramResult<()>;

    /// Manual terminal state. `Conflict` unless currently open.
    fn mark_retracted(&self, id: &str) -> EngramResult<()>;

    /// All decisions currently open (supersedence detection input).
    fn open_decisions(&self) -> EngramResult<Vec<Decision>>;

    /// Append-only audit trail for one decision, oldest first.
    fn status_history(&self, id: &str) -> EngramResult<Vec<StatusEvent>>;

    fn count_by_status(&self) -> EngramResult<Vec<(DecisionStatus, usize)>>;
}
