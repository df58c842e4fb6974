use crate::errors::EngramResult;

/// Produces fixed-dimension embeddings for decision heads and queries.
/// An embedder failure must never block a decision write — callers degrade
/// to lexical-only behavior and log.
pub trait IEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> EngramResult<Vec<f32>>;

    /// Dimension of every vector this embedder produces.
    fn dimensions(&self) -> usize;
}
