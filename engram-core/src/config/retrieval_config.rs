use serde::{Deserialize, Serialize};

use super::defaults;

/// Hybrid retriever configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Candidates fetched from the lexical pool (k1).
    pub lexical_pool_size: usize,
    /// Candidates fetched from the vector pool (k2).
    pub vector_pool_size: usize,
    /// Floor for candidates surfaced only via lexical search.
    pub lexical_floor: f64,
    /// Floor for candidates surfaced only via vector search.
    /// Candidates surfaced by both signals bypass the individual floors.
    pub vector_floor: f64,
    /// Per-signal deadline; a signal that misses it degrades to unavailable
    /// rather than hanging the request.
    pub signal_timeout_ms: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            lexical_pool_size: defaults::DEFAULT_LEXICAL_POOL_SIZE,
            vector_pool_size: defaults::DEFAULT_VECTOR_POOL_SIZE,
            lexical_floor: defaults::DEFAULT_LEXICAL_FLOOR,
            vector_floor: defaults::DEFAULT_VECTOR_FLOOR,
            signal_timeout_ms: defaults::DEFAULT_SIGNAL_TIMEOUT_MS,
        }
    }
}
