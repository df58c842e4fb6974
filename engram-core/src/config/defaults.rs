//! Default thresholds, pool sizes, and bonuses.

/// Candidates fetched from the lexical signal per query.
pub const DEFAULT_LEXICAL_POOL_SIZE: usize = 60;
/// Candidates fetched from the vector signal per query.
pub const DEFAULT_VECTOR_POOL_SIZE: usize = 60;

/// Minimum lexical score for a candidate surfaced only via lexical search.
pub const DEFAULT_LEXICAL_FLOOR: f64 = 0.05;
/// Minimum cosine similarity for a candidate surfaced only via vector search.
pub const DEFAULT_VECTOR_FLOOR: f64 = 0.6;

/// Per-signal deadline inside one retrieve call.
pub const DEFAULT_SIGNAL_TIMEOUT_MS: u64 = 2_000;

pub const DEFAULT_STATUS_OPEN_BONUS: f64 = 0.2;
pub const DEFAULT_STATUS_SUPERSEDED_PENALTY: f64 = 0.3;
pub const DEFAULT_COSIGN_BONUS: f64 = 0.1;
/// A candidate must sit in the top-N of both raw pools to earn the co-sign bonus.
pub const DEFAULT_COSIGN_TOP_K: usize = 5;
pub const DEFAULT_ENTITY_OVERLAP_BONUS: f64 = 0.15;

/// At most this many decisions per query in the packed context.
pub const DEFAULT_MAX_PER_QUERY: usize = 2;

/// Head-similarity threshold above which a new decision supersedes an old one.
pub const DEFAULT_SUPERSEDENCE_THRESHOLD: f64 = 0.8;

/// K for Failure@K.
pub const DEFAULT_FAILURE_K: usize = 20;
/// K for Precision@K / Recall@K.
pub const DEFAULT_PRECISION_RECALL_K: usize = 10;

pub const DEFAULT_MAX_FAILURE_AT_K: f64 = 0.20;
pub const DEFAULT_MIN_RECALL_AT_10: f64 = 0.7;
pub const DEFAULT_MAX_LEAKAGE: f64 = 0.01;
