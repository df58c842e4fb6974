use serde::{Deserialize, Serialize};

use super::defaults;

/// Scoring & ranking configuration. Each adjustment is independently
/// toggleable; bonuses are additive on the normalized base score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub status_adjustment: bool,
    pub status_open_bonus: f64,
    pub status_superseded_penalty: f64,

    pub cosign: bool,
    pub cosign_bonus: f64,
    /// Rank cutoff (in both raw pools) for the co-sign bonus.
    pub cosign_top_k: usize,

    pub entity_overlap: bool,
    pub entity_overlap_bonus: f64,
    /// Allow-list the query's entity extraction matches against.
    pub entity_allow_list: Vec<String>,

    /// Output-composition cap for the packed context, applied after ranking.
    pub max_per_query: usize,

    /// Clamp final scores to [0, 1]. The bonuses carry no normalization
    /// guarantee of their own; clamping keeps scores comparable across
    /// queries. Toggle off for unbounded accumulation.
    pub clamp_scores: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            status_adjustment: true,
            status_open_bonus: defaults::DEFAULT_STATUS_OPEN_BONUS,
            status_superseded_penalty: defaults::DEFAULT_STATUS_SUPERSEDED_PENALTY,
            cosign: true,
            cosign_bonus: defaults::DEFAULT_COSIGN_BONUS,
            cosign_top_k: defaults::DEFAULT_COSIGN_TOP_K,
            entity_overlap: true,
            entity_overlap_bonus: defaults::DEFAULT_ENTITY_OVERLAP_BONUS,
            entity_allow_list: Vec::new(),
            max_per_query: defaults::DEFAULT_MAX_PER_QUERY,
            clamp_scores: true,
        }
    }
}
