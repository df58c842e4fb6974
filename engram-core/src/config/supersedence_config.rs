use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants;

/// Supersedence detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupersedenceConfig {
    /// Similarity above which an existing open decision is superseded.
    pub similarity_threshold: f64,
    /// When false (default), similarity is measured on the canonicalized
    /// head alone. When true, the embedding text blends head and context.
    pub blend_context: bool,
    /// Depth bound for `superseded_by` chain walks.
    pub max_chain_depth: usize,
}

impl Default for SupersedenceConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: defaults::DEFAULT_SUPERSEDENCE_THRESHOLD,
            blend_context: false,
            max_chain_depth: constants::MAX_CHAIN_DEPTH,
        }
    }
}
