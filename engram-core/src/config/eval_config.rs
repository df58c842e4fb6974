use serde::{Deserialize, Serialize};

use super::defaults;

/// Release-gate thresholds for the evaluation harness.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub max_failure_at_k: f64,
    pub min_recall_at_10: f64,
    pub max_supersedence_leakage: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_failure_at_k: defaults::DEFAULT_MAX_FAILURE_AT_K,
            min_recall_at_10: defaults::DEFAULT_MIN_RECALL_AT_10,
            max_supersedence_leakage: defaults::DEFAULT_MAX_LEAKAGE,
        }
    }
}

/// Evaluation harness configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// K for Failure@K.
    pub failure_k: usize,
    /// K for Precision@K / Recall@K.
    pub precision_recall_k: usize,
    pub thresholds: Thresholds,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            failure_k: defaults::DEFAULT_FAILURE_K,
            precision_recall_k: defaults::DEFAULT_PRECISION_RECALL_K,
            thresholds: Thresholds::default(),
        }
    }
}
