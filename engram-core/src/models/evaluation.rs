use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A gold-standard evaluation tuple. Immutable once loaded for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationCase {
    pub query: String,
    pub expected_decision_ids: BTreeSet<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Latency percentiles in milliseconds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LatencyPercentiles {
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
}

/// Pass/fail per configured gate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GateOutcomes {
    pub failure_at_k: bool,
    pub recall_at_10: bool,
    pub supersedence_leakage: bool,
}

impl GateOutcomes {
    pub fn all_passed(&self) -> bool {
        self.failure_at_k && self.recall_at_10 && self.supersedence_leakage
    }
}

/// The report the evaluation harness emits; serializes to the JSON the
/// release gate consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub cases: usize,
    /// K used for Failure@K.
    pub k: usize,
    /// Fraction of cases where no expected id appeared in the top-K.
    pub failure_at_k: f64,
    pub precision_at_10: f64,
    pub recall_at_10: f64,
    /// Fraction of returned decisions (across all cases) that were superseded.
    pub supersedence_leakage: f64,
    pub latency: LatencyPercentiles,
    /// Fraction of cases answered from a degraded pipeline, so quality
    /// drops caused by outages are distinguishable from ranking regressions.
    pub degraded_case_fraction: f64,
    pub gates: GateOutcomes,
    pub passed: bool,
}

impl EvaluationReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
