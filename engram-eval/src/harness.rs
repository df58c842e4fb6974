//! Gold-set replay through the live retrieval pipeline.

use std::collections::BTreeSet;

use engram_core::config::EvalConfig;
use engram_core::decision::DecisionStatus;
use engram_core::models::{EvaluationReport, GateOutcomes, LatencyPercentiles};
use engram_core::errors::EngramResult;
use engram_core::traits::IDecisionStore;
use engram_retrieval::RetrievalEngine;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::gold::GoldSet;
use crate::metrics;

/// Outcome of replaying one gold case.
struct CaseOutcome {
    expected: BTreeSet<String>,
    retrieved: Vec<String>,
    superseded_returned: usize,
    /// None when retrieval errored; errored cases carry no latency sample.
    elapsed_ms: Option<f64>,
    degraded: bool,
}

/// Replays a gold set and aggregates the quality metrics the release gates
/// consume. Cases run in parallel; aggregation is serial and deterministic.
pub struct Harness {
    config: EvalConfig,
}

impl Harness {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Run the gold set against a retrieval engine backed by `store`.
    ///
    /// Fails fast on a gold set whose expected ids the store cannot resolve.
    /// Per-case retrieval errors count as failed, degraded cases rather than
    /// aborting the run; an outage mid-evaluation is itself a result.
    pub fn run(
        &self,
        store: &dyn IDecisionStore,
        engine: &RetrievalEngine<'_>,
        gold: &GoldSet,
    ) -> EngramResult<EvaluationReport> {
        gold.assert_resolvable(store)?;

        let k = self.config.failure_k.max(self.config.precision_recall_k);
        let outcomes: Vec<CaseOutcome> = gold
            .cases()
            .par_iter()
            .map(|case| {
                let tag = case.tags.first().map(String::as_str).unwrap_or("");
                match engine.retrieve(&case.query, tag, k) {
                    Ok(result) => CaseOutcome {
                        expected: case.expected_decision_ids.clone(),
                        retrieved: result.ids(),
                        superseded_returned: result
                            .ranked
                            .iter()
                            .filter(|r| r.decision.status == DecisionStatus::Superseded)
                            .count(),
                        elapsed_ms: Some(result.elapsed.as_secs_f64() * 1_000.0),
                        degraded: result.is_degraded(),
                    },
                    Err(e) => {
                        warn!(query = %case.query, error = %e, "gold case failed to retrieve");
                        CaseOutcome {
                            expected: case.expected_decision_ids.clone(),
                            retrieved: Vec::new(),
                            superseded_returned: 0,
                            elapsed_ms: None,
                            degraded: true,
                        }
                    }
                }
            })
            .collect();

        let report = self.aggregate(&outcomes);
        info!(
            cases = report.cases,
            failure_at_k = report.failure_at_k,
            recall_at_10 = report.recall_at_10,
            leakage = report.supersedence_leakage,
            passed = report.passed,
            "evaluation complete"
        );
        Ok(report)
    }

    fn aggregate(&self, outcomes: &[CaseOutcome]) -> EvaluationReport {
        let n = outcomes.len() as f64;
        let pr_k = self.config.precision_recall_k;

        let failures = outcomes
            .iter()
            .filter(|o| metrics::case_failed_at_k(&o.retrieved, &o.expected, self.config.failure_k))
            .count();
        let failure_at_k = failures as f64 / n;

        let precision_at_10 = outcomes
            .iter()
            .map(|o| metrics::precision_at_k(&o.retrieved, &o.expected, pr_k))
            .sum::<f64>()
            / n;
        let recall_at_10 = outcomes
            .iter()
            .map(|o| metrics::recall_at_k(&o.retrieved, &o.expected, pr_k))
            .sum::<f64>()
            / n;

        let total_returned: usize = outcomes.iter().map(|o| o.retrieved.len()).sum();
        let total_superseded: usize = outcomes.iter().map(|o| o.superseded_returned).sum();
        let supersedence_leakage = if total_returned == 0 {
            0.0
        } else {
            total_superseded as f64 / total_returned as f64
        };

        // Errored cases never produced a response, so they have no latency;
        // sampling them as zero would drag the percentiles down.
        let latencies: Vec<f64> = outcomes.iter().filter_map(|o| o.elapsed_ms).collect();
        let latency = LatencyPercentiles {
            p50_ms: metrics::percentile(&latencies, 50.0),
            p95_ms: metrics::percentile(&latencies, 95.0),
            p99_ms: metrics::percentile(&latencies, 99.0),
        };

        let degraded_case_fraction =
            outcomes.iter().filter(|o| o.degraded).count() as f64 / n;

        let t = &self.config.thresholds;
        let gates = GateOutcomes {
            failure_at_k: failure_at_k <= t.max_failure_at_k,
            recall_at_10: recall_at_10 >= t.min_recall_at_10,
            supersedence_leakage: supersedence_leakage <= t.max_supersedence_leakage,
        };

        EvaluationReport {
            cases: outcomes.len(),
            k: self.config.failure_k,
            failure_at_k,
            precision_at_10,
            recall_at_10,
            supersedence_leakage,
            latency,
            degraded_case_fraction,
            gates,
            passed: gates.all_passed(),
        }
    }
}
