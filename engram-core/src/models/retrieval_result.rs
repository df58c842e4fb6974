use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::decision::Decision;

/// A retrieval signal. New signal kinds can be added without touching the
/// merge/dedup logic, which is generic over this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Lexical,
    Vector,
}

/// Per-candidate score decomposition, kept so ranking regressions can be
/// traced back to the signal or bonus that moved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Raw lexical score (0..1), if the lexical signal surfaced this candidate.
    pub lexical: Option<f64>,
    /// Raw cosine similarity, if the vector signal surfaced this candidate.
    pub vector: Option<f64>,
    /// Normalized base score before adjustments.
    pub base: f64,
    /// Status bonus/penalty (+open, -superseded).
    pub status_adjust: f64,
    /// Co-sign bonus when both signals agree in their top ranks.
    pub cosign_bonus: f64,
    /// Entity-overlap bonus.
    pub entity_bonus: f64,
}

/// One ranked entry in a retrieval result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedDecision {
    pub decision: Decision,
    /// Final score after all adjustments.
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

impl RankedDecision {
    pub fn decision_id(&self) -> &str {
        &self.decision.id
    }
}

/// Ephemeral per-query result. Produced, returned (or logged for
/// evaluation), and discarded — never persisted.
#[derive(Debug, Clone)]
pub struct RetrievalResult {
    pub ranked: Vec<RankedDecision>,
    /// Wall-clock time spent inside `retrieve`.
    pub elapsed: Duration,
    /// Signals that were configured but did not contribute (outage or
    /// timeout). Empty for a fully healthy response.
    pub degraded: Vec<SignalKind>,
}

impl RetrievalResult {
    /// Ranked decision ids, in order.
    pub fn ids(&self) -> Vec<String> {
        self.ranked.iter().map(|r| r.decision.id.clone()).collect()
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}
