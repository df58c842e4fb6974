//! RankingPipeline: score → successor-order enforcement → truncate.

pub mod scorer;

use std::collections::{BTreeSet, HashMap};

use engram_core::config::ScoringConfig;
use engram_core::decision::{Decision, DecisionStatus};
use engram_core::models::RankedDecision;

use crate::search::Candidate;

/// Applies scoring and the rank-order invariant to merged candidates.
pub struct RankingPipeline {
    config: ScoringConfig,
}

impl RankingPipeline {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Rank candidates and keep the top `k`.
    pub fn rank(
        &self,
        candidates: &[Candidate],
        decisions: &HashMap<String, Decision>,
        query_entities: &BTreeSet<String>,
        k: usize,
    ) -> Vec<RankedDecision> {
        let mut ranked = scorer::score(candidates, decisions, query_entities, &self.config);
        enforce_successor_order(&mut ranked);
        ranked.truncate(k);
        ranked
    }
}

/// A superseded decision must never rank above its successor when both are
/// present; violations are fixed by hoisting the successor directly above
/// the stale entry. Runs to a fixpoint: supersedence chains are acyclic, so
/// each hoist strictly reduces the remaining inversions and the loop is
/// bounded by their count. The hoist budget guards against a corrupted
/// (cyclic) chain ever reaching this code.
fn enforce_successor_order(ranked: &mut Vec<RankedDecision>) {
    let mut hoist_budget = ranked.len() * ranked.len() + 1;

    loop {
        let positions: HashMap<String, usize> = ranked
            .iter()
            .enumerate()
            .map(|(i, r)| (r.decision.id.clone(), i))
            .collect();

        let violation = ranked.iter().enumerate().find_map(|(i, r)| {
            if r.decision.status != DecisionStatus::Superseded {
                return None;
            }
            let successor = r.decision.superseded_by.as_deref()?;
            let j = *positions.get(successor)?;
            (j > i).then_some((i, j))
        });

        match violation {
            Some((stale_pos, successor_pos)) => {
                if hoist_budget == 0 {
                    tracing::warn!(
                        "successor ordering did not settle; ranked list carries a supersedence cycle"
                    );
                    return;
                }
                hoist_budget -= 1;
                let successor = ranked.remove(successor_pos);
                ranked.insert(stale_pos, successor);
            }
            None => return,
        }
    }
}
