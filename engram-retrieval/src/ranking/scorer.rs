//! Base-score normalization plus the additive adjustment ladder:
//! status → co-sign → entity overlap, each independently toggleable.

use std::collections::{BTreeSet, HashMap};

use engram_core::config::ScoringConfig;
use engram_core::decision::{Decision, DecisionStatus};
use engram_core::models::{RankedDecision, ScoreBreakdown};

use crate::search::Candidate;

/// Score merged candidates. `decisions` maps candidate ids to their loaded
/// records; candidates without a record are skipped (deleted between fetch
/// and load cannot happen in an append-only store, but the map lookup stays
/// total).
pub fn score(
    candidates: &[Candidate],
    decisions: &HashMap<String, Decision>,
    query_entities: &BTreeSet<String>,
    config: &ScoringConfig,
) -> Vec<RankedDecision> {
    let lexical_range = signal_range(candidates.iter().filter_map(|c| c.lexical));
    let vector_range = signal_range(candidates.iter().filter_map(|c| c.vector));

    let mut ranked: Vec<RankedDecision> = candidates
        .iter()
        .filter_map(|c| {
            let decision = decisions.get(&c.id)?.clone();

            let norm_lexical = c.lexical.map(|v| normalize(v, lexical_range));
            let norm_vector = c.vector.map(|v| normalize(v, vector_range));
            let base = norm_lexical
                .unwrap_or(0.0)
                .max(norm_vector.unwrap_or(0.0));

            let status_adjust = if config.status_adjustment {
                match decision.status {
                    DecisionStatus::Open => config.status_open_bonus,
                    // Stale either way: sink without fully excluding, so
                    // supersession chains stay discoverable for audit.
                    DecisionStatus::Superseded | DecisionStatus::Retracted => {
                        -config.status_superseded_penalty
                    }
                }
            } else {
                0.0
            };

            let cosign_bonus = if config.cosign && in_cosign_window(c, config.cosign_top_k) {
                config.cosign_bonus
            } else {
                0.0
            };

            let entity_bonus = if config.entity_overlap
                && !query_entities.is_empty()
                && decision.entities.intersection(query_entities).next().is_some()
            {
                config.entity_overlap_bonus
            } else {
                0.0
            };

            let mut final_score = base + status_adjust + cosign_bonus + entity_bonus;
            if config.clamp_scores {
                final_score = final_score.clamp(0.0, 1.0);
            }

            Some(RankedDecision {
                decision,
                score: final_score,
                breakdown: ScoreBreakdown {
                    lexical: c.lexical,
                    vector: c.vector,
                    base,
                    status_adjust,
                    cosign_bonus,
                    entity_bonus,
                },
            })
        })
        .collect();

    // Sort by final score descending; ties break newest-first.
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.decision.created_at.cmp(&a.decision.created_at))
    });

    ranked
}

/// Candidate sits in the top-N of both raw pools.
fn in_cosign_window(candidate: &Candidate, top_k: usize) -> bool {
    matches!(
        (candidate.lexical_rank, candidate.vector_rank),
        (Some(lex), Some(vec)) if lex < top_k && vec < top_k
    )
}

fn signal_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}

/// Min-max normalization to 0..1. A degenerate range (single candidate or
/// all-equal scores) normalizes to 1.0.
fn normalize(value: f64, (min, max): (f64, f64)) -> f64 {
    if !min.is_finite() || !max.is_finite() || (max - min).abs() < f64::EPSILON {
        1.0
    } else {
        (value - min) / (max - min)
    }
}
