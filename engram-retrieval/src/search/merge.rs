//! Merge the lexical and vector candidate pools by decision id.
//!
//! UNION ALL → DISTINCT ON (decision_id) semantics: a decision present in
//! both pools keeps the union of its signal scores, never a double-counted
//! entry, and the first occurrence per signal wins.

use std::collections::HashMap;

use engram_core::config::RetrievalConfig;

/// A merged candidate carrying whatever signal evidence surfaced it.
/// Ranks are positions in the raw per-signal pools, kept for the co-sign check.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: String,
    pub lexical: Option<f64>,
    pub vector: Option<f64>,
    pub lexical_rank: Option<usize>,
    pub vector_rank: Option<usize>,
}

impl Candidate {
    /// Both independent signals agree this candidate is relevant.
    pub fn cosigned(&self) -> bool {
        self.lexical.is_some() && self.vector.is_some()
    }
}

/// Union two ranked pools, deduplicating by decision id.
pub fn merge(lexical: &[(String, f64)], vector: &[(String, f64)]) -> Vec<Candidate> {
    let mut order: Vec<String> = Vec::new();
    let mut by_id: HashMap<String, Candidate> = HashMap::new();

    for (rank, (id, score)) in lexical.iter().enumerate() {
        let entry = by_id.entry(id.clone()).or_insert_with(|| {
            order.push(id.clone());
            Candidate {
                id: id.clone(),
                lexical: None,
                vector: None,
                lexical_rank: None,
                vector_rank: None,
            }
        });
        if entry.lexical.is_none() {
            entry.lexical = Some(*score);
            entry.lexical_rank = Some(rank);
        }
    }

    for (rank, (id, score)) in vector.iter().enumerate() {
        let entry = by_id.entry(id.clone()).or_insert_with(|| {
            order.push(id.clone());
            Candidate {
                id: id.clone(),
                lexical: None,
                vector: None,
                lexical_rank: None,
                vector_rank: None,
            }
        });
        if entry.vector.is_none() {
            entry.vector = Some(*score);
            entry.vector_rank = Some(rank);
        }
    }

    order
        .into_iter()
        .filter_map(|id| by_id.remove(&id))
        .collect()
}

/// Drop single-signal candidates below their noise floor. Co-signed
/// candidates bypass the individual floors — agreement between independent
/// signals is itself sufficient evidence.
pub fn apply_floors(candidates: Vec<Candidate>, config: &RetrievalConfig) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|c| {
            if c.cosigned() {
                return true;
            }
            match (c.lexical, c.vector) {
                (Some(lex), None) => lex >= config.lexical_floor,
                (None, Some(vec)) => vec >= config.vector_floor,
                _ => false,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(entries: &[(&str, f64)]) -> Vec<(String, f64)> {
        entries.iter().map(|(id, s)| (id.to_string(), *s)).collect()
    }

    #[test]
    fn union_keeps_one_entry_per_id() {
        let merged = merge(
            &pool(&[("a", 0.9), ("b", 0.5)]),
            &pool(&[("b", 0.8), ("c", 0.7)]),
        );
        assert_eq!(merged.len(), 3);
        let b = merged.iter().find(|c| c.id == "b").unwrap();
        assert_eq!(b.lexical, Some(0.5));
        assert_eq!(b.vector, Some(0.8));
        assert!(b.cosigned());
    }

    #[test]
    fn first_occurrence_per_signal_wins() {
        let merged = merge(&pool(&[("a", 0.9), ("a", 0.1)]), &[]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].lexical, Some(0.9));
        assert_eq!(merged[0].lexical_rank, Some(0));
    }

    #[test]
    fn floors_drop_weak_single_signal_candidates() {
        let config = RetrievalConfig::default();
        let merged = merge(
            &pool(&[("weak-lex", 0.03), ("strong-lex", 0.4)]),
            &pool(&[("weak-vec", 0.5), ("strong-vec", 0.8)]),
        );
        let kept = apply_floors(merged, &config);
        let ids: Vec<&str> = kept.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["strong-lex", "strong-vec"]);
    }

    #[test]
    fn cosigned_candidates_bypass_floors() {
        let config = RetrievalConfig::default();
        let merged = merge(&pool(&[("both", 0.01)]), &pool(&[("both", 0.2)]));
        let kept = apply_floors(merged, &config);
        assert_eq!(kept.len(), 1);
    }
}
