//! The supersedence detector: compares a freshly written decision against
//! every open decision and flips the ones it replaces.

use std::collections::BTreeSet;

use engram_core::config::SupersedenceConfig;
use engram_core::decision::Decision;
use engram_core::errors::{EngramError, EngramResult, StorageError, SupersedenceError};
use engram_core::traits::IDecisionStore;
use tracing::{debug, info, warn};

use crate::chain;

/// Scans the open set after each write. Similarity is cosine over stored
/// head embeddings when both sides have one, and token overlap on the
/// canonical heads otherwise, so detection keeps working through embedder
/// outages (at reduced recall).
pub struct SupersedenceDetector<'a> {
    store: &'a dyn IDecisionStore,
    config: SupersedenceConfig,
}

impl<'a> SupersedenceDetector<'a> {
    pub fn new(store: &'a dyn IDecisionStore, config: SupersedenceConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SupersedenceConfig {
        &self.config
    }

    /// Run detection for `new`, which must already be persisted. Returns the
    /// ids of decisions marked superseded. Per-candidate failures (lost
    /// races, refused cycles) are logged and skipped; only store outages
    /// propagate.
    pub fn on_decision_write(&self, new: &Decision) -> EngramResult<Vec<String>> {
        let mut superseded = Vec::new();

        for candidate in self.store.open_decisions()? {
            if candidate.id == new.id {
                continue;
            }
            let similarity = self.similarity(new, &candidate);
            if similarity < self.config.similarity_threshold {
                continue;
            }
            debug!(
                old_id = %candidate.id,
                new_id = %new.id,
                similarity,
                "supersedence candidate above threshold"
            );

            if chain::would_create_cycle(
                self.store,
                &candidate.id,
                &new.id,
                self.config.max_chain_depth,
            )? {
                warn!(
                    old_id = %candidate.id,
                    new_id = %new.id,
                    "refusing supersedence that would close a chain cycle"
                );
                continue;
            }

            match self.store.mark_superseded(&candidate.id, &new.id) {
                Ok(()) => {
                    info!(old_id = %candidate.id, new_id = %new.id, similarity, "decision superseded");
                    superseded.push(candidate.id);
                }
                // Another writer got there first; their pointer stands.
                Err(EngramError::Storage(StorageError::Conflict { id, reason })) => {
                    warn!(old_id = %id, %reason, "supersedence flip lost to a concurrent writer");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(superseded)
    }

    /// Similarity between two decisions on their canonical heads.
    fn similarity(&self, a: &Decision, b: &Decision) -> f64 {
        match (&a.head_embedding, &b.head_embedding) {
            (Some(va), Some(vb)) if va.len() == vb.len() => cosine(va, vb),
            _ => token_overlap(&a.canonical_head, &b.canonical_head),
        }
    }

    /// Mark a supersedence decided outside the detector (manual curation),
    /// with the same cycle refusal.
    pub fn mark(&self, old_id: &str, new_id: &str) -> EngramResult<()> {
        if chain::would_create_cycle(self.store, old_id, new_id, self.config.max_chain_depth)? {
            return Err(EngramError::Supersedence(SupersedenceError::CycleDetected {
                old_id: old_id.to_string(),
                new_id: new_id.to_string(),
            }));
        }
        self.store.mark_superseded(old_id, new_id)
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Jaccard overlap of canonical-head token sets. The lexical fallback when
/// either side lacks an embedding.
fn token_overlap(a: &str, b: &str) -> f64 {
    let ta: BTreeSet<&str> = a.split_whitespace().collect();
    let tb: BTreeSet<&str> = b.split_whitespace().collect();
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    let intersection = ta.intersection(&tb).count() as f64;
    let union = ta.union(&tb).count() as f64;
    intersection / union
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = [0.6f32, 0.8, 0.0];
        assert!((cosine(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert_eq!(cosine(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn zero_vector_matches_nothing() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn token_overlap_is_jaccard() {
        // {use, postgresql, for, storage} vs {use, mysql, for, storage}
        let sim = token_overlap("use postgresql for storage", "use mysql for storage");
        assert!((sim - 0.6).abs() < 1e-9);
        assert_eq!(token_overlap("use postgresql", "use postgresql"), 1.0);
        assert_eq!(token_overlap("", "use postgresql"), 0.0);
    }
}
