//! Detection behavior over a real store: threshold flips, lexical fallback
//! during embedder outages, and cycle refusal.

use engram_core::config::SupersedenceConfig;
use engram_core::decision::{DecisionStatus, StatusEventKind};
use engram_core::errors::{EngramError, SupersedenceError};
use engram_core::traits::IDecisionStore;
use engram_storage::StorageEngine;
use engram_supersedence::writer::DecisionDraft;
use engram_supersedence::{chain, DecisionWriter, SupersedenceDetector};
use test_fixtures::{axis, decision, seed_store, FailingEmbedder, StaticEmbedder};

const DIMS: usize = 8;

fn draft(head: &str) -> DecisionDraft {
    DecisionDraft {
        head: head.to_string(),
        ..DecisionDraft::default()
    }
}

#[test]
fn similar_new_decision_supersedes_the_open_original() {
    let store = StorageEngine::open_in_memory().unwrap();
    // cos(new, old) ≈ 0.9, above the 0.8 threshold.
    let near = {
        let mut v = vec![0.0f32; DIMS];
        v[0] = 0.9;
        v[1] = (1.0f32 - 0.81).sqrt();
        v
    };
    let embedder = StaticEmbedder::new(DIMS)
        .with("use postgresql for storage", axis(DIMS, 0))
        .with("use mysql for storage", near);
    let writer = DecisionWriter::new(&store, SupersedenceConfig::default()).with_embedder(&embedder);

    let first = writer.put_decision(draft("Use MySQL for storage")).unwrap();
    assert!(first.superseded.is_empty());

    let second = writer
        .put_decision(draft("Switch to Postgres for storage"))
        .unwrap();
    assert_eq!(second.superseded, vec![first.decision.id.clone()]);

    let old = store.get(&first.decision.id).unwrap().unwrap();
    assert_eq!(old.status, DecisionStatus::Superseded);
    assert_eq!(old.superseded_by.as_deref(), Some(second.decision.id.as_str()));

    let history = store.status_history(&old.id).unwrap();
    let kinds: Vec<StatusEventKind> = history.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![StatusEventKind::Created, StatusEventKind::Superseded]);
}

#[test]
fn dissimilar_decisions_both_stay_open() {
    let store = StorageEngine::open_in_memory().unwrap();
    let embedder = StaticEmbedder::new(DIMS)
        .with("use postgresql for storage", axis(DIMS, 0))
        .with("deploy on kubernetes", axis(DIMS, 1));
    let writer = DecisionWriter::new(&store, SupersedenceConfig::default()).with_embedder(&embedder);

    writer.put_decision(draft("Use PostgreSQL for storage")).unwrap();
    let outcome = writer.put_decision(draft("Deploy on Kubernetes")).unwrap();

    assert!(outcome.superseded.is_empty());
    assert_eq!(store.open_decisions().unwrap().len(), 2);
}

#[test]
fn embedder_outage_never_blocks_the_write() {
    let store = StorageEngine::open_in_memory().unwrap();
    let embedder = FailingEmbedder;
    let writer = DecisionWriter::new(&store, SupersedenceConfig::default()).with_embedder(&embedder);

    let outcome = writer.put_decision(draft("Use PostgreSQL for storage")).unwrap();
    assert!(outcome.embedding_degraded);

    let stored = store.get(&outcome.decision.id).unwrap().unwrap();
    assert!(stored.head_embedding.is_none());
    assert_eq!(stored.status, DecisionStatus::Open);
}

#[test]
fn lexical_fallback_still_catches_identical_heads() {
    // Both sides lack embeddings; detection falls back to token overlap on
    // the canonical heads, which the rule table makes identical here.
    let store = StorageEngine::open_in_memory().unwrap();
    let embedder = FailingEmbedder;
    let writer = DecisionWriter::new(&store, SupersedenceConfig::default()).with_embedder(&embedder);

    let first = writer.put_decision(draft("Use PostgreSQL for storage")).unwrap();
    let second = writer
        .put_decision(draft("Switch to postgres, for storage"))
        .unwrap();

    assert_eq!(second.superseded, vec![first.decision.id]);
}

#[test]
fn moderately_overlapping_heads_stay_below_the_fallback_threshold() {
    let store = StorageEngine::open_in_memory().unwrap();
    let writer = DecisionWriter::new(&store, SupersedenceConfig::default());

    writer.put_decision(draft("Use PostgreSQL for storage")).unwrap();
    // Jaccard overlap 3/5 = 0.6 against the first head.
    let outcome = writer.put_decision(draft("Use MySQL for storage")).unwrap();

    assert!(outcome.superseded.is_empty());
    assert_eq!(store.open_decisions().unwrap().len(), 2);
}

#[test]
fn detection_refuses_to_close_a_chain_cycle() {
    let store = StorageEngine::open_in_memory().unwrap();
    let embedder = StaticEmbedder::new(DIMS)
        .with("use mysql for storage", axis(DIMS, 0))
        .with("use postgresql for storage", axis(DIMS, 0));
    let writer = DecisionWriter::new(&store, SupersedenceConfig::default()).with_embedder(&embedder);

    let a = writer.put_decision(draft("Use MySQL for storage")).unwrap();
    let b = writer.put_decision(draft("Use PostgreSQL for storage")).unwrap();
    assert_eq!(b.superseded, vec![a.decision.id.clone()]);

    // Re-running detection for the displaced decision would want to flip
    // its own successor; that must be refused, not applied.
    let detector = SupersedenceDetector::new(&store, SupersedenceConfig::default());
    let a_record = store.get(&a.decision.id).unwrap().unwrap();
    let flipped = detector.on_decision_write(&a_record).unwrap();
    assert!(flipped.is_empty());

    let b_record = store.get(&b.decision.id).unwrap().unwrap();
    assert_eq!(b_record.status, DecisionStatus::Open);
}

#[test]
fn manual_mark_surfaces_cycles_as_errors() {
    let store = StorageEngine::open_in_memory().unwrap();
    let new = decision("Use PostgreSQL for storage").build();
    let old = decision("Use MySQL for storage")
        .superseded_by(&new.id)
        .build();
    seed_store(&store, &[new.clone(), old.clone()]).unwrap();

    let detector = SupersedenceDetector::new(&store, SupersedenceConfig::default());
    let err = detector.mark(&new.id, &old.id).unwrap_err();
    assert!(matches!(
        err,
        EngramError::Supersedence(SupersedenceError::CycleDetected { .. })
    ));
}

#[test]
fn walk_chain_follows_successor_pointers_in_order() {
    let store = StorageEngine::open_in_memory().unwrap();
    let c = decision("Use PostgreSQL with pgvector").build();
    let b = decision("Use PostgreSQL").superseded_by(&c.id).build();
    let a = decision("Use MySQL").superseded_by(&b.id).build();
    seed_store(&store, &[c.clone(), b.clone(), a.clone()]).unwrap();

    let visited = chain::walk_chain(&store, &a.id, 50).unwrap();
    assert_eq!(visited, vec![a.id, b.id, c.id]);
}

#[test]
fn chain_walks_are_depth_bounded() {
    let store = StorageEngine::open_in_memory().unwrap();
    let b = decision("Use PostgreSQL").build();
    let a = decision("Use MySQL").superseded_by(&b.id).build();
    seed_store(&store, &[b, a.clone()]).unwrap();

    let err = chain::walk_chain(&store, &a.id, 1).unwrap_err();
    assert!(matches!(
        err,
        EngramError::Supersedence(SupersedenceError::ChainTooDeep { .. })
    ));
}
