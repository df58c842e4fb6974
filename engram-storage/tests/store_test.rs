//! Integration tests: CRUD, search, and supersedence transitions.

use std::collections::BTreeSet;

use engram_core::decision::{Decision, DecisionStatus, StatusEventKind};
use engram_core::errors::{EngramError, StorageError};
use engram_core::traits::IDecisionStore;
use engram_storage::StorageEngine;

fn make_decision(head: &str, context: &str) -> Decision {
    Decision::new(
        head,
        head.to_lowercase(),
        context,
        BTreeSet::new(),
        BTreeSet::new(),
    )
}

fn make_embedded_decision(head: &str, embedding: Vec<f32>) -> Decision {
    let mut d = make_decision(head, "");
    d.head_embedding = Some(embedding);
    d
}

#[test]
fn put_then_get_round_trips() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let mut d = make_decision("Use PostgreSQL for storage", "evaluated sqlite and mysql");
    d.entities.insert("postgresql".to_string());
    d.files.insert("docs/adr/001-storage.md".to_string());

    engine.put(&d).unwrap();
    let loaded = engine.get(&d.id).unwrap().expect("decision should exist");

    assert_eq!(loaded.id, d.id);
    assert_eq!(loaded.head, "Use PostgreSQL for storage");
    assert_eq!(loaded.canonical_head, "use postgresql for storage");
    assert_eq!(loaded.status, DecisionStatus::Open);
    assert!(loaded.entities.contains("postgresql"));
    assert!(loaded.files.contains("docs/adr/001-storage.md"));
}

#[test]
fn get_unknown_id_is_none() {
    let engine = StorageEngine::open_in_memory().unwrap();
    assert!(engine.get("no-such-id").unwrap().is_none());
}

#[test]
fn put_rejects_empty_head() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let d = make_decision("   ", "context");
    let err = engine.put(&d).unwrap_err();
    assert!(matches!(err, EngramError::Validation { .. }));
}

#[test]
fn lexical_search_finds_by_head_and_context() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .put(&make_decision("Use PostgreSQL for storage", ""))
        .unwrap();
    engine
        .put(&make_decision("Deploy on Kubernetes", "cluster runs postgresql too"))
        .unwrap();
    engine.put(&make_decision("Adopt rustfmt", "")).unwrap();

    let hits = engine.lexical_search("postgresql", 10).unwrap();
    assert_eq!(hits.len(), 2);
    for (_, score) in &hits {
        assert!(*score > 0.0 && *score < 1.0);
    }

    let none = engine.lexical_search("nonexistentterm", 10).unwrap();
    assert!(none.is_empty());
}

/// A term present in every row has bm25 IDF <= 0, so raw ranks come back
/// zero or positive. The matches must still score well above the default
/// lexical noise floor rather than vanish from small stores.
#[test]
fn lexical_search_scores_ubiquitous_terms_above_the_noise_floor() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .put(&make_decision("Use PostgreSQL for storage", ""))
        .unwrap();
    engine
        .put(&make_decision("Keep storage schemas in migrations", ""))
        .unwrap();

    let hits = engine.lexical_search("storage", 10).unwrap();
    assert_eq!(hits.len(), 2);
    for (_, score) in &hits {
        assert!(*score >= 0.1, "match scored {score}, below the floor");
    }
}

#[test]
fn lexical_search_survives_fts_syntax_in_query() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .put(&make_decision("Use PostgreSQL for storage", ""))
        .unwrap();
    // Quotes, parens, and operators must not produce an FTS syntax error.
    let hits = engine
        .lexical_search("\"postgresql\" AND (storage OR *)", 10)
        .unwrap();
    assert!(!hits.is_empty());
}

#[test]
fn vector_search_orders_by_cosine() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let close = make_embedded_decision("Use PostgreSQL", vec![1.0, 0.0, 0.1]);
    let far = make_embedded_decision("Adopt rustfmt", vec![0.0, 1.0, 0.0]);
    engine.put(&close).unwrap();
    engine.put(&far).unwrap();

    let hits = engine.vector_search(&[1.0, 0.0, 0.0], 10).unwrap();
    assert_eq!(hits[0].0, close.id);
    assert!(hits[0].1 > 0.9);
}

#[test]
fn vector_search_skips_dimension_mismatches() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .put(&make_embedded_decision("two dims", vec![1.0, 0.0]))
        .unwrap();
    let hits = engine.vector_search(&[1.0, 0.0, 0.0], 10).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn mark_superseded_flips_status_and_sets_pointer() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let old = make_decision("Use PostgreSQL", "");
    let new = make_decision("Use PostgreSQL with pgvector", "");
    engine.put(&old).unwrap();
    engine.put(&new).unwrap();

    engine.mark_superseded(&old.id, &new.id).unwrap();

    let loaded = engine.get(&old.id).unwrap().unwrap();
    assert_eq!(loaded.status, DecisionStatus::Superseded);
    assert_eq!(loaded.superseded_by.as_deref(), Some(new.id.as_str()));
    assert!(loaded.status_consistent());
}

#[test]
fn mark_superseded_is_idempotent_for_same_pair() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let old = make_decision("Use PostgreSQL", "");
    let new = make_decision("Use PostgreSQL with pgvector", "");
    engine.put(&old).unwrap();
    engine.put(&new).unwrap();

    engine.mark_superseded(&old.id, &new.id).unwrap();
    engine.mark_superseded(&old.id, &new.id).unwrap();

    let loaded = engine.get(&old.id).unwrap().unwrap();
    assert_eq!(loaded.superseded_by.as_deref(), Some(new.id.as_str()));
    // One superseded event, not two.
    let events = engine.status_history(&old.id).unwrap();
    let superseded_events = events
        .iter()
        .filter(|e| e.kind == StatusEventKind::Superseded)
        .count();
    assert_eq!(superseded_events, 1);
}

#[test]
fn mark_superseded_conflicts_on_different_successor() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let old = make_decision("Use PostgreSQL", "");
    let b = make_decision("Use PostgreSQL 15", "");
    let c = make_decision("Use PostgreSQL 16", "");
    engine.put(&old).unwrap();
    engine.put(&b).unwrap();
    engine.put(&c).unwrap();

    engine.mark_superseded(&old.id, &b.id).unwrap();
    let err = engine.mark_superseded(&old.id, &c.id).unwrap_err();
    assert!(matches!(
        err,
        EngramError::Storage(StorageError::Conflict { .. })
    ));

    // First writer's pointer is untouched.
    let loaded = engine.get(&old.id).unwrap().unwrap();
    assert_eq!(loaded.superseded_by.as_deref(), Some(b.id.as_str()));
}

#[test]
fn mark_superseded_rejects_successor_that_predates_the_decision() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let old = make_decision("Use PostgreSQL", "");
    let mut stale = make_decision("Use MySQL", "");
    stale.created_at = old.created_at - chrono::Duration::days(1);
    stale.updated_at = stale.created_at;
    engine.put(&old).unwrap();
    engine.put(&stale).unwrap();

    let err = engine.mark_superseded(&old.id, &stale.id).unwrap_err();
    assert!(matches!(
        err,
        EngramError::Storage(StorageError::Conflict { .. })
    ));
    assert_eq!(
        engine.get(&old.id).unwrap().unwrap().status,
        DecisionStatus::Open
    );
}

#[test]
fn mark_superseded_rejects_self() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let d = make_decision("Use PostgreSQL", "");
    engine.put(&d).unwrap();
    let err = engine.mark_superseded(&d.id, &d.id).unwrap_err();
    assert!(matches!(
        err,
        EngramError::Storage(StorageError::Conflict { .. })
    ));
}

#[test]
fn mark_superseded_requires_both_rows() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let d = make_decision("Use PostgreSQL", "");
    engine.put(&d).unwrap();
    let err = engine.mark_superseded(&d.id, "ghost").unwrap_err();
    assert!(matches!(
        err,
        EngramError::Storage(StorageError::DecisionNotFound { .. })
    ));
}

#[test]
fn retraction_is_terminal_and_conflicts_with_supersedence() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let d = make_decision("Use PostgreSQL", "");
    let newer = make_decision("Use MySQL", "");
    engine.put(&d).unwrap();
    engine.put(&newer).unwrap();

    engine.mark_retracted(&d.id).unwrap();
    engine.mark_retracted(&d.id).unwrap(); // idempotent

    let err = engine.mark_superseded(&d.id, &newer.id).unwrap_err();
    assert!(matches!(
        err,
        EngramError::Storage(StorageError::Conflict { .. })
    ));
    assert_eq!(
        engine.get(&d.id).unwrap().unwrap().status,
        DecisionStatus::Retracted
    );
}

#[test]
fn status_history_records_lifecycle_in_order() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let old = make_decision("Use PostgreSQL", "");
    let new = make_decision("Use PostgreSQL with pgvector", "");
    engine.put(&old).unwrap();
    engine.put(&new).unwrap();
    engine.mark_superseded(&old.id, &new.id).unwrap();

    let events = engine.status_history(&old.id).unwrap();
    let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![StatusEventKind::Created, StatusEventKind::Superseded]);
    assert_eq!(
        events[1].detail["superseded_by"].as_str(),
        Some(new.id.as_str())
    );
}

#[test]
fn open_decisions_excludes_superseded_and_retracted() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let a = make_decision("Decision A", "");
    let b = make_decision("Decision B", "");
    let c = make_decision("Decision C", "");
    engine.put(&a).unwrap();
    engine.put(&b).unwrap();
    engine.put(&c).unwrap();
    engine.mark_superseded(&a.id, &b.id).unwrap();
    engine.mark_retracted(&c.id).unwrap();

    let open = engine.open_decisions().unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, b.id);

    let counts: std::collections::HashMap<_, _> =
        engine.count_by_status().unwrap().into_iter().collect();
    assert_eq!(counts[&DecisionStatus::Open], 1);
    assert_eq!(counts[&DecisionStatus::Superseded], 1);
    assert_eq!(counts[&DecisionStatus::Retracted], 1);
}

#[test]
fn embedding_round_trips_through_put_get() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let d = make_embedded_decision("Use PostgreSQL", vec![0.25, -0.5, 1.0]);
    engine.put(&d).unwrap();
    let loaded = engine.get(&d.id).unwrap().unwrap();
    assert_eq!(loaded.head_embedding, Some(vec![0.25, -0.5, 1.0]));
}
