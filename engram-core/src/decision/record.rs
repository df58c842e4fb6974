use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a decision.
///
/// `Open → Superseded` is made only by the supersedence detector or an
/// explicit store call; `Retracted` is a terminal manual state. Decisions
/// are never physically deleted, only status-flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Open,
    Superseded,
    Retracted,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Superseded => "superseded",
            Self::Retracted => "retracted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "superseded" => Some(Self::Superseded),
            "retracted" => Some(Self::Retracted),
            _ => None,
        }
    }
}

/// A durable record of a choice or fact extracted from conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// UUID v4 identifier, never reused.
    pub id: String,
    /// Short statement of the decision as originally phrased.
    pub head: String,
    /// Canonicalized head, stored at write time so index-time and
    /// query-time normalization stay symmetric.
    pub canonical_head: String,
    pub status: DecisionStatus,
    /// Decision that replaced this one. Non-null iff status is Superseded.
    pub superseded_by: Option<String>,
    /// Normalized entity/tag strings, used for overlap scoring.
    pub entities: BTreeSet<String>,
    /// Resource identifiers (file paths etc.) the decision references.
    pub files: BTreeSet<String>,
    /// Free-text supporting context, searched alongside the head.
    pub context_value: String,
    /// Embedding of the canonical head (optionally blended with context).
    pub head_embedding: Option<Vec<f32>>,
    /// blake3 hash of the canonical head, for embedding dedup.
    pub head_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Decision {
    /// Build a fresh open decision. The caller supplies the canonical head
    /// (the canonicalizer lives upstream of this crate).
    pub fn new(
        head: impl Into<String>,
        canonical_head: impl Into<String>,
        context_value: impl Into<String>,
        entities: BTreeSet<String>,
        files: BTreeSet<String>,
    ) -> Self {
        let canonical_head = canonical_head.into();
        let head_hash = Self::compute_head_hash(&canonical_head);
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            head: head.into(),
            canonical_head,
            status: DecisionStatus::Open,
            superseded_by: None,
            entities,
            files,
            context_value: context_value.into(),
            head_embedding: None,
            head_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// blake3 hash of the canonical head.
    pub fn compute_head_hash(canonical_head: &str) -> String {
        blake3::hash(canonical_head.as_bytes()).to_hex().to_string()
    }

    /// True when the status invariant holds: Superseded iff a successor
    /// pointer is present.
    pub fn status_consistent(&self) -> bool {
        match self.status {
            DecisionStatus::Superseded => self.superseded_by.is_some(),
            _ => self.superseded_by.is_none(),
        }
    }
}

/// Identity equality: two decisions are equal if they share an id.
/// Content changes never change identity (DDD Entity pattern).
impl PartialEq for Decision {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Decision {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_decision_starts_open_without_successor() {
        let d = Decision::new(
            "Use PostgreSQL for storage",
            "use postgresql for storage",
            "",
            BTreeSet::new(),
            BTreeSet::new(),
        );
        assert_eq!(d.status, DecisionStatus::Open);
        assert!(d.superseded_by.is_none());
        assert!(d.status_consistent());
    }

    #[test]
    fn head_hash_tracks_canonical_head_only() {
        let a = Decision::new("Switch to pg", "use postgresql", "ctx a", BTreeSet::new(), BTreeSet::new());
        let b = Decision::new("Use postgres", "use postgresql", "ctx b", BTreeSet::new(), BTreeSet::new());
        assert_eq!(a.head_hash, b.head_hash);
        assert_ne!(a, b);
    }

    #[test]
    fn status_round_trips_through_strings() {
        for s in [
            DecisionStatus::Open,
            DecisionStatus::Superseded,
            DecisionStatus::Retracted,
        ] {
            assert_eq!(DecisionStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(DecisionStatus::parse("archived"), None);
    }
}
