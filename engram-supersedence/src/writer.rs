//! The decision write path: canonicalize, embed, persist, detect.

use std::collections::BTreeSet;

use engram_core::config::SupersedenceConfig;
use engram_core::decision::Decision;
use engram_core::errors::{EngramError, EngramResult};
use engram_core::traits::{IDecisionStore, IEmbedder};
use engram_retrieval::Canonicalizer;
use tracing::warn;

use crate::detector::SupersedenceDetector;

/// Input for a decision write, as extracted from conversation upstream.
#[derive(Debug, Clone, Default)]
pub struct DecisionDraft {
    pub head: String,
    pub context: String,
    pub entities: Vec<String>,
    pub files: Vec<String>,
}

/// What a write produced: the persisted record, the decisions it displaced,
/// and whether the embedding step had to be skipped.
#[derive(Debug)]
pub struct WriteOutcome {
    pub decision: Decision,
    pub superseded: Vec<String>,
    pub embedding_degraded: bool,
}

/// Front door for decision writes. Owns canonicalization and embedding so
/// stored heads and query-time heads always pass through the same rules,
/// and runs supersedence detection after every successful persist.
pub struct DecisionWriter<'a> {
    store: &'a dyn IDecisionStore,
    embedder: Option<&'a dyn IEmbedder>,
    canonicalizer: Canonicalizer,
    config: SupersedenceConfig,
}

impl<'a> DecisionWriter<'a> {
    pub fn new(store: &'a dyn IDecisionStore, config: SupersedenceConfig) -> Self {
        Self {
            store,
            embedder: None,
            canonicalizer: Canonicalizer::default(),
            config,
        }
    }

    pub fn with_embedder(mut self, embedder: &'a dyn IEmbedder) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn with_canonicalizer(mut self, canonicalizer: Canonicalizer) -> Self {
        self.canonicalizer = canonicalizer;
        self
    }

    /// Persist a draft and run supersedence detection against the open set.
    ///
    /// An embedder failure downgrades the record to lexical-only (flagged in
    /// the outcome) but the write itself always proceeds.
    pub fn put_decision(&self, draft: DecisionDraft) -> EngramResult<WriteOutcome> {
        if draft.head.trim().is_empty() {
            return Err(EngramError::validation("decision head must not be empty"));
        }

        let canonical_head = self.canonicalizer.canonicalize(&draft.head);
        let entities: BTreeSet<String> = draft
            .entities
            .iter()
            .map(|e| self.canonicalizer.canonicalize(e))
            .filter(|e| !e.is_empty())
            .collect();
        let files: BTreeSet<String> = draft.files.into_iter().collect();

        let embed_text = if self.config.blend_context && !draft.context.trim().is_empty() {
            format!("{canonical_head} {}", draft.context.trim())
        } else {
            canonical_head.clone()
        };

        let mut embedding_degraded = false;
        let head_embedding = match self.embedder {
            Some(embedder) => match embedder.embed(&embed_text) {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!(error = %e, "embedding failed, writing decision without a vector");
                    embedding_degraded = true;
                    None
                }
            },
            None => None,
        };

        let mut decision = Decision::new(
            draft.head,
            canonical_head,
            draft.context,
            entities,
            files,
        );
        decision.head_embedding = head_embedding;

        self.store.put(&decision)?;

        let detector = SupersedenceDetector::new(self.store, self.config.clone());
        let superseded = detector.on_decision_write(&decision)?;

        Ok(WriteOutcome {
            decision,
            superseded,
            embedding_degraded,
        })
    }
}
