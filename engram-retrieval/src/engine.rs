//! RetrievalEngine: orchestrates the full pipeline.
//!
//! query → validate → canonicalize → embed → hybrid fan-out → merge/floors
//! → score/rank → top-k result (with degradation flags and latency).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use engram_core::config::{RetrievalConfig, ScoringConfig};
use engram_core::decision::Decision;
use engram_core::errors::{EngramError, EngramResult};
use engram_core::models::{ConversationContext, RetrievalResult, SignalKind};
use engram_core::traits::{IDecisionStore, IEmbedder};
use tracing::{debug, info, warn};

use crate::canon::Canonicalizer;
use crate::entities;
use crate::ranking::RankingPipeline;
use crate::search::HybridSearcher;

/// The main retrieval engine. Stateless per request: concurrent `retrieve`
/// calls share no mutable state. The store is held behind an `Arc` so the
/// fan-out can hand it to signal threads it may abandon at the deadline.
pub struct RetrievalEngine<'a> {
    store: Arc<dyn IDecisionStore>,
    embedder: Option<&'a dyn IEmbedder>,
    canonicalizer: Canonicalizer,
    ranking: RankingPipeline,
    config: RetrievalConfig,
}

impl<'a> RetrievalEngine<'a> {
    pub fn new(
        store: Arc<dyn IDecisionStore>,
        config: RetrievalConfig,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            store,
            embedder: None,
            canonicalizer: Canonicalizer::default(),
            ranking: RankingPipeline::new(scoring),
            config,
        }
    }

    /// Attach an embedder, enabling the vector signal.
    pub fn with_embedder(mut self, embedder: &'a dyn IEmbedder) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Replace the default canonicalization rule table.
    pub fn with_canonicalizer(mut self, canonicalizer: Canonicalizer) -> Self {
        self.canonicalizer = canonicalizer;
        self
    }

    pub fn canonicalizer(&self) -> &Canonicalizer {
        &self.canonicalizer
    }

    /// Answer a query with the top-k ranked decisions.
    ///
    /// `tag` narrows candidates to decisions carrying that entity; pass ""
    /// for no narrowing. Errors: `Validation` before any I/O for malformed
    /// input, `Unavailable`/`Timeout` when no signal completes.
    pub fn retrieve(&self, query: &str, tag: &str, k: usize) -> EngramResult<RetrievalResult> {
        if query.trim().is_empty() {
            return Err(EngramError::validation("query must not be empty"));
        }
        if k == 0 {
            return Err(EngramError::validation("k must be positive"));
        }

        let started = Instant::now();
        let canonical = self.canonicalizer.canonicalize(query);
        debug!(query, canonical = %canonical, "canonicalized query");

        // An embedder that fails at query time is an outage of the vector
        // signal, not of the request: degrade and flag.
        let mut embed_failed = false;
        let query_embedding = match self.embedder {
            Some(embedder) => match embedder.embed(&canonical) {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!(error = %e, "query embedding failed, degrading to lexical-only");
                    embed_failed = true;
                    None
                }
            },
            None => None,
        };

        let searcher = HybridSearcher::new(Arc::clone(&self.store), &self.config);
        let mut outcome = searcher.search(&canonical, query_embedding.as_deref())?;
        if embed_failed && !outcome.degraded.contains(&SignalKind::Vector) {
            outcome.degraded.push(SignalKind::Vector);
        }

        let ids: Vec<String> = outcome.candidates.iter().map(|c| c.id.clone()).collect();
        let mut decisions: HashMap<String, Decision> = self
            .store
            .get_bulk(&ids)?
            .into_iter()
            .map(|d| (d.id.clone(), d))
            .collect();

        let tag = tag.trim();
        if !tag.is_empty() {
            let canonical_tag = self.canonicalizer.canonicalize(tag);
            decisions.retain(|_, d| d.entities.contains(&canonical_tag));
        }

        let query_entities =
            entities::extract_query_entities(&canonical, &self.ranking.config().entity_allow_list);

        let ranked = self
            .ranking
            .rank(&outcome.candidates, &decisions, &query_entities, k);

        let result = RetrievalResult {
            ranked,
            elapsed: started.elapsed(),
            degraded: outcome.degraded,
        };

        info!(
            results = result.ranked.len(),
            elapsed_ms = result.elapsed.as_millis() as u64,
            degraded = result.is_degraded(),
            "retrieval complete"
        );

        Ok(result)
    }

    /// Pack a result into a conversation envelope, applying the per-query
    /// output cap (diversity guard, applied after ranking).
    pub fn pack_context(
        &self,
        query: &str,
        tag: &str,
        result: &RetrievalResult,
    ) -> ConversationContext {
        ConversationContext::pack(query, tag, result, self.ranking.config().max_per_query)
    }
}
