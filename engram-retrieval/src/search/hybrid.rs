//! Concurrent lexical+vector fan-out with per-signal deadlines.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use engram_core::config::RetrievalConfig;
use engram_core::constants;
use engram_core::errors::{EngramError, EngramResult, RetrievalError};
use engram_core::models::SignalKind;
use engram_core::traits::IDecisionStore;
use tracing::{debug, warn};

use super::merge::{self, Candidate};

/// Result of the candidate-gathering stage.
#[derive(Debug)]
pub struct SearchOutcome {
    pub candidates: Vec<Candidate>,
    /// Signals that were attempted but contributed nothing (error or
    /// timeout). Partial results from a timed-out signal are discarded.
    pub degraded: Vec<SignalKind>,
}

/// Fans the query out to both signals on detached threads and merges the
/// surviving pools. Each signal gets the configured deadline; one slow or
/// failing signal degrades the response instead of hanging it. A thread
/// that blows its deadline is abandoned: it finishes in the background and
/// its send lands on a closed channel.
pub struct HybridSearcher<'a> {
    store: Arc<dyn IDecisionStore>,
    config: &'a RetrievalConfig,
}

type SignalResult = (SignalKind, EngramResult<Vec<(String, f64)>>);

impl<'a> HybridSearcher<'a> {
    pub fn new(store: Arc<dyn IDecisionStore>, config: &'a RetrievalConfig) -> Self {
        Self { store, config }
    }

    /// Gather candidates for an already-canonicalized query. `query_embedding`
    /// is `None` when no embedder is configured (lexical-only operation).
    pub fn search(
        &self,
        canonical_query: &str,
        query_embedding: Option<&[f32]>,
    ) -> EngramResult<SearchOutcome> {
        let timeout = Duration::from_millis(self.config.signal_timeout_ms);
        let lexical_k = self.config.lexical_pool_size.min(constants::MAX_POOL_SIZE);
        let vector_k = self.config.vector_pool_size.min(constants::MAX_POOL_SIZE);

        let attempted: Vec<SignalKind> = if query_embedding.is_some() {
            vec![SignalKind::Lexical, SignalKind::Vector]
        } else {
            vec![SignalKind::Lexical]
        };

        let (tx, rx) = mpsc::channel::<SignalResult>();

        let lex_tx = tx.clone();
        let lex_store = Arc::clone(&self.store);
        let lex_query = canonical_query.to_string();
        std::thread::spawn(move || {
            let result = lex_store.lexical_search(&lex_query, lexical_k);
            let _ = lex_tx.send((SignalKind::Lexical, result));
        });

        if let Some(embedding) = query_embedding {
            let vec_tx = tx.clone();
            let vec_store = Arc::clone(&self.store);
            let embedding = embedding.to_vec();
            std::thread::spawn(move || {
                let result = vec_store.vector_search(&embedding, vector_k);
                let _ = vec_tx.send((SignalKind::Vector, result));
            });
        }
        drop(tx);

        let deadline = Instant::now() + timeout;
        let mut lexical_pool: Option<Vec<(String, f64)>> = None;
        let mut vector_pool: Option<Vec<(String, f64)>> = None;
        let mut completed: Vec<SignalKind> = Vec::new();

        for _ in 0..attempted.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok((kind, Ok(pool))) => {
                    completed.push(kind);
                    match kind {
                        SignalKind::Lexical => lexical_pool = Some(pool),
                        SignalKind::Vector => vector_pool = Some(pool),
                    }
                }
                Ok((kind, Err(e))) => {
                    warn!(signal = ?kind, error = %e, "retrieval signal failed");
                    completed.push(kind);
                }
                Err(_) => {
                    // Deadline elapsed; unreceived signals count as
                    // timed out and anything they produce later is dropped.
                    break;
                }
            }
        }

        let degraded: Vec<SignalKind> = attempted
            .iter()
            .copied()
            .filter(|kind| match kind {
                SignalKind::Lexical => lexical_pool.is_none(),
                SignalKind::Vector => vector_pool.is_none(),
            })
            .collect();

        if lexical_pool.is_none() && vector_pool.is_none() {
            let timed_out = attempted.iter().any(|k| !completed.contains(k));
            // An outage must never masquerade as an empty-but-successful result.
            return Err(if timed_out {
                EngramError::Retrieval(RetrievalError::Timeout {
                    elapsed_ms: timeout.as_millis() as u64,
                })
            } else {
                EngramError::Retrieval(RetrievalError::Unavailable {
                    reason: "all retrieval signals failed".to_string(),
                })
            });
        }

        for kind in &degraded {
            warn!(signal = ?kind, "degrading to remaining signal");
        }

        let merged = merge::merge(
            lexical_pool.as_deref().unwrap_or(&[]),
            vector_pool.as_deref().unwrap_or(&[]),
        );
        let candidates = merge::apply_floors(merged, self.config);

        debug!(
            candidates = candidates.len(),
            degraded = degraded.len(),
            "hybrid search complete"
        );

        Ok(SearchOutcome {
            candidates,
            degraded,
        })
    }
}
