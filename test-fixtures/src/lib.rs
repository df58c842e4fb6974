//! Shared fixtures for the workspace test suites: a decision builder and a
//! family of deterministic embedders. Nothing here touches the network or
//! the filesystem; every fixture is reproducible across runs.

use std::collections::{BTreeSet, HashMap};
use std::hash::{DefaultHasher, Hash, Hasher};

use chrono::{DateTime, Duration, Utc};
use engram_core::decision::{Decision, DecisionStatus};
use engram_core::errors::{EngramError, EngramResult, RetrievalError};
use engram_core::traits::{IDecisionStore, IEmbedder};

/// Fluent builder for test decisions. Defaults: open status, canonical head
/// derived by lowercasing, no embedding, timestamps of "now".
pub struct DecisionBuilder {
    head: String,
    canonical: Option<String>,
    context: String,
    entities: BTreeSet<String>,
    files: BTreeSet<String>,
    embedding: Option<Vec<f32>>,
    status: DecisionStatus,
    superseded_by: Option<String>,
    id: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

/// Start building a decision with the given head text.
pub fn decision(head: &str) -> DecisionBuilder {
    DecisionBuilder {
        head: head.to_string(),
        canonical: None,
        context: String::new(),
        entities: BTreeSet::new(),
        files: BTreeSet::new(),
        embedding: None,
        status: DecisionStatus::Open,
        superseded_by: None,
        id: None,
        created_at: None,
    }
}

impl DecisionBuilder {
    /// Override the canonical head (default: lowercased head).
    pub fn canonical(mut self, canonical: &str) -> Self {
        self.canonical = Some(canonical.to_string());
        self
    }

    pub fn context(mut self, context: &str) -> Self {
        self.context = context.to_string();
        self
    }

    pub fn entity(mut self, entity: &str) -> Self {
        self.entities.insert(entity.to_string());
        self
    }

    pub fn file(mut self, file: &str) -> Self {
        self.files.insert(file.to_string());
        self
    }

    pub fn embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Embed the canonical head with the given embedder; panics on failure
    /// (fixtures only).
    pub fn embed_with(mut self, embedder: &dyn IEmbedder) -> Self {
        let text = self
            .canonical
            .clone()
            .unwrap_or_else(|| self.head.to_lowercase());
        self.embedding = Some(embedder.embed(&text).expect("fixture embedder failed"));
        self
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn superseded_by(mut self, successor_id: &str) -> Self {
        self.status = DecisionStatus::Superseded;
        self.superseded_by = Some(successor_id.to_string());
        self
    }

    pub fn retracted(mut self) -> Self {
        self.status = DecisionStatus::Retracted;
        self
    }

    /// Backdate the decision by `seconds` relative to now, for tests that
    /// depend on newest-first tie-breaking.
    pub fn age_seconds(mut self, seconds: i64) -> Self {
        self.created_at = Some(Utc::now() - Duration::seconds(seconds));
        self
    }

    pub fn build(self) -> Decision {
        let canonical = self
            .canonical
            .unwrap_or_else(|| self.head.to_lowercase());
        let mut d = Decision::new(
            self.head,
            canonical,
            self.context,
            self.entities,
            self.files,
        );
        if let Some(id) = self.id {
            d.id = id;
        }
        d.head_embedding = self.embedding;
        d.status = self.status;
        d.superseded_by = self.superseded_by;
        if let Some(at) = self.created_at {
            d.created_at = at;
            d.updated_at = at;
        }
        d
    }
}

/// Persist a batch of fixture decisions.
pub fn seed_store(store: &dyn IDecisionStore, decisions: &[Decision]) -> EngramResult<()> {
    for d in decisions {
        store.put(d)?;
    }
    Ok(())
}

/// Deterministic bag-of-tokens embedder. Each token hashes to a dimension;
/// vectors are L2-normalized. Texts sharing tokens get similar vectors,
/// disjoint texts get (near-)orthogonal ones. Good enough for ordering
/// tests, useless for semantics.
pub struct HashingEmbedder {
    dims: usize,
}

impl HashingEmbedder {
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(64)
    }
}

impl IEmbedder for HashingEmbedder {
    fn embed(&self, text: &str) -> EngramResult<Vec<f32>> {
        let mut v = vec![0.0f32; self.dims];
        for token in text.split_whitespace() {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            v[(hasher.finish() as usize) % self.dims] += 1.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }
}

/// Embedder with a fixed phrase-to-vector table, for tests that need exact
/// control over similarity. Unknown text maps to the zero vector, which
/// cosine search treats as matching nothing.
pub struct StaticEmbedder {
    dims: usize,
    table: HashMap<String, Vec<f32>>,
}

impl StaticEmbedder {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            table: HashMap::new(),
        }
    }

    pub fn with(mut self, text: &str, embedding: Vec<f32>) -> Self {
        assert_eq!(embedding.len(), self.dims, "fixture embedding dimension");
        self.table.insert(text.to_string(), embedding);
        self
    }
}

impl IEmbedder for StaticEmbedder {
    fn embed(&self, text: &str) -> EngramResult<Vec<f32>> {
        Ok(self
            .table
            .get(text)
            .cloned()
            .unwrap_or_else(|| vec![0.0; self.dims]))
    }

    fn dimensions(&self) -> usize {
        self.dims
    }
}

/// Embedder that always fails, for degradation-path tests.
pub struct FailingEmbedder;

impl IEmbedder for FailingEmbedder {
    fn embed(&self, _text: &str) -> EngramResult<Vec<f32>> {
        Err(EngramError::Retrieval(RetrievalError::Unavailable {
            reason: "embedder offline".to_string(),
        }))
    }

    fn dimensions(&self) -> usize {
        0
    }
}

/// Unit vector along the given axis, for hand-built similarity geometry.
pub fn axis(dims: usize, index: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; dims];
    v[index] = 1.0;
    v
}

/// Unit vector between two axes: cosine 1/sqrt(2) against either axis.
pub fn between(dims: usize, a: usize, b: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; dims];
    let c = std::f32::consts::FRAC_1_SQRT_2;
    v[a] = c;
    v[b] = c;
    v
}
