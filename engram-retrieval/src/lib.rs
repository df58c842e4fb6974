//! # engram-retrieval
//!
//! The query path: canonicalization, hybrid lexical+vector candidate
//! fetch with per-signal timeouts, merge/dedup, scoring, and ranking.

pub mod canon;
pub mod engine;
pub mod entities;
pub mod ranking;
pub mod search;

pub use canon::{CanonRules, Canonicalizer};
pub use engine::RetrievalEngine;
