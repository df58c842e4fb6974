//! Offline evaluation of retrieval quality. Replays a gold set of
//! (query, expected ids) cases through the live pipeline and reports
//! Failure@K, Precision/Recall@10, supersedence leakage, and latency
//! percentiles against the configured release gates.

pub mod gold;
pub mod harness;
pub mod metrics;

pub use gold::GoldSet;
pub use harness::Harness;
