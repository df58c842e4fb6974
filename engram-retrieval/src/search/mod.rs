//! Candidate gathering: concurrent signal fan-out, merge/dedup, noise floors.

pub mod hybrid;
pub mod merge;

pub use hybrid::{HybridSearcher, SearchOutcome};
pub use merge::Candidate;
