//! Seams between subsystems.

mod embedding;
mod storage;

pub use embedding::IEmbedder;
pub use storage::IDecisionStore;
