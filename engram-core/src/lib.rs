//! # engram-core
//!
//! Foundation crate for the Engram decision memory engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod decision;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{EvalConfig, RetrievalConfig, ScoringConfig, SupersedenceConfig};
pub use decision::{Decision, DecisionStatus, StatusEvent};
pub use errors::{EngramError, EngramResult};
pub use models::{RankedDecision, RetrievalResult, ScoreBreakdown, SignalKind};
pub use traits::{IDecisionStore, IEmbedder};
