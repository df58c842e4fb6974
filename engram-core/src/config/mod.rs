//! Component configuration. Every threshold lives in an explicit struct
//! handed to the component at construction time — no global mutable state,
//! so tests run against fixed configurations.

pub mod defaults;

mod eval_config;
mod retrieval_config;
mod scoring_config;
mod supersedence_config;

pub use eval_config::{EvalConfig, Thresholds};
pub use retrieval_config::RetrievalConfig;
pub use scoring_config::ScoringConfig;
pub use supersedence_config::SupersedenceConfig;
