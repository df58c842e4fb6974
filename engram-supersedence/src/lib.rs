//! Write-path supersedence: when a new decision is persisted, scan the open
//! set for decisions it replaces and flip them to superseded.
//!
//! Two hard rules govern this crate:
//! - an embedder outage degrades similarity to a lexical fallback but never
//!   blocks the write itself;
//! - a status flip that would make a `superseded_by` chain circular is
//!   refused, not repaired.

pub mod chain;
pub mod detector;
pub mod writer;

pub use detector::SupersedenceDetector;
pub use writer::DecisionWriter;
