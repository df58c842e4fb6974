//! The decision record and its lifecycle types.

mod events;
mod record;

pub use events::{StatusEvent, StatusEventKind};
pub use record::{Decision, DecisionStatus};
