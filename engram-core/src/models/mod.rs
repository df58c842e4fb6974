//! Cross-crate model structs (no behavior beyond small helpers).

mod conversation_context;
mod evaluation;
mod retrieval_result;

pub use conversation_context::ConversationContext;
pub use evaluation::{EvaluationCase, EvaluationReport, GateOutcomes, LatencyPercentiles};
pub use retrieval_result::{RankedDecision, RetrievalResult, ScoreBreakdown, SignalKind};
