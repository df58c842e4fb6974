use serde::{Deserialize, Serialize};

use super::retrieval_result::{RankedDecision, RetrievalResult};

/// The envelope a retrieval result is packed into before being handed back
/// to a conversation. References decisions by value for transport; the
/// store owns their lifetime, and the same decision may appear in many
/// contexts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    pub query: String,
    pub tag: String,
    /// At most `max_decisions` entries — one dominant cluster must not
    /// crowd out diversity, so the cap is applied after ranking.
    pub decisions: Vec<RankedDecision>,
}

impl ConversationContext {
    /// Pack the top of a ranked result into a context, applying the
    /// per-query output cap.
    pub fn pack(
        query: impl Into<String>,
        tag: impl Into<String>,
        result: &RetrievalResult,
        max_decisions: usize,
    ) -> Self {
        Self {
            query: query.into(),
            tag: tag.into(),
            decisions: result.ranked.iter().take(max_decisions).cloned().collect(),
        }
    }
}
