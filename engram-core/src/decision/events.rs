use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of lifecycle event recorded in the append-only status log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEventKind {
    Created,
    Superseded,
    Retracted,
}

impl StatusEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Superseded => "superseded",
            Self::Retracted => "retracted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(Self::Created),
            "superseded" => Some(Self::Superseded),
            "retracted" => Some(Self::Retracted),
            _ => None,
        }
    }
}

/// One entry in a decision's append-only audit trail. Status changes are
/// recorded as new facts; the row's current status is a projection of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEvent {
    pub decision_id: String,
    pub kind: StatusEventKind,
    /// Structured detail, e.g. `{"superseded_by": "<id>"}`.
    pub detail: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
