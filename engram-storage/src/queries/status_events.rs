//! Append-only status event log. Lifecycle transitions are recorded as new
//! facts in the same transaction as the row update; the log is never
//! rewritten.

use rusqlite::{params, Connection};

use engram_core::decision::{StatusEvent, StatusEventKind};
use engram_core::errors::EngramResult;

use crate::to_storage_err;

/// Append one status event. Runs inside the caller's transaction: a write
/// whose event cannot be recorded does not commit.
pub fn emit_event(
    conn: &Connection,
    decision_id: &str,
    kind: StatusEventKind,
    detail: &serde_json::Value,
) -> EngramResult<()> {
    let detail_json =
        serde_json::to_string(detail).map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT INTO decision_status_events (decision_id, event_type, detail)
         VALUES (?1, ?2, ?3)",
        params![decision_id, kind.as_str(), detail_json],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Full audit trail for one decision, oldest first.
pub fn status_history(conn: &Connection, decision_id: &str) -> EngramResult<Vec<StatusEvent>> {
    let mut stmt = conn
        .prepare(
            "SELECT decision_id, event_type, detail, created_at
             FROM decision_status_events
             WHERE decision_id = ?1
             ORDER BY id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![decision_id], |row| {
            let decision_id: String = row.get(0)?;
            let event_type: String = row.get(1)?;
            let detail: String = row.get(2)?;
            let created_at: String = row.get(3)?;
            Ok((decision_id, event_type, detail, created_at))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        let (decision_id, event_type, detail, created_at) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        let kind = StatusEventKind::parse(&event_type)
            .ok_or_else(|| to_storage_err(format!("unknown event type '{event_type}'")))?;
        let detail = serde_json::from_str(&detail)
            .map_err(|e| to_storage_err(format!("parse event detail: {e}")))?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .map_err(|e| to_storage_err(format!("parse event timestamp: {e}")))?;
        results.push(StatusEvent {
            decision_id,
            kind,
            detail,
            created_at,
        });
    }
    Ok(results)
}
