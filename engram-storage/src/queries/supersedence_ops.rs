//! Status transitions. All run BEGIN IMMEDIATE so the current-state check
//! and the commit are one atomic step: the first writer wins, later writers
//! observe the committed pointer and get `Conflict`.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use engram_core::decision::{DecisionStatus, StatusEventKind};
use engram_core::errors::{EngramError, EngramResult, StorageError};

use crate::to_storage_err;

/// Mark `old_id` superseded by `new_id`.
///
/// Idempotent for the same (old, new) pair. `Conflict` when the old
/// decision already points at a different successor, is retracted, would
/// supersede itself, or the successor was created before the decision it
/// replaces. `DecisionNotFound` when either id is missing.
pub fn mark_superseded(conn: &Connection, old_id: &str, new_id: &str) -> EngramResult<()> {
    if old_id == new_id {
        return Err(conflict(old_id, "a decision cannot supersede itself"));
    }

    conn.execute_batch("BEGIN IMMEDIATE")
        .map_err(|e| to_storage_err(format!("mark_superseded begin: {e}")))?;

    match mark_superseded_inner(conn, old_id, new_id) {
        Ok(changed) => {
            conn.execute_batch("COMMIT")
                .map_err(|e| to_storage_err(format!("mark_superseded commit: {e}")))?;
            if changed {
                tracing::info!(old_id, new_id, "decision superseded");
            }
            Ok(())
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}

/// Returns Ok(true) when the pointer was written, Ok(false) for the
/// idempotent repeat case.
fn mark_superseded_inner(conn: &Connection, old_id: &str, new_id: &str) -> EngramResult<bool> {
    let (status, current_successor, old_created) = fetch_status(conn, old_id)?;

    // The successor must exist; dangling pointers would corrupt chain walks.
    let (_, _, new_created) = fetch_status(conn, new_id)?;

    // A successor replaces what came before it; pointers may never run
    // backwards in time.
    if new_created < old_created {
        return Err(conflict(
            old_id,
            &format!("successor {new_id} predates the decision it would replace"),
        ));
    }

    match (&status, current_successor.as_deref()) {
        (DecisionStatus::Superseded, Some(existing)) if existing == new_id => {
            // Same pair, already applied.
            return Ok(false);
        }
        (DecisionStatus::Superseded, Some(existing)) => {
            return Err(conflict(
                old_id,
                &format!("already superseded by {existing}, not overwriting with {new_id}"),
            ));
        }
        (DecisionStatus::Retracted, _) => {
            return Err(conflict(old_id, "retracted is a terminal status"));
        }
        _ => {}
    }

    // Optimistic commit: the WHERE clause re-checks that no concurrent
    // writer set a successor between the read above and this update.
    let rows = conn
        .execute(
            "UPDATE decisions
             SET status = 'superseded',
                 superseded_by = ?2,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = ?1 AND superseded_by IS NULL AND status = 'open'",
            params![old_id, new_id],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    if rows == 0 {
        return Err(conflict(old_id, "lost supersedence race"));
    }

    super::status_events::emit_event(
        conn,
        old_id,
        StatusEventKind::Superseded,
        &serde_json::json!({ "superseded_by": new_id }),
    )?;

    Ok(true)
}

/// Flip an open decision to retracted (manual terminal state).
pub fn mark_retracted(conn: &Connection, id: &str) -> EngramResult<()> {
    conn.execute_batch("BEGIN IMMEDIATE")
        .map_err(|e| to_storage_err(format!("mark_retracted begin: {e}")))?;

    match mark_retracted_inner(conn, id) {
        Ok(()) => {
            conn.execute_batch("COMMIT")
                .map_err(|e| to_storage_err(format!("mark_retracted commit: {e}")))?;
            tracing::info!(id, "decision retracted");
            Ok(())
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}

fn mark_retracted_inner(conn: &Connection, id: &str) -> EngramResult<()> {
    let (status, _, _) = fetch_status(conn, id)?;
    match status {
        DecisionStatus::Retracted => return Ok(()), // idempotent
        DecisionStatus::Superseded => {
            return Err(conflict(id, "cannot retract a superseded decision"));
        }
        DecisionStatus::Open => {}
    }

    let rows = conn
        .execute(
            "UPDATE decisions
             SET status = 'retracted',
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = ?1 AND status = 'open'",
            params![id],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    if rows == 0 {
        return Err(conflict(id, "lost retraction race"));
    }

    super::status_events::emit_event(conn, id, StatusEventKind::Retracted, &serde_json::json!({}))
}

fn fetch_status(
    conn: &Connection,
    id: &str,
) -> EngramResult<(DecisionStatus, Option<String>, DateTime<Utc>)> {
    let row: Option<(String, Option<String>, String)> = conn
        .query_row(
            "SELECT status, superseded_by, created_at FROM decisions WHERE id = ?1",
            params![id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(to_storage_err(other.to_string())),
        })?;

    let (status_str, successor, created_str) = row.ok_or_else(|| {
        EngramError::Storage(StorageError::DecisionNotFound { id: id.to_string() })
    })?;
    let status = DecisionStatus::parse(&status_str)
        .ok_or_else(|| to_storage_err(format!("unknown status '{status_str}'")))?;
    let created_at = DateTime::parse_from_rfc3339(&created_str)
        .map_err(|e| to_storage_err(format!("bad created_at for {id}: {e}")))?
        .with_timezone(&Utc);
    Ok((status, successor, created_at))
}

fn conflict(id: &str, reason: &str) -> EngramError {
    EngramError::Storage(StorageError::Conflict {
        id: id.to_string(),
        reason: reason.to_string(),
    })
}
