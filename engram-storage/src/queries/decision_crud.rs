//! Insert and fetch decision rows. Inserts are append-only: rows are never
//! deleted, later status changes only flip the status/successor columns.

use std::collections::BTreeSet;

use rusqlite::{params, Connection};

use engram_core::decision::{Decision, DecisionStatus, StatusEventKind};
use engram_core::errors::EngramResult;

use crate::to_storage_err;

/// Insert a decision: row + embedding link + `created` status event,
/// all-or-nothing. The FTS index is synced by trigger.
pub fn insert_decision(conn: &Connection, decision: &Decision) -> EngramResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("insert_decision begin: {e}")))?;

    match insert_decision_inner(&tx, decision) {
        Ok(()) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("insert_decision commit: {e}")))?;
            Ok(())
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

/// Inner insert logic, operating on the provided connection (or transaction via Deref).
fn insert_decision_inner(conn: &Connection, decision: &Decision) -> EngramResult<()> {
    let entities_json =
        serde_json::to_string(&decision.entities).map_err(|e| to_storage_err(e.to_string()))?;
    let files_json =
        serde_json::to_string(&decision.files).map_err(|e| to_storage_err(e.to_string()))?;

    conn.execute(
        "INSERT INTO decisions (
            id, head, canonical_head, context_value, status, superseded_by,
            entities, files, head_hash, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            decision.id,
            decision.head,
            decision.canonical_head,
            decision.context_value,
            decision.status.as_str(),
            decision.superseded_by,
            entities_json,
            files_json,
            decision.head_hash,
            decision.created_at.to_rfc3339(),
            decision.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    if let Some(embedding) = &decision.head_embedding {
        store_embedding(conn, &decision.id, &decision.head_hash, embedding)?;
    }

    super::status_events::emit_event(
        conn,
        &decision.id,
        StatusEventKind::Created,
        &serde_json::json!({ "head_hash": decision.head_hash }),
    )?;

    Ok(())
}

/// Store an embedding for a decision, deduplicating by head hash.
/// Upsert + lookup + link run inside the caller's transaction.
fn store_embedding(
    conn: &Connection,
    decision_id: &str,
    head_hash: &str,
    embedding: &[f32],
) -> EngramResult<()> {
    let blob = f32_vec_to_bytes(embedding);
    let dims = embedding.len() as i32;

    conn.execute(
        "INSERT INTO decision_embeddings (head_hash, embedding, dimensions)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(head_hash) DO UPDATE SET
            embedding = excluded.embedding,
            dimensions = excluded.dimensions",
        params![head_hash, blob, dims],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let embedding_id: i64 = conn
        .query_row(
            "SELECT id FROM decision_embeddings WHERE head_hash = ?1",
            params![head_hash],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    conn.execute(
        "INSERT INTO decision_embedding_link (decision_id, embedding_id)
         VALUES (?1, ?2)
         ON CONFLICT(decision_id) DO UPDATE SET embedding_id = excluded.embedding_id",
        params![decision_id, embedding_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(())
}

/// Get a single decision by id, embedding included.
pub fn get_decision(conn: &Connection, id: &str) -> EngramResult<Option<Decision>> {
    let mut stmt = conn
        .prepare(
            "SELECT d.id, d.head, d.canonical_head, d.context_value, d.status,
                    d.superseded_by, d.entities, d.files, d.head_hash,
                    d.created_at, d.updated_at, e.embedding, e.dimensions
             FROM decisions d
             LEFT JOIN decision_embedding_link l ON l.decision_id = d.id
             LEFT JOIN decision_embeddings e ON e.id = l.embedding_id
             WHERE d.id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let result = stmt
        .query_row(params![id], |row| Ok(parse_decision_row(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match result {
        Some(Ok(decision)) => Ok(Some(decision)),
        Some(Err(e)) => Err(e),
        None => Ok(None),
    }
}

/// Bulk get decisions by ids. Missing ids are skipped, not errors.
pub fn bulk_get(conn: &Connection, ids: &[String]) -> EngramResult<Vec<Decision>> {
    let mut results = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(decision) = get_decision(conn, id)? {
            results.push(decision);
        }
    }
    Ok(results)
}

/// Parse a joined decision row (11 decision columns + embedding blob + dims).
pub(crate) fn parse_decision_row(row: &rusqlite::Row<'_>) -> EngramResult<Decision> {
    let status_str: String = row.get(4).map_err(|e| to_storage_err(e.to_string()))?;
    let status = DecisionStatus::parse(&status_str)
        .ok_or_else(|| to_storage_err(format!("unknown status '{status_str}'")))?;

    let entities_json: String = row.get(6).map_err(|e| to_storage_err(e.to_string()))?;
    let files_json: String = row.get(7).map_err(|e| to_storage_err(e.to_string()))?;
    let entities: BTreeSet<String> = serde_json::from_str(&entities_json)
        .map_err(|e| to_storage_err(format!("parse entities: {e}")))?;
    let files: BTreeSet<String> =
        serde_json::from_str(&files_json).map_err(|e| to_storage_err(format!("parse files: {e}")))?;

    let created_str: String = row.get(9).map_err(|e| to_storage_err(e.to_string()))?;
    let updated_str: String = row.get(10).map_err(|e| to_storage_err(e.to_string()))?;

    let parse_dt = |s: &str| -> EngramResult<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
    };

    let embedding_blob: Option<Vec<u8>> = row.get(11).ok();
    let dimensions: Option<i32> = row.get(12).ok().flatten();
    let head_embedding = match (embedding_blob, dimensions) {
        (Some(blob), Some(dims)) => Some(bytes_to_f32_vec(&blob, dims as usize)),
        _ => None,
    };

    Ok(Decision {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        head: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        canonical_head: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        context_value: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        status,
        superseded_by: row.get(5).map_err(|e| to_storage_err(e.to_string()))?,
        entities,
        files,
        head_hash: row.get(8).map_err(|e| to_storage_err(e.to_string()))?,
        created_at: parse_dt(&created_str)?,
        updated_at: parse_dt(&updated_str)?,
        head_embedding,
    })
}

/// Convert f32 slice to bytes (little-endian).
pub(crate) fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes back to f32 vec.
pub(crate) fn bytes_to_f32_vec(bytes: &[u8], expected_dims: usize) -> Vec<f32> {
    let mut result = Vec::with_capacity(expected_dims);
    for chunk in bytes.chunks_exact(4) {
        result.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    result
}

/// Helper trait to make `query_row` return `Option` on not-found.
pub(crate) trait OptionalRow<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalRow<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
