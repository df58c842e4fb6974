//! Non-search read queries over decisions.

use rusqlite::{params, Connection};

use engram_core::decision::{Decision, DecisionStatus};
use engram_core::errors::EngramResult;

use super::decision_crud::parse_decision_row;
use crate::to_storage_err;

/// All open decisions, newest first. Input set for supersedence detection.
pub fn open_decisions(conn: &Connection) -> EngramResult<Vec<Decision>> {
    let mut stmt = conn
        .prepare(
            "SELECT d.id, d.head, d.canonical_head, d.context_value, d.status,
                    d.superseded_by, d.entities, d.files, d.head_hash,
                    d.created_at, d.updated_at, e.embedding, e.dimensions
             FROM decisions d
             LEFT JOIN decision_embedding_link l ON l.decision_id = d.id
             LEFT JOIN decision_embeddings e ON e.id = l.embedding_id
             WHERE d.status = 'open'
             ORDER BY d.created_at DESC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![], |row| Ok(parse_decision_row(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        let decision = row.map_err(|e| to_storage_err(e.to_string()))??;
        results.push(decision);
    }
    Ok(results)
}

/// Decision counts per status.
pub fn count_by_status(conn: &Connection) -> EngramResult<Vec<(DecisionStatus, usize)>> {
    let mut stmt = conn
        .prepare("SELECT status, COUNT(*) FROM decisions GROUP BY status")
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![], |row| {
            let status: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((status, count))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        let (status_str, count) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let status = DecisionStatus::parse(&status_str)
            .ok_or_else(|| to_storage_err(format!("unknown status '{status_str}'")))?;
        results.push((status, count as usize));
    }
    Ok(results)
}
