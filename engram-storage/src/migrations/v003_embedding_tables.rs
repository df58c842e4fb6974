//! v003: decision_embeddings, decision_embedding_link.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS decision_embeddings (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            head_hash   TEXT NOT NULL UNIQUE,
            embedding   BLOB NOT NULL,
            dimensions  INTEGER NOT NULL,
            model_name  TEXT NOT NULL DEFAULT 'unknown',
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS decision_embedding_link (
            decision_id  TEXT PRIMARY KEY REFERENCES decisions(id),
            embedding_id INTEGER NOT NULL REFERENCES decision_embeddings(id)
        );

        CREATE INDEX IF NOT EXISTS idx_embedding_link_embedding
            ON decision_embedding_link(embedding_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
