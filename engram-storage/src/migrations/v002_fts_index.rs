//! v002: FTS5 index over head || context_value, trigger-synced.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "
        CREATE VIRTUAL TABLE IF NOT EXISTS decisions_fts USING fts5(
            head,
            context_value,
            content='decisions',
            content_rowid='rowid'
        );

        CREATE TRIGGER IF NOT EXISTS decisions_fts_ai AFTER INSERT ON decisions BEGIN
            INSERT INTO decisions_fts(rowid, head, context_value)
            VALUES (new.rowid, new.head, new.context_value);
        END;

        CREATE TRIGGER IF NOT EXISTS decisions_fts_ad AFTER DELETE ON decisions BEGIN
            INSERT INTO decisions_fts(decisions_fts, rowid, head, context_value)
            VALUES ('delete', old.rowid, old.head, old.context_value);
        END;

        CREATE TRIGGER IF NOT EXISTS decisions_fts_au AFTER UPDATE OF head, context_value ON decisions BEGIN
            INSERT INTO decisions_fts(decisions_fts, rowid, head, context_value)
            VALUES ('delete', old.rowid, old.head, old.context_value);
            INSERT INTO decisions_fts(rowid, head, context_value)
            VALUES (new.rowid, new.head, new.context_value);
        END;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
