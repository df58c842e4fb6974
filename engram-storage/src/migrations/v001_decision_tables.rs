//! v001: decisions table.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS decisions (
            id             TEXT PRIMARY KEY,
            head           TEXT NOT NULL,
            canonical_head TEXT NOT NULL,
            context_value  TEXT NOT NULL DEFAULT '',
            status         TEXT NOT NULL DEFAULT 'open'
                           CHECK (status IN ('open', 'superseded', 'retracted')),
            superseded_by  TEXT REFERENCES decisions(id),
            entities       TEXT NOT NULL DEFAULT '[]',
            files          TEXT NOT NULL DEFAULT '[]',
            head_hash      TEXT NOT NULL,
            created_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updated_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            CHECK (id <> superseded_by),
            CHECK ((status = 'superseded') = (superseded_by IS NOT NULL))
        );

        CREATE INDEX IF NOT EXISTS idx_decisions_status ON decisions(status);
        CREATE INDEX IF NOT EXISTS idx_decisions_superseded_by ON decisions(superseded_by);
        CREATE INDEX IF NOT EXISTS idx_decisions_created_at ON decisions(created_at);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
