//! Versioned schema migrations, tracked via `PRAGMA user_version`.

mod v001_decision_tables;
mod v002_fts_index;
mod v003_embedding_tables;
mod v004_status_events;

use rusqlite::Connection;

use engram_core::errors::{EngramError, EngramResult, StorageError};

use crate::to_storage_err;

type Migration = fn(&Connection) -> EngramResult<()>;

const MIGRATIONS: &[(u32, Migration)] = &[
    (1, v001_decision_tables::migrate),
    (2, v002_fts_index::migrate),
    (3, v003_embedding_tables::migrate),
    (4, v004_status_events::migrate),
];

/// Run all pending migrations. Each migration commits its own version bump,
/// so a failure leaves the database at the last fully-applied version.
pub fn run_migrations(conn: &Connection) -> EngramResult<()> {
    let current: u32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    for (version, migrate) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        migrate(conn).map_err(|e| {
            EngramError::Storage(StorageError::MigrationFailed {
                version: *version,
                reason: e.to_string(),
            })
        })?;
        conn.pragma_update(None, "user_version", version)
            .map_err(|e| to_storage_err(e.to_string()))?;
        tracing::debug!(version, "applied migration");
    }
    Ok(())
}

/// Current schema version of a database.
pub fn schema_version(conn: &Connection) -> EngramResult<u32> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}
