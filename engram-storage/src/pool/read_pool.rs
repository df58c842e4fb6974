//! Round-robin pool of read-only connections. WAL means these are never
//! blocked by the writer, so retrieval fan-out threads can all read at once.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};

use engram_core::errors::EngramResult;

use super::pragmas::apply_read_pragmas;
use crate::to_storage_err;

/// Hard cap on readers; beyond this they only contend on SQLite's own locks.
const MAX_READERS: usize = 8;

pub struct ReadPool {
    readers: Vec<Mutex<Connection>>,
    cursor: AtomicUsize,
}

impl ReadPool {
    /// Open `count` read-only connections against the database file,
    /// clamped to `1..=MAX_READERS`.
    pub(crate) fn open(path: &Path, count: usize) -> EngramResult<Self> {
        let readers = (0..count.clamp(1, MAX_READERS))
            .map(|_| {
                let conn = Connection::open_with_flags(
                    path,
                    OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
                )
                .map_err(|e| to_storage_err(e.to_string()))?;
                apply_read_pragmas(&conn)?;
                Ok(Mutex::new(conn))
            })
            .collect::<EngramResult<Vec<_>>>()?;
        Ok(Self {
            readers,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Single in-memory connection, a private empty database. Engines in
    /// in-memory mode never dispatch reads here.
    pub(crate) fn open_in_memory() -> EngramResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_read_pragmas(&conn)?;
        Ok(Self {
            readers: vec![Mutex::new(conn)],
            cursor: AtomicUsize::new(0),
        })
    }

    /// Run a read query on the next reader in rotation.
    pub(crate) fn with_conn<F, T>(&self, f: F) -> EngramResult<T>
    where
        F: FnOnce(&Connection) -> EngramResult<T>,
    {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let guard = self.readers[idx]
            .lock()
            .map_err(|e| to_storage_err(format!("read pool lock poisoned: {e}")))?;
        f(&guard)
    }
}
