//! SQLite connection handling: one writer, a small set of readers, WAL in
//! between. Status flips commit on the writer while retrieval keeps reading.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::Path;

use engram_core::errors::EngramResult;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

/// The writer/reader pair backing a decision store.
pub struct ConnectionPool {
    pub(crate) writer: WriteConnection,
    pub(crate) readers: ReadPool,
}

impl ConnectionPool {
    /// Open the pair against a database file, with `reader_count` read-only
    /// connections behind the writer.
    pub(crate) fn open(path: &Path, reader_count: usize) -> EngramResult<Self> {
        Ok(Self {
            writer: WriteConnection::open(path)?,
            readers: ReadPool::open(path, reader_count)?,
        })
    }

    /// In-memory pair for tests. Each in-memory connection is a private
    /// database, so engines in this mode must route reads through the
    /// writer; the reader here only keeps the struct shape uniform.
    pub(crate) fn open_in_memory() -> EngramResult<Self> {
        Ok(Self {
            writer: WriteConnection::open_in_memory()?,
            readers: ReadPool::open_in_memory()?,
        })
    }
}
