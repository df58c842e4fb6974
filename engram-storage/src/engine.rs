//! StorageEngine — owns the ConnectionPool, implements IDecisionStore,
//! startup pragma configuration and migrations.

use std::path::Path;

use engram_core::decision::{Decision, DecisionStatus, StatusEvent};
use engram_core::errors::{EngramError, EngramResult};
use engram_core::traits::IDecisionStore;

use crate::migrations;
use crate::pool::ConnectionPool;

/// The main storage engine. All writes funnel through the single write
/// connection, which together with BEGIN IMMEDIATE transactions gives the
/// at-most-one-writer-wins guarantee for supersedence pointers.
pub struct StorageEngine {
    pool: ConnectionPool,
    /// When true, use the read pool for read operations (file-backed mode).
    /// When false, route all reads through the writer (in-memory mode,
    /// because in-memory read pool connections are isolated databases).
    use_read_pool: bool,
}

/// Readers opened alongside the writer in file-backed mode; sized for the
/// two retrieval signals plus a couple of concurrent callers.
const READER_COUNT: usize = 4;

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path) -> EngramResult<Self> {
        let pool = ConnectionPool::open(path, READER_COUNT)?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory storage engine (for testing). Routes all reads
    /// through the writer since in-memory read pool connections can't see
    /// the writer's changes.
    pub fn open_in_memory() -> EngramResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Run migrations.
    fn initialize(&self) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| migrations::run_migrations(conn))
    }

    /// Execute a read-only query on the best available connection.
    fn with_reader<F, T>(&self, f: F) -> EngramResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> EngramResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }

    /// `get` that treats absence as an error, for callers that require the row.
    pub fn get_required(&self, id: &str) -> EngramResult<Decision> {
        self.get(id)?.ok_or_else(|| {
            EngramError::Storage(engram_core::errors::StorageError::DecisionNotFound {
                id: id.to_string(),
            })
        })
    }
}

impl IDecisionStore for StorageEngine {
    fn put(&self, decision: &Decision) -> EngramResult<()> {
        if decision.head.trim().is_empty() {
            return Err(EngramError::validation("decision head must not be empty"));
        }
        if !decision.status_consistent() {
            return Err(EngramError::validation(
                "superseded status requires a successor pointer",
            ));
        }
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::decision_crud::insert_decision(conn, decision))
    }

    fn get(&self, id: &str) -> EngramResult<Option<Decision>> {
        self.with_reader(|conn| crate::queries::decision_crud::get_decision(conn, id))
    }

    fn get_bulk(&self, ids: &[String]) -> EngramResult<Vec<Decision>> {
        if ids.len() > engram_core::constants::MAX_BULK_BATCH_SIZE {
            return Err(EngramError::validation(format!(
                "bulk fetch of {} ids exceeds the batch limit",
                ids.len()
            )));
        }
        self.with_reader(|conn| crate::queries::decision_crud::bulk_get(conn, ids))
    }

    fn lexical_search(&self, text: &str, k: usize) -> EngramResult<Vec<(String, f64)>> {
        self.with_reader(|conn| crate::queries::lexical_search::lexical_search(conn, text, k))
    }

    fn vector_search(&self, embedding: &[f32], k: usize) -> EngramResult<Vec<(String, f64)>> {
        self.with_reader(|conn| crate::queries::vector_search::vector_search(conn, embedding, k))
    }

    fn mark_superseded(&self, old_id: &str, new_id: &str) -> EngramResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            crate::queries::supersedence_ops::mark_superseded(conn, old_id, new_id)
        })
    }

    fn mark_retracted(&self, id: &str) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::supersedence_ops::mark_retracted(conn, id))
    }

    fn open_decisions(&self) -> EngramResult<Vec<Decision>> {
        self.with_reader(crate::queries::decision_query::open_decisions)
    }

    fn status_history(&self, id: &str) -> EngramResult<Vec<StatusEvent>> {
        self.with_reader(|conn| crate::queries::status_events::status_history(conn, id))
    }

    fn count_by_status(&self) -> EngramResult<Vec<(DecisionStatus, usize)>> {
        self.with_reader(crate::queries::decision_query::count_by_status)
    }
}
