//! # engram-storage
//!
//! SQLite persistence layer for decisions: single write connection + read
//! pool over WAL, versioned migrations, FTS5 lexical index, embedding
//! store, and an append-only status event log.

pub mod engine;
pub mod migrations;
mod pool;
pub mod queries;

pub use engine::StorageEngine;

use engram_core::errors::{EngramError, StorageError};

/// Wrap a raw SQLite failure message into the storage error type.
pub(crate) fn to_storage_err(message: impl Into<String>) -> EngramError {
    EngramError::Storage(StorageError::SqliteError {
        message: message.into(),
    })
}
