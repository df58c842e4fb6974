/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("decision not found: {id}")]
    DecisionNotFound { id: String },

    /// First-writer-wins violation on a supersedence pointer, or an attempt
    /// to transition out of a terminal status.
    #[error("conflict on decision {id}: {reason}")]
    Conflict { id: String, reason: String },

    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },
}
