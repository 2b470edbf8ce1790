/// Storage subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {message}")]
    SqliteError { message: String },

    #[error("migration v{version:03} failed: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("failed to open database at {path}: {reason}")]
    ConnectionFailed { path: String, reason: String },
}
