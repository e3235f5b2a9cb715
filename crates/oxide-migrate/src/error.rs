//! Error types for the migration runner.

use oxide_sql_script::ScriptError;

/// Errors that can occur while loading or running migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// Scripts could not be read, split or selected.
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// The configured driver name is not supported.
    #[error("{0}: unsupported driver")]
    UnsupportedDriver(String),

    /// Opening or pinging the database failed.
    #[error("Connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// A statement failed in a migration that aborts on error.
    #[error("Statement failed in migration #{group}: {source} ({sql})")]
    Statement {
        /// Group of the failing migration.
        group: usize,
        /// The failing statement, on one line.
        sql: String,
        /// Error reported by the backend.
        #[source]
        source: sqlx::Error,
    },

    /// Beginning, committing or rolling back a transaction failed.
    #[error("Transaction error: {0}")]
    Transaction(#[source] sqlx::Error),

    /// Serialization error while writing a report.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error while writing a report.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
