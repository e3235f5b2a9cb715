//! Database connectors.
//!
//! A connector wraps exactly one connection. The runner drives it through
//! plain statements and explicit transaction calls, so the same code path
//! serves a live server and the dry-run backend.

mod dry_run;
mod mysql;

pub use dry_run::{CallKind, DryRunConnector, DryRunEntry, one_line};
pub use mysql::MySqlConnector;

/// Outcome of an executed statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecResult {
    /// Rows changed by the statement.
    pub rows_affected: u64,
    /// Auto-increment id generated by the statement, or 0.
    pub last_insert_id: u64,
}

/// A statement prepared by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    /// Statement text.
    pub sql: String,
    /// Number of placeholders.
    pub params: usize,
}

/// The connection contract used by the runner.
///
/// Arguments are bound positionally to `?` placeholders. Statements
/// without arguments are sent as plain text.
#[allow(async_fn_in_trait)]
pub trait Connector: Sized {
    /// Row type returned by [`Connector::query`].
    type Row;

    /// Returns the connector name.
    fn name(&self) -> &'static str;

    /// Checks that the connection is alive.
    async fn ping(&mut self) -> Result<(), sqlx::Error>;

    /// Prepares a statement without running it.
    async fn prepare(&mut self, sql: &str) -> Result<Prepared, sqlx::Error>;

    /// Executes a statement.
    async fn execute(&mut self, sql: &str, args: &[&str]) -> Result<ExecResult, sqlx::Error>;

    /// Runs a query and collects its rows.
    async fn query(&mut self, sql: &str, args: &[&str]) -> Result<Vec<Self::Row>, sqlx::Error>;

    /// Starts a transaction.
    async fn begin(&mut self) -> Result<(), sqlx::Error>;

    /// Commits the open transaction.
    async fn commit(&mut self) -> Result<(), sqlx::Error>;

    /// Rolls back the open transaction.
    async fn rollback(&mut self) -> Result<(), sqlx::Error>;

    /// Closes the connection.
    async fn close(self) -> Result<(), sqlx::Error>;
}
