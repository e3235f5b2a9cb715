//! Dry-run connector.
//!
//! Accepts every call, touches nothing and logs what would have been sent.

use std::fmt;

use tracing::info;

use super::{Connector, ExecResult, Prepared};

/// Kind of connector call recorded by the dry run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Connection check.
    Ping,
    /// Statement execution.
    Exec,
    /// Query returning rows.
    Query,
    /// Transaction start.
    Begin,
    /// Transaction commit.
    Commit,
    /// Transaction rollback.
    Rollback,
}

impl CallKind {
    /// Returns the call name used in log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Exec => "exec",
            Self::Query => "query",
            Self::Begin => "begin",
            Self::Commit => "commit",
            Self::Rollback => "rollback",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunEntry {
    /// What was called.
    pub call: CallKind,
    /// Statement text on a single line; empty for ping and transaction calls.
    pub sql: String,
    /// Number of bound arguments.
    pub args: usize,
}

/// A connector that performs no I/O.
///
/// Every call emits one `info` event and is appended to an in-memory
/// journal. Statements report zero affected rows and queries return no
/// rows.
#[derive(Debug, Default)]
pub struct DryRunConnector {
    journal: Vec<DryRunEntry>,
}

impl DryRunConnector {
    /// Creates a dry-run connector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far.
    #[must_use]
    pub fn journal(&self) -> &[DryRunEntry] {
        &self.journal
    }

    fn record(&mut self, call: CallKind, sql: &str, args: usize) {
        let sql = one_line(sql);
        info!(call = %call, sql = %sql, args, "dry run");
        self.journal.push(DryRunEntry { call, sql, args });
    }
}

impl Connector for DryRunConnector {
    type Row = ();

    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn ping(&mut self) -> Result<(), sqlx::Error> {
        self.record(CallKind::Ping, "", 0);
        Ok(())
    }

    async fn prepare(&mut self, sql: &str) -> Result<Prepared, sqlx::Error> {
        Ok(Prepared {
            sql: sql.to_string(),
            params: 0,
        })
    }

    async fn execute(&mut self, sql: &str, args: &[&str]) -> Result<ExecResult, sqlx::Error> {
        self.record(CallKind::Exec, sql, args.len());
        Ok(ExecResult::default())
    }

    async fn query(&mut self, sql: &str, args: &[&str]) -> Result<Vec<()>, sqlx::Error> {
        self.record(CallKind::Query, sql, args.len());
        Ok(Vec::new())
    }

    async fn begin(&mut self) -> Result<(), sqlx::Error> {
        self.record(CallKind::Begin, "", 0);
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), sqlx::Error> {
        self.record(CallKind::Commit, "", 0);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), sqlx::Error> {
        self.record(CallKind::Rollback, "", 0);
        Ok(())
    }

    async fn close(self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

/// Collapses a multi-line statement onto one line.
#[must_use]
pub fn one_line(sql: &str) -> String {
    sql.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_line() {
        assert_eq!(
            one_line("CREATE TABLE t (\n    id INT,\n\n    name TEXT\n);"),
            "CREATE TABLE t ( id INT, name TEXT );"
        );
        assert_eq!(one_line("SELECT 1;"), "SELECT 1;");
        assert_eq!(one_line(""), "");
    }

    #[tokio::test]
    async fn test_calls_are_journaled() {
        let mut conn = DryRunConnector::new();
        conn.ping().await.unwrap();
        conn.begin().await.unwrap();
        let result = conn
            .execute("INSERT INTO t\nVALUES (?, ?)", &["1", "a"])
            .await
            .unwrap();
        conn.commit().await.unwrap();

        assert_eq!(result, ExecResult::default());
        let calls: Vec<CallKind> = conn.journal().iter().map(|e| e.call).collect();
        assert_eq!(
            calls,
            vec![
                CallKind::Ping,
                CallKind::Begin,
                CallKind::Exec,
                CallKind::Commit
            ]
        );
        assert_eq!(conn.journal()[2].sql, "INSERT INTO t VALUES (?, ?)");
        assert_eq!(conn.journal()[2].args, 2);
    }

    #[tokio::test]
    async fn test_query_returns_no_rows() {
        let mut conn = DryRunConnector::new();
        let rows = conn.query("SELECT * FROM t", &[]).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(
            conn.journal(),
            &[DryRunEntry {
                call: CallKind::Query,
                sql: "SELECT * FROM t".into(),
                args: 0,
            }]
        );
    }

    #[tokio::test]
    async fn test_rollback_and_prepare() {
        let mut conn = DryRunConnector::new();
        let prepared = conn.prepare("SELECT ?").await.unwrap();
        assert_eq!(prepared.params, 0);
        conn.rollback().await.unwrap();
        assert_eq!(conn.journal().len(), 1);
        assert_eq!(conn.journal()[0].call, CallKind::Rollback);
        assert_eq!(conn.name(), "dry-run");
        conn.close().await.unwrap();
    }
}
