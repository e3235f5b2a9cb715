//! Migration executor.
//!
//! Runs migrations in order against one connector. Each migration picks a
//! transaction scope from its transaction mode, and each statement decides
//! from its error mode whether a failure stops the run.

use oxide_sql_script::{ErrorMode, Migration, TxMode, Unit};
use tracing::{debug, info, warn};

use crate::config::{ConnectParams, Driver};
use crate::connector::{Connector, DryRunConnector, MySqlConnector, one_line};
use crate::error::{MigrateError, Result};

/// A statement failure that was tolerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementFailure {
    /// Group of the migration.
    pub group: usize,
    /// The statement, on one line.
    pub sql: String,
    /// Backend error message.
    pub message: String,
    /// Error mode that allowed the run to continue.
    pub mode: ErrorMode,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Migrations processed.
    pub migrations: usize,
    /// Statements that succeeded.
    pub executed: usize,
    /// Statements that failed without stopping the run.
    pub failures: Vec<StatementFailure>,
}

impl RunSummary {
    /// Records a tolerated failure and notifies according to its mode.
    fn tolerate(&mut self, migration: &Migration, unit: &Unit, error: &sqlx::Error) {
        let sql = one_line(&unit.sql);
        match unit.error_mode {
            ErrorMode::Warning => warn!(
                group = migration.group,
                file = %migration.file.display(),
                sql = %sql,
                error = %error,
                "Statement failed, continuing"
            ),
            _ => debug!(
                group = migration.group,
                sql = %sql,
                error = %error,
                "Statement failed silently"
            ),
        }
        self.failures.push(StatementFailure {
            group: migration.group,
            sql,
            message: error.to_string(),
            mode: unit.error_mode,
        });
    }
}

/// Executes migrations against a connector.
pub struct MigrationRunner<C: Connector> {
    conn: C,
}

impl<C: Connector> MigrationRunner<C> {
    /// Creates a runner owning `conn`.
    pub const fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Returns the connector.
    #[must_use]
    pub const fn connector(&self) -> &C {
        &self.conn
    }

    /// Consumes the runner and returns the connector.
    pub fn into_inner(self) -> C {
        self.conn
    }

    /// Checks the connection.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Connection`] if the ping fails.
    pub async fn ping(&mut self) -> Result<()> {
        self.conn.ping().await.map_err(MigrateError::Connection)
    }

    /// Runs all migrations in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing statement whose error mode is the
    /// default, or at the first transaction control failure.
    pub async fn run(&mut self, migrations: &[Migration]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for migration in migrations {
            info!(
                group = migration.group,
                file = %migration.file.display(),
                statements = migration.count(),
                transaction = %migration.tx_mode,
                error = %migration.error_mode,
                "Applying migration"
            );
            match migration.tx_mode {
                TxMode::Default => self.run_in_transaction(migration, &mut summary).await?,
                TxMode::Statement => self.run_per_statement(migration, &mut summary).await?,
                TxMode::Off => self.run_without_transaction(migration, &mut summary).await?,
            }
            summary.migrations += 1;
        }
        info!(
            migrations = summary.migrations,
            statements = summary.executed,
            failures = summary.failures.len(),
            "Run complete"
        );
        Ok(summary)
    }

    async fn exec(&mut self, group: usize, unit: &Unit) -> std::result::Result<(), sqlx::Error> {
        debug!(group, sql = %one_line(&unit.sql), "Executing statement");
        self.conn.execute(&unit.sql, &[]).await.map(|_| ())
    }

    async fn begin(&mut self) -> Result<()> {
        self.conn.begin().await.map_err(MigrateError::Transaction)
    }

    async fn commit(&mut self) -> Result<()> {
        self.conn.commit().await.map_err(MigrateError::Transaction)
    }

    /// Rolls back after a failed statement; the statement error wins.
    async fn rollback_after_failure(&mut self, group: usize) {
        if let Err(e) = self.conn.rollback().await {
            warn!(group, error = %e, "Rollback failed");
        }
    }

    /// One transaction for the whole migration.
    ///
    /// The transaction ends exactly once: rolled back when an aborting
    /// statement fails, committed otherwise.
    async fn run_in_transaction(
        &mut self,
        migration: &Migration,
        summary: &mut RunSummary,
    ) -> Result<()> {
        self.begin().await?;
        for unit in &migration.units {
            match self.exec(migration.group, unit).await {
                Ok(()) => summary.executed += 1,
                Err(source) if unit.aborts_on_error() => {
                    self.rollback_after_failure(migration.group).await;
                    return Err(statement_error(migration, unit, source));
                }
                Err(source) => summary.tolerate(migration, unit, &source),
            }
        }
        self.commit().await
    }

    /// One transaction per statement.
    async fn run_per_statement(
        &mut self,
        migration: &Migration,
        summary: &mut RunSummary,
    ) -> Result<()> {
        for unit in &migration.units {
            self.begin().await?;
            match self.exec(migration.group, unit).await {
                Ok(()) => {
                    self.commit().await?;
                    summary.executed += 1;
                }
                Err(source) => {
                    self.rollback_after_failure(migration.group).await;
                    if unit.aborts_on_error() {
                        return Err(statement_error(migration, unit, source));
                    }
                    summary.tolerate(migration, unit, &source);
                }
            }
        }
        Ok(())
    }

    /// Statements run directly, without a transaction.
    async fn run_without_transaction(
        &mut self,
        migration: &Migration,
        summary: &mut RunSummary,
    ) -> Result<()> {
        for unit in &migration.units {
            match self.exec(migration.group, unit).await {
                Ok(()) => summary.executed += 1,
                Err(source) if unit.aborts_on_error() => {
                    return Err(statement_error(migration, unit, source));
                }
                Err(source) => summary.tolerate(migration, unit, &source),
            }
        }
        Ok(())
    }

    /// Closes the connection, logging a failure instead of returning it.
    pub async fn close(self) {
        let name = self.conn.name();
        if let Err(e) = self.conn.close().await {
            warn!(connector = name, error = %e, "Failed to close connection");
        }
    }
}

fn statement_error(migration: &Migration, unit: &Unit, source: sqlx::Error) -> MigrateError {
    MigrateError::Statement {
        group: migration.group,
        sql: one_line(&unit.sql),
        source,
    }
}

/// Pings `conn`, runs `migrations` and closes the connection.
///
/// # Errors
///
/// See [`MigrationRunner::ping`] and [`MigrationRunner::run`].
pub async fn run_with<C: Connector>(conn: C, migrations: &[Migration]) -> Result<RunSummary> {
    let mut runner = MigrationRunner::new(conn);
    runner.ping().await?;
    let summary = runner.run(migrations).await;
    runner.close().await;
    summary
}

/// Runs `migrations` on the backend selected by `params.driver`.
///
/// `mysql` and `mariadb` connect to a server; an empty driver name runs
/// against the dry-run connector.
///
/// # Errors
///
/// Returns [`MigrateError::UnsupportedDriver`] for other driver names,
/// [`MigrateError::Connection`] if the server cannot be reached, and any
/// error from [`MigrationRunner::run`].
pub async fn exec(migrations: &[Migration], params: &ConnectParams) -> Result<RunSummary> {
    match params.driver()? {
        Driver::MySql => {
            info!(dsn = %params.dsn(), "Connecting");
            let conn = MySqlConnector::open(params)
                .await
                .map_err(MigrateError::Connection)?;
            run_with(conn, migrations).await
        }
        Driver::DryRun => {
            info!("No driver configured, running dry");
            run_with(DryRunConnector::new(), migrations).await
        }
    }
}
