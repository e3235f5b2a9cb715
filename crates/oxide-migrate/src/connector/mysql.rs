//! MySQL / MariaDB connector.

use sqlx::mysql::{MySqlConnection, MySqlRow};
use sqlx::{Connection, Either, Executor, Statement};

use super::{Connector, ExecResult, Prepared};
use crate::config::ConnectParams;

/// A single connection to a MySQL-compatible server.
pub struct MySqlConnector {
    conn: MySqlConnection,
}

impl MySqlConnector {
    /// Opens a connection.
    ///
    /// # Errors
    ///
    /// Returns the driver error if the server cannot be reached or
    /// rejects the credentials.
    pub async fn open(params: &ConnectParams) -> Result<Self, sqlx::Error> {
        let conn = MySqlConnection::connect_with(&params.connect_options()).await?;
        Ok(Self { conn })
    }

    async fn run_text(&mut self, sql: &str) -> Result<(), sqlx::Error> {
        self.conn.execute(sql).await?;
        Ok(())
    }
}

impl Connector for MySqlConnector {
    type Row = MySqlRow;

    fn name(&self) -> &'static str {
        "mysql"
    }

    async fn ping(&mut self) -> Result<(), sqlx::Error> {
        self.conn.ping().await
    }

    async fn prepare(&mut self, sql: &str) -> Result<Prepared, sqlx::Error> {
        let statement = self.conn.prepare(sql).await?;
        let params = match statement.parameters() {
            Some(Either::Left(types)) => types.len(),
            Some(Either::Right(count)) => count,
            None => 0,
        };
        Ok(Prepared {
            sql: sql.to_string(),
            params,
        })
    }

    async fn execute(&mut self, sql: &str, args: &[&str]) -> Result<ExecResult, sqlx::Error> {
        let result = if args.is_empty() {
            self.conn.execute(sql).await?
        } else {
            let mut query = sqlx::query(sql);
            for arg in args {
                query = query.bind(*arg);
            }
            query.execute(&mut self.conn).await?
        };
        Ok(ExecResult {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_id(),
        })
    }

    async fn query(&mut self, sql: &str, args: &[&str]) -> Result<Vec<MySqlRow>, sqlx::Error> {
        if args.is_empty() {
            return self.conn.fetch_all(sql).await;
        }
        let mut query = sqlx::query(sql);
        for arg in args {
            query = query.bind(*arg);
        }
        query.fetch_all(&mut self.conn).await
    }

    async fn begin(&mut self) -> Result<(), sqlx::Error> {
        self.run_text("BEGIN").await
    }

    async fn commit(&mut self) -> Result<(), sqlx::Error> {
        self.run_text("COMMIT").await
    }

    async fn rollback(&mut self) -> Result<(), sqlx::Error> {
        self.run_text("ROLLBACK").await
    }

    async fn close(self) -> Result<(), sqlx::Error> {
        self.conn.close().await
    }
}
