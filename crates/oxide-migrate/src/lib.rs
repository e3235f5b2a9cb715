//! Directive-driven SQL migrations for MySQL and MariaDB.
//!
//! `oxide-migrate` reads plain `.sql` scripts, splits them into migration
//! groups with [`oxide_sql_script`], and runs every group under its own
//! transaction and error policy:
//!
//! - **Transaction mode** - `default` wraps the whole group in one
//!   transaction, `statement` wraps each statement, `off` runs statements
//!   bare.
//! - **Error mode** - `default` aborts the run on the first failure,
//!   `warning` logs the failure and continues, `silent` continues quietly.
//!
//! Without a configured driver the run goes to a dry-run connector that
//! only logs the calls it receives.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use oxide_migrate::prelude::*;
//!
//! # async fn demo() -> oxide_migrate::error::Result<()> {
//! let migrations = extract(Path::new("migrations"), "2..", LoadOptions::default())?;
//! let params = ConnectParams {
//!     driver: "mysql".into(),
//!     user: "app".into(),
//!     database: "shop".into(),
//!     ..ConnectParams::default()
//! };
//! let summary = exec(&migrations, &params).await?;
//! println!("{} statements", summary.executed);
//! # Ok(())
//! # }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Show what the newest script contains
//! oxide-migrate info migrations/
//!
//! # Dry run of every script
//! oxide-migrate run '*' migrations/
//!
//! # Apply the two newest scripts
//! oxide-migrate -i mysql -u app -d shop run ..2 migrations/
//! ```

pub mod config;
pub mod connector;
pub mod error;
pub mod executor;
pub mod report;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{ConnectParams, Driver};
    pub use crate::connector::{Connector, DryRunConnector, MySqlConnector};
    pub use crate::error::{MigrateError, Result};
    pub use crate::executor::{MigrationRunner, RunSummary, StatementFailure, exec, run_with};
    pub use crate::report::{MigrationInfo, write_json, write_text};
    pub use oxide_sql_script::{
        CommentPolicy, ErrorMode, LoadOptions, Migration, ScriptLoader, TxMode, Unit, extract,
    };
}
