//! # oxide-sql-script
//!
//! Directive-aware splitting of SQL migration scripts.
//!
//! A script is plain SQL whose single-line comments may carry directives:
//!
//! ```sql
//! -- migrate
//! CREATE TABLE users (id INT);
//!
//! -- migrate; error=warning, transaction=statement
//! INSERT INTO users VALUES (1);
//!
//! -- delimiter $$
//! CREATE PROCEDURE p() BEGIN SELECT 1; END$$
//!
//! -- ignore
//! DROP TABLE users;
//! ```
//!
//! - `migrate` opens a new migration group, optionally setting the error
//!   mode (`default`, `silent`, `warning`) and the transaction mode
//!   (`default`, `statement`, `off`).
//! - `ignore` drops every statement until the next `migrate`.
//! - `delimiter <token>` splits the next statement on `<token>` instead
//!   of `;`.
//!
//! ## Example
//!
//! ```rust
//! use std::path::Path;
//! use oxide_sql_script::ScriptLoader;
//!
//! let script = "-- migrate\nCREATE TABLE t (id INT);\nINSERT INTO t VALUES (1);\n";
//! let migrations = ScriptLoader::new()
//!     .split(script.as_bytes(), Path::new("0001.sql"))
//!     .unwrap();
//!
//! assert_eq!(migrations.len(), 1);
//! assert_eq!(migrations[0].count(), 2);
//! ```

pub mod directive;
pub mod error;
pub mod loader;
pub mod migration;
pub mod range;
pub mod splitter;

pub use directive::{Directive, MigrateOptions, ScriptState};
pub use error::{Result, ScriptError, SpecError};
pub use loader::{CommentPolicy, LoadOptions, ScriptLoader, extract, list_scripts};
pub use migration::{ErrorMode, Migration, MigrationStack, TxMode, Unit};
pub use range::{Range, parse_spec, select, select_by_spec};
pub use splitter::Splitter;
