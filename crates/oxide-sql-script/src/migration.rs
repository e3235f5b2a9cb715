//! Migration groups and the statements they carry.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

/// How statement failures inside a migration are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Abort the run on the first failing statement.
    #[default]
    Default,
    /// Swallow failures without surfacing them.
    Silent,
    /// Swallow failures but surface a warning.
    Warning,
}

impl ErrorMode {
    /// Parses an `error=` option value. Unknown values map to the default.
    #[must_use]
    pub fn from_option(value: &str) -> Self {
        match value {
            "ignore" | "silent" => Self::Silent,
            "warning" => Self::Warning,
            _ => Self::Default,
        }
    }

    /// Returns true if a failure must stop execution.
    #[must_use]
    pub const fn aborts(self) -> bool {
        matches!(self, Self::Default)
    }

    /// Returns the option name for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Silent => "silent",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for ErrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction scope used when executing a migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxMode {
    /// One transaction around the whole migration.
    #[default]
    Default,
    /// One transaction per statement.
    Statement,
    /// No transaction at all.
    Off,
}

impl TxMode {
    /// Parses a `transaction=` option value. Unknown values map to the default.
    #[must_use]
    pub fn from_option(value: &str) -> Self {
        match value {
            "off" => Self::Off,
            "statement" | "stmt" | "query" => Self::Statement,
            _ => Self::Default,
        }
    }

    /// Returns the option name for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Statement => "statement",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for TxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// Statement text, trimmed.
    pub sql: String,
    /// Group the statement was scanned in.
    pub group: usize,
    /// Error mode active when the statement was scanned.
    pub error_mode: ErrorMode,
}

impl Unit {
    /// Returns true if a failure of this statement aborts the run.
    #[must_use]
    pub const fn aborts_on_error(&self) -> bool {
        self.error_mode.aborts()
    }
}

/// An ordered batch of statements opened by one directive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Migration {
    /// Script the migration was read from.
    pub file: PathBuf,
    /// Group number.
    pub group: usize,
    /// Error mode at the time the group was opened.
    pub error_mode: ErrorMode,
    /// Transaction mode at the time the group was opened.
    pub tx_mode: TxMode,
    /// Statements in scan order.
    pub units: Vec<Unit>,
}

impl Migration {
    /// Number of distinct groups among the statements.
    #[must_use]
    pub fn groups(&self) -> usize {
        self.units
            .iter()
            .map(|u| u.group)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Number of statements.
    #[must_use]
    pub fn count(&self) -> usize {
        self.units.len()
    }

    /// Returns true if the migration holds no statement.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Accumulates statements into migrations.
///
/// The stack starts with a placeholder migration so that statements
/// appearing before any directive still land somewhere. The first group
/// opened while that placeholder is still empty replaces it.
#[derive(Debug, Clone)]
pub struct MigrationStack {
    migrations: Vec<Migration>,
}

impl MigrationStack {
    /// Creates a stack seeded with `placeholder`.
    #[must_use]
    pub fn new(placeholder: Migration) -> Self {
        Self {
            migrations: vec![placeholder],
        }
    }

    /// Opens a new migration.
    pub fn open(&mut self, migration: Migration) {
        if let [only] = self.migrations.as_mut_slice() {
            if only.is_empty() {
                *only = migration;
                return;
            }
        }
        self.migrations.push(migration);
    }

    /// Appends a statement to the currently open migration.
    pub fn push(&mut self, unit: Unit) {
        if let Some(current) = self.migrations.last_mut() {
            current.units.push(unit);
        }
    }

    /// Number of migrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    /// Always false: the stack holds at least its placeholder.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// Total number of statements across all migrations.
    #[must_use]
    pub fn count(&self) -> usize {
        self.migrations.iter().map(Migration::count).sum()
    }

    /// Borrows the migrations.
    #[must_use]
    pub fn migrations(&self) -> &[Migration] {
        &self.migrations
    }

    /// Consumes the stack.
    #[must_use]
    pub fn into_vec(self) -> Vec<Migration> {
        self.migrations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(sql: &str, group: usize) -> Unit {
        Unit {
            sql: sql.to_string(),
            group,
            error_mode: ErrorMode::Default,
        }
    }

    fn migration(group: usize) -> Migration {
        Migration {
            group,
            ..Migration::default()
        }
    }

    #[test]
    fn test_mode_options() {
        assert_eq!(ErrorMode::from_option("silent"), ErrorMode::Silent);
        assert_eq!(ErrorMode::from_option("ignore"), ErrorMode::Silent);
        assert_eq!(ErrorMode::from_option("warning"), ErrorMode::Warning);
        assert_eq!(ErrorMode::from_option("bogus"), ErrorMode::Default);
        assert_eq!(TxMode::from_option("off"), TxMode::Off);
        assert_eq!(TxMode::from_option("stmt"), TxMode::Statement);
        assert_eq!(TxMode::from_option("query"), TxMode::Statement);
        assert_eq!(TxMode::from_option(""), TxMode::Default);
    }

    #[test]
    fn test_error_mode_aborts() {
        assert!(ErrorMode::Default.aborts());
        assert!(!ErrorMode::Silent.aborts());
        assert!(!ErrorMode::Warning.aborts());
    }

    #[test]
    fn test_placeholder_replaced_by_first_group() {
        let mut stack = MigrationStack::new(migration(1));
        stack.open(migration(2));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.migrations()[0].group, 2);
    }

    #[test]
    fn test_placeholder_kept_when_used() {
        let mut stack = MigrationStack::new(migration(1));
        stack.push(unit("SELECT 1;", 1));
        stack.open(migration(2));
        stack.push(unit("SELECT 2;", 2));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.count(), 2);
        assert_eq!(stack.migrations()[0].group, 1);
        assert_eq!(stack.migrations()[1].units[0].sql, "SELECT 2;");
    }

    #[test]
    fn test_leading_directives_collapse() {
        let mut stack = MigrationStack::new(migration(1));
        stack.open(migration(2));
        stack.open(migration(3));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.migrations()[0].group, 3);
    }

    #[test]
    fn test_empty_groups_after_first_are_kept() {
        let mut stack = MigrationStack::new(migration(1));
        stack.push(unit("SELECT 1;", 1));
        stack.open(migration(2));
        stack.open(migration(3));
        assert_eq!(stack.len(), 3);
        assert!(stack.migrations()[1].is_empty());
    }

    #[test]
    fn test_groups_and_count() {
        let mut m = migration(1);
        assert_eq!(m.groups(), 0);
        m.units.push(unit("SELECT 1;", 1));
        m.units.push(unit("SELECT 2;", 1));
        assert_eq!(m.groups(), 1);
        assert_eq!(m.count(), 2);
    }
}
