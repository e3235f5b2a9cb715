//! Directive recognition and the script state it drives.
//!
//! Directives are single-line SQL comments:
//!
//! ```sql
//! -- migrate; error=warning, transaction=statement
//! -- ignore
//! -- delimiter $$
//! ```
//!
//! Recognition is a pure function ([`Directive::parse`]); applying the
//! result to a [`ScriptState`] is a separate step.

use crate::migration::{ErrorMode, Migration, TxMode, Unit};

/// Comment marker introducing a directive.
pub const COMMENT_PREFIX: &str = "--";

/// Statement delimiter in effect unless a directive changes it.
pub const DEFAULT_DELIMITER: &str = ";";

/// Options attached to a `migrate` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MigrateOptions {
    /// Value of the `error` key, if given.
    pub error: Option<ErrorMode>,
    /// Value of the `transaction` key, if given.
    pub transaction: Option<TxMode>,
}

impl MigrateOptions {
    /// Parses `key=value` pairs separated by commas. Unknown keys are ignored.
    #[must_use]
    pub fn parse(options: &str) -> Self {
        let mut parsed = Self::default();
        for pair in options.split(',') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = value.trim();
            match key.trim() {
                "error" => parsed.error = Some(ErrorMode::from_option(value)),
                "transaction" => parsed.transaction = Some(TxMode::from_option(value)),
                _ => {}
            }
        }
        parsed
    }
}

/// A recognized control comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Opens a new migration group.
    Migrate(MigrateOptions),
    /// Drops statements until the next `migrate`.
    Ignore,
    /// Changes the delimiter for the next statement.
    Delimiter(String),
}

impl Directive {
    /// Recognizes a directive in a scanned token.
    ///
    /// Returns `None` for ordinary SQL and for comments that are not
    /// directives.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let body = token.strip_prefix(COMMENT_PREFIX)?.trim();
        let (word, options) = body.split_once(';').unwrap_or((body, ""));
        match word.trim() {
            "migrate" | "" => return Some(Self::Migrate(MigrateOptions::parse(options))),
            "ignore" => return Some(Self::Ignore),
            _ => {}
        }
        let rest = body.strip_prefix("delimiter")?;
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }
        Some(Self::Delimiter(rest.trim().to_string()))
    }
}

/// Splitter and assembler state for one run.
///
/// The group counter survives across files; everything else is reset by
/// [`ScriptState::start_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptState {
    delimiter: String,
    group: usize,
    ignore: bool,
    error_mode: ErrorMode,
    tx_mode: TxMode,
}

impl Default for ScriptState {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            group: 0,
            ignore: false,
            error_mode: ErrorMode::Default,
            tx_mode: TxMode::Default,
        }
    }
}

impl ScriptState {
    /// Creates a fresh state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepares the state for a new file.
    pub fn start_file(&mut self) {
        self.revert_delimiter();
        self.ignore = false;
        self.group += 1;
    }

    /// Updates the state for one scanned token.
    ///
    /// The delimiter is reverted to the default before the token is looked
    /// at, so a custom delimiter only ever applies to the next statement.
    /// Returns true if the token was a directive and must not be executed.
    pub fn update(&mut self, token: &str) -> bool {
        self.revert_delimiter();
        match Directive::parse(token) {
            Some(directive) => {
                self.apply(directive);
                true
            }
            None => false,
        }
    }

    /// Applies a recognized directive.
    pub fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Migrate(options) => {
                self.group += 1;
                self.ignore = false;
                if let Some(mode) = options.error {
                    self.error_mode = mode;
                }
                if let Some(mode) = options.transaction {
                    self.tx_mode = mode;
                }
            }
            Directive::Ignore => self.ignore = true,
            Directive::Delimiter(token) if token.is_empty() => self.revert_delimiter(),
            Directive::Delimiter(token) => self.delimiter = token,
        }
    }

    fn revert_delimiter(&mut self) {
        DEFAULT_DELIMITER.clone_into(&mut self.delimiter);
    }

    /// The active delimiter.
    #[must_use]
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Returns true if the default delimiter is active.
    #[must_use]
    pub fn is_default_delimiter(&self) -> bool {
        self.delimiter == DEFAULT_DELIMITER
    }

    /// The current group number.
    #[must_use]
    pub const fn group(&self) -> usize {
        self.group
    }

    /// Returns true while statements are being dropped.
    #[must_use]
    pub const fn is_ignoring(&self) -> bool {
        self.ignore
    }

    /// The active error mode.
    #[must_use]
    pub const fn error_mode(&self) -> ErrorMode {
        self.error_mode
    }

    /// The active transaction mode.
    #[must_use]
    pub const fn tx_mode(&self) -> TxMode {
        self.tx_mode
    }

    /// An empty migration carrying the current group and modes.
    #[must_use]
    pub fn migration(&self, file: &std::path::Path) -> Migration {
        Migration {
            file: file.to_path_buf(),
            group: self.group,
            error_mode: self.error_mode,
            tx_mode: self.tx_mode,
            units: Vec::new(),
        }
    }

    /// A statement tagged with the current group and error mode.
    #[must_use]
    pub fn unit(&self, sql: impl Into<String>) -> Unit {
        Unit {
            sql: sql.into(),
            group: self.group,
            error_mode: self.error_mode,
        }
    }
}
