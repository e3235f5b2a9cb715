//! Loading migrations from script files and directories.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::directive::{COMMENT_PREFIX, DEFAULT_DELIMITER, ScriptState};
use crate::error::{Result, ScriptError};
use crate::migration::{Migration, MigrationStack};
use crate::range::select_by_spec;
use crate::splitter::Splitter;

/// What to do with comment lines that are not directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentPolicy {
    /// Pass them through as statements.
    #[default]
    Keep,
    /// Leave them out of the migration.
    Drop,
}

/// Options for [`ScriptLoader`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Handling of plain comment lines.
    pub comments: CommentPolicy,
}

/// Splits scripts into migrations.
///
/// One loader carries the group counter and the sticky error and
/// transaction modes from one file to the next, so group numbers keep
/// increasing across a whole run.
#[derive(Debug, Default)]
pub struct ScriptLoader {
    state: ScriptState,
    options: LoadOptions,
}

impl ScriptLoader {
    /// Creates a loader with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader with the given options.
    #[must_use]
    pub fn with_options(options: LoadOptions) -> Self {
        Self {
            state: ScriptState::new(),
            options,
        }
    }

    /// Loads a directory (files picked by `spec`) or a single file.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Spec`] for a bad spec, and any error from
    /// [`ScriptLoader::load_file`].
    pub fn load(&mut self, path: &Path, spec: &str) -> Result<Vec<Migration>> {
        if !path.is_dir() {
            return self.load_file(path);
        }
        let files = select_by_spec(spec, &list_scripts(path)?)?;
        debug!(dir = %path.display(), spec, files = files.len(), "Selected scripts");

        let mut all = Vec::new();
        for file in &files {
            all.extend(self.load_file(file)?);
        }
        Ok(all)
    }

    /// Loads one script file.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Io`] if the file cannot be read and any
    /// splitting error.
    pub fn load_file(&mut self, path: &Path) -> Result<Vec<Migration>> {
        let file = File::open(path).map_err(|e| ScriptError::io(path, e))?;
        self.state.start_file();
        let migrations = self.split(file, path)?;
        debug!(
            file = %path.display(),
            migrations = migrations.len(),
            statements = migrations.iter().map(Migration::count).sum::<usize>(),
            "Loaded script"
        );
        Ok(migrations)
    }

    /// Splits a script read from `reader`, continuing the current state.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::IncompleteStatement`] if the script ends in
    /// the middle of a statement, or an IO or encoding error.
    pub fn split<R: Read>(&mut self, reader: R, path: &Path) -> Result<Vec<Migration>> {
        let mut splitter = Splitter::new(reader, path);
        let mut stack = MigrationStack::new(self.state.migration(path));

        while let Some(sql) = splitter.next_token(self.state.delimiter())? {
            let single_line = self.state.is_default_delimiter();
            let group = self.state.group();
            if self.state.update(&sql) {
                debug!(group = self.state.group(), directive = %sql, "Directive");
                if self.state.group() != group {
                    stack.open(self.state.migration(path));
                }
                continue;
            }
            if sql.is_empty() || sql == DEFAULT_DELIMITER || self.state.is_ignoring() {
                continue;
            }
            if single_line
                && self.options.comments == CommentPolicy::Drop
                && sql.starts_with(COMMENT_PREFIX)
            {
                continue;
            }
            stack.push(self.state.unit(sql));
        }
        Ok(stack.into_vec())
    }
}

/// Lists the regular files of `dir`, sorted by name.
///
/// # Errors
///
/// Returns [`ScriptError::Io`] if the directory cannot be read.
pub fn list_scripts(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| ScriptError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ScriptError::io(dir, e))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Loads migrations from `path` with a fresh loader.
///
/// # Errors
///
/// See [`ScriptLoader::load`].
pub fn extract(path: &Path, spec: &str, options: LoadOptions) -> Result<Vec<Migration>> {
    ScriptLoader::with_options(options).load(path, spec)
}
