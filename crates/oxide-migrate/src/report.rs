//! Migration reports for the `info` command.

use std::io::Write;

use oxide_sql_script::Migration;
use serde::Serialize;

use crate::error::Result;

/// Summary of one migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationInfo {
    /// Group number.
    pub group: usize,
    /// Source script.
    pub file: String,
    /// Distinct groups among the statements.
    pub groups: usize,
    /// Number of statements.
    pub queries: usize,
    /// Error mode name.
    pub error_mode: &'static str,
    /// Transaction mode name.
    pub transaction_mode: &'static str,
}

impl From<&Migration> for MigrationInfo {
    fn from(migration: &Migration) -> Self {
        Self {
            group: migration.group,
            file: migration.file.display().to_string(),
            groups: migration.groups(),
            queries: migration.count(),
            error_mode: migration.error_mode.as_str(),
            transaction_mode: migration.tx_mode.as_str(),
        }
    }
}

/// Writes the plain-text report.
///
/// # Errors
///
/// Returns an IO error if writing fails.
pub fn write_text<W: Write>(out: &mut W, migrations: &[Migration]) -> Result<()> {
    for migration in migrations {
        let title = format!("migration #{}", migration.group);
        writeln!(out, "{title}")?;
        writeln!(out, "{}", "=".repeat(title.len()))?;
        writeln!(out, "- {} groups", migration.groups())?;
        writeln!(out, "- {} queries", migration.count())?;
    }
    Ok(())
}

/// Writes the report as a JSON array.
///
/// # Errors
///
/// Returns a serialization or IO error if writing fails.
pub fn write_json<W: Write>(out: &mut W, migrations: &[Migration]) -> Result<()> {
    let infos: Vec<MigrationInfo> = migrations.iter().map(MigrationInfo::from).collect();
    serde_json::to_writer_pretty(&mut *out, &infos)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use oxide_sql_script::ScriptLoader;

    use super::*;

    fn migrations() -> Vec<Migration> {
        ScriptLoader::new()
            .split(
                "-- migrate\nSELECT 1;\nSELECT 2;\n-- ignore\nSELECT 3;\n-- migrate; transaction=off\nSELECT 4;\n"
                    .as_bytes(),
                Path::new("0001.sql"),
            )
            .unwrap()
    }

    #[test]
    fn test_text_report() {
        let mut out = Vec::new();
        write_text(&mut out, &migrations()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "migration #1\n============\n- 1 groups\n- 2 queries\n\
             migration #2\n============\n- 1 groups\n- 1 queries\n"
        );
    }

    #[test]
    fn test_json_report() {
        let mut out = Vec::new();
        write_json(&mut out, &migrations()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["queries"], 2);
        assert_eq!(value[1]["transaction_mode"], "off");
        assert_eq!(value[1]["file"], "0001.sql");
    }
}
