//! End-to-end runs against the dry-run connector.

use std::fs;

use oxide_migrate::connector::CallKind;
use oxide_migrate::prelude::*;

const PROCEDURES: &str = "\
-- delimiter $$
CREATE PROCEDURE p()
BEGIN
    SELECT 1;
END$$
-- migrate
SELECT 2;
";

const SEED: &str = "\
-- migrate
CREATE TABLE t (id INT);
-- migrate; error=silent, transaction=off
INSERT INTO t VALUES (1);
INSERT INTO missing_table VALUES (2);
";

fn scripts() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("0001_procedures.sql"), PROCEDURES).unwrap();
    fs::write(dir.path().join("0002_seed.sql"), SEED).unwrap();
    dir
}

#[tokio::test]
async fn dry_run_never_fails() {
    let dir = scripts();
    let migrations = extract(dir.path(), "*", LoadOptions::default()).unwrap();
    assert_eq!(migrations.len(), 4);

    let summary = exec(&migrations, &ConnectParams::default()).await.unwrap();
    assert_eq!(summary.migrations, 4);
    assert_eq!(summary.executed, 5);
    assert!(summary.failures.is_empty());
}

#[tokio::test]
async fn dry_run_journal_has_one_line_statements() {
    let dir = scripts();
    let migrations = extract(dir.path(), "2", LoadOptions::default()).unwrap();
    assert_eq!(migrations.len(), 2);

    let mut runner = MigrationRunner::new(DryRunConnector::new());
    runner.ping().await.unwrap();
    runner.run(&migrations).await.unwrap();

    let journal = runner.connector().journal();
    let calls: Vec<CallKind> = journal.iter().map(|e| e.call).collect();
    assert_eq!(
        calls,
        vec![
            CallKind::Ping,
            CallKind::Begin,
            CallKind::Exec,
            CallKind::Commit,
            CallKind::Begin,
            CallKind::Exec,
            CallKind::Commit,
        ]
    );
    assert_eq!(journal[2].sql, "CREATE PROCEDURE p() BEGIN SELECT 1; END");
    assert!(journal.iter().all(|e| !e.sql.contains('\n') && e.args == 0));
}

#[tokio::test]
async fn procedure_body_is_one_statement() {
    let dir = scripts();
    let migrations = extract(dir.path(), "2", LoadOptions::default()).unwrap();
    assert_eq!(migrations[0].count(), 1);
    assert!(migrations[0].units[0].sql.ends_with("END"));
    assert_eq!(migrations[1].units[0].sql, "SELECT 2;");
}

#[tokio::test]
async fn unsupported_driver_fails_before_running() {
    let params = ConnectParams {
        driver: "postgres".into(),
        ..ConnectParams::default()
    };
    let err = exec(&[], &params).await.unwrap_err();
    assert_eq!(err.to_string(), "postgres: unsupported driver");
}
