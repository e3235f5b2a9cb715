//! oxide-migrate CLI
//!
//! Command-line tool for running SQL migration scripts.

use std::io::Write;
use std::path::Path;

use clap::{Args, Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use oxide_migrate::prelude::*;

/// Directive-driven SQL migrations.
#[derive(Parser)]
#[command(name = "oxide-migrate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectParams,

    /// Leave plain comment lines out instead of sending them as statements.
    #[arg(long, global = true)]
    drop_comments: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Scripts to load.
#[derive(Args)]
struct Target {
    /// File selection spec (`*`, `N`, `A..B`, `A..`, `..B`, comma separated),
    /// or the script path when given alone.
    #[arg(value_name = "SPEC")]
    first: String,

    /// Script file or directory.
    #[arg(value_name = "PATH")]
    path: Option<String>,
}

impl Target {
    /// Returns `(spec, path)`; the spec defaults to the newest file.
    fn resolve(&self) -> (&str, &Path) {
        match &self.path {
            Some(path) => (self.first.as_str(), Path::new(path)),
            None => ("1", Path::new(&self.first)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Execute migrations.
    Run {
        #[command(flatten)]
        target: Target,
    },

    /// Show group and statement counts per migration.
    Info {
        #[command(flatten)]
        target: Target,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let options = LoadOptions {
        comments: if cli.drop_comments {
            CommentPolicy::Drop
        } else {
            CommentPolicy::Keep
        },
    };

    match &cli.command {
        Commands::Run { target } => {
            let (spec, path) = target.resolve();
            let migrations = extract(path, spec, options)?;
            let summary = exec(&migrations, &cli.connection).await?;
            if !summary.failures.is_empty() {
                info!(
                    failures = summary.failures.len(),
                    "Some statements failed and were skipped"
                );
            }
        }

        Commands::Info { target, json } => {
            let (spec, path) = target.resolve();
            let migrations = extract(path, spec, options)?;
            let mut out = std::io::stdout().lock();
            if *json {
                write_json(&mut out, &migrations)?;
            } else {
                write_text(&mut out, &migrations)?;
            }
            out.flush()?;
        }
    }

    Ok(())
}
