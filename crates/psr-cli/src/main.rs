//! psr entry point: sets up tracing, resolves config, and hands off to the
//! command handlers in `commands/`.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use psr_config::ReplicatorConfig;

mod commands;

#[derive(Parser)]
#[command(name = "psr")]
#[command(about = "Parameter store replicator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply change events from the source snapshot to the target snapshot
    Replicate {
        /// Source store snapshot (read only)
        #[arg(long)]
        source: PathBuf,

        /// Target store snapshot; created if missing
        #[arg(long)]
        target: PathBuf,

        /// Event file (JSON document or newline-delimited JSON). Reads stdin when omitted.
        #[arg(long)]
        events: Option<PathBuf>,
    },

    /// Print the resolved configuration as JSON
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Silent if the file does not exist; deployments inject env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();
    let cfg = ReplicatorConfig::from_env()?;

    match cli.cmd {
        Commands::Replicate {
            source,
            target,
            events,
        } => {
            let report =
                commands::replicate::run_replicate(&cfg, &source, &target, events.as_deref())
                    .await?;
            for line in report.signal_lines() {
                println!("{line}");
            }
            let code = report.exit_code();
            if code != 0 {
                std::process::exit(code);
            }
        }

        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&cfg)?);
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries one completion signal per event.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
