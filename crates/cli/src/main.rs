// Path: crates/cli/src/main.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Gradebook CLI
//!
//! Operates a gradebook ledger stored on disk: registers students, records
//! evaluations, runs bulk imports and answers queries.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gradebook_execution::LedgerMachine;
use std::path::PathBuf;
use tokio::sync::broadcast;

mod commands;
mod util;

use commands::*;

#[derive(Parser, Debug)]
#[clap(
    name = "gradebook",
    version,
    about = "Append-only evaluation ledger with student and recorder registries."
)]
struct Cli {
    /// Path to a TOML ledger configuration.
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the configured data directory.
    #[clap(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print the Prometheus metrics exposition after the command.
    #[clap(long, global = true)]
    metrics: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register and look up students.
    Student(student::StudentArgs),

    /// Look up recorders.
    Recorder(recorder::RecorderArgs),

    /// Record one evaluation.
    Record(record::RecordArgs),

    /// Read evaluations and counts.
    Query(query::QueryArgs),

    /// Record every row of a JSON file of evaluations.
    Import(import::ImportArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = util::load_config(cli.config.as_deref(), cli.data_dir)?;

    gradebook_telemetry::init::init_tracing(&config.telemetry)?;
    if cli.metrics {
        gradebook_telemetry::prometheus::install().context("failed to install metrics")?;
    }

    let (tx, mut events) = broadcast::channel(config.event_buffer.max(1));
    let ledger = LedgerMachine::open(&config)
        .with_context(|| format!("failed to open ledger in {}", config.data_dir.display()))?
        .with_event_sender(tx);

    match cli.command {
        Commands::Student(args) => student::run(args, &ledger, &mut events),
        Commands::Recorder(args) => recorder::run(args, &ledger),
        Commands::Record(args) => record::run(args, &ledger, &mut events),
        Commands::Query(args) => query::run(args, &ledger),
        Commands::Import(args) => import::run(args, &ledger, &mut events),
    }?;

    if cli.metrics {
        print!("{}", gradebook_telemetry::prometheus::render()?);
    }
    Ok(())
}
