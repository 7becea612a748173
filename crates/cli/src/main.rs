// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! rl - Record Ledger operator CLI
//!
//! Opens a store directory directly and runs one ledger operation against
//! it. The store directory is locked while the command runs, so `rl` and a
//! running `rld` cannot share a directory.

mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{log, maintenance};
use output::OutputFormat;
use rl_core::{ServiceConfig, SystemClock};
use rl_engine::LogService;
use rl_storage::LocalStore;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rl",
    version,
    about = "Record Ledger - per-collection write-ahead log"
)]
struct Cli {
    /// Store directory (defaults to the platform data directory)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Upper bound on records returned by one pull
    #[arg(long, global = true, default_value_t = ServiceConfig::default().max_pull_batch)]
    max_pull_batch: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append records to a collection
    Push(log::PushArgs),
    /// Read records starting at an offset
    Pull(log::PullArgs),
    /// Clone a collection's log into a new collection
    Fork(log::ForkArgs),
    /// Stop further appends to a collection
    Seal(log::CollectionArgs),
    /// Show compaction and enumeration offsets
    Bounds(log::CollectionArgs),
    /// Move a collection's compaction offset forward
    Advance(log::AdvanceArgs),
    /// List collections waiting for compaction
    Candidates(maintenance::CandidatesArgs),
    /// Delete compacted records from every collection
    Purge,
    /// Delete collections the catalog no longer knows
    Gc(maintenance::GcArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let data_dir = cli.data_dir.map_or_else(default_data_dir, Ok)?;
    let store = LocalStore::open(&data_dir)
        .with_context(|| format!("failed to open store at {}", data_dir.display()))?;
    let service = LogService::new(
        store.clone(),
        SystemClock,
        &ServiceConfig {
            max_pull_batch: cli.max_pull_batch,
        },
    );
    let format = cli.format;

    match cli.command {
        Commands::Push(args) => log::push(&service, args, format).await?,
        Commands::Pull(args) => log::pull(&service, args, format).await?,
        Commands::Fork(args) => log::fork(&service, args, format).await?,
        Commands::Seal(args) => log::seal(&service, args, format).await?,
        Commands::Bounds(args) => log::bounds(&service, args, format).await?,
        Commands::Advance(args) => log::advance(&service, args, format).await?,
        Commands::Candidates(args) => maintenance::candidates(&service, args, format).await?,
        Commands::Purge => maintenance::purge(&service, format).await?,
        Commands::Gc(args) => maintenance::gc(&store, args, format).await?,
    }

    Ok(())
}

fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("record-ledger"))
        .ok_or_else(|| anyhow::anyhow!("could not determine data directory, pass --data-dir"))
}

/// Log to stderr so stdout stays machine-readable
fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
