//! topicsync — keep a marker topic on GitHub repositories in line with a local record.
//!
//! # Usage
//!
//! ```text
//! topicsync init    [--config config.yaml] [--owner jdecool] [--topic hacktoberfest]
//! topicsync update  [--config config.yaml] [--owner jdecool] [--topic hacktoberfest]
//! ```
//!
//! Diagnostics go to stderr; set `RUST_LOG=info` (or `debug`) for per-repository detail.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use commands::{init::InitArgs, update::UpdateArgs};
use topicsync_core::{reconcile::Target, RecordStore};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "topicsync",
    version,
    about = "Synchronize a marker topic on GitHub repositories with a local record",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the record from the current topics of every repository.
    Init(InitArgs),

    /// Add or remove the marker topic so repositories match the record.
    Update(UpdateArgs),
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Path of the YAML record file.
    #[arg(long, global = true, value_name = "PATH", default_value = "config.yaml")]
    pub config: PathBuf,

    /// GitHub user whose repositories are reconciled.
    #[arg(long, global = true, value_name = "LOGIN", default_value = "jdecool")]
    pub owner: String,

    /// Marker topic to add or remove.
    #[arg(long, global = true, value_name = "NAME", default_value = "hacktoberfest")]
    pub topic: String,
}

impl Settings {
    pub fn store(&self) -> RecordStore {
        RecordStore::new(&self.config)
    }

    pub fn target(&self) -> Target {
        Target {
            owner: self.owner.clone(),
            marker: self.topic.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Init(args) => args.run(&cli.settings),
        Commands::Update(args) => args.run(&cli.settings),
    }
}

fn init_tracing() {
    use std::io::IsTerminal;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}
