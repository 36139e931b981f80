//! Development tasks for the behavior tree workspace
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod shapes;

use anyhow::Result;
use clap::Parser;
use commands::{Layout, Tick};

/// Development tasks for the behavior tree workspace
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for the behavior tree engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Build a synthetic tree and tick it frame by frame
    Tick(Tick),

    /// Report arena usage for tree shapes
    Layout(Layout),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for BT_ARENA_CAPACITY and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Tick(cmd) => cmd.execute(),
        Command::Layout(cmd) => cmd.execute(),
    }
}
