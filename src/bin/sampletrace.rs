// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Sampletrace CLI
//!
//! Unified command-line tool for sensor sample trace operations.
//!
//! ## Usage
//!
//! ```sh
//! # Record a live feed into rotating trace files
//! sampletrace record aggregator.example.com 7008 -o session -R 3600
//!
//! # Replay a trace into an aggregator at double speed
//! sampletrace replay session.sst localhost 7007 -x 2.0
//!
//! # Merge recorded sessions into one timeline
//! sampletrace merge merged.sst a.sst b.sst c.sst
//!
//! # Render a trace as CSV
//! sampletrace export session.sst session.csv --packed
//!
//! # Summarize a trace file
//! sampletrace inspect session.sst
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{ExportCmd, InspectCmd, MergeCmd, RecordCmd, ReplayCmd};
use common::Result;
use tracing_subscriber::EnvFilter;

/// Sampletrace - RTLS sensor sample trace toolkit
///
/// Record, merge, replay, and render timestamped sensor sample traces.
#[derive(Parser, Clone)]
#[command(name = "sampletrace")]
#[command(about = "Record, merge, replay, and render sensor sample traces", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Record a live sample feed into trace files
    Record(RecordCmd),

    /// Replay a trace file into an aggregator at its recorded pace
    Replay(ReplayCmd),

    /// Merge trace files into one continuous timeline
    Merge(MergeCmd),

    /// Render a trace file as CSV
    Export(ExportCmd),

    /// Summarize a trace file's contents
    Inspect(InspectCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Record(cmd) => cmd.run(),
        Commands::Replay(cmd) => cmd.run(),
        Commands::Merge(cmd) => cmd.run(),
        Commands::Export(cmd) => cmd.run(),
        Commands::Inspect(cmd) => cmd.run(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("sampletrace=info".parse().unwrap()),
        )
        .init();

    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
