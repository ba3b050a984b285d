// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! readbench CLI
//!
//! Command-line front end for the sequential read benchmark.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

/// readbench - compare file read strategies across buffer sizes
#[derive(Parser)]
#[command(name = "readbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Ranked tab-separated table
    Text,
    /// Results in sweep order as JSON
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a benchmark sweep (Ctrl+C stops it and reports what finished)
    Run(commands::run::RunArgs),

    /// Validate a configuration file and print its sweep
    Validate {
        /// Path to the configuration file
        file: PathBuf,
    },

    /// List available read strategies
    Strategies,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    // Dispatch to command handlers
    match cli.command {
        Commands::Run(args) => commands::run::execute(args).await,
        Commands::Validate { file } => commands::validate::execute(&file).await,
        Commands::Strategies => commands::strategies::execute().await,
    }
}
