// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `readbench run` command - Run a benchmark sweep.
//!
//! The sweep runs on the harness worker thread; this task only waits for it
//! and forwards Ctrl+C as a cooperative cancellation.

use std::path::PathBuf;

use clap::Args;
use readbench_core::{
    report, BenchConfig, BenchRunner, ConfigLoader, Harness, RawBenchConfig, Step, StrategyKind,
};

use crate::OutputFormat;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// YAML configuration file (replaces the sweep flags below)
    #[arg(
        short,
        long,
        conflicts_with_all = ["file_size_mb", "times", "from", "to", "step", "strategy", "temp_dir"]
    )]
    pub config: Option<PathBuf>,

    /// Size of the backing file in megabytes
    #[arg(long, default_value_t = 64)]
    pub file_size_mb: i64,

    /// Timed repetitions per strategy and buffer size
    #[arg(short, long, default_value_t = 1)]
    pub times: i64,

    /// First buffer size in bytes
    #[arg(long, default_value_t = 4096)]
    pub from: i64,

    /// Last buffer size in bytes (inclusive)
    #[arg(long, default_value_t = 1024 * 1024)]
    pub to: i64,

    /// Sweep step: x<N> multiplies, +<N> adds
    #[arg(long, default_value = "x2", allow_hyphen_values = true)]
    pub step: Step,

    /// Strategy to run (repeatable; all when omitted)
    #[arg(short, long)]
    pub strategy: Vec<StrategyKind>,

    /// Directory for the backing file
    #[arg(long)]
    pub temp_dir: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl RunArgs {
    /// Resolve the arguments into a validated configuration.
    pub fn resolve(&self) -> Result<BenchConfig, readbench_core::ReadBenchError> {
        if let Some(path) = &self.config {
            return ConfigLoader::load_file(path);
        }

        let raw = RawBenchConfig {
            file_size_bytes: None,
            file_size_mb: Some(self.file_size_mb),
            repetitions: self.times,
            buffer_size_from: self.from,
            buffer_size_to: self.to,
            step_amount: self.step.amount() as i64,
            step_mode: self.step.mode(),
            strategies: self.strategy.iter().map(|kind| kind.name().to_string()).collect(),
            temp_dir: self.temp_dir.clone(),
        };
        Ok(raw.validate()?)
    }
}

pub async fn execute(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match args.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ Invalid configuration:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        file_size = %config.file_size(),
        repetitions = config.repetitions(),
        step = %config.step(),
        "Starting benchmark"
    );

    let handle = BenchRunner::spawn(Harness::new(config))?;
    let canceller = handle.canceller();
    let mut worker = tokio::task::spawn_blocking(move || handle.wait());

    let outcome = tokio::select! {
        joined = &mut worker => joined?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            eprintln!();
            eprintln!("Stopping after the current pass...");
            canceller.cancel();
            worker.await?
        }
    };

    let rendered = outcome.and_then(|results| match args.format {
        OutputFormat::Text => report::render(&results),
        OutputFormat::Json => report::render_json(&results),
    });

    match rendered {
        Ok(report) => {
            println!("{}", report);
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Benchmark failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
