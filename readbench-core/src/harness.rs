// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark harness: backing file, sweep loop and aggregation.

use std::collections::HashSet;
use std::sync::Arc;

use tempfile::NamedTempFile;

use crate::cancel::CancellationToken;
use crate::config::BenchConfig;
use crate::error::{InvalidConfigError, ReadBenchError, ReadBenchResult};
use crate::measure::measure;
use crate::native::{NativePort, StdioPort};
use crate::result::ResultSet;
use crate::strategy::Strategy;

/// Prefix of the backing file name.
pub const BACKING_FILE_PREFIX: &str = "IOTEST";
/// Suffix of the backing file name.
pub const BACKING_FILE_SUFFIX: &str = ".testfile";

/// A configured benchmark run.
///
/// Runs strictly sequentially: for every buffer size in the sweep, every
/// registered strategy is measured in registration order.
#[derive(Debug, Clone)]
pub struct Harness {
    config: BenchConfig,
    strategies: Vec<Strategy>,
}

impl Harness {
    /// Harness running the strategies selected in `config`, with native
    /// reads going through libc stdio.
    pub fn new(config: BenchConfig) -> Self {
        let port: Arc<dyn NativePort> = Arc::new(StdioPort::new());
        let strategies = config
            .strategies()
            .iter()
            .map(|&kind| Strategy::from_kind(kind, &port))
            .collect();
        Self { config, strategies }
    }

    /// Replace the registered strategies. Names must be unique.
    pub fn with_strategies(mut self, strategies: Vec<Strategy>) -> ReadBenchResult<Self> {
        let mut seen = HashSet::new();
        for strategy in &strategies {
            if !seen.insert(strategy.name()) {
                return Err(InvalidConfigError::DuplicateStrategy {
                    name: strategy.name().to_string(),
                }
                .into());
            }
        }
        self.strategies = strategies;
        Ok(self)
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Run the whole sweep, blocking the calling thread.
    ///
    /// Cancellation is checked before each sweep point (and, inside
    /// [`measure`], before each repetition) and yields the results gathered
    /// so far. Any strategy failure aborts the run and discards them. The
    /// backing file is removed on every exit path.
    pub fn run(&self, cancel: &CancellationToken) -> ReadBenchResult<ResultSet> {
        let config = &self.config;
        let backing = create_backing_file(config)?;
        let path = backing.path();

        tracing::info!(
            path = %path.display(),
            file_size = config.file_size().bytes(),
            repetitions = config.repetitions(),
            from = config.buffer_from().bytes(),
            to = config.buffer_to().bytes(),
            step = %config.step(),
            strategies = self.strategies.len(),
            "Starting benchmark run"
        );

        let mut results = ResultSet::new();
        for buffer_size in config.sweep() {
            if cancel.is_cancelled() {
                tracing::warn!(
                    buffer_size,
                    collected = results.len(),
                    "Run cancelled, stopping sweep"
                );
                break;
            }

            tracing::debug!(buffer_size, "Sweep point");
            let mut buffer = vec![0u8; buffer_size];

            for strategy in &self.strategies {
                let result = measure(strategy, path, &mut buffer, config, cancel)?;

                // A measurement that never started because of cancellation
                // carries no timing and is not reported.
                if result.completed_repetitions == 0 && result.repetitions > 0 {
                    continue;
                }

                tracing::debug!(
                    strategy = %result.name,
                    buffer_size,
                    cost_ns = result.cost_nanos,
                    "Measured"
                );
                results.push(result);
            }
        }

        tracing::info!(results = results.len(), "Benchmark run finished");
        Ok(results)
    }
}

/// Create the backing file, sized exactly to the configured file size.
/// It is deleted when the returned handle drops.
fn create_backing_file(config: &BenchConfig) -> ReadBenchResult<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder
        .prefix(BACKING_FILE_PREFIX)
        .suffix(BACKING_FILE_SUFFIX);

    let file = match config.temp_dir() {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|source| ReadBenchError::FileSetup {
        context: "creating backing file",
        source,
    })?;

    file.as_file()
        .set_len(config.file_size().bytes())
        .map_err(|source| ReadBenchError::FileSetup {
            context: "sizing backing file",
            source,
        })?;

    tracing::debug!(
        path = %file.path().display(),
        size = config.file_size().bytes(),
        "Created backing file"
    );
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawBenchConfig;
    use crate::types::StepMode;

    fn small_config() -> BenchConfig {
        RawBenchConfig::new(64 * 1024, 4096, 16384)
            .step(StepMode::Multiplicative, 2)
            .validate()
            .unwrap()
    }

    #[test]
    fn test_backing_file_sized_and_named() {
        let file = create_backing_file(&small_config()).unwrap();
        assert_eq!(file.as_file().metadata().unwrap().len(), 64 * 1024);

        let name = file.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(BACKING_FILE_PREFIX));
        assert!(name.ends_with(BACKING_FILE_SUFFIX));
    }

    #[test]
    fn test_backing_file_in_missing_dir_fails() {
        let config = RawBenchConfig::new(1024, 16, 16)
            .temp_dir("/nonexistent/readbench")
            .validate()
            .unwrap();
        assert!(matches!(
            Harness::new(config).run(&CancellationToken::new()),
            Err(ReadBenchError::FileSetup { .. })
        ));
    }

    #[test]
    fn test_results_in_sweep_order() {
        let harness = Harness::new(small_config())
            .with_strategies(vec![Strategy::Stream, Strategy::MemoryMapped])
            .unwrap();
        let results = harness.run(&CancellationToken::new()).unwrap();

        let order: Vec<_> = results
            .iter()
            .map(|r| (r.buffer_size, r.name.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (4096, "stream"),
                (4096, "mmap"),
                (8192, "stream"),
                (8192, "mmap"),
                (16384, "stream"),
                (16384, "mmap"),
            ]
        );
    }

    #[test]
    fn test_cancelled_before_start_is_empty() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let results = Harness::new(small_config()).run(&cancel).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_duplicate_strategies_rejected() {
        let result =
            Harness::new(small_config()).with_strategies(vec![Strategy::Stream, Strategy::Stream]);
        assert!(matches!(result, Err(ReadBenchError::InvalidConfig(_))));
    }

    #[test]
    fn test_default_strategies_follow_config() {
        let config = RawBenchConfig::new(1024, 16, 16)
            .strategies(["mmap", "stream"])
            .validate()
            .unwrap();
        let names: Vec<_> = Harness::new(config)
            .strategies()
            .iter()
            .map(Strategy::name)
            .collect();
        assert_eq!(names, vec!["mmap", "stream"]);
    }
}
