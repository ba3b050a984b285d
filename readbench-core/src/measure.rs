// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Timing of one strategy at one buffer size.

use std::path::Path;
use std::time::Instant;

use crate::cancel::CancellationToken;
use crate::config::BenchConfig;
use crate::error::{Phase, ReadBenchError, ReadBenchResult, StrategyError};
use crate::result::BenchmarkResult;
use crate::strategy::Strategy;

/// Run `strategy` over `path` for the configured number of repetitions and
/// average the pass times.
///
/// Each repetition is setup, timed run, teardown. Only the run is timed.
/// Teardown happens even when the run fails, and the run error wins. The
/// token is polled before each repetition; whatever completed is averaged,
/// and zero completed repetitions cost exactly 0.
pub fn measure(
    strategy: &Strategy,
    path: &Path,
    buffer: &mut [u8],
    config: &BenchConfig,
    cancel: &CancellationToken,
) -> ReadBenchResult<BenchmarkResult> {
    let name = strategy.name();
    let fail = move |phase: Phase| {
        move |source: StrategyError| ReadBenchError::Strategy {
            strategy: name,
            phase,
            source,
        }
    };

    let mut total_nanos = 0u64;
    let mut completed = 0u32;
    let mut bytes_per_pass = 0u64;

    while completed < config.repetitions() {
        if cancel.is_cancelled() {
            tracing::debug!(
                strategy = name,
                completed,
                "Cancelled before repetition"
            );
            break;
        }

        let mut handle = strategy
            .setup(path, buffer.len())
            .map_err(fail(Phase::Setup))?;

        let start = Instant::now();
        let outcome = handle.run(buffer);
        let elapsed = start.elapsed().as_nanos() as u64;

        let released = handle.teardown();
        let bytes = outcome.map_err(fail(Phase::Run))?;
        released.map_err(fail(Phase::Teardown))?;

        total_nanos = total_nanos.saturating_add(elapsed);
        completed += 1;
        bytes_per_pass = bytes;

        tracing::trace!(
            strategy = name,
            buffer_size = buffer.len(),
            repetition = completed,
            elapsed_ns = elapsed,
            bytes,
            "Repetition finished"
        );
    }

    let cost_nanos = if completed == 0 {
        0
    } else {
        total_nanos / u64::from(completed)
    };

    Ok(BenchmarkResult {
        name: name.to_string(),
        cost_nanos,
        buffer_size: buffer.len(),
        file_size_bytes: config.file_size().bytes(),
        repetitions: config.repetitions(),
        completed_repetitions: completed,
        bytes_per_pass,
    })
}
