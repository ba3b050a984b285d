// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Runs a harness on a dedicated worker thread so the caller never blocks.

use std::thread::{self, JoinHandle};

use crate::cancel::CancellationToken;
use crate::error::{ReadBenchError, ReadBenchResult};
use crate::harness::Harness;
use crate::result::ResultSet;

/// Name of the worker thread.
pub const WORKER_THREAD_NAME: &str = "readbench-worker";

/// Launches benchmark runs.
pub struct BenchRunner;

impl BenchRunner {
    /// Start `harness` on a new worker thread.
    pub fn spawn(harness: Harness) -> ReadBenchResult<RunHandle> {
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();

        let join = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || harness.run(&worker_cancel))
            .map_err(ReadBenchError::WorkerSpawn)?;

        Ok(RunHandle { cancel, join })
    }
}

/// Control surface of a running benchmark.
#[derive(Debug)]
pub struct RunHandle {
    cancel: CancellationToken,
    join: JoinHandle<ReadBenchResult<ResultSet>>,
}

impl RunHandle {
    /// Ask the worker to stop at its next polling point. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A token that cancels this run, for use from other threads or tasks.
    pub fn canceller(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Block until the worker finishes and return its outcome.
    pub fn wait(self) -> ReadBenchResult<ResultSet> {
        self.join.join().map_err(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            ReadBenchError::WorkerPanicked { message }
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawBenchConfig;
    use crate::strategy::Strategy;

    #[test]
    fn test_run_on_worker() {
        let config = RawBenchConfig::new(32 * 1024, 1024, 4096).validate().unwrap();
        let harness = Harness::new(config)
            .with_strategies(vec![Strategy::Stream])
            .unwrap();

        let results = BenchRunner::spawn(harness).unwrap().wait().unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_cancel_before_wait_is_not_an_error() {
        let config = RawBenchConfig::new(32 * 1024, 1, 1 << 20)
            .repetitions(2)
            .validate()
            .unwrap();
        let handle = BenchRunner::spawn(Harness::new(config)).unwrap();
        handle.cancel();
        handle.cancel();

        let results = handle.wait().unwrap();
        assert!(results.len() <= 21 * 6);
        assert!(results.iter().all(|r| r.completed_repetitions > 0));
    }
}
