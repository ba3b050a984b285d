// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Measurement results and their aggregation.

use serde::{Deserialize, Serialize};

/// Averaged cost of one strategy at one buffer size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Strategy name
    pub name: String,
    /// Mean pass time in nanoseconds (0 when nothing was measured)
    pub cost_nanos: u64,
    /// Buffer size used for the pass in bytes
    pub buffer_size: usize,
    /// Size of the backing file in bytes
    pub file_size_bytes: u64,
    /// Configured repetitions
    pub repetitions: u32,
    /// Repetitions that actually ran before cancellation
    pub completed_repetitions: u32,
    /// Bytes consumed by the last completed pass
    pub bytes_per_pass: u64,
}

impl BenchmarkResult {
    /// Cost in whole milliseconds, rounded half up.
    pub fn cost_millis(&self) -> u64 {
        (self.cost_nanos as f64 / 1e6).round() as u64
    }

    /// Whether every configured repetition ran.
    pub fn is_complete(&self) -> bool {
        self.completed_repetitions == self.repetitions
    }
}

/// Results in sweep order: buffer size outer, strategy inner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    results: Vec<BenchmarkResult>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result in encounter order.
    pub fn push(&mut self, result: BenchmarkResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BenchmarkResult> {
        self.results.iter()
    }

    pub fn as_slice(&self) -> &[BenchmarkResult] {
        &self.results
    }

    /// Results ordered by cost, ties kept in encounter order.
    pub fn ranked(&self) -> Vec<&BenchmarkResult> {
        let mut ranked: Vec<_> = self.results.iter().collect();
        ranked.sort_by_key(|result| result.cost_nanos);
        ranked
    }

    /// Lowest cost in the set.
    pub fn bench(&self) -> Option<u64> {
        self.results.iter().map(|result| result.cost_nanos).min()
    }
}

impl From<Vec<BenchmarkResult>> for ResultSet {
    fn from(results: Vec<BenchmarkResult>) -> Self {
        Self { results }
    }
}

impl IntoIterator for ResultSet {
    type Item = BenchmarkResult;
    type IntoIter = std::vec::IntoIter<BenchmarkResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a BenchmarkResult;
    type IntoIter = std::slice::Iter<'a, BenchmarkResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
