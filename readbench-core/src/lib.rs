// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! readbench Core Library
//!
//! Benchmarks alternative strategies for reading a file sequentially across a
//! sweep of buffer sizes, and ranks them in a comparison table.
//!
//! # Flow
//!
//! - A [`BenchConfig`] is validated from raw values or a YAML file.
//! - A [`Harness`] creates a sized backing file, walks the buffer-size sweep
//!   and measures every [`Strategy`] at every point.
//! - The collected [`ResultSet`] is rendered by [`report::render`].
//! - [`BenchRunner`] moves the whole run onto a worker thread and hands back
//!   a [`RunHandle`] for cooperative cancellation.

pub mod cancel;
pub mod config;
pub mod error;
pub mod harness;
pub mod measure;
pub mod native;
pub mod report;
pub mod result;
pub mod runner;
pub mod strategy;
pub mod sweep;
pub mod types;

// Re-export commonly used types
pub use cancel::CancellationToken;
pub use config::{BenchConfig, ConfigLoader, RawBenchConfig};
pub use error::{InvalidConfigError, PortError, ReadBenchError, ReadBenchResult, StrategyError};
pub use harness::Harness;
pub use native::{Execution, NativePort, NativeToken, StdioPort};
pub use result::{BenchmarkResult, ResultSet};
pub use runner::{BenchRunner, RunHandle};
pub use strategy::{Strategy, StrategyKind};
pub use types::{BufferSize, FileSize, Step, StepMode};
