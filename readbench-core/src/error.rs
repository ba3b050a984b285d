// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for readbench.
//!
//! Explicit enum error types only. No `Box<dyn Error>`, no `anyhow::Result`.
//! Cancellation is deliberately absent: a cancelled run is a successful run
//! with fewer results.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for a benchmark run.
#[derive(Debug, Error)]
pub enum ReadBenchError {
    // =========================================================================
    // Configuration Errors - Rejected Before Any File I/O
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] InvalidConfigError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // Run Errors - Abort the Whole Run
    // =========================================================================
    #[error("Failed to prepare backing file: {context} - {source}")]
    FileSetup {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Strategy '{strategy}' failed during {phase}: {source}")]
    Strategy {
        strategy: &'static str,
        phase: Phase,
        #[source]
        source: StrategyError,
    },

    #[error("Failed to spawn benchmark worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("Benchmark worker panicked: {message}")]
    WorkerPanicked { message: String },

    // =========================================================================
    // Reporting Errors
    // =========================================================================
    #[error("No results to report")]
    NoResults,

    #[error("Failed to serialize results: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration errors, always reported against a named field.
#[derive(Debug, Error)]
pub enum InvalidConfigError {
    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown step policy '{input}' - expected x<N>, *<N> or +<N>")]
    UnknownStepPolicy { input: String },

    #[error("Unknown strategy '{name}'")]
    UnknownStrategy { name: String },

    #[error("Duplicate strategy '{name}' - names must be unique within a run")]
    DuplicateStrategy { name: String },
}

/// Lifecycle phase of a strategy when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Run,
    Teardown,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Setup => write!(f, "setup"),
            Phase::Run => write!(f, "run"),
            Phase::Teardown => write!(f, "teardown"),
        }
    }
}

/// Underlying cause of a strategy failure.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("System call failed: {syscall} - {source}")]
    Syscall {
        syscall: &'static str,
        #[source]
        source: nix::Error,
    },

    #[error("Native port error: {0}")]
    Port(#[from] PortError),
}

/// Errors reported by a native read port.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("Failed to open {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    #[error("Unknown native token: {token}")]
    UnknownToken { token: u64 },

    #[error("Native read failed for token {token}: {reason}")]
    ReadFailed { token: u64, reason: String },

    #[error("Failed to release token {token}: {reason}")]
    ReleaseFailed { token: u64, reason: String },
}

/// Result type alias using ReadBenchError.
pub type ReadBenchResult<T> = Result<T, ReadBenchError>;
