// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Native read port.
//!
//! The `native_fread` strategy never talks to a foreign binding directly.
//! It goes through [`NativePort`], a three-call contract
//! (prepare / execute / release) keyed by an opaque token. [`StdioPort`] is
//! the default implementation on top of libc stdio.

mod stdio;

use std::fmt;
use std::path::Path;

use crate::error::PortError;

pub use stdio::StdioPort;

/// Opaque handle returned by [`NativePort::prepare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeToken(u64);

impl NativeToken {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NativeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a single native pass reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Execution {
    /// Time the native side measured for its own pass.
    pub elapsed_nanos: u64,
    /// Bytes consumed by the pass.
    pub bytes_read: u64,
}

/// Contract for a foreign sequential reader.
///
/// A token from `prepare` is passed to `execute` once per repetition and to
/// `release` exactly once. Implementations must be usable from the worker
/// thread, hence `Send + Sync`.
pub trait NativePort: Send + Sync + fmt::Debug {
    /// Open `path` and allocate a read buffer of `buffer_size` bytes.
    fn prepare(&self, path: &Path, buffer_size: usize) -> Result<NativeToken, PortError>;

    /// Read the whole file once, front to back.
    fn execute(&self, token: NativeToken) -> Result<Execution, PortError>;

    /// Free everything `prepare` allocated.
    fn release(&self, token: NativeToken) -> Result<(), PortError>;
}
