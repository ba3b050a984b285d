// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Sequential read strategies.
//!
//! A [`Strategy`] is a stateless descriptor. Every repetition calls
//! [`Strategy::setup`] to get a fresh [`Handle`] that owns whatever OS
//! resource the strategy needs; [`Handle::run`] makes one full pass over the
//! file and [`Handle::teardown`] releases the resource. Nothing survives from
//! one handle to the next.

mod mapped;
mod view;

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::os::unix::fs::FileExt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{InvalidConfigError, StrategyError};
use crate::native::{NativePort, NativeToken, StdioPort};

pub use mapped::{MappedFile, MappedReader};
pub use view::ByteView;

/// Names of the built-in strategies, without their resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StrategyKind {
    RandomAccess,
    BufferedStream,
    Stream,
    WrappedChannel,
    MemoryMapped,
    NativeRead,
}

impl StrategyKind {
    /// Every built-in strategy in reporting order.
    pub const ALL: [StrategyKind; 6] = [
        StrategyKind::RandomAccess,
        StrategyKind::BufferedStream,
        StrategyKind::Stream,
        StrategyKind::WrappedChannel,
        StrategyKind::MemoryMapped,
        StrategyKind::NativeRead,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::RandomAccess => "random_access",
            StrategyKind::BufferedStream => "buffered_stream",
            StrategyKind::Stream => "stream",
            StrategyKind::WrappedChannel => "wrapped_channel",
            StrategyKind::MemoryMapped => "mmap",
            StrategyKind::NativeRead => "native_fread",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::RandomAccess => "positioned pread calls at a tracked offset",
            StrategyKind::BufferedStream => "read() through an 8 KiB BufReader",
            StrategyKind::Stream => "plain read() on the file",
            StrategyKind::WrappedChannel => "read() into a cleared view over the buffer",
            StrategyKind::MemoryMapped => "copy chunks out of a read-only mmap",
            StrategyKind::NativeRead => "libc fread through the native port",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = InvalidConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InvalidConfigError::UnknownStrategy {
                name: s.to_string(),
            })
    }
}

impl TryFrom<String> for StrategyKind {
    type Error = InvalidConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StrategyKind> for String {
    fn from(kind: StrategyKind) -> Self {
        kind.name().to_string()
    }
}

/// A registered read strategy.
#[derive(Debug, Clone)]
pub enum Strategy {
    RandomAccess,
    BufferedStream,
    Stream,
    WrappedChannel,
    MemoryMapped,
    NativeRead(Arc<dyn NativePort>),
}

impl Strategy {
    /// Build a strategy from its kind, routing native reads through `port`.
    pub fn from_kind(kind: StrategyKind, port: &Arc<dyn NativePort>) -> Self {
        match kind {
            StrategyKind::RandomAccess => Strategy::RandomAccess,
            StrategyKind::BufferedStream => Strategy::BufferedStream,
            StrategyKind::Stream => Strategy::Stream,
            StrategyKind::WrappedChannel => Strategy::WrappedChannel,
            StrategyKind::MemoryMapped => Strategy::MemoryMapped,
            StrategyKind::NativeRead => Strategy::NativeRead(Arc::clone(port)),
        }
    }

    /// All built-in strategies, native reads going through libc stdio.
    pub fn defaults() -> Vec<Strategy> {
        let port: Arc<dyn NativePort> = Arc::new(StdioPort::new());
        StrategyKind::ALL
            .into_iter()
            .map(|kind| Strategy::from_kind(kind, &port))
            .collect()
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::RandomAccess => StrategyKind::RandomAccess,
            Strategy::BufferedStream => StrategyKind::BufferedStream,
            Strategy::Stream => StrategyKind::Stream,
            Strategy::WrappedChannel => StrategyKind::WrappedChannel,
            Strategy::MemoryMapped => StrategyKind::MemoryMapped,
            Strategy::NativeRead(_) => StrategyKind::NativeRead,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Acquire this strategy's resource for one pass over `path`.
    pub fn setup(&self, path: &Path, buffer_size: usize) -> Result<Handle, StrategyError> {
        let handle = match self {
            Strategy::RandomAccess => Handle::RandomAccess {
                file: File::open(path)?,
                offset: 0,
            },
            Strategy::BufferedStream => Handle::BufferedStream(BufReader::new(File::open(path)?)),
            Strategy::Stream => Handle::Stream(File::open(path)?),
            Strategy::WrappedChannel => Handle::WrappedChannel(File::open(path)?),
            Strategy::MemoryMapped => Handle::MemoryMapped(MappedReader::new(MappedFile::open(path)?)),
            Strategy::NativeRead(port) => Handle::NativeRead {
                token: port.prepare(path, buffer_size)?,
                port: Arc::clone(port),
            },
        };
        Ok(handle)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-repetition state of a strategy, exclusively owned between setup and
/// teardown.
#[derive(Debug)]
pub enum Handle {
    RandomAccess { file: File, offset: u64 },
    BufferedStream(BufReader<File>),
    Stream(File),
    WrappedChannel(File),
    MemoryMapped(MappedReader),
    NativeRead {
        port: Arc<dyn NativePort>,
        token: NativeToken,
    },
}

impl Handle {
    /// One full sequential pass using `buffer`. Returns the bytes consumed.
    pub fn run(&mut self, buffer: &mut [u8]) -> Result<u64, StrategyError> {
        let consumed = match self {
            Handle::RandomAccess { file, offset } => {
                let start = *offset;
                loop {
                    let n = match file.read_at(buffer, *offset) {
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        other => other?,
                    };
                    if n == 0 {
                        break;
                    }
                    *offset += n as u64;
                }
                *offset - start
            }
            Handle::BufferedStream(reader) => drain(reader, buffer)?,
            Handle::Stream(file) => drain(file, buffer)?,
            Handle::WrappedChannel(file) => {
                let mut view = ByteView::wrap(buffer);
                let mut total = 0u64;
                loop {
                    let n = view.fill_from(file)?;
                    if n == 0 {
                        break;
                    }
                    total += n as u64;
                    view.clear();
                }
                total
            }
            Handle::MemoryMapped(reader) => reader.drain_into(buffer),
            Handle::NativeRead { port, token } => {
                let execution = port.execute(*token)?;
                tracing::trace!(
                    token = %token,
                    native_elapsed_ns = execution.elapsed_nanos,
                    "Native pass finished"
                );
                execution.bytes_read
            }
        };
        Ok(consumed)
    }

    /// Release the handle's resource.
    pub fn teardown(self) -> Result<(), StrategyError> {
        match self {
            Handle::RandomAccess { .. }
            | Handle::BufferedStream(_)
            | Handle::Stream(_)
            | Handle::WrappedChannel(_) => Ok(()),
            Handle::MemoryMapped(reader) => reader.into_inner().unmap(),
            Handle::NativeRead { port, token } => Ok(port.release(token)?),
        }
    }
}

/// Read until the reader reports end of file.
fn drain<R: Read>(reader: &mut R, buffer: &mut [u8]) -> io::Result<u64> {
    let mut total = 0u64;
    loop {
        match reader.read(buffer) {
            Ok(0) => return Ok(total),
            Ok(n) => total += n as u64,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn file_of(len: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let contents: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        file.write_all(&contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_every_strategy_reads_whole_file() {
        let file = file_of(100_000);
        let mut buffer = vec![0u8; 4096];

        for strategy in Strategy::defaults() {
            let mut handle = strategy.setup(file.path(), buffer.len()).unwrap();
            let consumed = handle.run(&mut buffer).unwrap();
            handle.teardown().unwrap();
            assert_eq!(consumed, 100_000, "strategy {}", strategy);
        }
    }

    #[test]
    fn test_fresh_handle_per_setup() {
        let file = file_of(10_000);
        let mut buffer = vec![0u8; 1000];

        for strategy in Strategy::defaults() {
            for _ in 0..2 {
                let mut handle = strategy.setup(file.path(), buffer.len()).unwrap();
                assert_eq!(handle.run(&mut buffer).unwrap(), 10_000, "strategy {}", strategy);
                handle.teardown().unwrap();
            }
        }
    }

    #[test]
    fn test_second_run_on_same_handle_is_at_eof() {
        let file = file_of(5_000);
        let mut buffer = vec![0u8; 512];

        let mut handle = Strategy::Stream.setup(file.path(), buffer.len()).unwrap();
        assert_eq!(handle.run(&mut buffer).unwrap(), 5_000);
        assert_eq!(handle.run(&mut buffer).unwrap(), 0);
        handle.teardown().unwrap();
    }

    #[test]
    fn test_setup_missing_file_fails() {
        let missing = Path::new("/nonexistent/readbench/file");
        for strategy in Strategy::defaults() {
            assert!(strategy.setup(missing, 4096).is_err(), "strategy {}", strategy);
        }
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.name().parse::<StrategyKind>().unwrap(), kind);
        }
        assert_eq!("MMAP".parse::<StrategyKind>().unwrap(), StrategyKind::MemoryMapped);
        assert!("splice".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_defaults_cover_all_kinds() {
        let kinds: Vec<_> = Strategy::defaults().iter().map(Strategy::kind).collect();
        assert_eq!(kinds, StrategyKind::ALL.to_vec());
    }
}
