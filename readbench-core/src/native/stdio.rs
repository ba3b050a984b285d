// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! libc stdio implementation of the native port (`fopen` / `fread` / `fclose`).

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use dashmap::DashMap;

use super::{Execution, NativePort, NativeToken};
use crate::error::PortError;

/// An open stdio stream plus its read buffer.
#[derive(Debug)]
struct StdioSession {
    file: Option<NonNull<libc::FILE>>,
    buffer: Vec<u8>,
}

// SAFETY: the FILE stream is owned by exactly one session and only touched
// while holding that session's DashMap shard lock.
unsafe impl Send for StdioSession {}

// SAFETY: see above; shared references never reach the stream.
unsafe impl Sync for StdioSession {}

impl StdioSession {
    fn close(mut self) -> std::io::Result<()> {
        if let Some(file) = self.file.take() {
            // SAFETY: file came from fopen and has not been closed yet.
            if unsafe { libc::fclose(file.as_ptr()) } != 0 {
                return Err(std::io::Error::last_os_error());
            }
        }
        Ok(())
    }
}

impl Drop for StdioSession {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            // SAFETY: file came from fopen and has not been closed yet.
            unsafe { libc::fclose(file.as_ptr()) };
        }
    }
}

/// Native port backed by the C standard library.
///
/// Each `prepare` opens a fresh `FILE*` so sessions never share stream state.
#[derive(Debug, Default)]
pub struct StdioPort {
    sessions: DashMap<u64, StdioSession>,
    next_token: AtomicU64,
}

impl StdioPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of prepared, not yet released, sessions.
    pub fn open_sessions(&self) -> usize {
        self.sessions.len()
    }
}

impl NativePort for StdioPort {
    fn prepare(&self, path: &Path, buffer_size: usize) -> Result<NativeToken, PortError> {
        let c_path =
            CString::new(path.as_os_str().as_bytes()).map_err(|e| PortError::OpenFailed {
                path: path.to_path_buf(),
                reason: format!("Invalid path: {}", e),
            })?;

        // SAFETY: both arguments are valid NUL-terminated strings.
        let raw = unsafe { libc::fopen(c_path.as_ptr(), c"r".as_ptr()) };
        let file = NonNull::new(raw).ok_or_else(|| PortError::OpenFailed {
            path: path.to_path_buf(),
            reason: std::io::Error::last_os_error().to_string(),
        })?;

        let token = self.next_token.fetch_add(1, Ordering::Relaxed) + 1;
        self.sessions.insert(
            token,
            StdioSession {
                file: Some(file),
                buffer: vec![0u8; buffer_size],
            },
        );

        tracing::trace!(token, path = %path.display(), buffer_size, "Prepared stdio session");
        Ok(NativeToken::new(token))
    }

    fn execute(&self, token: NativeToken) -> Result<Execution, PortError> {
        let mut session = self
            .sessions
            .get_mut(&token.value())
            .ok_or(PortError::UnknownToken {
                token: token.value(),
            })?;
        let file = session.file.ok_or(PortError::UnknownToken {
            token: token.value(),
        })?;
        let buffer = &mut session.buffer;

        let start = Instant::now();
        let mut bytes_read = 0u64;
        loop {
            // SAFETY: buffer is valid for buffer.len() bytes and file is open.
            let n = unsafe {
                libc::fread(
                    buffer.as_mut_ptr() as *mut libc::c_void,
                    1,
                    buffer.len(),
                    file.as_ptr(),
                )
            };
            if n == 0 {
                break;
            }
            bytes_read += n as u64;
        }
        let elapsed_nanos = start.elapsed().as_nanos() as u64;

        // SAFETY: file is open.
        if unsafe { libc::ferror(file.as_ptr()) } != 0 {
            return Err(PortError::ReadFailed {
                token: token.value(),
                reason: "stream error indicator set".to_string(),
            });
        }

        Ok(Execution {
            elapsed_nanos,
            bytes_read,
        })
    }

    fn release(&self, token: NativeToken) -> Result<(), PortError> {
        let (_, session) =
            self.sessions
                .remove(&token.value())
                .ok_or(PortError::UnknownToken {
                    token: token.value(),
                })?;

        session.close().map_err(|e| PortError::ReleaseFailed {
            token: token.value(),
            reason: e.to_string(),
        })
    }
}
