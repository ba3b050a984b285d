// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Read-only memory mapping of a whole file.

use std::fs::File;
use std::num::NonZeroUsize;
use std::path::Path;
use std::ptr::NonNull;

use nix::sys::mman::{mmap, munmap, MapFlags, ProtFlags};

use crate::error::StrategyError;

/// A read-only, private mapping of an entire file.
///
/// Unmapped by [`MappedFile::unmap`] or, failing that, on drop.
/// Empty files are represented without a mapping.
pub struct MappedFile {
    ptr: NonNull<libc::c_void>,
    len: usize,
}

// SAFETY: MappedFile owns its mapping and only exposes it read-only.
unsafe impl Send for MappedFile {}

impl MappedFile {
    /// Map `path` read-only from offset 0 to its current length.
    pub fn open(path: &Path) -> Result<Self, StrategyError> {
        let file = File::open(path)?;
        let len = usize::try_from(file.metadata()?.len()).map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "file is larger than the address space",
            )
        })?;

        let Some(length) = NonZeroUsize::new(len) else {
            return Ok(Self {
                ptr: NonNull::dangling(),
                len: 0,
            });
        };

        // SAFETY: fresh private read-only mapping of an open file; the kernel
        // picks the address. The mapping stays valid after `file` is closed.
        let ptr = unsafe {
            mmap(
                None,
                length,
                ProtFlags::PROT_READ,
                MapFlags::MAP_PRIVATE,
                &file,
                0,
            )
        }
        .map_err(|source| StrategyError::Syscall {
            syscall: "mmap",
            source,
        })?;

        tracing::trace!(path = %path.display(), len, "Mapped file");
        Ok(Self { ptr, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: ptr is valid for len bytes of PROT_READ memory until unmapped,
        // and a dangling pointer is valid for a zero-length slice.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr() as *const u8, self.len) }
    }

    /// Release the mapping, surfacing munmap failures.
    pub fn unmap(&mut self) -> Result<(), StrategyError> {
        let len = std::mem::take(&mut self.len);
        if len == 0 {
            return Ok(());
        }
        // SAFETY: ptr/len describe a live mapping created in `open`; len is
        // zeroed first so the mapping is never released twice.
        unsafe { munmap(self.ptr, len) }.map_err(|source| StrategyError::Syscall {
            syscall: "munmap",
            source,
        })
    }
}

impl Drop for MappedFile {
    fn drop(&mut self) {
        if let Err(e) = self.unmap() {
            tracing::error!(error = %e, "Failed to unmap file");
        }
    }
}

impl std::fmt::Debug for MappedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedFile").field("len", &self.len).finish()
    }
}

/// Cursor over a mapping, copying out fixed-size chunks.
#[derive(Debug)]
pub struct MappedReader {
    map: MappedFile,
    position: usize,
}

impl MappedReader {
    pub fn new(map: MappedFile) -> Self {
        Self { map, position: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.map.len() - self.position
    }

    /// Copy the whole mapping through `buffer`.
    ///
    /// Full chunks of `buffer.len()` while at least that much remains; stop at
    /// zero remaining; otherwise one final short chunk of exactly the
    /// remainder. Returns the bytes copied.
    pub fn drain_into(&mut self, buffer: &mut [u8]) -> u64 {
        let chunk = buffer.len();
        if chunk == 0 {
            return 0;
        }

        let mut copied = 0u64;
        loop {
            let remaining = self.remaining();
            let take = if remaining >= chunk {
                chunk
            } else if remaining == 0 {
                break;
            } else {
                remaining
            };

            let source = &self.map.as_slice()[self.position..self.position + take];
            buffer[..take].copy_from_slice(source);
            self.position += take;
            copied += take as u64;

            if take < chunk {
                break;
            }
        }
        copied
    }

    pub fn into_inner(self) -> MappedFile {
        self.map
    }
}
