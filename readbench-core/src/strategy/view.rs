// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Fixed-capacity write cursor over a borrowed buffer.

use std::io::{self, Read};

/// A view over a caller-owned buffer with a fill position.
///
/// Reads land in `[position, capacity)`. `clear` rewinds the position without
/// touching or reallocating the storage.
#[derive(Debug)]
pub struct ByteView<'a> {
    storage: &'a mut [u8],
    position: usize,
}

impl<'a> ByteView<'a> {
    pub fn wrap(storage: &'a mut [u8]) -> Self {
        Self {
            storage,
            position: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.capacity() - self.position
    }

    pub fn clear(&mut self) {
        self.position = 0;
    }

    /// One read call into the unfilled tail. Returns bytes read, 0 at EOF.
    pub fn fill_from<R: Read>(&mut self, reader: &mut R) -> io::Result<usize> {
        let n = loop {
            match reader.read(&mut self.storage[self.position..]) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => break other?,
            }
        };
        self.position += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_advances_and_clear_rewinds() {
        let mut storage = [0u8; 4];
        let mut view = ByteView::wrap(&mut storage);
        let mut source: &[u8] = b"abcdef";

        assert_eq!(view.fill_from(&mut source).unwrap(), 4);
        assert_eq!(view.remaining(), 0);

        view.clear();
        assert_eq!(view.position(), 0);
        assert_eq!(view.fill_from(&mut source).unwrap(), 2);
        assert_eq!(view.fill_from(&mut source).unwrap(), 0);
        assert_eq!(view.position(), 2);
        assert_eq!(&storage[..2], b"ef");
    }
}
