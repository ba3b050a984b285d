// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Buffer-size sweep generation.

use crate::types::{BufferSize, Step};

/// Iterator over the buffer sizes of a sweep.
///
/// Starts at `from`, emits, then advances by the step until the value exceeds
/// `to`. A step that would overflow ends the sweep. Because a validated
/// [`Step`] always grows the value, the sequence is strictly increasing and
/// finite.
#[derive(Debug, Clone)]
pub struct BufferSweep {
    cursor: Option<usize>,
    to: usize,
    step: Step,
}

impl BufferSweep {
    pub fn new(from: BufferSize, to: BufferSize, step: Step) -> Self {
        Self {
            cursor: Some(from.bytes()),
            to: to.bytes(),
            step,
        }
    }
}

impl Iterator for BufferSweep {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.cursor.filter(|&size| size <= self.to)?;
        self.cursor = self.step.advance(current);
        Some(current)
    }
}

impl std::iter::FusedIterator for BufferSweep {}
