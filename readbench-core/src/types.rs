// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers for validated inputs.
//!
//! Each type validates its invariant at creation time so the rest of the
//! harness can rely on it without re-checking.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidConfigError;

/// Bytes per megabyte as used in reports.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Validated size of the backing file in bytes. Always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u64")]
pub struct FileSize(u64);

impl FileSize {
    /// Create a new FileSize with validation.
    pub fn new(bytes: i64) -> Result<Self, InvalidConfigError> {
        if bytes <= 0 {
            return Err(InvalidConfigError::InvalidFieldValue {
                field: "file_size_bytes",
                value: bytes.to_string(),
                reason: "File size must be greater than 0".to_string(),
            });
        }
        Ok(Self(bytes as u64))
    }

    /// Create from megabytes for convenience.
    pub fn from_mb(mb: i64) -> Result<Self, InvalidConfigError> {
        let bytes = mb.checked_mul(BYTES_PER_MB as i64).ok_or_else(|| {
            InvalidConfigError::InvalidFieldValue {
                field: "file_size_mb",
                value: mb.to_string(),
                reason: "File size overflows 64 bits".to_string(),
            }
        })?;
        Self::new(bytes)
    }

    /// Get the size in bytes.
    pub fn bytes(&self) -> u64 {
        self.0
    }

    /// Get the size in whole megabytes (truncating).
    pub fn megabytes(&self) -> u64 {
        self.0 / BYTES_PER_MB
    }
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}MB", self.megabytes())
    }
}

impl TryFrom<i64> for FileSize {
    type Error = InvalidConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FileSize> for u64 {
    fn from(size: FileSize) -> Self {
        size.0
    }
}

/// Validated buffer size in bytes. Always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "usize")]
pub struct BufferSize(usize);

impl BufferSize {
    /// Create a new BufferSize, reporting failures against `field`.
    pub fn for_field(field: &'static str, bytes: i64) -> Result<Self, InvalidConfigError> {
        if bytes <= 0 {
            return Err(InvalidConfigError::InvalidFieldValue {
                field,
                value: bytes.to_string(),
                reason: "Buffer size must be greater than 0".to_string(),
            });
        }
        let bytes = usize::try_from(bytes).map_err(|_| InvalidConfigError::InvalidFieldValue {
            field,
            value: bytes.to_string(),
            reason: "Buffer size does not fit in memory on this platform".to_string(),
        })?;
        Ok(Self(bytes))
    }

    /// Get the size in bytes.
    pub fn bytes(&self) -> usize {
        self.0
    }
}

impl fmt::Display for BufferSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for BufferSize {
    type Error = InvalidConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::for_field("buffer_size", value)
    }
}

impl From<BufferSize> for usize {
    fn from(size: BufferSize) -> Self {
        size.0
    }
}

/// How the sweep advances from one buffer size to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepMode {
    /// `current += amount`
    Additive,
    /// `current *= amount`
    Multiplicative,
}

impl fmt::Display for StepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepMode::Additive => write!(f, "additive"),
            StepMode::Multiplicative => write!(f, "multiplicative"),
        }
    }
}

/// Validated sweep step: additive amounts are at least 1, multiplicative
/// factors at least 2, so the sequence always strictly increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Step {
    mode: StepMode,
    amount: usize,
}

impl Step {
    /// Create a new Step with validation.
    pub fn new(mode: StepMode, amount: i64) -> Result<Self, InvalidConfigError> {
        let minimum = match mode {
            StepMode::Additive => 1,
            StepMode::Multiplicative => 2,
        };
        if amount < minimum {
            return Err(InvalidConfigError::InvalidFieldValue {
                field: "step_amount",
                value: amount.to_string(),
                reason: format!("A {} step must be at least {}", mode, minimum),
            });
        }
        let amount = usize::try_from(amount).map_err(|_| InvalidConfigError::InvalidFieldValue {
            field: "step_amount",
            value: amount.to_string(),
            reason: "Step amount does not fit in memory on this platform".to_string(),
        })?;
        Ok(Self { mode, amount })
    }

    pub fn mode(&self) -> StepMode {
        self.mode
    }

    pub fn amount(&self) -> usize {
        self.amount
    }

    /// Advance `current` by one step. `None` once the next value would overflow.
    pub fn advance(&self, current: usize) -> Option<usize> {
        match self.mode {
            StepMode::Additive => current.checked_add(self.amount),
            StepMode::Multiplicative => current.checked_mul(self.amount),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            StepMode::Additive => write!(f, "+{}", self.amount),
            StepMode::Multiplicative => write!(f, "x{}", self.amount),
        }
    }
}

/// Parses the compact notation `x2`, `X2`, `*2` or `+4096`.
impl FromStr for Step {
    type Err = InvalidConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let mode = match chars.next() {
            Some('x' | 'X' | '*') => StepMode::Multiplicative,
            Some('+') => StepMode::Additive,
            _ => {
                return Err(InvalidConfigError::UnknownStepPolicy {
                    input: s.to_string(),
                })
            }
        };
        let amount: i64 =
            chars
                .as_str()
                .parse()
                .map_err(|_| InvalidConfigError::UnknownStepPolicy {
                    input: s.to_string(),
                })?;
        Self::new(mode, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_size_rejects_non_positive() {
        assert!(FileSize::new(0).is_err());
        assert!(FileSize::new(-1).is_err());
        assert_eq!(FileSize::new(1).unwrap().bytes(), 1);
    }

    #[test]
    fn test_file_size_megabytes_truncates() {
        let size = FileSize::new(3 * BYTES_PER_MB as i64 - 1).unwrap();
        assert_eq!(size.megabytes(), 2);
        assert_eq!(FileSize::from_mb(64).unwrap().bytes(), 64 * BYTES_PER_MB);
    }

    #[test]
    fn test_buffer_size_reports_field() {
        let err = BufferSize::for_field("buffer_size_to", 0).unwrap_err();
        assert!(err.to_string().contains("buffer_size_to"));
    }

    #[test]
    fn test_step_minimums() {
        assert!(Step::new(StepMode::Additive, 0).is_err());
        assert!(Step::new(StepMode::Additive, -4).is_err());
        assert!(Step::new(StepMode::Additive, 1).is_ok());
        assert!(Step::new(StepMode::Multiplicative, 1).is_err());
        assert!(Step::new(StepMode::Multiplicative, 0).is_err());
        assert!(Step::new(StepMode::Multiplicative, 2).is_ok());
    }

    #[test]
    fn test_step_parse() {
        let step: Step = "x2".parse().unwrap();
        assert_eq!(step.mode(), StepMode::Multiplicative);
        assert_eq!(step.amount(), 2);

        let step: Step = "*4".parse().unwrap();
        assert_eq!(step.mode(), StepMode::Multiplicative);

        let step: Step = "+4096".parse().unwrap();
        assert_eq!(step.mode(), StepMode::Additive);
        assert_eq!(step.amount(), 4096);
        assert_eq!(step.to_string(), "+4096");

        assert!("-2".parse::<Step>().is_err());
        assert!("x".parse::<Step>().is_err());
        assert!("x1".parse::<Step>().is_err());
        assert!("".parse::<Step>().is_err());
    }

    #[test]
    fn test_step_advance_overflow() {
        let step = Step::new(StepMode::Multiplicative, 2).unwrap();
        assert_eq!(step.advance(4096), Some(8192));
        assert_eq!(step.advance(usize::MAX), None);
    }
}
