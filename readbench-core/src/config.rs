// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark configuration with strict validation.
//!
//! Raw values (from YAML or the command line) are validated into an
//! immutable [`BenchConfig`] before any file is created. Any invalid field
//! results in an [`InvalidConfigError`] naming that field.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{InvalidConfigError, ReadBenchError, ReadBenchResult};
use crate::strategy::StrategyKind;
use crate::sweep::BufferSweep;
use crate::types::{BufferSize, FileSize, Step, StepMode};

fn default_repetitions() -> i64 {
    1
}

fn default_step_amount() -> i64 {
    2
}

fn default_step_mode() -> StepMode {
    StepMode::Multiplicative
}

/// Configuration as supplied (before validation).
///
/// Exactly one of `file_size_bytes` / `file_size_mb` must be set.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawBenchConfig {
    #[serde(default)]
    pub file_size_bytes: Option<i64>,
    #[serde(default)]
    pub file_size_mb: Option<i64>,
    #[serde(default = "default_repetitions")]
    pub repetitions: i64,
    pub buffer_size_from: i64,
    pub buffer_size_to: i64,
    #[serde(default = "default_step_amount")]
    pub step_amount: i64,
    #[serde(default = "default_step_mode")]
    pub step_mode: StepMode,
    #[serde(default)]
    pub strategies: Vec<String>,
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

impl RawBenchConfig {
    /// Minimal raw config; everything else takes its default.
    pub fn new(file_size_bytes: i64, buffer_size_from: i64, buffer_size_to: i64) -> Self {
        Self {
            file_size_bytes: Some(file_size_bytes),
            file_size_mb: None,
            repetitions: default_repetitions(),
            buffer_size_from,
            buffer_size_to,
            step_amount: default_step_amount(),
            step_mode: default_step_mode(),
            strategies: Vec::new(),
            temp_dir: None,
        }
    }

    pub fn repetitions(mut self, repetitions: i64) -> Self {
        self.repetitions = repetitions;
        self
    }

    pub fn step(mut self, mode: StepMode, amount: i64) -> Self {
        self.step_mode = mode;
        self.step_amount = amount;
        self
    }

    pub fn strategies<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strategies = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Validate and convert into a [`BenchConfig`].
    pub fn validate(self) -> Result<BenchConfig, InvalidConfigError> {
        let file_size = match (self.file_size_bytes, self.file_size_mb) {
            (Some(bytes), None) => FileSize::new(bytes)?,
            (None, Some(mb)) => FileSize::from_mb(mb)?,
            (Some(bytes), Some(mb)) => {
                return Err(InvalidConfigError::InvalidFieldValue {
                    field: "file_size_bytes",
                    value: format!("{} (and file_size_mb = {})", bytes, mb),
                    reason: "Set either file_size_bytes or file_size_mb, not both".to_string(),
                })
            }
            (None, None) => {
                return Err(InvalidConfigError::InvalidFieldValue {
                    field: "file_size_bytes",
                    value: "<missing>".to_string(),
                    reason: "A file size is required".to_string(),
                })
            }
        };

        let repetitions = u32::try_from(self.repetitions).map_err(|_| {
            InvalidConfigError::InvalidFieldValue {
                field: "repetitions",
                value: self.repetitions.to_string(),
                reason: format!("Must be between 0 and {}", u32::MAX),
            }
        })?;

        let buffer_from = BufferSize::for_field("buffer_size_from", self.buffer_size_from)?;
        let buffer_to = BufferSize::for_field("buffer_size_to", self.buffer_size_to)?;
        if buffer_from > buffer_to {
            return Err(InvalidConfigError::InvalidFieldValue {
                field: "buffer_size_to",
                value: self.buffer_size_to.to_string(),
                reason: format!(
                    "Must not be smaller than buffer_size_from ({})",
                    buffer_from
                ),
            });
        }

        let step = Step::new(self.step_mode, self.step_amount)?;

        let mut strategies = Vec::with_capacity(self.strategies.len());
        let mut seen = HashSet::new();
        for name in &self.strategies {
            let kind: StrategyKind = name.parse()?;
            if !seen.insert(kind) {
                return Err(InvalidConfigError::DuplicateStrategy {
                    name: kind.name().to_string(),
                });
            }
            strategies.push(kind);
        }
        if strategies.is_empty() {
            strategies = StrategyKind::ALL.to_vec();
        }

        Ok(BenchConfig {
            file_size,
            repetitions,
            buffer_from,
            buffer_to,
            step,
            strategies,
            temp_dir: self.temp_dir,
        })
    }
}

/// Validated, immutable run parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    file_size: FileSize,
    repetitions: u32,
    buffer_from: BufferSize,
    buffer_to: BufferSize,
    step: Step,
    strategies: Vec<StrategyKind>,
    temp_dir: Option<PathBuf>,
}

impl BenchConfig {
    pub fn file_size(&self) -> FileSize {
        self.file_size
    }

    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }

    pub fn buffer_from(&self) -> BufferSize {
        self.buffer_from
    }

    pub fn buffer_to(&self) -> BufferSize {
        self.buffer_to
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// Strategies selected for the run, in registration order.
    pub fn strategies(&self) -> &[StrategyKind] {
        &self.strategies
    }

    /// Directory for the backing file; `None` means the system temp dir.
    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp_dir.as_deref()
    }

    /// The buffer sizes this configuration sweeps over.
    pub fn sweep(&self) -> BufferSweep {
        BufferSweep::new(self.buffer_from, self.buffer_to, self.step)
    }
}

/// Loads benchmark configuration files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> ReadBenchResult<BenchConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ReadBenchError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ReadBenchError::ConfigParse {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;

        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> ReadBenchResult<BenchConfig> {
        let raw: RawBenchConfig =
            serde_yaml::from_str(content).map_err(|e| ReadBenchError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?;

        Ok(raw.validate()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CONFIG: &str = r#"
file_size_mb: 64
repetitions: 3
buffer_size_from: 4096
buffer_size_to: 1048576
step_amount: 4
step_mode: multiplicative
strategies:
  - mmap
  - native_fread
"#;

    fn field_of(err: InvalidConfigError) -> &'static str {
        match err {
            InvalidConfigError::InvalidFieldValue { field, .. } => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_valid_config() {
        let config = ConfigLoader::load_string(VALID_CONFIG).unwrap();
        assert_eq!(config.file_size().bytes(), 64 * 1024 * 1024);
        assert_eq!(config.repetitions(), 3);
        assert_eq!(config.step().amount(), 4);
        assert_eq!(
            config.strategies(),
            &[StrategyKind::MemoryMapped, StrategyKind::NativeRead]
        );
    }

    #[test]
    fn test_defaults_applied() {
        let yaml = r#"
file_size_bytes: 1048576
buffer_size_from: 4096
buffer_size_to: 16384
"#;
        let config = ConfigLoader::load_string(yaml).unwrap();
        assert_eq!(config.repetitions(), 1);
        assert_eq!(config.step().mode(), StepMode::Multiplicative);
        assert_eq!(config.step().amount(), 2);
        assert_eq!(config.strategies(), &StrategyKind::ALL);
        assert!(config.temp_dir().is_none());
    }

    #[test]
    fn test_file_size_must_be_positive() {
        let err = RawBenchConfig::new(0, 4096, 8192).validate().unwrap_err();
        assert_eq!(field_of(err), "file_size_bytes");
    }

    #[test]
    fn test_file_size_exactly_one_unit() {
        let mut raw = RawBenchConfig::new(1024, 16, 32);
        raw.file_size_mb = Some(1);
        assert!(raw.validate().is_err());

        let mut raw = RawBenchConfig::new(1024, 16, 32);
        raw.file_size_bytes = None;
        assert!(raw.validate().is_err());
    }

    #[test]
    fn test_negative_repetitions() {
        let err = RawBenchConfig::new(1024, 16, 32)
            .repetitions(-1)
            .validate()
            .unwrap_err();
        assert_eq!(field_of(err), "repetitions");
    }

    #[test]
    fn test_zero_repetitions_allowed() {
        let config = RawBenchConfig::new(1024, 16, 32)
            .repetitions(0)
            .validate()
            .unwrap();
        assert_eq!(config.repetitions(), 0);
    }

    #[test]
    fn test_buffer_bounds() {
        let err = RawBenchConfig::new(1024, 0, 32).validate().unwrap_err();
        assert_eq!(field_of(err), "buffer_size_from");

        let err = RawBenchConfig::new(1024, 64, 32).validate().unwrap_err();
        assert_eq!(field_of(err), "buffer_size_to");

        assert!(RawBenchConfig::new(1024, 32, 32).validate().is_ok());
    }

    #[test]
    fn test_step_rejections() {
        for (mode, amount) in [
            (StepMode::Additive, 0),
            (StepMode::Additive, -1),
            (StepMode::Multiplicative, 1),
            (StepMode::Multiplicative, 0),
            (StepMode::Multiplicative, -2),
        ] {
            let err = RawBenchConfig::new(1024, 16, 32)
                .step(mode, amount)
                .validate()
                .unwrap_err();
            assert_eq!(field_of(err), "step_amount");
        }
    }

    #[test]
    fn test_duplicate_strategy() {
        let err = RawBenchConfig::new(1024, 16, 32)
            .strategies(["stream", "STREAM"])
            .validate()
            .unwrap_err();
        assert!(matches!(err, InvalidConfigError::DuplicateStrategy { .. }));
    }

    #[test]
    fn test_unknown_strategy() {
        let err = RawBenchConfig::new(1024, 16, 32)
            .strategies(["sendfile"])
            .validate()
            .unwrap_err();
        assert!(matches!(err, InvalidConfigError::UnknownStrategy { .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
file_size_bytes: 1024
buffer_size_from: 16
buffer_size_to: 32
warmup: 3
"#;
        assert!(matches!(
            ConfigLoader::load_string(yaml),
            Err(ReadBenchError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ConfigLoader::load_file("/nonexistent/readbench.yaml"),
            Err(ReadBenchError::ConfigNotFound { .. })
        ));
    }
}
