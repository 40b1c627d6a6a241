// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Backend description: the scratchpad geometry the planner plans against.
//!
//! The accelerator backend provides two constants: the byte capacity of a
//! single scratchpad and how many scratchpads exist. Both can come from a
//! YAML description file or from [`BackendConfig::default`], which describes
//! an SMV-class backend (three 32 KiB pads).

use crate::config::consts::{DEFAULT_SPM_CAPACITY, DEFAULT_SPM_COUNT, SUPPORTED_SPM_COUNT};
use crate::errors::ConfigError;
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Scratchpad geometry of the target accelerator.
///
/// # Fields
/// * `spm_capacity` - Byte capacity of one scratchpad
/// * `spm_count` - Number of scratchpads; the last one is the output pad and
///   is never written to by the pin planner
///
/// # Example
/// ```yaml
/// spm_capacity: 32768
/// spm_count: 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_capacity")]
    pub spm_capacity: u64,
    #[serde(default = "default_count")]
    pub spm_count: usize,
}

fn default_capacity() -> u64 {
    DEFAULT_SPM_CAPACITY
}

fn default_count() -> usize {
    DEFAULT_SPM_COUNT
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            spm_capacity: DEFAULT_SPM_CAPACITY,
            spm_count: DEFAULT_SPM_COUNT,
        }
    }
}

impl BackendConfig {
    pub fn new(spm_capacity: u64, spm_count: usize) -> Self {
        Self {
            spm_capacity,
            spm_count,
        }
    }

    /// Total budget the planner may fill with pins: every pad except the
    /// reserved output pad.
    pub fn writable_budget(&self) -> u64 {
        self.spm_capacity * (self.spm_count as u64 - 1)
    }

    /// Index of the reserved output pad.
    pub fn output_pad(&self) -> usize {
        self.spm_count - 1
    }

    /// Check the geometry against what the planner's slot layout supports.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spm_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.spm_count != SUPPORTED_SPM_COUNT {
            return Err(ConfigError::UnsupportedPadCount {
                requested: self.spm_count,
                supported: SUPPORTED_SPM_COUNT,
            });
        }
        Ok(())
    }
}

/// Load and validate a backend description from a YAML file.
pub fn load_backend_config<P: AsRef<Path>>(path: P) -> anyhow::Result<BackendConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading backend config '{}'", path.display()))?;
    let cfg: BackendConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("parsing backend config '{}'", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validating backend config '{}'", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_describe_an_smv_backend() {
        let cfg = BackendConfig::default();
        assert_eq!(cfg.spm_capacity, 32 * 1024);
        assert_eq!(cfg.spm_count, 3);
        assert_eq!(cfg.writable_budget(), 64 * 1024);
        assert_eq!(cfg.output_pad(), 2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_parse_backend_yaml() {
        let yaml = "spm_capacity: 1024\nspm_count: 3\n";
        let cfg: BackendConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg, BackendConfig::new(1024, 3));
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let cfg: BackendConfig = serde_yaml::from_str("spm_capacity: 4096\n").unwrap();
        assert_eq!(cfg.spm_capacity, 4096);
        assert_eq!(cfg.spm_count, 3);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let cfg = BackendConfig::new(0, 3);
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn test_validate_rejects_unsupported_pad_count() {
        let cfg = BackendConfig::new(1024, 4);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::UnsupportedPadCount {
                requested: 4,
                supported: 3
            })
        );
    }

    #[test]
    fn test_load_backend_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backend.yaml");
        std::fs::write(&path, "spm_capacity: 2048\n").unwrap();

        let cfg = load_backend_config(&path).unwrap();
        assert_eq!(cfg.spm_capacity, 2048);
    }

    #[test]
    fn test_load_backend_config_missing_file() {
        let result = load_backend_config("/nonexistent/backend.yaml");
        assert!(result.is_err());
        let msg = format!("{:#}", result.unwrap_err());
        assert!(msg.contains("reading backend config"));
    }
}
