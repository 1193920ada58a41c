//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//!
//! Command-line arguments are applied on top by the handlers.

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use bundlegate_core::validation::{FILE_PATH_KEY, RANGE_KEY};
use bundlegate_core::{CompatibilityPolicy, OcpVersion};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Compatibility policy
    pub policy: PolicyConfig,

    /// Default label source
    pub label: LabelConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Which platform release the checks guard against
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// First OpenShift version that no longer serves the removed APIs
    pub unsupported_version: String,

    /// Kubernetes release that removed them
    pub removed_in_kube: String,

    /// Link appended to annotation and label messages
    pub docs_link: Option<String>,
}

/// Label source used when `--optional-values` is not given
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Index image Dockerfile or `metadata/annotations.yaml`
    pub file: Option<PathBuf>,

    /// Range expression, e.g. `v4.6-v4.8`
    pub range: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: String,

    /// Use colored output by default
    pub color: bool,

    /// Show progress indicators
    pub progress: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or filter directives
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,

    /// Log file path
    pub file: Option<PathBuf>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let policy = CompatibilityPolicy::default();
        Self {
            unsupported_version: policy.threshold(),
            removed_in_kube: policy.removed_in_kube,
            docs_link: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
            progress: true,
        }
    }
}

impl PolicyConfig {
    /// Build the compatibility policy, with optional command-line overrides
    pub fn to_policy(
        &self,
        unsupported_version: Option<&str>,
        removed_in_kube: Option<&str>,
    ) -> Result<CompatibilityPolicy> {
        let version = match unsupported_version {
            Some(raw) => OcpVersion::parse_tolerant(raw).map_err(|e| {
                Error::invalid_args(format!("--unsupported-version {}: {}", raw, e))
            })?,
            None => OcpVersion::parse_tolerant(&self.unsupported_version).map_err(|e| {
                Error::config(format!(
                    "policy.unsupported_version {}: {}",
                    self.unsupported_version, e
                ))
            })?,
        };

        let kube = removed_in_kube.unwrap_or(&self.removed_in_kube);
        let mut policy = CompatibilityPolicy::new(version, kube);
        if let Some(link) = &self.docs_link {
            policy = policy.with_docs_link(link);
        }
        Ok(policy)
    }
}

impl LabelConfig {
    /// The configured label source as optional-values pairs
    pub fn to_optional_values(&self) -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();
        if let Some(file) = &self.file {
            values.insert(FILE_PATH_KEY.to_string(), file.display().to_string());
        }
        if let Some(range) = &self.range {
            values.insert(RANGE_KEY.to_string(), range.clone());
        }
        values
    }
}

impl OutputConfig {
    /// The configured output format, if it names a known one
    pub fn output_format(&self) -> Option<OutputFormat> {
        OutputFormat::from_str(&self.format, true).ok()
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) if !path.exists() => Err(Error::config(format!(
                "config file {} does not exist",
                path.display()
            ))),
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".bundlegate.yaml"),
            PathBuf::from(".bundlegate.json"),
            PathBuf::from(".bundlegate.toml"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let bundlegate_dir = config_dir.join("bundlegate");
            paths.push(bundlegate_dir.join("config.yaml"));
            paths.push(bundlegate_dir.join("config.json"));
            paths.push(bundlegate_dir.join("config.toml"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".bundlegate.yaml"));
            paths.push(home_dir.join(".bundlegate.json"));
        }

        paths
    }
}
