//! Platform version parsing
//!
//! Copyright (c) 2025 Bundlegate Authors
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A platform version such as `4.9.0`
///
/// Equality and ordering ignore build metadata, so `4.8.0+build` equals `4.8.0`.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OcpVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release: Option<String>,
    pub build_metadata: Option<String>,
}

impl OcpVersion {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre_release: None,
            build_metadata: None,
        }
    }

    /// Parse a strict `X.Y.Z` version string
    ///
    /// No `v` prefix is accepted. Pre-release and build suffixes are kept,
    /// but exactly three numeric components are required.
    pub fn parse(version_str: &str) -> Result<Self, VersionError> {
        let (core, pre_release, build_metadata) = split_suffixes(version_str);

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() != 3 {
            return Err(VersionError::InvalidFormat(format!(
                "expected format X.Y.Z, got: {}",
                version_str
            )));
        }

        Ok(Self {
            major: parse_component(parts[0], "major")?,
            minor: parse_component(parts[1], "minor")?,
            patch: parse_component(parts[2], "patch")?,
            pre_release,
            build_metadata,
        })
    }

    /// Parse a loosely written version
    ///
    /// Surrounding whitespace and a leading `v` are dropped and missing minor
    /// or patch components default to zero, so `v4.8` reads as `4.8.0`.
    pub fn parse_tolerant(version_str: &str) -> Result<Self, VersionError> {
        let trimmed = version_str.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(VersionError::EmptyVersion);
        }
        let (core, pre_release, build_metadata) = split_suffixes(trimmed);

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() > 3 {
            return Err(VersionError::InvalidFormat(format!(
                "expected at most three components, got: {}",
                trimmed
            )));
        }

        let component = |index: usize, name: &str| -> Result<u64, VersionError> {
            match parts.get(index) {
                Some(part) => {
                    let part = part.trim_start_matches('0');
                    if part.is_empty() {
                        Ok(0)
                    } else {
                        parse_component(part, name)
                    }
                }
                None => Ok(0),
            }
        };

        Ok(Self {
            major: component(0, "major")?,
            minor: component(1, "minor")?,
            patch: component(2, "patch")?,
            pre_release,
            build_metadata,
        })
    }

    /// The same version with the patch level and suffixes dropped
    pub fn truncated(&self) -> Self {
        Self::new(self.major, self.minor, 0)
    }

    /// Whether the version only carries major.minor information
    pub fn is_major_minor(&self) -> bool {
        *self == self.truncated()
    }

    /// `major.minor` rendering used in messages and range checks
    pub fn major_minor(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

fn split_suffixes(version_str: &str) -> (&str, Option<String>, Option<String>) {
    let (version_part, build_metadata) = match version_str.split_once('+') {
        Some((version, build)) => (version, Some(build.to_string())),
        None => (version_str, None),
    };
    let (version_part, pre_release) = match version_part.split_once('-') {
        Some((version, pre)) => (version, Some(pre.to_string())),
        None => (version_part, None),
    };
    (version_part, pre_release, build_metadata)
}

fn parse_component(part: &str, name: &str) -> Result<u64, VersionError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionError::InvalidFormat(format!(
            "invalid {} version: {:?}",
            name, part
        )));
    }
    if part.len() > 1 && part.starts_with('0') {
        return Err(VersionError::InvalidFormat(format!(
            "{} version must not contain leading zeroes: {:?}",
            name, part
        )));
    }
    part.parse()
        .map_err(|_| VersionError::InvalidFormat(format!("invalid {} version: {:?}", name, part)))
}

impl fmt::Display for OcpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(ref pre) = self.pre_release {
            write!(f, "-{}", pre)?;
        }
        if let Some(ref build) = self.build_metadata {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

impl FromStr for OcpVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_tolerant(s)
    }
}

impl TryFrom<String> for OcpVersion {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_tolerant(&value)
    }
}

impl From<OcpVersion> for String {
    fn from(version: OcpVersion) -> Self {
        version.to_string()
    }
}

impl PartialEq for OcpVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for OcpVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OcpVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| {
                // Pre-release versions have lower precedence
                match (&self.pre_release, &other.pre_release) {
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => Ordering::Greater,
                    (Some(_), None) => Ordering::Less,
                    (Some(a), Some(b)) => a.cmp(b),
                }
            })
    }
}

/// Version and range parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("invalid version format: {0}")]
    InvalidFormat(String),

    #[error("range is empty")]
    EmptyRange,

    #[error("version is empty")]
    EmptyVersion,

    #[error("invalid version {version:?}: {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("invalid truncated version {version:?}: {reason}")]
    InvalidTruncatedVersion { version: String, reason: String },

    #[error("invalid range {range:?}: {reason}")]
    InvalidRange { range: String, reason: String },
}

impl VersionError {
    /// Whether the error concerns the range expression rather than the target version
    pub fn is_range_error(&self) -> bool {
        matches!(self, Self::EmptyRange | Self::InvalidRange { .. })
    }
}
