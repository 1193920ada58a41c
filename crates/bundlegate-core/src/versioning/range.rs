//! Target platform range expressions
//!
//! Ranges come from the `com.redhat.openshift.versions` label and use a
//! small syntax over major.minor versions:
//!
//! - `v4.6` - version 4.6 or newer
//! - `=v4.6` - exactly 4.6
//! - `v4.6-v4.8` - 4.6 through 4.8, inclusive
//! - `v4.5,v4.6` - legacy list, read as "4.5 or newer"
//!
//! Copyright (c) 2025 Bundlegate Authors
//! Licensed under the Apache-2.0 license

use crate::versioning::version::{OcpVersion, VersionError};
use std::fmt;

/// Comma lists accepted before ranges existed. Both orders mean ">= 4.5".
///
/// Only these exact spellings are recognised; other comma lists are invalid.
pub const LEGACY_MIN_4_5_LISTS: [&str; 4] = ["v4.5,v4.6", "v4.6,v4.5", "4.5,4.6", "4.6,4.5"];

/// A parsed range expression over major.minor versions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRange {
    /// `=vX.Y`
    Exact(OcpVersion),
    /// `vX.Y`
    AtLeast(OcpVersion),
    /// `vX.Y-vA.B`
    Between { min: OcpVersion, max: OcpVersion },
}

impl VersionRange {
    /// Parse a range expression
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let cleaned = raw
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .trim();
        if cleaned.is_empty() {
            return Err(VersionError::EmptyRange);
        }

        if LEGACY_MIN_4_5_LISTS.contains(&cleaned) {
            return Ok(VersionRange::AtLeast(OcpVersion::new(4, 5, 0)));
        }

        // A separator left over from `label: value` syntax
        let cleaned = cleaned.strip_prefix(':').unwrap_or(cleaned).trim_start();

        match cleaned.split_once('-') {
            None => match cleaned.strip_prefix('=') {
                Some(exact) => Ok(VersionRange::Exact(parse_bound(raw, exact)?)),
                None => Ok(VersionRange::AtLeast(parse_bound(raw, cleaned)?)),
            },
            Some((min, max)) => {
                if min.starts_with('=') || max.starts_with('=') {
                    return Err(VersionError::InvalidRange {
                        range: raw.to_string(),
                        reason: "cannot use equal prefix with range".to_string(),
                    });
                }
                if max.contains('-') {
                    return Err(VersionError::InvalidRange {
                        range: raw.to_string(),
                        reason: "a range takes exactly two bounds".to_string(),
                    });
                }
                Ok(VersionRange::Between {
                    min: parse_bound(raw, min)?,
                    max: parse_bound(raw, max)?,
                })
            }
        }
    }

    /// Check whether a version lies within this range
    pub fn contains(&self, version: &OcpVersion) -> bool {
        match self {
            VersionRange::Exact(v) => version == v,
            VersionRange::AtLeast(v) => version >= v,
            VersionRange::Between { min, max } => version >= min && version <= max,
        }
    }
}

/// Complete a `vX.Y` token to `X.Y.0` and parse it strictly
fn parse_bound(range: &str, token: &str) -> Result<OcpVersion, VersionError> {
    let token = token.strip_prefix('v').unwrap_or(token);
    OcpVersion::parse(&format!("{}.0", token)).map_err(|e| VersionError::InvalidRange {
        range: range.to_string(),
        reason: format!("bound {:?}: {}", token, e),
    })
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionRange::Exact(v) => write!(f, "={}", v),
            VersionRange::AtLeast(v) => write!(f, ">={}", v),
            VersionRange::Between { min, max } => write!(f, ">={} <={}", min, max),
        }
    }
}

/// Check whether `target` falls within the range expression `range`
///
/// The target is read as `major.minor`. With `tolerant_truncation`, a target
/// carrying a patch level (`4.8.1`) is cut back to `4.8` instead of failing.
pub fn range_contains_version(
    range: &str,
    target: &str,
    tolerant_truncation: bool,
) -> Result<bool, VersionError> {
    if range.is_empty() {
        return Err(VersionError::EmptyRange);
    }
    if target.is_empty() {
        return Err(VersionError::EmptyVersion);
    }

    let target = target.strip_prefix('v').unwrap_or(target);
    let version = match OcpVersion::parse(&format!("{}.0", target)) {
        Ok(version) => version,
        Err(err) if tolerant_truncation => {
            let mut parts = target.split('.');
            match (parts.next(), parts.next()) {
                (Some(major), Some(minor)) => OcpVersion::parse(&format!("{}.{}.0", major, minor))
                    .map_err(|e| VersionError::InvalidTruncatedVersion {
                        version: format!("{}.{}", major, minor),
                        reason: e.to_string(),
                    })?,
                _ => {
                    return Err(VersionError::InvalidTruncatedVersion {
                        version: target.to_string(),
                        reason: err.to_string(),
                    })
                }
            }
        }
        Err(err) => {
            return Err(VersionError::InvalidVersion {
                version: target.to_string(),
                reason: err.to_string(),
            })
        }
    };

    let parsed = VersionRange::parse(range)?;
    tracing::trace!(range = %parsed, version = %version, "evaluating range membership");
    Ok(parsed.contains(&version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_parsing() {
        assert_eq!(
            VersionRange::parse("v4.6").unwrap(),
            VersionRange::AtLeast(OcpVersion::new(4, 6, 0))
        );
        assert_eq!(
            VersionRange::parse("=v4.8").unwrap(),
            VersionRange::Exact(OcpVersion::new(4, 8, 0))
        );
        assert_eq!(
            VersionRange::parse("v4.6-v4.8").unwrap(),
            VersionRange::Between {
                min: OcpVersion::new(4, 6, 0),
                max: OcpVersion::new(4, 8, 0),
            }
        );
        assert_eq!(
            VersionRange::parse(" \"v4.6-v4.8\" ").unwrap(),
            VersionRange::parse("v4.6-v4.8").unwrap()
        );
        assert_eq!(
            VersionRange::parse("4.6,4.5").unwrap(),
            VersionRange::AtLeast(OcpVersion::new(4, 5, 0))
        );
    }

    #[test]
    fn test_legacy_list_is_not_generalised() {
        assert!(VersionRange::parse("v4.7,v4.8").is_err());
        assert!(VersionRange::parse("v4.5,v4.6,v4.7").is_err());
    }

    #[test]
    fn test_range_parse_errors() {
        assert_eq!(VersionRange::parse(""), Err(VersionError::EmptyRange));
        assert_eq!(VersionRange::parse("''"), Err(VersionError::EmptyRange));
        assert!(VersionRange::parse("=v4.6-v4.8").is_err());
        assert!(VersionRange::parse("v4.6-=v4.8").is_err());
        assert!(VersionRange::parse("v4.6-v4.8-v4.9").is_err());
        assert!(VersionRange::parse("v4.8.1").is_err());
        assert!(VersionRange::parse("vv4.vv8v-vvv4vvv.vvv9vvv").is_err());
    }

    #[test]
    fn test_range_single_v_prefix_only() {
        assert!(VersionRange::parse("vv4.8").is_err());
        assert!(VersionRange::parse("=vv4.9").is_err());
        assert!(VersionRange::parse("vv4.6-vv4.8").is_err());
        assert!(VersionRange::parse("v4.6-vv4.8").is_err());
        assert!(range_contains_version("=v4.9", "vv4.9", false).is_err());
        assert!(range_contains_version("=v4.9", "vv4.9", true).is_err());
        assert_eq!(range_contains_version("=v4.9", "v4.9", false), Ok(true));
    }

    #[test]
    fn test_range_bounds_reject_inner_whitespace() {
        assert!(VersionRange::parse("v4.6 - v4.8").is_err());
        assert!(VersionRange::parse("v4.6- v4.8").is_err());
        assert!(VersionRange::parse("  v4.6-v4.8  ").is_ok());
    }

    #[test]
    fn test_contains() {
        let v4_9 = OcpVersion::new(4, 9, 0);
        assert!(VersionRange::parse("=v4.9").unwrap().contains(&v4_9));
        assert!(!VersionRange::parse("=v4.10").unwrap().contains(&v4_9));
        assert!(VersionRange::parse("v4.6-v4.9").unwrap().contains(&v4_9));
        assert!(!VersionRange::parse("v4.6-v4.8").unwrap().contains(&v4_9));
        assert!(VersionRange::parse("v4.9").unwrap().contains(&v4_9));
    }

    #[test]
    fn test_range_contains_version_truncation() {
        assert_eq!(range_contains_version("v4.6-v4.8", "4.8.1", true), Ok(true));
        assert!(matches!(
            range_contains_version("v4.6-v4.8", "4.8.1", false),
            Err(VersionError::InvalidVersion { .. })
        ));
        assert!(matches!(
            range_contains_version("v4.6-v4.8", "4", true),
            Err(VersionError::InvalidTruncatedVersion { .. })
        ));
        assert_eq!(range_contains_version("v4.6-v4.8", "v4.7", false), Ok(true));
    }

    #[test]
    fn test_range_contains_version_empty_inputs() {
        assert_eq!(range_contains_version("", "4.9", false), Err(VersionError::EmptyRange));
        assert_eq!(range_contains_version("v4.6", "", false), Err(VersionError::EmptyVersion));
    }
}
