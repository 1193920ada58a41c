//! Platform versions and target range expressions
//!
//! This module provides:
//! - Strict and tolerant parsing of platform versions
//! - Parsing of label range expressions into [`VersionRange`]
//! - Range membership checks with optional major.minor truncation
//!
//! Copyright (c) 2025 Bundlegate Authors
//! Licensed under the Apache-2.0 license

pub mod range;
pub mod version;

pub use range::{range_contains_version, VersionRange, LEGACY_MIN_4_5_LISTS};
pub use version::{OcpVersion, VersionError};
