//! Diagnostics produced by bundle validation
//!
//! Copyright (c) 2025 Bundlegate Authors
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "Error"),
            Level::Warning => write!(f, "Warning"),
        }
    }
}

/// What a diagnostic is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The bundle itself could not be inspected
    InvalidBundle,
    /// The ClusterServiceVersion metadata is inconsistent
    InvalidCsv,
    /// An external check reported a problem
    FailedValidation,
}

/// A single error or warning tagged with the object it concerns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: Level,
    pub kind: DiagnosticKind,
    /// Name of the object the diagnostic refers to
    pub value: String,
    /// Human-readable message
    pub detail: String,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, detail: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            kind,
            value: value.into(),
            detail: detail.into(),
        }
    }

    pub fn warning(kind: DiagnosticKind, detail: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            kind,
            value: value.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::FailedValidation => {
                write!(f, "{}: Value {}: {}", self.level, self.value, self.detail)
            }
            DiagnosticKind::InvalidBundle | DiagnosticKind::InvalidCsv => {
                write!(f, "{}: Value : ({}) {}", self.level, self.value, self.detail)
            }
        }
    }
}

/// Everything validation reported for one bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestResult {
    pub name: String,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl ManifestResult {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a diagnostic to the list matching its level
    pub fn add(&mut self, diagnostic: Diagnostic) {
        match diagnostic.level {
            Level::Error => self.errors.push(diagnostic),
            Level::Warning => self.warnings.push(diagnostic),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let error = Diagnostic::error(DiagnosticKind::InvalidCsv, "bad value", "etcdoperator.v0.9.4");
        assert_eq!(error.to_string(), "Error: Value : (etcdoperator.v0.9.4) bad value");

        let warning = Diagnostic::warning(
            DiagnosticKind::FailedValidation,
            "uses removed APIs",
            "etcdoperator.v0.9.4",
        );
        assert_eq!(warning.to_string(), "Warning: Value etcdoperator.v0.9.4: uses removed APIs");
    }

    #[test]
    fn test_add_routes_by_level() {
        let mut result = ManifestResult::new("bundle");
        result.add(Diagnostic::warning(DiagnosticKind::InvalidCsv, "w", "csv"));
        result.add(Diagnostic::error(DiagnosticKind::InvalidCsv, "e", "csv"));

        assert!(result.has_errors());
        assert!(result.has_warnings());
        assert_eq!(result.errors[0].detail, "e");
        assert_eq!(result.warnings[0].detail, "w");
    }

    #[test]
    fn test_serialization_shape() {
        let diagnostic = Diagnostic::error(DiagnosticKind::InvalidCsv, "bad", "csv");
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["level"], "error");
        assert_eq!(json["kind"], "invalid_csv");
    }
}
