//! Error types for the bundlegate core library
//!
//! Pipeline stages never return these; they report problems as diagnostics.
//! The errors below surface from the standalone helpers (range evaluation,
//! label extraction, manifest parsing) that callers may use directly.

use crate::extract::{ExtractError, LabelFileError};
use crate::versioning::VersionError;
use thiserror::Error;

/// Main error type for bundlegate operations
#[derive(Error, Debug)]
pub enum Error {
    /// Version or range expression could not be parsed
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Metadata value could not be extracted
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Label file could not be read
    #[error(transparent)]
    LabelFile(#[from] LabelFileError),

    /// Manifest is not valid JSON
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Manifest parsed but is not a usable Kubernetes object
    #[error("invalid manifest: {message}")]
    InvalidManifest { message: String },
}

/// Result type alias for bundlegate operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn json(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            message: message.into(),
            source,
        }
    }

    pub fn invalid_manifest(message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            message: message.into(),
        }
    }

    /// Whether the error came from a version or range expression
    pub fn is_version_error(&self) -> bool {
        matches!(self, Self::Version(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_error_is_transparent() {
        let err: Error = VersionError::EmptyRange.into();
        assert!(err.is_version_error());
        assert_eq!(err.to_string(), "range is empty");
    }

    #[test]
    fn test_json_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::json("manifest.json", source);
        assert!(err.to_string().starts_with("JSON error: manifest.json"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
