//! Extraction errors

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while pulling version values out of bundle metadata
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The properties annotation is not a list of `{type, value}` entries
    #[error(
        "csv.Annotations has an invalid value specified for {key}. \
         Please, check the value ({raw}) and ensure that it is an array such as: \
         \"{key}\": '[{{\"type\": \"key name\", \"value\": \"key value\"}}]'"
    )]
    InvalidProperties {
        key: String,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// The matching property entry has a value that is not a string
    #[error("csv.Annotations.{key} has an invalid value for {property}: expected a string, found {found}")]
    InvalidPropertyValue {
        key: String,
        property: String,
        found: String,
    },

    /// A line names the label but carries no value separator or no value
    #[error("invalid syntax ({line}) for ({label})")]
    InvalidLabelSyntax { line: String, label: String },
}

/// Errors raised while reading a label source file
#[derive(Debug, Error)]
pub enum LabelFileError {
    #[error("the file path informed ({}) was not found. Error : {source}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("the file path informed ({}) is not a file", path.display())]
    NotAFile { path: PathBuf },

    #[error("unable to read the index image in the path ({}). Error : {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Extract(#[from] ExtractError),
}
