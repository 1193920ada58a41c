//! Target-platform label lookup in free-form files
//!
//! The label appears either in an index image Dockerfile
//! (`LABEL com.redhat.openshift.versions="v4.6-v4.8"`) or in
//! `metadata/annotations.yaml` (`com.redhat.openshift.versions: v4.6-v4.8`).

use super::error::{ExtractError, LabelFileError};
use std::fs;
use std::path::Path;

/// Label declaring the OpenShift versions a bundle is distributed to
pub const OCP_VERSIONS_LABEL: &str = "com.redhat.openshift.versions";

/// Find the first line mentioning `label_key` and return its cleaned value
pub fn extract_label_value(content: &str, label_key: &str) -> Result<Option<String>, ExtractError> {
    let Some(line) = content.lines().find(|line| line.contains(label_key)) else {
        return Ok(None);
    };

    let invalid = || ExtractError::InvalidLabelSyntax {
        line: line.to_string(),
        label: label_key.to_string(),
    };

    if !line.contains('=') && !line.contains(':') {
        return Err(invalid());
    }

    let remainder = match line.split_once(label_key) {
        Some((_, rest)) => rest.split(label_key).next().unwrap_or(rest),
        None => "",
    };
    if remainder.is_empty() {
        return Err(invalid());
    }

    Ok(Some(clean_version_value(remainder)))
}

/// Strip quoting and separator artifacts around a version value
///
/// Quotes are removed anywhere in the value, then one leading `=`
/// (Dockerfile syntax) and one leading `:` (YAML syntax) are dropped.
pub fn clean_version_value(value: &str) -> String {
    let value = value.replace(['\'', '"'], "");
    let value = value.strip_prefix('=').unwrap_or(value.as_str());
    let value = value.strip_prefix(':').unwrap_or(value);
    value.trim().to_string()
}

/// Read `path` and extract the label value from its content
pub fn read_label_file(path: &Path, label_key: &str) -> Result<Option<String>, LabelFileError> {
    let metadata = fs::metadata(path).map_err(|source| LabelFileError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.is_dir() {
        return Err(LabelFileError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| LabelFileError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "read label file");

    Ok(extract_label_value(&content, label_key)?)
}
