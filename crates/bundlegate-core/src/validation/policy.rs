//! Validator configuration: the compatibility policy and per-run options

use crate::versioning::OcpVersion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Optional-values key naming an index Dockerfile or annotations file
pub const FILE_PATH_KEY: &str = "file";

/// Optional-values key carrying a label range directly
pub const RANGE_KEY: &str = "range";

/// OpenShift docs on managing the versions an operator is distributed to
pub const OCP_DOCS_MANAGING_VERSIONS: &str = "https://docs.openshift.com/container-platform/4.8/operators/operator_sdk/osdk-working-bundle-images.html#osdk-control-compat_osdk-working-bundle-images";

/// Kubernetes deprecation guide
pub const KUBE_DEPRECATION_GUIDE: &str = "https://kubernetes.io/docs/reference/using-api/deprecation-guide/";

/// Which platform release stopped serving the APIs a bundle still uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityPolicy {
    /// First OpenShift version that no longer serves the removed APIs
    pub unsupported_version: OcpVersion,
    /// Kubernetes release that removed them
    pub removed_in_kube: String,
    /// Link appended to annotation and label messages
    pub docs_link: String,
}

impl Default for CompatibilityPolicy {
    fn default() -> Self {
        Self {
            unsupported_version: OcpVersion::new(4, 9, 0),
            removed_in_kube: "1.22".to_string(),
            docs_link: OCP_DOCS_MANAGING_VERSIONS.to_string(),
        }
    }
}

impl CompatibilityPolicy {
    pub fn new(unsupported_version: OcpVersion, removed_in_kube: impl Into<String>) -> Self {
        Self {
            unsupported_version: unsupported_version.truncated(),
            removed_in_kube: removed_in_kube.into(),
            ..Self::default()
        }
    }

    pub fn with_docs_link(mut self, link: impl Into<String>) -> Self {
        self.docs_link = link.into();
        self
    }

    /// Threshold rendered as `major.minor`, e.g. `4.9`
    pub fn threshold(&self) -> String {
        self.unsupported_version.major_minor()
    }

    /// Label value suggested in messages: the three minors below the threshold
    pub fn example_range(&self) -> String {
        let major = self.unsupported_version.major;
        let minor = self.unsupported_version.minor;
        format!(
            "{}.{}-{}.{}",
            major,
            minor.saturating_sub(3),
            major,
            minor.saturating_sub(1)
        )
    }

    /// Deprecation guide anchor for the removal release, e.g. `...#v1-22`
    pub fn deprecation_guide_link(&self) -> String {
        format!("{}#v{}", KUBE_DEPRECATION_GUIDE, self.removed_in_kube.replace('.', "-"))
    }
}

/// Where the target-platform label comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelSource {
    /// A range expression given directly, e.g. `v4.6-v4.8`
    Range(String),
    /// A Dockerfile or annotations file containing the label
    File(PathBuf),
}

/// Per-run inputs besides the bundle itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorOptions {
    pub label: Option<LabelSource>,
}

impl ValidatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from `key=value` pairs; `file` wins over `range`
    pub fn from_optional_values(values: &BTreeMap<String, String>) -> Self {
        let non_empty = |key: &str| values.get(key).filter(|v| !v.is_empty());

        let label = if let Some(path) = non_empty(FILE_PATH_KEY) {
            Some(LabelSource::File(PathBuf::from(path)))
        } else {
            non_empty(RANGE_KEY).map(|range| LabelSource::Range(range.clone()))
        };

        Self { label }
    }

    pub fn with_label_range(mut self, range: impl Into<String>) -> Self {
        self.label = Some(LabelSource::Range(range.into()));
        self
    }

    pub fn with_label_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.label = Some(LabelSource::File(path.into()));
        self
    }
}
