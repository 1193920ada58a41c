//! Bundlegate Core - version-compatibility checks for OpenShift operator bundles
//!
//! A bundle that still uses Kubernetes APIs removed in a given release must
//! declare, consistently, the newest OpenShift version it can run on (the
//! `olm.maxOpenShiftVersion` property) and the versions it is distributed to
//! (the `com.redhat.openshift.versions` label). This crate checks both.
//!
//! # Main Components
//!
//! - **Versioning**: platform versions, label range expressions, membership
//! - **Extraction**: the max-version annotation and the label value
//! - **Validation**: the staged compatibility pipeline and its diagnostics
//!
//! # Example
//!
//! ```
//! use bundlegate_core::{Bundle, ClusterServiceVersion, OpenShiftValidator, ValidatorOptions};
//!
//! let bundle = Bundle {
//!     name: "etcdoperator.v0.9.4".to_string(),
//!     csv: Some(ClusterServiceVersion::new("etcdoperator.v0.9.4")),
//!     objects: Vec::new(),
//! };
//! let options = ValidatorOptions::new().with_label_range("v4.6-v4.8");
//! let result = OpenShiftValidator::default().validate_bundle(Some(&bundle), &options);
//! assert!(!result.has_errors());
//! ```

pub mod bundle;
pub mod error;
pub mod extract;
pub mod validation;
pub mod versioning;

pub use bundle::{Bundle, ClusterServiceVersion, Manifest, CSV_KIND};
pub use error::{Error, Result};
pub use extract::{ExtractError, LabelFileError, OCP_VERSIONS_LABEL, OLM_MAX_OPENSHIFT_VERSION, OLM_PROPERTIES};
pub use validation::{
    CompatibilityCheck, CompatibilityPolicy, DeprecatedApiDetector, Diagnostic, DiagnosticKind,
    LabelSource, Level, ManifestResult, NoDeprecatedApis, OpenShiftValidator, ValidatorOptions,
};
pub use versioning::{range_contains_version, OcpVersion, VersionError, VersionRange};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
