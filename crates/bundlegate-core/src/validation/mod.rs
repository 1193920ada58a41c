//! Bundle validation: the compatibility pipeline and its entry point
//!
//! [`OpenShiftValidator`] runs removed-API detection, then threads a
//! [`CompatibilityCheck`] through the ordered [`checks::STAGES`] and turns
//! the accumulated messages into [`Diagnostic`]s.

pub mod checks;
pub mod openshift;
pub mod policy;
pub mod result;

pub use checks::CompatibilityCheck;
pub use openshift::{DeprecatedApiDetector, NoDeprecatedApis, OpenShiftValidator};
pub use policy::{
    CompatibilityPolicy, LabelSource, ValidatorOptions, FILE_PATH_KEY, KUBE_DEPRECATION_GUIDE,
    OCP_DOCS_MANAGING_VERSIONS, RANGE_KEY,
};
pub use result::{Diagnostic, DiagnosticKind, Level, ManifestResult};
