//! Pulling raw version values out of bundle metadata
//!
//! Two sources feed the compatibility checks: the max-version entry of the
//! CSV's properties annotation, and the target-platform label found in an
//! index image Dockerfile or an annotations file.

pub mod annotation;
pub mod error;
pub mod label;

pub use annotation::{max_openshift_version, OLM_MAX_OPENSHIFT_VERSION, OLM_PROPERTIES};
pub use error::{ExtractError, LabelFileError};
pub use label::{clean_version_value, extract_label_value, read_label_file, OCP_VERSIONS_LABEL};
