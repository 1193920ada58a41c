//! Compatibility decision pipeline
//!
//! A [`CompatibilityCheck`] is threaded by `&mut` through [`STAGES`] in
//! order. Stages never fail: every problem is appended to the accumulator as
//! an error or warning, and later stages read the flags left by earlier ones
//! to skip checks whose inputs were rejected.
//!
//! Copyright (c) 2025 Bundlegate Authors
//! Licensed under the Apache-2.0 license

use crate::extract::{
    clean_version_value, max_openshift_version, read_label_file, OCP_VERSIONS_LABEL,
    OLM_MAX_OPENSHIFT_VERSION, OLM_PROPERTIES,
};
use crate::validation::policy::{CompatibilityPolicy, LabelSource};
use crate::versioning::{range_contains_version, OcpVersion};
use tracing::{debug, trace};

/// Per-bundle accumulator, created for one run and dropped afterwards
#[derive(Debug, Clone, Default)]
pub struct CompatibilityCheck<'a> {
    /// Name used to tag every message
    pub bundle_name: String,
    /// Raw `olm.properties` annotation
    pub properties: Option<&'a str>,
    /// Label source as supplied by the caller
    pub label_source: Option<&'a LabelSource>,
    /// Range actually compared, after file extraction and cleaning
    pub range_value: Option<String>,
    /// `olm.maxOpenShiftVersion` value
    pub max_version: Option<String>,
    /// Consolidated removed-API detail; `None` when no removed APIs are used
    pub deprecated_api_detail: Option<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,

    label_failed: bool,
    max_version_rejected: bool,
    range_rejected: bool,
}

impl<'a> CompatibilityCheck<'a> {
    pub fn new(bundle_name: impl Into<String>) -> Self {
        Self {
            bundle_name: bundle_name.into(),
            ..Self::default()
        }
    }

    pub fn with_properties(mut self, properties: Option<&'a str>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_label_source(mut self, source: Option<&'a LabelSource>) -> Self {
        self.label_source = source;
        self
    }

    pub fn with_deprecated_api_detail(mut self, detail: Option<String>) -> Self {
        self.deprecated_api_detail = detail.filter(|d| !d.is_empty());
        self
    }

    fn error(&mut self, message: String) {
        trace!(bundle = %self.bundle_name, %message, "compatibility error");
        self.errors.push(message);
    }

    fn warning(&mut self, message: String) {
        trace!(bundle = %self.bundle_name, %message, "compatibility warning");
        self.warnings.push(message);
    }
}

/// A pipeline stage
pub type Stage = fn(&mut CompatibilityCheck<'_>, &CompatibilityPolicy);

/// Stages in execution order
pub const STAGES: [(&str, Stage); 6] = [
    ("extract_max_version", extract_max_version),
    ("check_max_version", check_max_version),
    ("resolve_label", resolve_label),
    ("check_label_presence", check_label_presence),
    ("check_label_against_max_version", check_label_against_max_version),
    ("check_label_against_threshold", check_label_against_threshold),
];

/// Run every stage over `check`
pub fn run(check: &mut CompatibilityCheck<'_>, policy: &CompatibilityPolicy) {
    for (name, stage) in STAGES {
        let (errors, warnings) = (check.errors.len(), check.warnings.len());
        stage(check, policy);
        debug!(
            bundle = %check.bundle_name,
            stage = name,
            new_errors = check.errors.len() - errors,
            new_warnings = check.warnings.len() - warnings,
            "stage complete"
        );
    }
}

/// Populate `max_version` from the properties annotation
pub fn extract_max_version(check: &mut CompatibilityCheck<'_>, _policy: &CompatibilityPolicy) {
    match max_openshift_version(check.properties) {
        Ok(value) => check.max_version = value,
        Err(err) => {
            check.max_version_rejected = true;
            check.error(err.to_string());
        }
    }
}

/// Validate the max-version annotation on its own
pub fn check_max_version(check: &mut CompatibilityCheck<'_>, policy: &CompatibilityPolicy) {
    let threshold = policy.threshold();

    let Some(max_value) = check.max_version.clone() else {
        if check.deprecated_api_detail.is_some() {
            check.error(format!(
                "{} csv.Annotations not specified with an OCP version lower than {}. \
                 This annotation is required to prevent the user from upgrading their OCP cluster \
                 before they have installed a version of their operator which is compatible with {}. \
                 For further information see {}",
                OLM_MAX_OPENSHIFT_VERSION, threshold, threshold, policy.docs_link
            ));
        }
        return;
    };

    let version = match OcpVersion::parse_tolerant(&max_value) {
        Ok(version) => version,
        Err(err) => {
            check.max_version_rejected = true;
            check.error(format!(
                "csv.Annotations.{} has an invalid value. Unable to parse ({}) using semver : {}",
                OLM_PROPERTIES, max_value, err
            ));
            return;
        }
    };

    if !version.is_major_minor() {
        check.warning(format!(
            "csv.Annotations.{} has an invalid value. {} must specify only major.minor versions, \
             {} will be truncated to {}",
            OLM_PROPERTIES,
            OLM_MAX_OPENSHIFT_VERSION,
            version,
            version.truncated()
        ));
        return;
    }

    if let Some(detail) = check.deprecated_api_detail.clone() {
        if version >= policy.unsupported_version {
            check.error(format!(
                "invalid value for {}. The OCP version value {} is >= of {}. Note that {}",
                OLM_MAX_OPENSHIFT_VERSION, max_value, threshold, detail
            ));
        }
    }
}

/// Resolve `range_value` from a direct range or a label file
pub fn resolve_label(check: &mut CompatibilityCheck<'_>, _policy: &CompatibilityPolicy) {
    match check.label_source {
        None => {}
        Some(LabelSource::Range(range)) => {
            check.range_value = Some(range.clone()).filter(|r| !r.is_empty());
        }
        Some(LabelSource::File(path)) => match read_label_file(path, OCP_VERSIONS_LABEL) {
            Ok(value) => check.range_value = value.filter(|v| !v.is_empty()),
            Err(err) => {
                check.label_failed = true;
                check.error(err.to_string());
            }
        },
    }
}

/// A label source was given but yielded no range
pub fn check_label_presence(check: &mut CompatibilityCheck<'_>, policy: &CompatibilityPolicy) {
    if check.label_source.is_none() || check.range_value.is_some() || check.label_failed {
        return;
    }

    match check.deprecated_api_detail.clone() {
        Some(detail) => check.error(format!(
            "this bundle is using APIs which were deprecated and removed in v{}. More info: {}. \
             Migrate the APIs for {} or provide compatible version(s) via the labels. \
             (e.g. LABEL {}='{}')",
            policy.removed_in_kube,
            policy.deprecation_guide_link(),
            detail,
            OCP_VERSIONS_LABEL,
            policy.example_range()
        )),
        None => check.warning(format!("unable to find {} configuration", OCP_VERSIONS_LABEL)),
    }
}

/// The annotation must fall inside the declared label range
pub fn check_label_against_max_version(
    check: &mut CompatibilityCheck<'_>,
    policy: &CompatibilityPolicy,
) {
    if check.max_version_rejected {
        return;
    }
    let (Some(max_value), Some(range)) = (check.max_version.clone(), check.range_value.clone())
    else {
        return;
    };

    match range_contains_version(&range, &clean_version_value(&max_value), true) {
        Ok(true) => {}
        Ok(false) => check.error(format!(
            "the {} annotation with the value {} to block the cluster upgrade is incompatible \
             with the versions where this solutions should be distributed ({} with the value {}). \
             For further information see {}",
            OLM_MAX_OPENSHIFT_VERSION, max_value, OCP_VERSIONS_LABEL, range, policy.docs_link
        )),
        Err(err) => {
            check.range_rejected = err.is_range_error();
            check.error(format!("error invalid label range {}", err));
        }
    }
}

/// With removed APIs in use, the label range must stop below the threshold
pub fn check_label_against_threshold(
    check: &mut CompatibilityCheck<'_>,
    policy: &CompatibilityPolicy,
) {
    if check.range_rejected {
        return;
    }
    let (Some(detail), Some(range)) = (check.deprecated_api_detail.clone(), check.range_value.clone())
    else {
        return;
    };

    match range_contains_version(&range, &policy.threshold(), false) {
        Ok(false) => {}
        Ok(true) => check.error(format!(
            "this bundle is using APIs which were deprecated and removed in v{}. More info: {}. \
             Migrate the API(s) for {} or provide compatible version(s) by using the {} annotation \
             in `metadata/annotations.yaml` to ensure that the index image will be generated \
             with its label. (e.g. LABEL {}='{}')",
            policy.removed_in_kube,
            policy.deprecation_guide_link(),
            detail,
            OCP_VERSIONS_LABEL,
            OCP_VERSIONS_LABEL,
            policy.example_range()
        )),
        Err(err) => check.error(format!("error to validate the OpenShift label range: {}", err)),
    }
}
