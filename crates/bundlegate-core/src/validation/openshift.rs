//! OpenShift compatibility validator
//!
//! Entry point tying removed-API detection to the compatibility pipeline.
//! The bundle and the label options are separate, typed parameters.

use crate::bundle::{Bundle, Manifest};
use crate::validation::checks::{self, CompatibilityCheck};
use crate::validation::policy::{CompatibilityPolicy, ValidatorOptions};
use crate::validation::result::{Diagnostic, DiagnosticKind, ManifestResult};
use std::fmt;
use tracing::{debug, info, instrument};

/// Source of removed-API findings for a bundle's manifests
///
/// Each returned string is a complete, human-readable detail naming the
/// affected objects. An empty list means the bundle uses no removed APIs.
pub trait DeprecatedApiDetector: Send + Sync {
    fn analyze(&self, objects: &[Manifest]) -> Vec<String>;
}

impl<F> DeprecatedApiDetector for F
where
    F: Fn(&[Manifest]) -> Vec<String> + Send + Sync,
{
    fn analyze(&self, objects: &[Manifest]) -> Vec<String> {
        self(objects)
    }
}

/// Detector that never reports anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDeprecatedApis;

impl DeprecatedApiDetector for NoDeprecatedApis {
    fn analyze(&self, _objects: &[Manifest]) -> Vec<String> {
        Vec::new()
    }
}

/// Validates bundles against an OpenShift [`CompatibilityPolicy`]
pub struct OpenShiftValidator {
    policy: CompatibilityPolicy,
    detector: Box<dyn DeprecatedApiDetector>,
}

impl fmt::Debug for OpenShiftValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenShiftValidator")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for OpenShiftValidator {
    fn default() -> Self {
        Self::new(CompatibilityPolicy::default())
    }
}

impl OpenShiftValidator {
    pub fn new(policy: CompatibilityPolicy) -> Self {
        Self {
            policy,
            detector: Box::new(NoDeprecatedApis),
        }
    }

    pub fn with_detector(mut self, detector: impl DeprecatedApiDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    pub fn policy(&self) -> &CompatibilityPolicy {
        &self.policy
    }

    /// Validate one bundle
    ///
    /// A missing bundle or a bundle without a ClusterServiceVersion yields a
    /// single error and no further checks.
    #[instrument(skip_all, fields(bundle = bundle.map_or("", |b| b.name.as_str())))]
    pub fn validate_bundle(&self, bundle: Option<&Bundle>, options: &ValidatorOptions) -> ManifestResult {
        let Some(bundle) = bundle else {
            let mut result = ManifestResult::default();
            result.add(Diagnostic::error(DiagnosticKind::InvalidBundle, "bundle is missing", ""));
            return result;
        };

        let mut result = ManifestResult::new(&bundle.name);
        let Some(csv) = bundle.csv.as_ref() else {
            result.add(Diagnostic::error(
                DiagnosticKind::InvalidBundle,
                "bundle csv is missing",
                &bundle.name,
            ));
            return result;
        };

        let details = self.detector.analyze(&bundle.objects);
        debug!(count = details.len(), "removed-API details");
        for detail in &details {
            result.add(Diagnostic::warning(
                DiagnosticKind::FailedValidation,
                detail.as_str(),
                &csv.name,
            ));
        }

        let mut check = CompatibilityCheck::new(&csv.name)
            .with_properties(csv.properties())
            .with_label_source(options.label.as_ref())
            .with_deprecated_api_detail(details.last().cloned());
        checks::run(&mut check, &self.policy);

        for error in check.errors {
            result.add(Diagnostic::error(DiagnosticKind::InvalidCsv, error, &csv.name));
        }
        for warning in check.warnings {
            result.add(Diagnostic::warning(DiagnosticKind::InvalidCsv, warning, &csv.name));
        }

        info!(
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "bundle validated"
        );
        result
    }

    /// Validate several bundles; each gets an independent check
    pub fn validate_bundles(&self, bundles: &[Bundle], options: &ValidatorOptions) -> Vec<ManifestResult> {
        bundles
            .iter()
            .map(|bundle| self.validate_bundle(Some(bundle), options))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::ClusterServiceVersion;
    use crate::extract::OLM_PROPERTIES;

    fn bundle(max: Option<&str>) -> Bundle {
        let mut csv = ClusterServiceVersion::new("memcached-operator.v0.0.1");
        if let Some(max) = max {
            csv = csv.with_annotation(
                OLM_PROPERTIES,
                format!(r#"[{{"type": "olm.maxOpenShiftVersion", "value": "{}"}}]"#, max),
            );
        }
        Bundle {
            name: "memcached-operator.v0.0.1".to_string(),
            csv: Some(csv),
            objects: Vec::new(),
        }
    }

    fn removed_apis(_: &[Manifest]) -> Vec<String> {
        vec!["Migrate the API(s) for CRD: ([\"memcacheds.cache.example.com\"])".to_string()]
    }

    #[test]
    fn test_missing_bundle() {
        let result = OpenShiftValidator::default().validate_bundle(None, &ValidatorOptions::new());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].detail, "bundle is missing");
    }

    #[test]
    fn test_missing_csv() {
        let bundle = Bundle {
            name: "broken".to_string(),
            ..Bundle::default()
        };
        let result = OpenShiftValidator::default()
            .with_detector(removed_apis)
            .validate_bundle(Some(&bundle), &ValidatorOptions::new());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].detail, "bundle csv is missing");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_detector_details_become_warnings() {
        let validator = OpenShiftValidator::default().with_detector(removed_apis);
        let options = ValidatorOptions::new().with_label_range("v4.6-v4.8");
        let result = validator.validate_bundle(Some(&bundle(Some("4.8"))), &options);

        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, DiagnosticKind::FailedValidation);
        assert_eq!(result.warnings[0].value, "memcached-operator.v0.0.1");
    }

    #[test]
    fn test_pipeline_errors_are_tagged() {
        let validator = OpenShiftValidator::default().with_detector(removed_apis);
        let result = validator.validate_bundle(Some(&bundle(None)), &ValidatorOptions::new());

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, DiagnosticKind::InvalidCsv);
        assert!(result.errors[0]
            .to_string()
            .starts_with("Error: Value : (memcached-operator.v0.0.1) olm.maxOpenShiftVersion"));
    }

    #[test]
    fn test_custom_policy() {
        let policy = CompatibilityPolicy::new(crate::versioning::OcpVersion::new(4, 12, 0), "1.25");
        let validator = OpenShiftValidator::new(policy).with_detector(removed_apis);
        let options = ValidatorOptions::new().with_label_range("v4.10-v4.11");
        let result = validator.validate_bundle(Some(&bundle(Some("4.11"))), &options);
        assert!(result.errors.is_empty(), "{:?}", result.errors);

        let result = validator.validate_bundle(Some(&bundle(Some("4.12"))), &options);
        assert!(result.errors.iter().any(|e| e.detail.contains("is >= of 4.12")));
    }

    #[test]
    fn test_validate_bundles() {
        let bundles = vec![bundle(None), bundle(Some("4.8"))];
        let results = OpenShiftValidator::default().validate_bundles(&bundles, &ValidatorOptions::new());
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.has_errors()));
    }
}
