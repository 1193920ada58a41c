//! End-to-end tests for the OpenShift compatibility validator
//!
//! Bundles are built in memory; label sources come from the fixtures under
//! `tests/testdata`.

use bundlegate_core::{
    Bundle, ClusterServiceVersion, Manifest, ManifestResult, OpenShiftValidator, ValidatorOptions,
    OLM_PROPERTIES,
};
use serde_json::json;
use std::path::PathBuf;

const CSV_NAME: &str = "etcdoperator.v0.9.4";

const REMOVED_APIS_DETAIL: &str = "this bundle is using APIs which were deprecated and removed in v1.22. \
    More info: https://kubernetes.io/docs/reference/using-api/deprecation-guide/#v1-22. \
    Migrate the API(s) for CRD: ([\"etcdbackups.etcd.database.coreos.com\" \
    \"etcdclusters.etcd.database.coreos.com\" \"etcdrestores.etcd.database.coreos.com\"])";

const DOCS_LINK: &str = "https://docs.openshift.com/container-platform/4.8/operators/operator_sdk/osdk-working-bundle-images.html#osdk-control-compat_osdk-working-bundle-images";

fn testdata(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/testdata")
        .join(path)
}

fn etcd_bundle(max_version: Option<&str>) -> Bundle {
    let mut csv = ClusterServiceVersion::new(CSV_NAME);
    if let Some(max) = max_version {
        csv = csv.with_annotation(
            OLM_PROPERTIES,
            format!(r#"[{{"type": "olm.maxOpenShiftVersion", "value": "{}"}}]"#, max),
        );
    }
    let crd = Manifest::new(json!({
        "apiVersion": "apiextensions.k8s.io/v1beta1",
        "kind": "CustomResourceDefinition",
        "metadata": {"name": "etcdclusters.etcd.database.coreos.com"}
    }));

    Bundle {
        name: CSV_NAME.to_string(),
        csv: Some(csv),
        objects: vec![crd],
    }
}

fn with_removed_apis() -> OpenShiftValidator {
    OpenShiftValidator::default().with_detector(|objects: &[Manifest]| {
        if objects
            .iter()
            .any(|m| m.api_version() == Some("apiextensions.k8s.io/v1beta1"))
        {
            vec![REMOVED_APIS_DETAIL.to_string()]
        } else {
            Vec::new()
        }
    })
}

fn rendered(result: &ManifestResult) -> (Vec<String>, Vec<String>) {
    (
        result.errors.iter().map(ToString::to_string).collect(),
        result.warnings.iter().map(ToString::to_string).collect(),
    )
}

fn removed_apis_warning() -> String {
    format!("Warning: Value {}: {}", CSV_NAME, REMOVED_APIS_DETAIL)
}

#[test]
fn test_no_removed_apis_and_no_configuration() {
    let bundle = Bundle {
        objects: Vec::new(),
        ..etcd_bundle(None)
    };
    let result = with_removed_apis().validate_bundle(Some(&bundle), &ValidatorOptions::new());

    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
    assert_eq!(result.name, CSV_NAME);
}

#[test]
fn test_annotation_below_threshold_without_label() {
    let result =
        with_removed_apis().validate_bundle(Some(&etcd_bundle(Some("4.8"))), &ValidatorOptions::new());
    let (errors, warnings) = rendered(&result);

    assert!(errors.is_empty(), "{:?}", errors);
    assert_eq!(warnings, vec![removed_apis_warning()]);
}

#[test]
fn test_annotation_and_annotations_file_label() {
    let options = ValidatorOptions::new().with_label_file(testdata("annotations/annotations.yaml"));
    let result = with_removed_apis().validate_bundle(Some(&etcd_bundle(Some("4.8"))), &options);
    let (errors, warnings) = rendered(&result);

    assert!(errors.is_empty(), "{:?}", errors);
    assert_eq!(warnings, vec![removed_apis_warning()]);
}

#[test]
fn test_annotation_and_label_range() {
    let options = ValidatorOptions::new().with_label_range("v4.6-v4.8");
    let result = with_removed_apis().validate_bundle(Some(&etcd_bundle(Some("4.8"))), &options);
    let (errors, warnings) = rendered(&result);

    assert!(errors.is_empty(), "{:?}", errors);
    assert_eq!(warnings, vec![removed_apis_warning()]);
}

#[test]
fn test_missing_annotation_with_removed_apis() {
    let options =
        ValidatorOptions::new().with_label_file(testdata("dockerfile/valid_bundle.Dockerfile"));
    let result = with_removed_apis().validate_bundle(Some(&etcd_bundle(None)), &options);
    let (errors, warnings) = rendered(&result);

    assert_eq!(warnings, vec![removed_apis_warning()]);
    assert_eq!(
        errors,
        vec![format!(
            "Error: Value : ({}) olm.maxOpenShiftVersion csv.Annotations not specified with an OCP \
             version lower than 4.9. This annotation is required to prevent the user from upgrading \
             their OCP cluster before they have installed a version of their operator which is \
             compatible with 4.9. For further information see {}",
            CSV_NAME, DOCS_LINK
        )]
    );
}

#[test]
fn test_annotation_at_threshold_with_removed_apis() {
    let options =
        ValidatorOptions::new().with_label_file(testdata("dockerfile/valid_bundle.Dockerfile"));
    let result = with_removed_apis().validate_bundle(Some(&etcd_bundle(Some("4.9"))), &options);
    let (errors, warnings) = rendered(&result);

    assert_eq!(warnings, vec![removed_apis_warning()]);
    assert_eq!(
        errors,
        vec![
            format!(
                "Error: Value : ({}) invalid value for olm.maxOpenShiftVersion. The OCP version value \
                 4.9 is >= of 4.9. Note that {}",
                CSV_NAME, REMOVED_APIS_DETAIL
            ),
            format!(
                "Error: Value : ({}) the olm.maxOpenShiftVersion annotation with the value 4.9 to \
                 block the cluster upgrade is incompatible with the versions where this solutions \
                 should be distributed (com.redhat.openshift.versions with the value v4.6-v4.8). \
                 For further information see {}",
                CSV_NAME, DOCS_LINK
            ),
        ]
    );
}

#[test]
fn test_patch_version_in_annotation_is_truncated() {
    let options =
        ValidatorOptions::new().with_label_file(testdata("dockerfile/valid_bundle.Dockerfile"));
    let result = with_removed_apis().validate_bundle(Some(&etcd_bundle(Some("4.8.1"))), &options);
    let (errors, warnings) = rendered(&result);

    assert!(errors.is_empty(), "{:?}", errors);
    assert_eq!(
        warnings,
        vec![
            removed_apis_warning(),
            format!(
                "Warning: Value : ({}) csv.Annotations.olm.properties has an invalid value. \
                 olm.maxOpenShiftVersion must specify only major.minor versions, 4.8.1 will be \
                 truncated to 4.8.0",
                CSV_NAME
            ),
        ]
    );
}

#[test]
fn test_patch_version_at_threshold_without_label_only_warns() {
    let result =
        with_removed_apis().validate_bundle(Some(&etcd_bundle(Some("4.9.1"))), &ValidatorOptions::new());
    let (errors, warnings) = rendered(&result);

    assert!(errors.is_empty(), "{:?}", errors);
    let truncation: Vec<_> = warnings
        .iter()
        .filter(|w| w.contains("will be truncated"))
        .collect();
    assert_eq!(truncation.len(), 1, "{:?}", warnings);
    assert_eq!(
        warnings,
        vec![
            removed_apis_warning(),
            format!(
                "Warning: Value : ({}) csv.Annotations.olm.properties has an invalid value. \
                 olm.maxOpenShiftVersion must specify only major.minor versions, 4.9.1 will be \
                 truncated to 4.9.0",
                CSV_NAME
            ),
        ]
    );
}

#[test]
fn test_build_metadata_in_annotation_is_equivalent() {
    let options =
        ValidatorOptions::new().with_label_file(testdata("dockerfile/valid_bundle.Dockerfile"));
    let result =
        with_removed_apis().validate_bundle(Some(&etcd_bundle(Some("4.8.0+build"))), &options);
    let (errors, warnings) = rendered(&result);

    assert!(errors.is_empty(), "{:?}", errors);
    assert_eq!(warnings, vec![removed_apis_warning()]);
}

#[test]
fn test_exact_label_range() {
    let options =
        ValidatorOptions::new().with_label_file(testdata("dockerfile/valid_bundle_4_8.Dockerfile"));
    let result = with_removed_apis().validate_bundle(Some(&etcd_bundle(Some("4.8"))), &options);
    let (errors, warnings) = rendered(&result);

    assert!(errors.is_empty(), "{:?}", errors);
    assert_eq!(warnings, vec![removed_apis_warning()]);
}

#[test]
fn test_label_range_including_threshold() {
    let options = ValidatorOptions::new().with_label_range("v4.7");
    let result = with_removed_apis().validate_bundle(Some(&etcd_bundle(Some("4.8"))), &options);

    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0]
        .detail
        .contains("provide compatible version(s) by using the com.redhat.openshift.versions annotation"));
}

#[test]
fn test_label_file_without_label() {
    let options = ValidatorOptions::new().with_label_file(testdata("dockerfile/no_label.Dockerfile"));

    let clean = Bundle {
        objects: Vec::new(),
        ..etcd_bundle(None)
    };
    let result = with_removed_apis().validate_bundle(Some(&clean), &options);
    assert!(result.errors.is_empty());
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0]
        .detail
        .contains("unable to find com.redhat.openshift.versions configuration"));

    let result = with_removed_apis().validate_bundle(Some(&etcd_bundle(Some("4.8"))), &options);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0]
        .detail
        .contains("or provide compatible version(s) via the labels. (e.g. LABEL com.redhat.openshift.versions='4.6-4.8')"));
}

#[test]
fn test_label_file_with_invalid_syntax() {
    let options =
        ValidatorOptions::new().with_label_file(testdata("dockerfile/invalid_label.Dockerfile"));
    let result = with_removed_apis().validate_bundle(Some(&etcd_bundle(Some("4.8"))), &options);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].detail,
        "invalid syntax (LABEL com.redhat.openshift.versions) for (com.redhat.openshift.versions)"
    );
}

#[test]
fn test_label_file_not_found() {
    let options = ValidatorOptions::new().with_label_file(testdata("dockerfile/invalid"));
    let result = OpenShiftValidator::default().validate_bundle(Some(&etcd_bundle(None)), &options);

    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].detail.contains("was not found"));
    assert!(result.warnings.is_empty());
}

#[test]
fn test_label_file_is_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let options = ValidatorOptions::new().with_label_file(dir.path());
    let result = OpenShiftValidator::default().validate_bundle(Some(&etcd_bundle(None)), &options);

    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].detail.ends_with("is not a file"));
}

#[test]
fn test_optional_values() {
    let mut values = std::collections::BTreeMap::new();
    values.insert("range".to_string(), "v4.9".to_string());
    values.insert(
        "file".to_string(),
        testdata("dockerfile/valid_bundle.Dockerfile")
            .to_string_lossy()
            .into_owned(),
    );
    let options = ValidatorOptions::from_optional_values(&values);
    let result = with_removed_apis().validate_bundle(Some(&etcd_bundle(Some("4.8"))), &options);

    assert!(result.errors.is_empty(), "{:?}", result.errors);
}
