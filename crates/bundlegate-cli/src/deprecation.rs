//! Built-in removed-API detection
//!
//! [`KubeRemovedApis`] knows which beta API group/versions a Kubernetes
//! release stopped serving and reports the bundle objects still using them.

use bundlegate_core::validation::KUBE_DEPRECATION_GUIDE;
use bundlegate_core::{DeprecatedApiDetector, Manifest};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// (apiVersion, kind) pairs no longer served from Kubernetes 1.22
const REMOVED_IN_1_22: &[(&str, &str)] = &[
    ("admissionregistration.k8s.io/v1beta1", "MutatingWebhookConfiguration"),
    ("admissionregistration.k8s.io/v1beta1", "ValidatingWebhookConfiguration"),
    ("apiextensions.k8s.io/v1beta1", "CustomResourceDefinition"),
    ("apiregistration.k8s.io/v1beta1", "APIService"),
    ("authentication.k8s.io/v1beta1", "TokenReview"),
    ("authorization.k8s.io/v1beta1", "LocalSubjectAccessReview"),
    ("authorization.k8s.io/v1beta1", "SelfSubjectAccessReview"),
    ("authorization.k8s.io/v1beta1", "SubjectAccessReview"),
    ("certificates.k8s.io/v1beta1", "CertificateSigningRequest"),
    ("coordination.k8s.io/v1beta1", "Lease"),
    ("extensions/v1beta1", "Ingress"),
    ("networking.k8s.io/v1beta1", "Ingress"),
    ("networking.k8s.io/v1beta1", "IngressClass"),
    ("rbac.authorization.k8s.io/v1beta1", "ClusterRole"),
    ("rbac.authorization.k8s.io/v1beta1", "ClusterRoleBinding"),
    ("rbac.authorization.k8s.io/v1beta1", "Role"),
    ("rbac.authorization.k8s.io/v1beta1", "RoleBinding"),
    ("scheduling.k8s.io/v1beta1", "PriorityClass"),
    ("storage.k8s.io/v1beta1", "CSIDriver"),
    ("storage.k8s.io/v1beta1", "CSINode"),
    ("storage.k8s.io/v1beta1", "StorageClass"),
    ("storage.k8s.io/v1beta1", "VolumeAttachment"),
];

/// (apiVersion, kind) pairs no longer served from Kubernetes 1.25
const REMOVED_IN_1_25: &[(&str, &str)] = &[
    ("autoscaling/v2beta1", "HorizontalPodAutoscaler"),
    ("batch/v1beta1", "CronJob"),
    ("discovery.k8s.io/v1beta1", "EndpointSlice"),
    ("events.k8s.io/v1beta1", "Event"),
    ("node.k8s.io/v1beta1", "RuntimeClass"),
    ("policy/v1beta1", "PodDisruptionBudget"),
    ("policy/v1beta1", "PodSecurityPolicy"),
];

/// Detector for the APIs removed in one Kubernetes release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KubeRemovedApis {
    release: String,
    removed: &'static [(&'static str, &'static str)],
}

impl KubeRemovedApis {
    /// Table for a release such as `1.22`; `None` when the release is unknown
    pub fn for_release(release: &str) -> Option<Self> {
        let release = release.trim().trim_start_matches('v');
        let removed = match release {
            "1.22" => REMOVED_IN_1_22,
            "1.25" => REMOVED_IN_1_25,
            _ => return None,
        };
        Some(Self {
            release: release.to_string(),
            removed,
        })
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    fn is_removed(&self, manifest: &Manifest) -> bool {
        match (manifest.api_version(), manifest.kind()) {
            (Some(api_version), Some(kind)) => self
                .removed
                .iter()
                .any(|(v, k)| *v == api_version && *k == kind),
            _ => false,
        }
    }

    fn guide_link(&self) -> String {
        format!("{}#v{}", KUBE_DEPRECATION_GUIDE, self.release.replace('.', "-"))
    }
}

/// Name used for a kind in the migration list
fn display_kind(kind: &str) -> &str {
    match kind {
        "CustomResourceDefinition" => "CRD",
        other => other,
    }
}

impl DeprecatedApiDetector for KubeRemovedApis {
    fn analyze(&self, objects: &[Manifest]) -> Vec<String> {
        let mut found: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for manifest in objects.iter().filter(|m| self.is_removed(m)) {
            let kind = manifest.kind().map(display_kind).unwrap_or_default();
            found
                .entry(kind)
                .or_default()
                .insert(manifest.name().unwrap_or_default());
        }

        if found.is_empty() {
            return Vec::new();
        }
        debug!(release = %self.release, kinds = found.len(), "Found removed APIs");

        let kinds = found
            .iter()
            .map(|(kind, names)| {
                let quoted: Vec<String> = names.iter().map(|n| format!("{:?}", n)).collect();
                format!("{}: ([{}])", kind, quoted.join(" "))
            })
            .collect::<Vec<_>>()
            .join(", ");

        vec![format!(
            "this bundle is using APIs which were deprecated and removed in v{}. More info: {}. \
             Migrate the API(s) for {}",
            self.release,
            self.guide_link(),
            kinds
        )]
    }
}
