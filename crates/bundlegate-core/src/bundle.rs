//! In-memory bundle model
//!
//! A bundle is a ClusterServiceVersion plus the other Kubernetes manifests
//! shipped next to it. Manifests are kept as untyped JSON values; only the
//! fields the checks need get typed accessors.

use crate::error::{Error, Result};
use crate::extract::OLM_PROPERTIES;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Kind of the bundle's primary descriptor
pub const CSV_KIND: &str = "ClusterServiceVersion";

/// A single Kubernetes manifest object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(pub Value);

impl Manifest {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Accept a decoded document only if it looks like a Kubernetes object
    pub fn from_value(value: Value) -> Result<Self> {
        let manifest = Self(value);
        if !manifest.0.is_object() {
            return Err(Error::invalid_manifest("document is not a mapping"));
        }
        if manifest.kind().is_none() {
            return Err(Error::invalid_manifest("document has no kind"));
        }
        Ok(manifest)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let value = serde_json::from_str(content)
            .map_err(|e| Error::json("failed to parse manifest", e))?;
        Self::from_value(value)
    }

    pub fn api_version(&self) -> Option<&str> {
        self.0.get("apiVersion").and_then(Value::as_str)
    }

    pub fn kind(&self) -> Option<&str> {
        self.0.get("kind").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.0
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
    }

    /// Entries of `metadata.annotations`
    ///
    /// Annotation values must be strings; any other value rejects the
    /// manifest instead of being dropped.
    pub fn annotations(&self) -> Result<BTreeMap<String, String>> {
        let Some(annotations) = self
            .0
            .get("metadata")
            .and_then(|m| m.get("annotations"))
            .filter(|a| !a.is_null())
        else {
            return Ok(BTreeMap::new());
        };
        let annotations = annotations
            .as_object()
            .ok_or_else(|| Error::invalid_manifest("metadata.annotations is not a mapping"))?;

        annotations
            .iter()
            .map(|(key, value)| match value.as_str() {
                Some(s) => Ok((key.clone(), s.to_string())),
                None => Err(Error::invalid_manifest(format!(
                    "annotation {:?} must be a string, found {}",
                    key, value
                ))),
            })
            .collect()
    }

    pub fn is_csv(&self) -> bool {
        self.kind() == Some(CSV_KIND)
    }
}

/// The parts of a ClusterServiceVersion the checks read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterServiceVersion {
    pub name: String,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl ClusterServiceVersion {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: BTreeMap::new(),
        }
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Raw `olm.properties` annotation, if set
    pub fn properties(&self) -> Option<&str> {
        self.annotations.get(OLM_PROPERTIES).map(String::as_str)
    }
}

impl TryFrom<&Manifest> for ClusterServiceVersion {
    type Error = Error;

    fn try_from(manifest: &Manifest) -> Result<Self> {
        Ok(Self {
            name: manifest.name().unwrap_or_default().to_string(),
            annotations: manifest.annotations()?,
        })
    }
}

/// An operator bundle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bundle {
    pub name: String,
    pub csv: Option<ClusterServiceVersion>,
    pub objects: Vec<Manifest>,
}

impl Bundle {
    /// Build a bundle from its manifests, taking the first CSV as descriptor
    pub fn from_manifests(objects: Vec<Manifest>) -> Result<Self> {
        let csv = objects
            .iter()
            .find(|m| m.is_csv())
            .map(ClusterServiceVersion::try_from)
            .transpose()?;
        let name = csv.as_ref().map(|c| c.name.clone()).unwrap_or_default();

        Ok(Self { name, csv, objects })
    }

    /// Override CSV annotations, as when checking a bundle against
    /// annotations it does not carry yet
    pub fn with_csv_annotations(mut self, annotations: BTreeMap<String, String>) -> Self {
        if let Some(csv) = self.csv.as_mut() {
            csv.annotations.extend(annotations);
        }
        self
    }
}
