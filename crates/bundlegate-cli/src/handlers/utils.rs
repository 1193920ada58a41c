//! Shared utilities for command handlers

use crate::error::{Error, ErrorContext, Result};
use bundlegate_core::{Bundle, Manifest};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Load a bundle from a directory
///
/// Manifests are read from `<dir>/manifests` when it exists, otherwise from
/// `<dir>` itself. Every `.yaml`, `.yml` and `.json` file is decoded, YAML
/// files may hold several documents.
pub fn load_bundle(dir: &Path) -> Result<Bundle> {
    if !dir.is_dir() {
        return Err(Error::BundleNotFound {
            path: dir.to_path_buf(),
        });
    }

    let manifests_dir = dir.join("manifests");
    let source = if manifests_dir.is_dir() {
        manifests_dir
    } else {
        dir.to_path_buf()
    };

    let mut objects = Vec::new();
    for path in manifest_files(&source)? {
        let loaded = load_manifest_file(&path)?;
        trace!(file = %path.display(), objects = loaded.len(), "Loaded manifest file");
        objects.extend(loaded);
    }

    let mut bundle = Bundle::from_manifests(objects)?;
    if bundle.name.is_empty() {
        bundle.name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    debug!(
        bundle = %bundle.name,
        objects = bundle.objects.len(),
        has_csv = bundle.csv.is_some(),
        "Bundle loaded"
    );

    Ok(bundle)
}

/// Manifest files of a directory, sorted by path
fn manifest_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_manifest = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml") | Some("json")
        );
        if path.is_file() && is_manifest {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn load_manifest_file(path: &Path) -> Result<Vec<Manifest>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let invalid = |expected: &str| Error::InvalidFormat {
        path: path.to_path_buf(),
        expected: expected.to_string(),
    };

    if path.extension().and_then(|s| s.to_str()) == Some("json") {
        let manifest = Manifest::from_json_str(&content)
            .map_err(|_| invalid("a JSON Kubernetes object"))?;
        return Ok(vec![manifest]);
    }

    let mut manifests = Vec::new();
    for document in serde_yaml::Deserializer::from_str(&content) {
        let value = serde_json::Value::deserialize(document)?;
        // Empty documents between `---` separators
        if value.is_null() {
            continue;
        }
        let manifest =
            Manifest::from_value(value).map_err(|_| invalid("YAML Kubernetes objects"))?;
        manifests.push(manifest);
    }
    Ok(manifests)
}

/// Collect `--annotation` pairs, later values overriding earlier ones
pub fn annotations_map(pairs: &[(String, String)]) -> BTreeMap<String, String> {
    pairs.iter().cloned().collect()
}
