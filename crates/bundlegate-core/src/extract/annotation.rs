//! Max-version annotation lookup
//!
//! The upper platform bound lives inside the CSV's `olm.properties`
//! annotation, a JSON list of typed entries:
//!
//! ```text
//! olm.properties: '[{"type": "olm.maxOpenShiftVersion", "value": "4.8"}]'
//! ```

use super::error::ExtractError;
use serde::Deserialize;
use serde_json::Value;

/// CSV annotation holding the typed property list
pub const OLM_PROPERTIES: &str = "olm.properties";

/// Property type carrying the highest supported OpenShift version
pub const OLM_MAX_OPENSHIFT_VERSION: &str = "olm.maxOpenShiftVersion";

#[derive(Debug, Deserialize)]
struct PropertyAnnotation {
    #[serde(rename = "type", alias = "Type")]
    kind: String,
    #[serde(default, alias = "Value")]
    value: Value,
}

/// Extract the `olm.maxOpenShiftVersion` value from a properties blob
///
/// An absent or empty blob yields `Ok(None)`; so does a list without a
/// matching entry. Only the first matching entry is considered.
pub fn max_openshift_version(properties: Option<&str>) -> Result<Option<String>, ExtractError> {
    let Some(raw) = properties.filter(|p| !p.is_empty()) else {
        return Ok(None);
    };

    let entries: Vec<PropertyAnnotation> =
        serde_json::from_str(raw).map_err(|source| ExtractError::InvalidProperties {
            key: OLM_PROPERTIES.to_string(),
            raw: raw.to_string(),
            source,
        })?;

    let Some(entry) = entries.into_iter().find(|e| e.kind == OLM_MAX_OPENSHIFT_VERSION) else {
        return Ok(None);
    };

    match entry.value {
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Null => Ok(None),
        other => Err(ExtractError::InvalidPropertyValue {
            key: OLM_PROPERTIES.to_string(),
            property: OLM_MAX_OPENSHIFT_VERSION.to_string(),
            found: other.to_string(),
        }),
    }
}
