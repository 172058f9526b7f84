use anyhow::{anyhow, Result};
use kube::core::DynamicObject;

use crate::manifest::{Metadata, PatternManifest, PatternManifestSpec};

/// Convert a dynamic cluster object into our internal PatternManifest
/// representation. A missing name is the only hard failure; a spec that
/// fails to parse degrades to an empty spec so one malformed resource
/// cannot take down the catalog.
pub fn convert_pattern_manifest(obj: &DynamicObject) -> Result<PatternManifest> {
    let name = obj
        .metadata
        .name
        .clone()
        .ok_or_else(|| anyhow!("object missing metadata.name"))?;

    let metadata = Metadata {
        name: name.clone(),
        namespace: obj.metadata.namespace.clone(),
        creation_timestamp: obj.metadata.creation_timestamp.as_ref().map(|t| t.0),
    };

    let spec = match obj.data.get("spec") {
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            log::warn!("PatternManifest {} has an unreadable spec: {}", name, e);
            PatternManifestSpec::default()
        }),
        None => PatternManifestSpec::default(),
    };

    Ok(PatternManifest { metadata, spec })
}
