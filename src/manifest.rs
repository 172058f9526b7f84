use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Group/version/kind of the PatternManifest custom resource.
pub const PATTERN_MANIFEST_GROUP: &str = "gitops.hybrid-cloud-patterns.io";
pub const PATTERN_MANIFEST_VERSION: &str = "v1alpha1";
pub const PATTERN_MANIFEST_KIND: &str = "PatternManifest";
pub const PATTERN_MANIFEST_PLURAL: &str = "patternmanifests";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatternManifest {
    pub metadata: Metadata,
    #[serde(default)]
    pub spec: PatternManifestSpec,
}

/// Standard object metadata. Only `name` is guaranteed by the API server;
/// everything else stays optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct PatternManifestSpec {
    pub description: Option<String>,
    pub organization: OrganizationSpec,
    pub pattern: PatternSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct OrganizationSpec {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub maintainers: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct PatternSpec {
    pub name: Option<String>,
    pub long_description: Option<String>,
    pub branch: Option<String>,
    pub badge: Option<String>,
    pub url: Option<String>,
    pub maintainers: Option<String>,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub name: String,
}

impl PatternManifest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: Metadata {
                name: name.into(),
                ..Metadata::default()
            },
            spec: PatternManifestSpec::default(),
        }
    }

    /// Human-facing name: the pattern's display name when the manifest
    /// carries one, the resource name otherwise.
    pub fn display_name(&self) -> &str {
        self.spec
            .pattern
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.metadata.name)
    }

    /// Tile blurb: the pattern's long description, falling back to the flat
    /// spec description, falling back to empty.
    pub fn short_description(&self) -> &str {
        self.spec
            .pattern
            .long_description
            .as_deref()
            .or(self.spec.description.as_deref())
            .unwrap_or("")
    }
}

// Sample catalog served by the demo source so the app can be explored
// without a cluster.
pub fn sample_catalog() -> Vec<PatternManifest> {
    let organization = OrganizationSpec {
        name: Some("validatedpatterns".to_string()),
        description: Some("Red Hat Validated Patterns".to_string()),
        url: Some("https://validatedpatterns.io".to_string()),
        maintainers: Some("Validated Patterns Team".to_string()),
    };

    vec![
        PatternManifest {
            metadata: Metadata {
                name: "multicloud-gitops".to_string(),
                namespace: Some("default".to_string()),
                creation_timestamp: None,
            },
            spec: PatternManifestSpec {
                description: Some(
                    "GitOps-driven application and policy delivery across multiple clusters"
                        .to_string(),
                ),
                organization: organization.clone(),
                pattern: PatternSpec {
                    name: Some("MultiCloud GitOps".to_string()),
                    long_description: Some(
                        "Deploys a hub cluster plus managed clusters and keeps applications, \
                         configuration and policy in sync from a Git repository."
                            .to_string(),
                    ),
                    branch: Some("main".to_string()),
                    badge: Some("validated".to_string()),
                    url: Some("https://github.com/validatedpatterns/multicloud-gitops".to_string()),
                    maintainers: Some("Validated Patterns Team".to_string()),
                    products: vec![
                        Product {
                            name: "Red Hat OpenShift Container Platform".to_string(),
                        },
                        Product {
                            name: "Red Hat Advanced Cluster Management".to_string(),
                        },
                    ],
                },
            },
        },
        PatternManifest {
            metadata: Metadata {
                name: "industrial-edge".to_string(),
                namespace: Some("default".to_string()),
                creation_timestamp: None,
            },
            spec: PatternManifestSpec {
                description: Some(
                    "Data pipelines and machine learning at industrial edge sites".to_string(),
                ),
                organization: organization.clone(),
                pattern: PatternSpec {
                    name: Some("Industrial Edge".to_string()),
                    long_description: Some(
                        "Connects factory-floor sensor data to central data science workflows \
                         and pushes updated models back out to the edge."
                            .to_string(),
                    ),
                    branch: Some("main".to_string()),
                    badge: Some("validated".to_string()),
                    url: Some("https://github.com/validatedpatterns/industrial-edge".to_string()),
                    maintainers: Some("Validated Patterns Team".to_string()),
                    products: vec![
                        Product {
                            name: "Red Hat OpenShift Container Platform".to_string(),
                        },
                        Product {
                            name: "Red Hat AMQ Streams".to_string(),
                        },
                        Product {
                            name: "Red Hat OpenShift AI".to_string(),
                        },
                    ],
                },
            },
        },
        PatternManifest {
            metadata: Metadata {
                name: "medical-diagnosis".to_string(),
                namespace: Some("default".to_string()),
                creation_timestamp: None,
            },
            spec: PatternManifestSpec {
                description: Some(
                    "Medical image analysis with GPU-accelerated inference".to_string(),
                ),
                organization,
                pattern: PatternSpec {
                    name: Some("Medical Diagnosis".to_string()),
                    long_description: Some(
                        "Ingests chest X-ray images through an event stream and flags anomalies \
                         with a trained risk-assessment model."
                            .to_string(),
                    ),
                    branch: Some("main".to_string()),
                    badge: Some("validated".to_string()),
                    url: Some("https://github.com/validatedpatterns/medical-diagnosis".to_string()),
                    maintainers: Some("Validated Patterns Team".to_string()),
                    products: vec![
                        Product {
                            name: "Red Hat OpenShift Container Platform".to_string(),
                        },
                        Product {
                            name: "Red Hat OpenShift Data Foundation".to_string(),
                        },
                    ],
                },
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_description_fallback() {
        let mut manifest = PatternManifest::new("my-pattern");
        assert_eq!(manifest.short_description(), "");

        manifest.spec.description = Some("flat description".to_string());
        assert_eq!(manifest.short_description(), "flat description");

        manifest.spec.pattern.long_description = Some("long description".to_string());
        assert_eq!(manifest.short_description(), "long description");
    }

    #[test]
    fn test_display_name_fallback() {
        let mut manifest = PatternManifest::new("multicloud-gitops");
        assert_eq!(manifest.display_name(), "multicloud-gitops");

        manifest.spec.pattern.name = Some(String::new());
        assert_eq!(manifest.display_name(), "multicloud-gitops");

        manifest.spec.pattern.name = Some("MultiCloud GitOps".to_string());
        assert_eq!(manifest.display_name(), "MultiCloud GitOps");
    }

    #[test]
    fn test_deserialize_camel_case_payload() {
        let manifest: PatternManifest = serde_json::from_value(serde_json::json!({
            "metadata": { "name": "multicloud-gitops", "namespace": "default" },
            "spec": {
                "organization": {
                    "name": "validatedpatterns",
                    "url": "https://validatedpatterns.io"
                },
                "pattern": {
                    "name": "MultiCloud GitOps",
                    "longDescription": "Hub and spoke GitOps",
                    "products": [
                        { "name": "Red Hat OpenShift Container Platform" }
                    ]
                }
            }
        }))
        .expect("manifest should deserialize");

        assert_eq!(manifest.metadata.name, "multicloud-gitops");
        assert_eq!(
            manifest.spec.pattern.long_description.as_deref(),
            Some("Hub and spoke GitOps")
        );
        assert_eq!(manifest.spec.pattern.products.len(), 1);
        assert_eq!(manifest.spec.organization.description, None);
    }

    #[test]
    fn test_deserialize_minimal_payload() {
        let manifest: PatternManifest = serde_json::from_value(serde_json::json!({
            "metadata": { "name": "bare" }
        }))
        .expect("manifest without spec should deserialize");

        assert_eq!(manifest.metadata.name, "bare");
        assert_eq!(manifest.short_description(), "");
        assert!(manifest.spec.pattern.products.is_empty());
    }

    #[test]
    fn test_sample_catalog_names() {
        let catalog = sample_catalog();
        let names: Vec<&str> = catalog.iter().map(|m| m.metadata.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["multicloud-gitops", "industrial-edge", "medical-diagnosis"]
        );
        assert_eq!(catalog[0].display_name(), "MultiCloud GitOps");
    }
}
