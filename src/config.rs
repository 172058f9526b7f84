use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Namespace the catalog watch runs in.
    pub namespace: String,
    /// Kubeconfig context override; the default context when absent.
    pub context: Option<String>,
    /// Serve the bundled sample catalog instead of watching a cluster.
    pub demo: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            context: None,
            demo: false,
        }
    }
}

impl AppConfig {
    /// Get the path to the config file in the user's home directory
    pub fn config_path() -> Result<PathBuf> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;

        let config_dir = home_dir.join(".quilt");

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        Ok(config_dir.join("config.json"))
    }

    /// Load configuration from file, creating default if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)?;
            let config: AppConfig = serde_json::from_str(&contents)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;
            Ok(config)
        } else {
            // Create default config
            let default_config = AppConfig::default();
            default_config.save_to(config_path)?;
            Ok(default_config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.namespace, "default");
        assert_eq!(config.context, None);
        assert!(!config.demo);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");

        let config = AppConfig {
            namespace: "patterns".to_string(),
            context: Some("staging-cluster".to_string()),
            demo: true,
        };
        config.save_to(&path).expect("save should succeed");

        let loaded = AppConfig::load_from(&path).expect("load should succeed");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");

        let loaded = AppConfig::load_from(&path).expect("load should succeed");
        assert_eq!(loaded, AppConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "namespace": "patterns" }"#).expect("write");

        let loaded = AppConfig::load_from(&path).expect("load should succeed");
        assert_eq!(loaded.namespace, "patterns");
        assert_eq!(loaded.context, None);
        assert!(!loaded.demo);
    }
}
