/// Labeler configuration
///
/// Read from `labeler.toml` in the working directory when present, otherwise
/// defaults. Environment variables override file values:
/// `LABELER_DATA_DIR`, `LABELER_OUTPUT_CSV`, `GITHUB_TOKEN`, `GITHUB_OWNER`,
/// `GITHUB_REPO`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LabelerError, Result};

pub const CONFIG_FILE: &str = "labeler.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelerConfig {
    /// Directory holding the `.npy` storm images
    pub data_dir: PathBuf,
    /// Only the first `item_limit` files (by name) are offered
    pub item_limit: usize,
    /// Grid spacing used for the km axis labels
    pub km_per_pixel: f64,
    /// Local CSV rewritten after every label change
    pub output_csv: PathBuf,
    pub remote: RemoteSettings,
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("storm_images_cleaned"),
            item_limit: 5,
            km_per_pixel: 4.4,
            output_csv: PathBuf::from("storm_labels.csv"),
            remote: RemoteSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub enabled: bool,
    pub token: String,
    pub owner: String,
    pub repo: String,
    /// Repository folder receiving submissions
    pub directory: String,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            token: String::new(),
            owner: String::new(),
            repo: String::new(),
            directory: "user_classifications".to_string(),
        }
    }
}

impl RemoteSettings {
    /// Enabled and fully specified
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.token.is_empty() && !self.owner.is_empty() && !self.repo.is_empty()
    }
}

impl LabelerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| LabelerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, else defaults; then apply env overrides
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(path)?;
            log::info!("Loaded configuration from {}", path.display());
            Self::from_toml_str(&text)?
        } else {
            log::info!("No {} found, using defaults", path.display());
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("LABELER_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(csv) = var("LABELER_OUTPUT_CSV") {
            self.output_csv = PathBuf::from(csv);
        }
        if let Some(token) = var("GITHUB_TOKEN") {
            self.remote.token = token;
        }
        if let Some(owner) = var("GITHUB_OWNER") {
            self.remote.owner = owner;
        }
        if let Some(repo) = var("GITHUB_REPO") {
            self.remote.repo = repo;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.item_limit == 0 {
            return Err(LabelerError::Config("item_limit must be at least 1".to_string()));
        }
        if !(self.km_per_pixel.is_finite() && self.km_per_pixel > 0.0) {
            return Err(LabelerError::Config(format!(
                "km_per_pixel must be positive, got {}",
                self.km_per_pixel
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LabelerConfig::default();
        assert_eq!(config.item_limit, 5);
        assert_eq!(config.km_per_pixel, 4.4);
        assert_eq!(config.output_csv, PathBuf::from("storm_labels.csv"));
        assert!(!config.remote.is_usable());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = LabelerConfig::from_toml_str(
            r#"
            data_dir = "/data/storms"

            [remote]
            enabled = true
            owner = "octo"
            repo = "labels"
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/data/storms"));
        assert_eq!(config.item_limit, 5);
        assert_eq!(config.remote.directory, "user_classifications");
        // no token yet
        assert!(!config.remote.is_usable());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = LabelerConfig::default();
        config.remote.enabled = true;
        config.apply_overrides(|key| match key {
            "GITHUB_TOKEN" => Some("secret".to_string()),
            "GITHUB_OWNER" => Some("octo".to_string()),
            "GITHUB_REPO" => Some("labels".to_string()),
            "LABELER_DATA_DIR" => Some("elsewhere".to_string()),
            _ => None,
        });
        assert!(config.remote.is_usable());
        assert_eq!(config.data_dir, PathBuf::from("elsewhere"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(LabelerConfig::from_toml_str("item_limit = 0").is_err());
        assert!(LabelerConfig::from_toml_str("km_per_pixel = -1.0").is_err());
        assert!(LabelerConfig::from_toml_str("item_limit = \"five\"").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = LabelerConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.item_limit, 5);
    }
}
