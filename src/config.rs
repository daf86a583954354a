use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Storage locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Seed for the run's random number generator. Unset means a fresh
    /// entropy-derived seed per run.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding conception record JSON files
    #[serde(default = "default_conception_dir")]
    pub conception_dir: PathBuf,

    /// Directory holding append-only training history JSONL files
    #[serde(default = "default_training_dir")]
    pub training_dir: PathBuf,
}

fn default_conception_dir() -> PathBuf {
    PathBuf::from("data/conceptions")
}

fn default_training_dir() -> PathBuf {
    PathBuf::from("data/training")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            conception_dir: default_conception_dir(),
            training_dir: default_training_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            seed: None,
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(
            conception_dir = %config.storage.conception_dir.display(),
            training_dir = %config.storage.training_dir.display(),
            seeded = config.seed.is_some(),
            "configuration loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(
            config.storage.conception_dir,
            PathBuf::from("data/conceptions")
        );
        assert_eq!(config.storage.training_dir, PathBuf::from("data/training"));
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_from_toml() {
        let toml_src = r#"
            seed = 42

            [storage]
            conception_dir = "/tmp/embryo/conceptions"
            training_dir = "/tmp/embryo/training"
        "#;
        let config: Config = toml::from_str(toml_src).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(
            config.storage.conception_dir,
            PathBuf::from("/tmp/embryo/conceptions")
        );
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("seed = 7").unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.storage.training_dir, PathBuf::from("data/training"));
    }
}
