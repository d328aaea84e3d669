use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the catalog/mapping service
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        Self::load(&dir.join(".docbind.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let content = r#"
[service]
base_url = "https://mapping.example.com/api"
timeout_secs = 10
"#;
        let config: Config = toml::from_str(content).unwrap();

        assert_eq!(config.service.base_url, "https://mapping.example.com/api");
        assert_eq!(config.service.timeout_secs, 10);
    }

    #[test]
    fn test_timeout_defaults() {
        let content = r#"
[service]
base_url = "https://mapping.example.com/api"
"#;
        let config: Config = toml::from_str(content).unwrap();

        assert_eq!(config.service.timeout_secs, 30);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".docbind.toml"),
            "[service]\nbase_url = \"http://localhost:8080\"\n",
        )
        .unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.service.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::load_from_dir(dir.path()),
            Err(ConfigError::Io(_))
        ));
    }
}
