use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parsing(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parsing(e) => write!(f, "TOML parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Parsing(value)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Config {
    pub front_matter: Option<FrontMatterConfig>,
    pub paths: Option<PathsConfig>,
}

impl Config {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&data)?;

        Ok(config)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct FrontMatterConfig {
    /// Value for `draft` when the notebook metadata leaves it unset.
    pub draft: bool,
}

impl Default for FrontMatterConfig {
    fn default() -> Self {
        Self { draft: true }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct PathsConfig {
    /// URL prefix figure references are resolved under, e.g. "/images".
    /// Unset means figures resolve relative to the exported file.
    pub static_prefix: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(
            r#"
            [front_matter]
            draft = false

            [paths]
            static_prefix = "/images"
            "#,
        )
        .unwrap();

        assert!(!config.front_matter.unwrap().draft);
        assert_eq!(
            config.paths.unwrap().static_prefix.as_deref(),
            Some("/images")
        );
    }

    #[test]
    fn empty_config_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.front_matter.is_none());
        assert!(config.paths.is_none());
        assert!(FrontMatterConfig::default().draft);
    }
}
