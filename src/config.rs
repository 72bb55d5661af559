//! Configuration management for taskbrew.
//!
//! Loads the optional TOML config file. Everything has a default, so a
//! missing file is the same as an empty one.

use crate::error::{BrewError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for taskbrew.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Record store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Console settings.
    #[serde(default)]
    pub console: ConsoleConfig,

    /// Context to start the session in.
    #[serde(default)]
    pub context: ContextConfig,
}

/// Record store settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite database file. Defaults to the platform data directory.
    pub path: Option<PathBuf>,
}

/// Console settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Prompt shown before each command.
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

fn default_prompt() -> String {
    "brew> ".to_string()
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
        }
    }
}

/// Starting context, as set by `use program` / `use project`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ContextConfig {
    pub program: Option<String>,
    pub project: Option<String>,
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("taskbrew")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| BrewError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            BrewError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_parse_valid_config() {
        let toml = r#"
[store]
path = "/var/lib/taskbrew/records.db"

[console]
prompt = "tb> "

[context]
program = "a1b2c3d4"
project = "e5f6a7b8"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(
            config.store.path,
            Some(PathBuf::from("/var/lib/taskbrew/records.db"))
        );
        assert_eq!(config.console.prompt, "tb> ");
        assert_eq!(config.context.program.as_deref(), Some("a1b2c3d4"));
        assert_eq!(config.context.project.as_deref(), Some("e5f6a7b8"));
    }

    #[test]
    fn test_missing_optional_fields() {
        let config: Config = toml::from_str("[context]\nprogram = \"p1\"\n").unwrap();

        assert_eq!(config.store.path, None);
        assert_eq!(config.console.prompt, "brew> ");
        assert_eq!(config.context.project, None);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_file(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_error_names_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[console]\nprompt = 42").unwrap();

        let err = Config::load_from_file(file.path()).unwrap_err();
        assert_eq!(err.category(), "Configuration Error");
        assert!(err
            .to_string()
            .contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_default_path() {
        assert!(Config::default_path().ends_with("taskbrew/config.toml"));
    }
}
