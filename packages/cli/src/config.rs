use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::Level;

pub const DEFAULT_CONFIG_NAME: &str = "outliner.config.json";

/// Outliner configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Spaces per depth level when printing an outline
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,

    /// Print node ids next to their content
    #[serde(default)]
    pub show_ids: bool,

    /// Log level used when no -v flag is given
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seed for generated node ids (defaults to the outline file path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_seed: Option<String>,
}

fn default_indent_width() -> usize {
    2
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Configured log level, falling back to WARN on unknown names
    pub fn level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::WARN)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_width: default_indent_width(),
            show_ids: false,
            log_level: default_log_level(),
            id_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "indentWidth": 4,
            "showIds": true,
            "logLevel": "debug",
            "idSeed": "notes"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.indent_width, 4);
        assert!(config.show_ids);
        assert_eq!(config.level(), Level::DEBUG);
        assert_eq!(config.id_seed.as_deref(), Some("notes"));
    }

    #[test]
    fn test_default_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.indent_width, 2);
        assert!(!config.show_ids);
        assert_eq!(config.level(), Level::WARN);
        assert_eq!(config.id_seed, None);
    }

    #[test]
    fn test_unknown_log_level_falls_back() {
        let config = Config {
            log_level: "chatty".to_string(),
            ..Config::default()
        };
        assert_eq!(config.level(), Level::WARN);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config.indent_width, 2);
    }
}
