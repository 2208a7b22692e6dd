use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const MAX_WORDS_PER_ROUND: usize = 500;
pub const MAX_HORIZONTAL_MARGIN: u16 = 40;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_words_per_round")]
    pub words_per_round: usize,
    /// Size of the resampled list; the whole base list when unset.
    #[serde(default)]
    pub sample_size: Option<usize>,
    #[serde(default = "default_horizontal_margin")]
    pub horizontal_margin: u16,
    #[serde(default = "default_max_sample_attempts")]
    pub max_sample_attempts: usize,
    /// Word list file; the bundled English list when unset.
    #[serde(default)]
    pub word_list: Option<PathBuf>,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_words_per_round() -> usize {
    20
}
fn default_horizontal_margin() -> u16 {
    10
}
fn default_max_sample_attempts() -> usize {
    1000
}
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("typtr")
        .to_string_lossy()
        .to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            words_per_round: default_words_per_round(),
            sample_size: None,
            horizontal_margin: default_horizontal_margin(),
            max_sample_attempts: default_max_sample_attempts(),
            word_list: None,
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading config file '{}'", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("parsing config file '{}'", path.display()))?
        } else {
            Config::default()
        };
        config.validate();
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typtr")
            .join("config.toml")
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// Clamp numeric settings into the ranges the drill can handle.
    pub fn validate(&mut self) {
        self.words_per_round = self.words_per_round.clamp(1, MAX_WORDS_PER_ROUND);
        self.horizontal_margin = self.horizontal_margin.min(MAX_HORIZONTAL_MARGIN);
        self.max_sample_attempts = self.max_sample_attempts.max(1);
        if let Some(size) = self.sample_size {
            self.sample_size = Some(size.max(1));
        }
    }

    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.words_per_round, 20);
        assert_eq!(config.horizontal_margin, 10);
        assert_eq!(config.max_sample_attempts, 1000);
        assert!(config.sample_size.is_none());
        assert!(config.word_list.is_none());
        assert!(config.data_dir.contains("typtr"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
words_per_round = 35
word_list = "/usr/share/dict/words"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.words_per_round, 35);
        assert_eq!(config.word_list, Some(PathBuf::from("/usr/share/dict/words")));
        assert_eq!(config.horizontal_margin, 10);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.sample_size = Some(800);
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.words_per_round, deserialized.words_per_round);
        assert_eq!(config.sample_size, deserialized.sample_size);
        assert_eq!(config.data_dir, deserialized.data_dir);
    }

    #[test]
    fn test_validate_clamps_out_of_range_values() {
        let mut config = Config {
            words_per_round: 0,
            horizontal_margin: 200,
            max_sample_attempts: 0,
            sample_size: Some(0),
            ..Config::default()
        };
        config.validate();
        assert_eq!(config.words_per_round, 1);
        assert_eq!(config.horizontal_margin, MAX_HORIZONTAL_MARGIN);
        assert_eq!(config.max_sample_attempts, 1);
        assert_eq!(config.sample_size, Some(1));

        config.words_per_round = 10_000;
        config.validate();
        assert_eq!(config.words_per_round, MAX_WORDS_PER_ROUND);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.words_per_round, 20);
    }

    #[test]
    fn test_load_from_rejects_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "words_per_round = \"many\"").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let config = Config {
            log_level: "chatty".to_string(),
            ..Config::default()
        };
        assert_eq!(config.tracing_level(), tracing::Level::INFO);
        let config = Config {
            log_level: "debug".to_string(),
            ..Config::default()
        };
        assert_eq!(config.tracing_level(), tracing::Level::DEBUG);
    }
}
