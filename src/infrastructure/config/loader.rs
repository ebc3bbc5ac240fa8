use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::domain::models::MAX_TITLE_LEN;

/// Project-local configuration directory.
pub const CONFIG_DIR: &str = ".issuepilot";

/// Environment prefix for configuration overrides.
pub const ENV_PREFIX: &str = "ISSUEPILOT_";

/// Credential variables share the prefix but are not configuration.
const CREDENTIAL_KEYS: [&str; 2] = ["TOKEN", "API_KEY"];

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("{0} cannot be empty")]
    EmptyUrl(&'static str),

    #[error("Invalid max_tokens: {0}. Must be at least 1")]
    InvalidMaxTokens(u32),

    #[error("Invalid temperature: {0}. Must be between 0.0 and 1.0")]
    InvalidTemperature(f32),

    #[error("Invalid issue bounds: min_issues ({0}) must not exceed max_issues ({1})")]
    InvalidIssueBounds(u32, u32),

    #[error("Invalid max_title_len: {0}. Must be between 1 and 256")]
    InvalidMaxTitleLen(usize),

    #[error("Config file not found: {}", .0.display())]
    MissingFile(PathBuf),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration relative to the current directory.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .issuepilot/config.yaml
    /// 3. .issuepilot/local.yaml
    /// 4. `explicit` file, when given (must exist)
    /// 5. Environment variables (ISSUEPILOT_* prefix, `__` for nesting)
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        Self::load_from_dir(Path::new("."), explicit)
    }

    /// Same as [`ConfigLoader::load`], rooted at `base_dir`.
    pub fn load_from_dir(base_dir: &Path, explicit: Option<&Path>) -> Result<Config> {
        let config_dir = base_dir.join(CONFIG_DIR);
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(config_dir.join("config.yaml")))
            .merge(Yaml::file(config_dir.join("local.yaml")));

        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::MissingFile(path.to_path_buf()).into());
            }
            figment = figment.merge(Yaml::file(path));
        }

        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).ignore(&CREDENTIAL_KEYS).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        if config.llm.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyUrl("llm.base_url"));
        }
        if config.github.api_base_url.trim().is_empty() {
            return Err(ConfigError::EmptyUrl("github.api_base_url"));
        }

        if config.llm.max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens(config.llm.max_tokens));
        }

        if !(0.0..=1.0).contains(&config.llm.temperature) {
            return Err(ConfigError::InvalidTemperature(config.llm.temperature));
        }

        if config.llm.min_issues > config.llm.max_issues {
            return Err(ConfigError::InvalidIssueBounds(
                config.llm.min_issues,
                config.llm.max_issues,
            ));
        }

        if !(1..=MAX_TITLE_LEN).contains(&config.workflow.max_title_len) {
            return Err(ConfigError::InvalidMaxTitleLen(config.workflow.max_title_len));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.workflow.max_title_len, 256);
        assert_eq!(config.workflow.submission_delay_ms, 1000);
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
logging:
  level: debug
  format: json
llm:
  model: claude-test
  min_issues: 3
  max_issues: 4
github:
  api_base_url: https://ghe.example.com/api/v3
  provision_labels: false
workflow:
  submission_delay_ms: 0
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.llm.model, "claude-test");
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.github.api_base_url, "https://ghe.example.com/api/v3");
        assert!(!config.github.provision_labels);
        assert!(config.github.verify_repository);
        assert_eq!(config.workflow.submission_delay_ms, 0);

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidLogFormat(_)
        ));
    }

    #[test]
    fn test_validate_invalid_rotation() {
        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidRotation(_)
        ));
    }

    #[test]
    fn test_validate_empty_urls() {
        let mut config = Config::default();
        config.llm.base_url = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::EmptyUrl("llm.base_url")
        ));

        let mut config = Config::default();
        config.github.api_base_url = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::EmptyUrl("github.api_base_url")
        ));
    }

    #[test]
    fn test_validate_zero_max_tokens() {
        let mut config = Config::default();
        config.llm.max_tokens = 0;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidMaxTokens(0)
        ));
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut config = Config::default();
        config.llm.temperature = 1.5;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidTemperature(_)
        ));

        config.llm.temperature = 0.0;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_issue_bounds() {
        let mut config = Config::default();
        config.llm.min_issues = 8;
        config.llm.max_issues = 3;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidIssueBounds(8, 3)
        ));
    }

    #[test]
    fn test_validate_zero_title_len() {
        let mut config = Config::default();
        config.workflow.max_title_len = 0;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidMaxTitleLen(0)
        ));
    }

    #[test]
    fn test_validate_title_len_above_tracker_limit() {
        let mut config = Config::default();
        config.workflow.max_title_len = MAX_TITLE_LEN;
        assert!(ConfigLoader::validate(&config).is_ok());

        config.workflow.max_title_len = MAX_TITLE_LEN + 1;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidMaxTitleLen(257)
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");

        let err = ConfigLoader::load_from_dir(dir.path(), Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("nope.yaml"));
    }

    #[test]
    fn test_hierarchical_merging() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.yaml"),
            "logging:\n  level: info\n  format: json\nllm:\n  model: base-model\n",
        )
        .unwrap();
        std::fs::write(config_dir.join("local.yaml"), "logging:\n  level: debug\n").unwrap();
        let explicit = dir.path().join("explicit.yaml");
        std::fs::write(&explicit, "llm:\n  model: explicit-model\n").unwrap();

        let config = temp_env::with_vars_unset(
            ["ISSUEPILOT_LOGGING__LEVEL", "ISSUEPILOT_LLM__MODEL"],
            || ConfigLoader::load_from_dir(dir.path(), Some(&explicit)),
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug", "local.yaml should win");
        assert_eq!(config.logging.format, "json", "base value should persist");
        assert_eq!(config.llm.model, "explicit-model", "explicit file should win");
    }
}
