//! Layered configuration loading.

use std::fs;

use issuepilot::{ConfigError, ConfigLoader};

const OVERRIDE_VARS: [&str; 4] = [
    "ISSUEPILOT_LLM__MODEL",
    "ISSUEPILOT_LOGGING__LEVEL",
    "ISSUEPILOT_WORKFLOW__SUBMISSION_DELAY_MS",
    "ISSUEPILOT_GITHUB__API_BASE_URL",
];

#[test]
fn test_defaults_without_files() {
    let dir = tempfile::tempdir().unwrap();

    let config = temp_env::with_vars_unset(OVERRIDE_VARS, || {
        ConfigLoader::load_from_dir(dir.path(), None)
    })
    .unwrap();

    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.github.api_base_url, "https://api.github.com");
    assert_eq!(config.workflow.max_title_len, 256);
    assert!(config.github.verify_repository);
}

#[test]
fn test_environment_overrides_files() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join(".issuepilot");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.yaml"),
        "llm:\n  model: file-model\nworkflow:\n  submission_delay_ms: 250\n",
    )
    .unwrap();

    let config = temp_env::with_vars(
        [
            ("ISSUEPILOT_LLM__MODEL", Some("env-model")),
            ("ISSUEPILOT_LOGGING__LEVEL", None),
            ("ISSUEPILOT_WORKFLOW__SUBMISSION_DELAY_MS", None),
            ("ISSUEPILOT_GITHUB__API_BASE_URL", None),
        ],
        || ConfigLoader::load_from_dir(dir.path(), None),
    )
    .unwrap();

    assert_eq!(config.llm.model, "env-model");
    assert_eq!(config.workflow.submission_delay_ms, 250);
}

#[test]
fn test_credentials_in_environment_do_not_disturb_config() {
    let dir = tempfile::tempdir().unwrap();

    let config = temp_env::with_vars(
        [
            ("ISSUEPILOT_TOKEN", Some("ghp_secret")),
            ("ISSUEPILOT_API_KEY", Some("sk-secret")),
            ("ISSUEPILOT_LLM__MODEL", None),
        ],
        || ConfigLoader::load_from_dir(dir.path(), None),
    )
    .unwrap();

    let dumped = serde_json::to_string(&config).unwrap();
    assert!(!dumped.contains("ghp_secret"));
    assert!(!dumped.contains("sk-secret"));
}

#[test]
fn test_invalid_values_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let explicit = dir.path().join("bad.yaml");
    fs::write(&explicit, "logging:\n  level: loud\n").unwrap();

    let err = temp_env::with_vars_unset(OVERRIDE_VARS, || {
        ConfigLoader::load_from_dir(dir.path(), Some(&explicit))
    })
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::InvalidLogLevel(level)) if level == "loud"
    ));

    let oversized = dir.path().join("long-titles.yaml");
    fs::write(&oversized, "workflow:\n  max_title_len: 1000\n").unwrap();

    let err = temp_env::with_vars_unset(OVERRIDE_VARS, || {
        ConfigLoader::load_from_dir(dir.path(), Some(&oversized))
    })
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::InvalidMaxTitleLen(1000))
    ));
}

#[test]
fn test_missing_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.yaml");

    let err = ConfigLoader::load_from_dir(dir.path(), Some(&missing)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::MissingFile(path)) if path == &missing
    ));
}
