use serde::{Deserialize, Serialize};

/// Main configuration structure for IssuePilot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Language-model service configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// GitHub API configuration
    #[serde(default)]
    pub github: GitHubConfig,

    /// Submission behaviour
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for JSON log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Language-model (Anthropic Messages API) configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LlmConfig {
    /// Base URL for the Messages API
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens for the response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,

    /// Lower bound of issues requested from the model
    #[serde(default = "default_min_issues")]
    pub min_issues: u32,

    /// Upper bound of issues requested from the model
    #[serde(default = "default_max_issues")]
    pub max_issues: u32,
}

fn default_llm_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-5-20250929".to_string()
}

const fn default_max_tokens() -> u32 {
    4096
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_llm_timeout_secs() -> u64 {
    120
}

const fn default_min_issues() -> u32 {
    5
}

const fn default_max_issues() -> u32 {
    10
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_llm_timeout_secs(),
            min_issues: default_min_issues(),
            max_issues: default_max_issues(),
        }
    }
}

/// GitHub REST API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GitHubConfig {
    /// Base URL for the REST API v3
    #[serde(default = "default_github_api_base_url")]
    pub api_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_github_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header (required by GitHub)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Check the repository is reachable before generating proposals
    #[serde(default = "default_true")]
    pub verify_repository: bool,

    /// Create labels used by proposals when they do not exist yet
    #[serde(default = "default_true")]
    pub provision_labels: bool,
}

fn default_github_api_base_url() -> String {
    "https://api.github.com".to_string()
}

const fn default_github_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "issuepilot".to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_github_api_base_url(),
            timeout_secs: default_github_timeout_secs(),
            user_agent: default_user_agent(),
            verify_repository: true,
            provision_labels: true,
        }
    }
}

/// Workflow configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkflowConfig {
    /// Maximum issue title length in characters
    #[serde(default = "default_max_title_len")]
    pub max_title_len: usize,

    /// Pause between consecutive create-issue calls, in milliseconds
    #[serde(default = "default_submission_delay_ms")]
    pub submission_delay_ms: u64,
}

const fn default_max_title_len() -> usize {
    crate::domain::models::MAX_TITLE_LEN
}

const fn default_submission_delay_ms() -> u64 {
    1_000
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_title_len: default_max_title_len(),
            submission_delay_ms: default_submission_delay_ms(),
        }
    }
}
