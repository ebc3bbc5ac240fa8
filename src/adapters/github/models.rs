//! GitHub REST API request and response models.
//!
//! These structs map to the GitHub REST API v3 JSON payloads used by the
//! adapter. They are not part of the public domain model.

use serde::{Deserialize, Serialize};

/// A repository returned by `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepository {
    /// `owner/name`.
    pub full_name: String,
    /// URL to view the repository in the GitHub UI.
    pub html_url: String,
    /// Whether the issue tracker is enabled.
    #[serde(default = "default_true")]
    pub has_issues: bool,
}

const fn default_true() -> bool {
    true
}

/// A label defined in a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubLabel {
    /// The label name (e.g., "bug", "priority: high").
    pub name: String,
    /// Hex colour without the leading `#`.
    #[serde(default)]
    pub color: String,
}

/// Request body for creating a label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubCreateLabelRequest {
    pub name: String,
    /// Hex colour without the leading `#`.
    pub color: String,
}

/// Request body for creating a new GitHub issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubCreateIssueRequest {
    /// Issue title.
    pub title: String,
    /// Issue body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Labels to apply to the new issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

/// Response from the create-issue endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubCreateIssueResponse {
    /// Issue number within the repository.
    pub number: u64,
    /// URL to view the issue in the GitHub UI.
    pub html_url: String,
}

/// Error payload returned with non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<GitHubErrorDetail>,
}

/// One entry of [`GitHubErrorBody::errors`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
}

impl GitHubErrorBody {
    /// Whether a 422 response means "this already exists".
    pub fn is_already_exists(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.code.as_deref() == Some("already_exists"))
    }
}
