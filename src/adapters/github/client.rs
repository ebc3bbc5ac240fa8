//! GitHub HTTP client.
//!
//! Wraps the GitHub REST API v3, providing typed methods for the
//! operations the issue tracker adapter needs. The token is supplied per
//! call: one client can serve any number of invocations without holding
//! credentials.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use tracing::debug;

use crate::domain::errors::ApiError;
use crate::domain::models::{Credential, GitHubConfig};

use super::models::{
    GitHubCreateIssueRequest, GitHubCreateIssueResponse, GitHubCreateLabelRequest,
    GitHubErrorBody, GitHubLabel, GitHubRepository,
};

/// Page size used for list endpoints (GitHub's maximum).
const PER_PAGE: usize = 100;

/// HTTP client for the GitHub REST API v3.
///
/// All methods map HTTP and network failures to [`ApiError`], carrying
/// the status code and GitHub's error message when there is one.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    /// The underlying HTTP client.
    http: Client,
    /// API root, without trailing slash.
    base_url: String,
    /// GitHub rejects requests without a User-Agent.
    user_agent: String,
}

impl GitHubClient {
    /// Create a client from configuration.
    pub fn new(config: &GitHubConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// Build an authorized request.
    fn request(&self, method: Method, path: &str, token: &Credential) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "GitHub request");
        self.http
            .request(method, url)
            .header("Authorization", format!("Bearer {}", token.expose()))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("User-Agent", &self.user_agent)
    }

    /// Fetch a repository. Used as a reachability and permission check.
    pub async fn get_repository(
        &self,
        owner: &str,
        repo: &str,
        token: &Credential,
    ) -> Result<GitHubRepository, ApiError> {
        let resp = self
            .request(Method::GET, &format!("/repos/{owner}/{repo}"), token)
            .send()
            .await
            .map_err(network_error)?;

        parse_json(check_status(resp).await?).await
    }

    /// List every label in a repository, following pagination.
    pub async fn list_labels(
        &self,
        owner: &str,
        repo: &str,
        token: &Credential,
    ) -> Result<Vec<GitHubLabel>, ApiError> {
        let mut labels = Vec::new();
        let mut page = 1;

        loop {
            let path = format!("/repos/{owner}/{repo}/labels?per_page={PER_PAGE}&page={page}");
            let resp = self
                .request(Method::GET, &path, token)
                .send()
                .await
                .map_err(network_error)?;

            let batch: Vec<GitHubLabel> = parse_json(check_status(resp).await?).await?;
            let full_page = batch.len() == PER_PAGE;
            labels.extend(batch);

            if !full_page {
                return Ok(labels);
            }
            page += 1;
        }
    }

    /// Create a label. A label that already exists counts as success.
    pub async fn create_label(
        &self,
        owner: &str,
        repo: &str,
        token: &Credential,
        name: &str,
        color: &str,
    ) -> Result<(), ApiError> {
        let body = GitHubCreateLabelRequest {
            name: name.to_string(),
            color: color.to_string(),
        };

        let resp = self
            .request(Method::POST, &format!("/repos/{owner}/{repo}/labels"), token)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        if resp.status() == StatusCode::UNPROCESSABLE_ENTITY {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let error: GitHubErrorBody = serde_json::from_str(&text).unwrap_or_default();
            if error.is_already_exists() {
                return Ok(());
            }
            return Err(api_error(status, &text));
        }

        check_status(resp).await.map(|_| ())
    }

    /// Create a new issue in a repository.
    ///
    /// Returns the created issue's number and URL.
    pub async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        token: &Credential,
        request: &GitHubCreateIssueRequest,
    ) -> Result<GitHubCreateIssueResponse, ApiError> {
        let resp = self
            .request(Method::POST, &format!("/repos/{owner}/{repo}/issues"), token)
            .json(request)
            .send()
            .await
            .map_err(network_error)?;

        parse_json(check_status(resp).await?).await
    }
}

fn network_error(err: reqwest::Error) -> ApiError {
    ApiError::network(err.to_string())
}

/// Pass successful responses through; turn the rest into [`ApiError`].
async fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    Err(api_error(status, &text))
}

async fn parse_json<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let status = resp.status().as_u16();
    resp.json::<T>().await.map_err(|e| {
        ApiError::new(Some(status), format!("unexpected response body: {e}"))
    })
}

/// Prefer GitHub's `message` field; fall back to the raw body or the
/// status reason.
fn api_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<GitHubErrorBody>(body)
        .ok()
        .map(|e| e.message)
        .filter(|m| !m.is_empty())
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    ApiError::new(Some(status.as_u16()), message)
}
