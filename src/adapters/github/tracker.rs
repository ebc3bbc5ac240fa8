//! GitHub Issues implementation of [`IssueTrackerClient`].

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::ApiError;
use crate::domain::models::{CreatedIssue, IssueProposal, IssueTarget};
use crate::domain::ports::IssueTrackerClient;

use super::client::GitHubClient;
use super::labels::label_color;
use super::models::GitHubCreateIssueRequest;

/// Creates issues (and missing labels) through the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubIssueTracker {
    /// Shared GitHub HTTP client.
    client: Arc<GitHubClient>,
}

impl GitHubIssueTracker {
    /// Tracker sharing an existing GitHub client.
    pub const fn new(client: Arc<GitHubClient>) -> Self {
        Self { client }
    }

    /// Build the request body for a proposal; empty bodies and label lists
    /// are omitted.
    pub fn to_request(proposal: &IssueProposal) -> GitHubCreateIssueRequest {
        GitHubCreateIssueRequest {
            title: proposal.title.clone(),
            body: (!proposal.body.is_empty()).then(|| proposal.body.clone()),
            labels: (!proposal.labels.is_empty()).then(|| proposal.labels.clone()),
        }
    }
}

#[async_trait]
impl IssueTrackerClient for GitHubIssueTracker {
    async fn create_issue(
        &self,
        target: &IssueTarget<'_>,
        proposal: &IssueProposal,
    ) -> Result<CreatedIssue, ApiError> {
        tracing::info!(
            owner = target.owner_login,
            repo = target.repo_name,
            title = %proposal.title,
            "GitHub Issues: creating issue"
        );

        let resp = self
            .client
            .create_issue(
                target.owner_login,
                target.repo_name,
                target.access_token,
                &Self::to_request(proposal),
            )
            .await?;

        Ok(CreatedIssue::new(resp.number).with_url(resp.html_url))
    }

    async fn ensure_labels(
        &self,
        target: &IssueTarget<'_>,
        labels: &[String],
    ) -> Result<Vec<String>, ApiError> {
        let existing: HashSet<String> = self
            .client
            .list_labels(target.owner_login, target.repo_name, target.access_token)
            .await?
            .into_iter()
            .map(|label| label.name.to_lowercase())
            .collect();

        let mut created = Vec::new();
        let mut failed = Vec::new();

        for label in labels {
            if existing.contains(&label.to_lowercase()) {
                continue;
            }
            let color = label_color(label);
            match self
                .client
                .create_label(
                    target.owner_login,
                    target.repo_name,
                    target.access_token,
                    label,
                    &color,
                )
                .await
            {
                Ok(()) => {
                    tracing::info!(label = %label, color = %color, "GitHub Issues: created label");
                    created.push(label.clone());
                }
                Err(err) => {
                    tracing::warn!(label = %label, error = %err, "GitHub Issues: label creation failed");
                    failed.push((label.clone(), err));
                }
            }
        }

        match failed.split_first() {
            None => Ok(created),
            Some(((_, first), _)) => {
                let names: Vec<&str> = failed.iter().map(|(name, _)| name.as_str()).collect();
                Err(ApiError::new(
                    first.status_code,
                    format!("failed to create labels [{}]: {}", names.join(", "), first.message),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_request_omits_empty_parts() {
        let proposal = IssueProposal {
            title: "Add login".to_string(),
            body: String::new(),
            labels: vec![],
        };
        let req = GitHubIssueTracker::to_request(&proposal);
        assert_eq!(req.title, "Add login");
        assert!(req.body.is_none());
        assert!(req.labels.is_none());
    }

    #[test]
    fn test_to_request_keeps_body_and_labels() {
        let proposal = IssueProposal {
            title: "Add login".to_string(),
            body: "OAuth flow".to_string(),
            labels: vec!["feature".to_string()],
        };
        let req = GitHubIssueTracker::to_request(&proposal);
        assert_eq!(req.body.as_deref(), Some("OAuth flow"));
        assert_eq!(req.labels, Some(vec!["feature".to_string()]));
    }
}
