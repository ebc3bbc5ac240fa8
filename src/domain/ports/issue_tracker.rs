use async_trait::async_trait;

use crate::domain::errors::ApiError;
use crate::domain::models::{CreatedIssue, IssueProposal, IssueTarget};

/// Port for the code-hosting service that receives the issues.
///
/// Only [`create_issue`](IssueTrackerClient::create_issue) is required.
/// Trackers that do not manage labels can rely on the default
/// [`ensure_labels`](IssueTrackerClient::ensure_labels), which does nothing.
#[async_trait]
pub trait IssueTrackerClient: Send + Sync {
    /// Create one issue from a normalized proposal.
    ///
    /// Any failure (auth, rate limit, unknown repository, network) is
    /// reported as an [`ApiError`] scoped to this proposal.
    async fn create_issue(
        &self,
        target: &IssueTarget<'_>,
        proposal: &IssueProposal,
    ) -> Result<CreatedIssue, ApiError>;

    /// Make sure every label in `labels` exists in the target repository.
    ///
    /// Returns the labels that had to be created.
    async fn ensure_labels(
        &self,
        _target: &IssueTarget<'_>,
        _labels: &[String],
    ) -> Result<Vec<String>, ApiError> {
        Ok(Vec::new())
    }
}
