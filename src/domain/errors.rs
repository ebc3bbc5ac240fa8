//! Domain errors for the issue-generation workflow.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::models::RequestField;

/// Errors that abort a whole workflow run.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A required request field was empty. No network call was made.
    #[error("Invalid request: missing required field '{0}'")]
    InvalidRequest(RequestField),

    /// The language-model step produced nothing to submit.
    #[error("Proposal generation failed: {0}")]
    Generation(#[from] GenerationError),
}

impl WorkflowError {
    /// The request was rejected before any network call.
    pub const fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }
}

/// Failure of the language-model call or of its output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// The service could not be reached (connection, DNS, timeout).
    #[error("language model unreachable: {0}")]
    Unreachable(String),

    /// The service answered with an error status.
    #[error("language model rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The service answered but the output could not be parsed.
    #[error("malformed language model output: {0}")]
    Malformed(String),

    /// Nothing usable was left after normalization.
    #[error("no usable proposals ({dropped} dropped for missing titles)")]
    NoProposals { dropped: usize },
}

/// Failure of a single issue-tracker call.
///
/// Scoped to one proposal: recorded as that proposal's outcome, never
/// aborts the rest of the batch.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("{}", self.describe())]
pub struct ApiError {
    /// HTTP status, when the tracker answered at all.
    pub status_code: Option<u16>,
    pub message: String,
}

impl ApiError {
    /// Error with an optional HTTP status.
    pub fn new(status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }

    /// A transport-level failure with no HTTP status.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }

    /// 401 or 403.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status_code, Some(401 | 403))
    }

    /// 429, or GitHub's 403 secondary rate limit.
    pub fn is_rate_limited(&self) -> bool {
        self.status_code == Some(429)
            || (self.status_code == Some(403) && self.message.to_lowercase().contains("rate limit"))
    }

    fn describe(&self) -> String {
        match self.status_code {
            Some(code) => format!("HTTP {code}: {}", self.message),
            None => format!("network error: {}", self.message),
        }
    }
}
