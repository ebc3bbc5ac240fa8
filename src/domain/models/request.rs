//! The per-invocation input to the issue-generation workflow.

use std::fmt;

use crate::domain::errors::WorkflowError;

/// A secret string (access token or API key).
///
/// `Debug` and `Display` never print the value; use [`Credential::expose`]
/// at the point where the secret has to go on the wire.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Credential(<empty>)")
        } else {
            f.write_str("Credential([REDACTED])")
        }
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Required field of a [`GenerationRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestField {
    AccessToken,
    ApiKey,
    OwnerLogin,
    RepoName,
    Description,
}

impl RequestField {
    /// Field name as used in error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::ApiKey => "api_key",
            Self::OwnerLogin => "owner_login",
            Self::RepoName => "repo_name",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for RequestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one workflow invocation needs.
///
/// Constructed once per invocation and consumed by the workflow; never
/// persisted. All five fields must be non-blank before anything is sent
/// over the network (see [`GenerationRequest::validate`]).
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Token for the issue tracker.
    pub access_token: Credential,
    /// Key for the language-model service.
    pub api_key: Credential,
    /// Repository owner (user or organisation).
    pub owner_login: String,
    /// Repository name.
    pub repo_name: String,
    /// Free-text project description the proposals are generated from.
    pub description: String,
}

impl GenerationRequest {
    /// Build a request; nothing is checked until [`GenerationRequest::validate`].
    pub fn new(
        access_token: impl Into<Credential>,
        api_key: impl Into<Credential>,
        owner_login: impl Into<String>,
        repo_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            api_key: api_key.into(),
            owner_login: owner_login.into(),
            repo_name: repo_name.into(),
            description: description.into(),
        }
    }

    /// Reject the request if any required field is blank.
    ///
    /// Fields are checked in declaration order; the first blank one is
    /// reported.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        let checks = [
            (RequestField::AccessToken, self.access_token.is_blank()),
            (RequestField::ApiKey, self.api_key.is_blank()),
            (RequestField::OwnerLogin, self.owner_login.trim().is_empty()),
            (RequestField::RepoName, self.repo_name.trim().is_empty()),
            (RequestField::Description, self.description.trim().is_empty()),
        ];

        match checks.into_iter().find(|(_, blank)| *blank) {
            Some((field, _)) => Err(WorkflowError::InvalidRequest(field)),
            None => Ok(()),
        }
    }

    /// `owner/repo`, as shown in logs and output.
    pub fn repository_slug(&self) -> String {
        format!("{}/{}", self.owner_login.trim(), self.repo_name.trim())
    }

    /// Destination of the create-issue calls for this request.
    pub fn target(&self) -> IssueTarget<'_> {
        IssueTarget {
            owner_login: self.owner_login.trim(),
            repo_name: self.repo_name.trim(),
            access_token: &self.access_token,
        }
    }
}

/// Repository coordinates plus the token used to write to it.
#[derive(Debug, Clone, Copy)]
pub struct IssueTarget<'a> {
    pub owner_login: &'a str,
    pub repo_name: &'a str,
    pub access_token: &'a Credential,
}
