//! Issue proposals, raw and normalized.

use serde::{Deserialize, Serialize};

/// Maximum issue title length accepted by GitHub.
pub const MAX_TITLE_LEN: usize = 256;

/// A proposal exactly as the language model returned it.
///
/// `title` is optional because model output is not trusted: drafts without
/// a usable title are dropped during normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl ProposalDraft {
    /// Draft with a title and body and no labels.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
            labels: Vec::new(),
        }
    }

    /// A draft with no title at all.
    pub fn untitled(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: Some(body.into()),
            labels: Vec::new(),
        }
    }

    /// Replace the labels.
    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }
}

impl From<&IssueProposal> for ProposalDraft {
    fn from(proposal: &IssueProposal) -> Self {
        Self {
            title: Some(proposal.title.clone()),
            body: Some(proposal.body.clone()),
            labels: proposal.labels.clone(),
        }
    }
}

/// A normalized candidate issue: non-empty trimmed title of at most
/// [`MAX_TITLE_LEN`] characters, trimmed body, distinct non-empty labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueProposal {
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// A normalized proposal together with its place in the submission plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedProposal {
    pub proposal: IssueProposal,
    /// Index (in the plan) of the earlier entry with the same title.
    pub duplicate_of: Option<usize>,
}

impl PlannedProposal {
    pub const fn is_duplicate(&self) -> bool {
        self.duplicate_of.is_some()
    }
}
