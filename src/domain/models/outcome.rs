//! Per-proposal outcomes and the events a workflow run streams out.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::ApiError;

use super::proposal::IssueProposal;

/// An issue the tracker accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
}

impl CreatedIssue {
    /// Issue `number` without a URL.
    pub const fn new(number: u64) -> Self {
        Self {
            number,
            html_url: None,
        }
    }

    /// Attach the issue's HTML URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.html_url = Some(url.into());
        self
    }
}

/// Why a proposal was not submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// An earlier proposal in the same run has the same title.
    Duplicate,
    /// The user cancelled the run before this proposal was submitted.
    Cancelled,
}

impl SkipReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Duplicate => "duplicate",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Terminal state of one proposal's submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IssueOutcome {
    Created(CreatedIssue),
    Failed(ApiError),
    Skipped { reason: SkipReason },
}

impl IssueOutcome {
    /// Shorthand for `Skipped { reason }`.
    pub const fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }

    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Why the proposal was skipped, if it was.
    pub const fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Skipped { reason } => Some(*reason),
            _ => None,
        }
    }
}

impl fmt::Display for IssueOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created(issue) => write!(f, "created #{}", issue.number),
            Self::Failed(err) => write!(f, "failed: {err}"),
            Self::Skipped { reason } => write!(f, "skipped ({})", reason.as_str()),
        }
    }
}

/// One proposal and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueResult {
    /// Zero-based position in the normalized proposal list.
    pub position: usize,
    pub proposal: IssueProposal,
    pub outcome: IssueOutcome,
}

/// Non-fatal problems reported on the result stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkflowWarning {
    /// The model returned a proposal without a usable title.
    UntitledProposalDropped { index: usize },
    /// Labels could not be provisioned before submission.
    LabelProvisioningFailed { message: String },
}

impl fmt::Display for WorkflowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UntitledProposalDropped { index } => {
                write!(f, "proposal #{} had no title and was dropped", index + 1)
            }
            Self::LabelProvisioningFailed { message } => {
                write!(f, "could not provision labels: {message}")
            }
        }
    }
}

/// Counts reported when a run finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub created: usize,
    pub failed: usize,
    pub skipped: usize,
    pub warnings: usize,
    /// Whether the run observed a cancellation request.
    pub cancelled: bool,
}

impl RunSummary {
    /// Count one outcome.
    pub fn record(&mut self, outcome: &IssueOutcome) {
        match outcome {
            IssueOutcome::Created(_) => self.created += 1,
            IssueOutcome::Failed(_) => self.failed += 1,
            IssueOutcome::Skipped { .. } => self.skipped += 1,
        }
    }

    /// Results reported so far.
    pub const fn total(&self) -> usize {
        self.created + self.failed + self.skipped
    }

    /// At least one issue was created.
    pub const fn is_success(&self) -> bool {
        self.created > 0
    }
}

/// Item of the stream produced by a workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WorkflowEvent {
    Warning(WorkflowWarning),
    Outcome(IssueResult),
    /// Always the last successful item of a run.
    Completed(RunSummary),
}
