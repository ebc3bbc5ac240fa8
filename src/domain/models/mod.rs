pub mod config;
pub mod outcome;
pub mod proposal;
pub mod request;

pub use config::{Config, GitHubConfig, LlmConfig, LoggingConfig, WorkflowConfig};
pub use outcome::{
    CreatedIssue, IssueOutcome, IssueResult, RunSummary, SkipReason, WorkflowEvent,
    WorkflowWarning,
};
pub use proposal::{IssueProposal, PlannedProposal, ProposalDraft, MAX_TITLE_LEN};
pub use request::{Credential, GenerationRequest, IssueTarget, RequestField};
