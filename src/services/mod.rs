//! Service layer: the issue-generation workflow and its helpers.

pub mod issue_workflow;
pub mod normalizer;

pub use issue_workflow::{IssueWorkflow, WorkflowOptions, WorkflowReport, WorkflowStream};
pub use normalizer::{normalize_proposals, normalize_title, NormalizedProposals};
