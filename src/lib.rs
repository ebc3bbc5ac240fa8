//! IssuePilot - turn a project description into GitHub issues.
//!
//! A language model drafts issue proposals from free text; the workflow
//! normalizes them (trimming, title truncation, duplicate detection) and
//! submits them one at a time, reporting each outcome as it happens.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and the port traits
//! - **Service Layer** (`services`): normalization and the workflow
//! - **Adapters** (`adapters`): GitHub and Claude implementations of the ports
//! - **Infrastructure Layer** (`infrastructure`): HTTP client, config, logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use issuepilot::services::IssueWorkflow;
//! use tokio_util::sync::CancellationToken;
//!
//! let workflow = IssueWorkflow::new(language_model, tracker);
//! let report = workflow.run_to_completion(request, CancellationToken::new()).await?;
//! println!("{} created", report.summary.created);
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{ApiError, GenerationError, WorkflowError};
pub use domain::models::{
    Config, CreatedIssue, GenerationRequest, IssueOutcome, IssueProposal, IssueResult,
    ProposalDraft, RunSummary, SkipReason, WorkflowEvent, WorkflowWarning,
};
pub use domain::ports::{IssueTrackerClient, LanguageModelClient};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{IssueWorkflow, WorkflowOptions, WorkflowReport};
