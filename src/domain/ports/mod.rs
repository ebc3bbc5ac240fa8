//! Port trait definitions (Hexagonal Architecture)
//!
//! The workflow talks to the outside world only through these traits:
//! - LanguageModelClient: turns a project description into proposal drafts
//! - IssueTrackerClient: creates issues (and labels) in a repository
//!
//! Adapters in `crate::adapters` implement them; tests use in-memory fakes.

pub mod issue_tracker;
pub mod language_model;

pub use issue_tracker::IssueTrackerClient;
pub use language_model::LanguageModelClient;
