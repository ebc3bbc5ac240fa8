//! GitHub Issues adapter.
//!
//! Creates issues and provisions labels through the GitHub REST API, and
//! offers a repository preflight check for the CLI.

pub mod client;
pub mod labels;
pub mod models;
pub mod tracker;

pub use client::GitHubClient;
pub use labels::label_color;
pub use tracker::GitHubIssueTracker;
