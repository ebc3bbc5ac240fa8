//! Language-model adapter backed by the Claude Messages API.

pub mod proposer;

pub use proposer::{extract_json_payload, parse_drafts, ClaudeIssueProposer};
