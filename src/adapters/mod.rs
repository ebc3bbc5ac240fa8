//! Adapters implementing the domain ports against external services.

pub mod claude;
pub mod github;
