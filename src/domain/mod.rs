//! Domain layer for IssuePilot
//!
//! Core models, errors and the port traits the workflow depends on.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{ApiError, GenerationError, WorkflowError};
