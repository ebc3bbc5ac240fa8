//! Infrastructure layer module
//!
//! - Claude Messages API client
//! - Configuration management
//! - Logging infrastructure

pub mod claude;
pub mod config;
pub mod logging;
