//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::Level;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{LogSettings, LoggerImpl};

pub use types::{Cli, Commands};

/// Process exit status of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// At least one issue was created.
    Success,
    /// Nothing was created, or the run could not start.
    Failure,
    /// The input was rejected before any network call.
    InvalidInput,
}

impl ExitStatus {
    /// Numeric process exit code.
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::InvalidInput => 2,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        Self::from(status.code())
    }
}

/// Shared inputs of every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Config,
    pub json: bool,
}

/// Load configuration, install logging and dispatch the parsed command.
pub async fn run(cli: Cli) -> Result<ExitStatus> {
    let config = ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let mut settings = LogSettings::from_config(&config.logging)?;
    if cli.verbose {
        settings = settings.with_level(Level::DEBUG);
    }
    let _logger = LoggerImpl::init(&settings)?;

    let ctx = CommandContext {
        config,
        json: cli.json,
    };

    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, &ctx).await,
    }
}

/// Report an error that escaped a command and return the failure status.
pub fn handle_error(err: &anyhow::Error, json_mode: bool) -> ExitStatus {
    if json_mode {
        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        println!("{}", serde_json::json!({ "error": err.to_string(), "causes": chain }));
    } else {
        eprintln!("Error: {err:#}");
    }
    ExitStatus::Failure
}
