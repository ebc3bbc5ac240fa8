//! IssuePilot CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use issuepilot::cli::{self, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    match cli::run(cli).await {
        Ok(status) => status.into(),
        Err(err) => cli::handle_error(&err, json).into(),
    }
}
