//! `generate` command: description in, GitHub issues out.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use futures::StreamExt;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::adapters::claude::ClaudeIssueProposer;
use crate::adapters::github::{GitHubClient, GitHubIssueTracker};
use crate::cli::output::{create_spinner, output, results_table, CommandOutput, ProgressBarExt};
use crate::cli::{CommandContext, ExitStatus};
use crate::domain::errors::ApiError;
use crate::domain::models::{
    Config, GenerationRequest, IssueOutcome, IssueResult, RunSummary, WorkflowEvent,
    WorkflowWarning,
};
use crate::infrastructure::claude::{ClaudeClient, ClaudeClientConfig};
use crate::services::{IssueWorkflow, WorkflowOptions};

/// Arguments of `issuepilot generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Free-text project description the issues are drafted from
    #[arg(short, long)]
    pub description: String,

    /// Repository owner (user or organization login)
    #[arg(short, long)]
    pub owner: String,

    /// Repository name
    #[arg(short, long)]
    pub repo: String,

    /// GitHub access token with permission to create issues
    #[arg(long, env = "ISSUEPILOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Anthropic API key
    #[arg(long, env = "ISSUEPILOT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

impl GenerateArgs {
    /// Missing credentials become blank and fail validation.
    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest::new(
            self.token.clone().unwrap_or_default(),
            self.api_key.clone().unwrap_or_default(),
            self.owner.clone(),
            self.repo.clone(),
            self.description.clone(),
        )
    }
}

/// Everything `generate` reports, in human or JSON form.
#[derive(Debug, Serialize)]
pub struct GenerateOutput {
    pub repository: String,
    pub results: Vec<IssueResult>,
    pub warnings: Vec<WorkflowWarning>,
    pub summary: RunSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateOutput {
    fn new(repository: String) -> Self {
        Self {
            repository,
            results: Vec::new(),
            warnings: Vec::new(),
            summary: RunSummary::default(),
            error: None,
        }
    }

    fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

impl CommandOutput for GenerateOutput {
    fn to_human(&self) -> String {
        let mut out = String::new();

        if let Some(ref error) = self.error {
            let _ = writeln!(out, "Error: {error}");
        }
        if !self.results.is_empty() {
            let _ = writeln!(out, "{}", results_table(&self.results, true));
        }

        let summary = &self.summary;
        let _ = write!(
            out,
            "{}: {} proposal(s), {} created, {} failed, {} skipped",
            self.repository,
            summary.total(),
            summary.created,
            summary.failed,
            summary.skipped
        );
        if summary.warnings > 0 {
            let _ = write!(out, ", {} warning(s)", summary.warnings);
        }
        if summary.cancelled {
            out.push_str(" (cancelled)");
        }
        out
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// One progress line per result.
fn describe(result: &IssueResult) -> String {
    let title = &result.proposal.title;
    match &result.outcome {
        IssueOutcome::Created(issue) => match issue.html_url {
            Some(ref url) => format!("✓ #{} {title} ({url})", issue.number),
            None => format!("✓ #{} {title}", issue.number),
        },
        IssueOutcome::Failed(err) => format!("✗ {title}: {err}{}", failure_hint(err)),
        IssueOutcome::Skipped { reason } => format!("- {title}: skipped ({})", reason.as_str()),
    }
}

fn failure_hint(err: &ApiError) -> &'static str {
    if err.is_rate_limited() {
        " (rate limited, try a longer workflow.submission_delay_ms)"
    } else if err.is_auth_error() {
        " (check the token can create issues in this repository)"
    } else {
        ""
    }
}

fn build_workflow(config: &Config) -> Result<(IssueWorkflow, Arc<GitHubClient>)> {
    let github =
        Arc::new(GitHubClient::new(&config.github).context("Failed to build GitHub client")?);
    let claude = Arc::new(
        ClaudeClient::new(ClaudeClientConfig::from(&config.llm))
            .context("Failed to build Claude client")?,
    );

    let workflow = IssueWorkflow::new(
        Arc::new(ClaudeIssueProposer::new(claude, config.llm.clone())),
        Arc::new(GitHubIssueTracker::new(Arc::clone(&github))),
    )
    .with_options(WorkflowOptions::from_config(config));

    Ok((workflow, github))
}

/// Check the repository is reachable with the token and accepts issues.
async fn verify_repository(github: &GitHubClient, request: &GenerationRequest) -> Result<(), String> {
    let target = request.target();
    let repository = github
        .get_repository(target.owner_login, target.repo_name, target.access_token)
        .await
        .map_err(|err| format!("cannot access repository {}: {err}", request.repository_slug()))?;

    if !repository.has_issues {
        return Err(format!("issues are disabled for {}", repository.full_name));
    }
    info!(repository = %repository.full_name, "Repository verified");
    Ok(())
}

/// Execute the `generate` command.
pub async fn execute(args: GenerateArgs, ctx: &CommandContext) -> Result<ExitStatus> {
    let request = args.to_request();
    let mut report = GenerateOutput::new(request.repository_slug());

    if let Err(err) = request.validate() {
        output(&report.with_error(err.to_string()), ctx.json);
        return Ok(ExitStatus::InvalidInput);
    }

    let (workflow, github) = build_workflow(&ctx.config)?;

    if ctx.config.github.verify_repository {
        if let Err(message) = verify_repository(&github, &request).await {
            output(&report.with_error(message), ctx.json);
            return Ok(ExitStatus::Failure);
        }
    }

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling remaining submissions");
                cancel.cancel();
            }
        })
    };

    let spinner = create_spinner(!ctx.json);
    spinner.set_message(format!("Generating issues for {}", report.repository));

    let mut events = workflow.run(request, cancel);
    let mut status = ExitStatus::Failure;

    while let Some(event) = events.next().await {
        match event {
            Ok(WorkflowEvent::Warning(warning)) => {
                if !ctx.json {
                    spinner.suspend(|| eprintln!("warning: {warning}"));
                }
                report.warnings.push(warning);
            }
            Ok(WorkflowEvent::Outcome(result)) => {
                if !ctx.json {
                    spinner.suspend(|| println!("{}", describe(&result)));
                }
                spinner.set_message(format!("Submitted {} issue(s)", result.position + 1));
                report.results.push(result);
            }
            Ok(WorkflowEvent::Completed(summary)) => {
                report.summary = summary;
                status = if summary.is_success() {
                    ExitStatus::Success
                } else {
                    ExitStatus::Failure
                };
            }
            Err(err) => {
                status = if err.is_invalid_request() {
                    ExitStatus::InvalidInput
                } else {
                    ExitStatus::Failure
                };
                report.error = Some(err.to_string());
            }
        }
    }
    interrupt.abort();

    match status {
        ExitStatus::Success => spinner.finish_success("Done"),
        _ if report.summary.cancelled => spinner.finish_warning("Cancelled"),
        _ => spinner.finish_error("No issues created"),
    }

    output(&report, ctx.json);
    Ok(status)
}
