//! The issue-generation workflow.
//!
//! One invocation walks `Validating -> Generating -> Normalizing ->
//! Submitting(i) -> Done`, with `Cancelled` reachable from every check
//! point. Results are produced as a lazy stream so callers can show
//! progress while issues are being created.
//!
//! The workflow holds no state between invocations: everything a run
//! needs lives in the [`GenerationRequest`] and the injected clients.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, BoxStream, StreamExt};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use crate::domain::errors::{GenerationError, WorkflowError};
use crate::domain::models::{
    Config, GenerationRequest, IssueOutcome, IssueProposal, IssueResult, PlannedProposal,
    RunSummary, SkipReason, WorkflowEvent, WorkflowWarning, MAX_TITLE_LEN,
};
use crate::domain::ports::{IssueTrackerClient, LanguageModelClient};
use crate::services::normalizer::{normalize_proposals, NormalizedProposals};

/// Stream of events produced by [`IssueWorkflow::run`].
///
/// An `Err` item is always the last item of the stream.
pub type WorkflowStream = BoxStream<'static, Result<WorkflowEvent, WorkflowError>>;

/// Tunables for a workflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowOptions {
    /// Titles longer than this many characters are truncated. Values above
    /// [`MAX_TITLE_LEN`] are capped to it.
    pub max_title_len: usize,
    /// Pause between consecutive create-issue calls.
    pub submission_delay: Duration,
    /// Ask the tracker to create missing labels before submitting.
    pub provision_labels: bool,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            max_title_len: MAX_TITLE_LEN,
            submission_delay: Duration::ZERO,
            provision_labels: true,
        }
    }
}

impl WorkflowOptions {
    /// Options for the `workflow` and `github` config sections.
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_title_len: config.workflow.max_title_len.clamp(1, MAX_TITLE_LEN),
            submission_delay: Duration::from_millis(config.workflow.submission_delay_ms),
            provision_labels: config.github.provision_labels,
        }
    }
}

/// Everything a finished run produced, collected from its stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowReport {
    pub results: Vec<IssueResult>,
    pub warnings: Vec<WorkflowWarning>,
    pub summary: RunSummary,
}

/// Turns a project description into issues.
#[derive(Clone)]
pub struct IssueWorkflow {
    language_model: Arc<dyn LanguageModelClient>,
    tracker: Arc<dyn IssueTrackerClient>,
    options: WorkflowOptions,
}

impl IssueWorkflow {
    /// Workflow over the given clients with default options.
    pub fn new(
        language_model: Arc<dyn LanguageModelClient>,
        tracker: Arc<dyn IssueTrackerClient>,
    ) -> Self {
        Self {
            language_model,
            tracker,
            options: WorkflowOptions::default(),
        }
    }

    /// Replace the run options.
    #[must_use]
    pub fn with_options(mut self, options: WorkflowOptions) -> Self {
        self.options = options;
        self
    }

    /// Start a run.
    ///
    /// Nothing happens until the returned stream is polled. Each poll
    /// advances the run to its next observable event; network calls are
    /// made only while the stream is being polled, and `cancel` is checked
    /// immediately before each of them.
    pub fn run(&self, request: GenerationRequest, cancel: CancellationToken) -> WorkflowStream {
        let span = info_span!(
            "issue_workflow",
            run_id = %Uuid::new_v4(),
            repository = %request.repository_slug(),
        );

        let run = Run {
            language_model: Arc::clone(&self.language_model),
            tracker: Arc::clone(&self.tracker),
            options: self.options.clone(),
            request,
            cancel,
            phase: Phase::Validating,
            pending: VecDeque::new(),
            summary: RunSummary::default(),
            span,
        };

        stream::unfold(run, |run| {
            let span = run.span.clone();
            run.advance().instrument(span)
        })
        .boxed()
    }

    /// Run to the end and collect everything the stream produced.
    pub async fn run_to_completion(
        &self,
        request: GenerationRequest,
        cancel: CancellationToken,
    ) -> Result<WorkflowReport, WorkflowError> {
        let mut events = self.run(request, cancel);
        let mut report = WorkflowReport::default();

        while let Some(event) = events.next().await {
            match event? {
                WorkflowEvent::Warning(warning) => report.warnings.push(warning),
                WorkflowEvent::Outcome(result) => report.results.push(result),
                WorkflowEvent::Completed(summary) => report.summary = summary,
            }
        }

        Ok(report)
    }
}

type Item = Result<WorkflowEvent, WorkflowError>;

enum Phase {
    Validating,
    Generating,
    ProvisioningLabels(NormalizedProposals),
    Submitting {
        plan: VecDeque<PlannedProposal>,
        position: usize,
        submitted: usize,
    },
    Completing,
    Finished,
}

/// State of one invocation, threaded through `stream::unfold`.
struct Run {
    language_model: Arc<dyn LanguageModelClient>,
    tracker: Arc<dyn IssueTrackerClient>,
    options: WorkflowOptions,
    request: GenerationRequest,
    cancel: CancellationToken,
    phase: Phase,
    pending: VecDeque<Item>,
    summary: RunSummary,
    span: Span,
}

impl Run {
    async fn advance(mut self) -> Option<(Item, Self)> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Some((item, self));
            }

            match std::mem::replace(&mut self.phase, Phase::Finished) {
                Phase::Validating => {
                    if let Err(err) = self.request.validate() {
                        warn!(error = %err, "rejecting request");
                        return Some((Err(err), self));
                    }
                    self.phase = Phase::Generating;
                }

                Phase::Generating => {
                    if self.cancel.is_cancelled() {
                        info!("cancelled before generation");
                        self.summary.cancelled = true;
                        self.phase = Phase::Completing;
                        continue;
                    }
                    self.generate().await;
                }

                Phase::ProvisioningLabels(normalized) => {
                    if self.cancel.is_cancelled() {
                        self.cancel_remaining(normalized.entries.into(), 0);
                        self.phase = Phase::Completing;
                        continue;
                    }
                    self.provision_labels(&normalized).await;
                    self.phase = Phase::Submitting {
                        plan: normalized.entries.into(),
                        position: 0,
                        submitted: 0,
                    };
                }

                Phase::Submitting {
                    mut plan,
                    position,
                    mut submitted,
                } => {
                    let Some(entry) = plan.pop_front() else {
                        self.phase = Phase::Completing;
                        continue;
                    };

                    let outcome = if self.cancel.is_cancelled() {
                        None
                    } else if entry.is_duplicate() {
                        debug!(title = %entry.proposal.title, "skipping duplicate proposal");
                        Some(IssueOutcome::skipped(SkipReason::Duplicate))
                    } else if submitted > 0 && !self.pace().await {
                        None
                    } else {
                        submitted += 1;
                        Some(self.submit(&entry.proposal).await)
                    };

                    let Some(outcome) = outcome else {
                        plan.push_front(entry);
                        self.cancel_remaining(plan, position);
                        self.phase = Phase::Completing;
                        continue;
                    };

                    self.summary.record(&outcome);
                    self.phase = Phase::Submitting {
                        plan,
                        position: position + 1,
                        submitted,
                    };
                    let result = IssueResult {
                        position,
                        proposal: entry.proposal,
                        outcome,
                    };
                    return Some((Ok(WorkflowEvent::Outcome(result)), self));
                }

                Phase::Completing => {
                    let summary = self.summary;
                    info!(
                        created = summary.created,
                        failed = summary.failed,
                        skipped = summary.skipped,
                        cancelled = summary.cancelled,
                        "issue generation finished"
                    );
                    return Some((Ok(WorkflowEvent::Completed(summary)), self));
                }

                Phase::Finished => return None,
            }
        }
    }

    /// Ask the model for drafts and normalize them into a plan.
    async fn generate(&mut self) {
        info!("requesting issue proposals");
        let drafts = match self.language_model.propose(&self.request).await {
            Ok(drafts) => drafts,
            Err(err) => {
                error!(error = %err, "proposal generation failed");
                self.pending.push_back(Err(err.into()));
                return;
            }
        };

        let received = drafts.len();
        let max_title_len = self.options.max_title_len.min(MAX_TITLE_LEN);
        let normalized = normalize_proposals(drafts, max_title_len);
        for &index in &normalized.dropped_untitled {
            warn!(index, "dropping proposal without a title");
            self.warn(WorkflowWarning::UntitledProposalDropped { index });
        }

        if normalized.is_empty() {
            let err = GenerationError::NoProposals {
                dropped: normalized.dropped_untitled.len(),
            };
            error!(received, error = %err, "nothing to submit");
            self.pending.push_back(Err(err.into()));
            return;
        }

        info!(
            received,
            planned = normalized.entries.len(),
            unique = normalized.unique().count(),
            "proposals normalized"
        );
        self.phase = Phase::ProvisioningLabels(normalized);
    }

    async fn provision_labels(&mut self, normalized: &NormalizedProposals) {
        let labels = normalized.labels();
        if !self.options.provision_labels || labels.is_empty() {
            return;
        }

        let result = self
            .tracker
            .ensure_labels(&self.request.target(), &labels)
            .await;
        match result {
            Ok(created) if !created.is_empty() => {
                info!(created = ?created, "created missing labels");
            }
            Ok(_) => {}
            Err(err) => {
                warn!(status = ?err.status_code, error = %err, "label provisioning failed");
                self.warn(WorkflowWarning::LabelProvisioningFailed {
                    message: err.to_string(),
                });
            }
        }
    }

    /// Wait out the submission delay. Returns `false` if the run was
    /// cancelled in the meantime.
    async fn pace(&self) -> bool {
        let delay = self.options.submission_delay;
        if !delay.is_zero() {
            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = self.cancel.cancelled() => {}
            }
        }
        !self.cancel.is_cancelled()
    }

    async fn submit(&self, proposal: &IssueProposal) -> IssueOutcome {
        match self
            .tracker
            .create_issue(&self.request.target(), proposal)
            .await
        {
            Ok(issue) => {
                info!(title = %proposal.title, number = issue.number, "issue created");
                IssueOutcome::Created(issue)
            }
            Err(err) => {
                warn!(
                    title = %proposal.title,
                    status = ?err.status_code,
                    error = %err,
                    "issue creation failed"
                );
                IssueOutcome::Failed(err)
            }
        }
    }

    fn cancel_remaining(&mut self, remaining: VecDeque<PlannedProposal>, first_position: usize) {
        info!(remaining = remaining.len(), "run cancelled");
        self.summary.cancelled = true;

        for (offset, entry) in remaining.into_iter().enumerate() {
            let outcome = IssueOutcome::skipped(SkipReason::Cancelled);
            self.summary.record(&outcome);
            self.pending.push_back(Ok(WorkflowEvent::Outcome(IssueResult {
                position: first_position + offset,
                proposal: entry.proposal,
                outcome,
            })));
        }
    }

    fn warn(&mut self, warning: WorkflowWarning) {
        self.summary.warnings += 1;
        self.pending.push_back(Ok(WorkflowEvent::Warning(warning)));
    }
}
