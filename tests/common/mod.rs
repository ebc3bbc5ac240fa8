//! Common test utilities for integration tests
//!
//! In-memory implementations of the workflow's ports plus request and
//! draft builders shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use issuepilot::domain::models::IssueTarget;
use issuepilot::{
    ApiError, CreatedIssue, GenerationError, GenerationRequest, IssueProposal,
    IssueTrackerClient, LanguageModelClient, ProposalDraft,
};
use tokio_util::sync::CancellationToken;

/// A request with every field filled in.
pub fn request() -> GenerationRequest {
    GenerationRequest::new(
        "ghp_testtoken",
        "sk-ant-testkey",
        "octocat",
        "hello-world",
        "A command-line todo app with sync",
    )
}

/// Drafts with the given titles and a fixed body.
pub fn drafts(titles: &[&str]) -> Vec<ProposalDraft> {
    titles
        .iter()
        .map(|title| ProposalDraft::new(*title, "..."))
        .collect()
}

/// Language model returning a fixed answer and counting calls.
pub struct ScriptedModel {
    answer: Result<Vec<ProposalDraft>, GenerationError>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    pub fn returning(drafts: Vec<ProposalDraft>) -> Self {
        Self {
            answer: Ok(drafts),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: GenerationError) -> Self {
        Self {
            answer: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModelClient for ScriptedModel {
    async fn propose(
        &self,
        _request: &GenerationRequest,
    ) -> Result<Vec<ProposalDraft>, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

/// Tracker recording every submitted proposal.
///
/// Issue numbers start at 1 and count successful creations. Failures can
/// be scripted per call (1-based), and the tracker can trigger a
/// cancellation token while serving a given call.
#[derive(Default)]
pub struct RecordingTracker {
    submitted: Mutex<Vec<IssueProposal>>,
    ensured_labels: Mutex<Vec<Vec<String>>>,
    failures: HashMap<usize, ApiError>,
    cancel_on_call: Option<(usize, CancellationToken)>,
    created: AtomicUsize,
}

impl RecordingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing_on(mut self, call: usize, error: ApiError) -> Self {
        self.failures.insert(call, error);
        self
    }

    #[must_use]
    pub fn cancelling_on(mut self, call: usize, token: CancellationToken) -> Self {
        self.cancel_on_call = Some((call, token));
        self
    }

    pub fn calls(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    pub fn titles(&self) -> Vec<String> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.title.clone())
            .collect()
    }

    pub fn submitted(&self) -> Vec<IssueProposal> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn ensured_labels(&self) -> Vec<Vec<String>> {
        self.ensured_labels.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueTrackerClient for RecordingTracker {
    async fn create_issue(
        &self,
        _target: &IssueTarget<'_>,
        proposal: &IssueProposal,
    ) -> Result<CreatedIssue, ApiError> {
        let call = {
            let mut submitted = self.submitted.lock().unwrap();
            submitted.push(proposal.clone());
            submitted.len()
        };

        if let Some((at, ref token)) = self.cancel_on_call {
            if at == call {
                token.cancel();
            }
        }

        if let Some(error) = self.failures.get(&call) {
            return Err(error.clone());
        }

        let number = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(CreatedIssue::new(number as u64)
            .with_url(format!("https://github.com/octocat/hello-world/issues/{number}")))
    }

    async fn ensure_labels(
        &self,
        _target: &IssueTarget<'_>,
        labels: &[String],
    ) -> Result<Vec<String>, ApiError> {
        self.ensured_labels.lock().unwrap().push(labels.to_vec());
        Ok(labels.to_vec())
    }
}
