use async_trait::async_trait;

use crate::domain::errors::GenerationError;
use crate::domain::models::{GenerationRequest, ProposalDraft};

/// Port for the language-model service that drafts issues.
///
/// Implementations receive the whole [`GenerationRequest`] so they can use
/// the repository identity as prompt context and the request's API key for
/// authentication. They return drafts in presentation order and leave
/// validation (missing titles, duplicates, length limits) to the workflow.
///
/// Implementations must be `Send + Sync`; the workflow holds them behind an
/// `Arc<dyn LanguageModelClient>`.
#[async_trait]
pub trait LanguageModelClient: Send + Sync {
    /// Propose issues for the request's project description.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::Unreachable`] when the service cannot be reached
    /// - [`GenerationError::Rejected`] when it answers with an error status
    /// - [`GenerationError::Malformed`] when its output cannot be parsed
    async fn propose(&self, request: &GenerationRequest)
        -> Result<Vec<ProposalDraft>, GenerationError>;
}
