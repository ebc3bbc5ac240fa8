//! Claude-backed implementation of [`LanguageModelClient`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::domain::errors::GenerationError;
use crate::domain::models::{GenerationRequest, LlmConfig, ProposalDraft};
use crate::domain::ports::LanguageModelClient;
use crate::infrastructure::claude::{ClaudeApiError, ClaudeClient, MessageRequest};

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that generates GitHub issues for software projects.";

/// Asks Claude to draft issues for a project description.
pub struct ClaudeIssueProposer {
    client: Arc<ClaudeClient>,
    config: LlmConfig,
}

impl ClaudeIssueProposer {
    /// Proposer using `client` with the model settings in `config`.
    pub const fn new(client: Arc<ClaudeClient>, config: LlmConfig) -> Self {
        Self { client, config }
    }

    /// Build the user prompt for a request.
    pub fn build_prompt(&self, request: &GenerationRequest) -> String {
        format!(
            r#"You are an expert project manager who specializes in creating GitHub issues for software projects.
Based on the following project description, generate {min}-{max} well-structured GitHub issues for the repository {repo}.

Project Description: {description}

For each issue, include:
1. A clear, concise title
2. A detailed description that explains what needs to be done
3. 2-3 relevant labels (like "feature", "bug", "enhancement", "documentation", etc.)

Format the response as a JSON array of objects, where each object has the following structure:
{{
  "title": "Issue title",
  "body": "Detailed description",
  "labels": ["label1", "label2"]
}}

Only provide the JSON array, with no additional text."#,
            min = self.config.min_issues,
            max = self.config.max_issues,
            repo = request.repository_slug(),
            description = request.description.trim(),
        )
    }
}

#[async_trait]
impl LanguageModelClient for ClaudeIssueProposer {
    #[instrument(skip(self, request), fields(model = %self.config.model))]
    async fn propose(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<ProposalDraft>, GenerationError> {
        let message = MessageRequest::single_turn(
            &self.config.model,
            self.build_prompt(request),
            self.config.max_tokens,
        )
        .with_system(SYSTEM_PROMPT)
        .with_temperature(self.config.temperature);

        let response = self
            .client
            .send_message(&request.api_key, &message)
            .await
            .map_err(generation_error)?;

        let text = response.text();
        debug!(chars = text.len(), stop_reason = ?response.stop_reason, "Received proposal text");

        let drafts = parse_drafts(&text)?;
        info!(count = drafts.len(), "Parsed issue drafts");
        Ok(drafts)
    }
}

fn generation_error(err: ClaudeApiError) -> GenerationError {
    if err.is_unreachable() {
        return GenerationError::Unreachable(err.to_string());
    }
    match err.status_code() {
        Some(status) => GenerationError::Rejected {
            status,
            message: err.to_string(),
        },
        None => GenerationError::Malformed(err.to_string()),
    }
}

/// Strip markdown fences and surrounding prose, leaving the JSON payload.
pub fn extract_json_payload(text: &str) -> &str {
    let trimmed = text.trim();

    let unfenced = match trimmed.find("```") {
        Some(open) => {
            let after = &trimmed[open + 3..];
            let body_start = after.find('\n').map_or(0, |nl| nl + 1);
            let body = &after[body_start..];
            body.find("```").map_or(body, |close| &body[..close])
        }
        None => trimmed,
    };

    let start = unfenced.find(['[', '{']);
    let end = unfenced.rfind([']', '}']);
    match (start, end) {
        (Some(start), Some(end)) if end >= start => &unfenced[start..=end],
        _ => unfenced.trim(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    List(Vec<Value>),
    Wrapped { issues: Vec<Value> },
}

#[derive(Deserialize)]
struct RawDraft {
    #[serde(default)]
    title: Option<Value>,
    #[serde(default, alias = "description")]
    body: Option<Value>,
    #[serde(default)]
    labels: Option<Value>,
}

/// Parse model output into drafts, preserving order.
///
/// Accepts a bare array or an object with an `issues` array. Entries that
/// are not objects become untitled drafts so the workflow can report them.
pub fn parse_drafts(text: &str) -> Result<Vec<ProposalDraft>, GenerationError> {
    let payload: Payload = serde_json::from_str(extract_json_payload(text))
        .map_err(|e| GenerationError::Malformed(format!("expected a JSON array of issues: {e}")))?;

    let entries = match payload {
        Payload::List(entries) | Payload::Wrapped { issues: entries } => entries,
    };

    Ok(entries.into_iter().map(draft_from_value).collect())
}

fn draft_from_value(value: Value) -> ProposalDraft {
    let Ok(raw) = serde_json::from_value::<RawDraft>(value) else {
        return ProposalDraft::default();
    };

    ProposalDraft {
        title: raw.title.and_then(as_text),
        body: raw.body.and_then(as_text),
        labels: match raw.labels {
            Some(Value::Array(items)) => items.into_iter().filter_map(as_text).collect(),
            Some(Value::String(single)) => vec![single],
            _ => Vec::new(),
        },
    }
}

fn as_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_plain() {
        assert_eq!(extract_json_payload(r#"[{"title":"A"}]"#), r#"[{"title":"A"}]"#);
    }

    #[test]
    fn test_extract_json_code_block() {
        let input = "```json\n[{\"title\": \"A\"}]\n```";
        assert_eq!(extract_json_payload(input), r#"[{"title": "A"}]"#);
    }

    #[test]
    fn test_extract_json_with_prose() {
        let input = "Here are your issues:\n[{\"title\": \"A\"}]\nGood luck!";
        assert_eq!(extract_json_payload(input), r#"[{"title": "A"}]"#);
    }

    #[test]
    fn test_parse_drafts_array() {
        let drafts = parse_drafts(
            r#"[
                {"title": "Set up CI", "body": "GitHub Actions", "labels": ["ci", "chore"]},
                {"title": "Write docs", "description": "README"}
            ]"#,
        )
        .unwrap();

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].title.as_deref(), Some("Set up CI"));
        assert_eq!(drafts[0].labels, vec!["ci", "chore"]);
        assert_eq!(drafts[1].body.as_deref(), Some("README"));
        assert!(drafts[1].labels.is_empty());
    }

    #[test]
    fn test_parse_drafts_wrapped_object() {
        let drafts = parse_drafts(r#"{"issues": [{"title": "A", "body": "b"}]}"#).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title.as_deref(), Some("A"));
    }

    #[test]
    fn test_non_object_entries_become_untitled() {
        let drafts = parse_drafts(r#"["just a string", {"title": null}, {"title": "Ok"}]"#).unwrap();
        assert_eq!(drafts.len(), 3);
        assert!(drafts[0].title.is_none());
        assert!(drafts[1].title.is_none());
        assert_eq!(drafts[2].title.as_deref(), Some("Ok"));
    }

    #[test]
    fn test_parse_drafts_rejects_prose() {
        let err = parse_drafts("I cannot help with that.").unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    #[test]
    fn test_generation_error_mapping() {
        assert!(matches!(
            generation_error(ClaudeApiError::InvalidApiKey),
            GenerationError::Rejected { status: 401, .. }
        ));
        let json_err = serde_json::from_str::<u32>("x").unwrap_err();
        assert!(matches!(
            generation_error(ClaudeApiError::JsonError(json_err)),
            GenerationError::Malformed(_)
        ));
    }

    #[test]
    fn test_prompt_mentions_repository_and_bounds() {
        let client = Arc::new(ClaudeClient::new(Default::default()).unwrap());
        let proposer = ClaudeIssueProposer::new(client, LlmConfig::default());
        let request = GenerationRequest::new("tok", "key", "octo", "widgets", "  A widget store  ");

        let prompt = proposer.build_prompt(&request);
        assert!(prompt.contains("octo/widgets"));
        assert!(prompt.contains("generate 5-10"));
        assert!(prompt.contains("Project Description: A widget store\n"));
    }
}
