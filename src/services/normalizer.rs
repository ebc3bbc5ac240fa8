//! Proposal normalization.
//!
//! Turns raw model drafts into the ordered submission plan: titles and
//! bodies are trimmed, titles are truncated to the tracker's limit, drafts
//! without a title are dropped, and exact-title repeats are marked as
//! duplicates of their first occurrence. Normalizing an already normalized
//! list changes nothing.

use std::collections::HashMap;

use crate::domain::models::{IssueProposal, PlannedProposal, ProposalDraft};

/// Result of [`normalize_proposals`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedProposals {
    /// Surviving proposals in presentation order, duplicates included.
    pub entries: Vec<PlannedProposal>,
    /// Indices (in the draft list) of drafts dropped for a missing title.
    pub dropped_untitled: Vec<usize>,
}

impl NormalizedProposals {
    /// Nothing survived normalization.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Proposals that will actually be submitted.
    pub fn unique(&self) -> impl Iterator<Item = &IssueProposal> {
        self.entries
            .iter()
            .filter(|entry| !entry.is_duplicate())
            .map(|entry| &entry.proposal)
    }

    /// Distinct labels used by the proposals that will be submitted, in
    /// first-use order.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for proposal in self.unique() {
            for label in &proposal.labels {
                if !labels.contains(label) {
                    labels.push(label.clone());
                }
            }
        }
        labels
    }
}

/// Trim `raw` and cut it to at most `max_len` characters.
///
/// Returns `None` when nothing is left.
pub fn normalize_title(raw: &str, max_len: usize) -> Option<String> {
    let trimmed = raw.trim();
    let title = if trimmed.chars().count() > max_len {
        trimmed.chars().take(max_len).collect::<String>()
    } else {
        trimmed.to_string()
    };
    let title = title.trim_end();

    (!title.is_empty()).then(|| title.to_string())
}

fn normalize_labels(raw: Vec<String>) -> Vec<String> {
    let mut labels: Vec<String> = Vec::with_capacity(raw.len());
    for label in raw {
        let label = label.trim();
        if !label.is_empty() && !labels.iter().any(|l| l == label) {
            labels.push(label.to_string());
        }
    }
    labels
}

/// Build the submission plan from raw drafts.
pub fn normalize_proposals(drafts: Vec<ProposalDraft>, max_title_len: usize) -> NormalizedProposals {
    let mut normalized = NormalizedProposals::default();
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    for (index, draft) in drafts.into_iter().enumerate() {
        let Some(title) = draft
            .title
            .as_deref()
            .and_then(|t| normalize_title(t, max_title_len))
        else {
            normalized.dropped_untitled.push(index);
            continue;
        };

        let position = normalized.entries.len();
        let duplicate_of = match first_seen.get(&title) {
            Some(&earlier) => Some(earlier),
            None => {
                first_seen.insert(title.clone(), position);
                None
            }
        };

        normalized.entries.push(PlannedProposal {
            proposal: IssueProposal {
                title,
                body: draft.body.as_deref().map(str::trim).unwrap_or_default().to_string(),
                labels: normalize_labels(draft.labels),
            },
            duplicate_of,
        });
    }

    normalized
}
