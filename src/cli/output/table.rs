//! Table output for workflow results using comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};

use crate::domain::models::{IssueOutcome, IssueResult};

use super::truncate;

const TITLE_WIDTH: usize = 60;

/// Render one row per result: position, title, status, link or error.
pub fn results_table(results: &[IssueResult], use_colors: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Status").add_attribute(Attribute::Bold),
        Cell::new("Details").add_attribute(Attribute::Bold),
    ]);

    for result in results {
        let (status, details) = match &result.outcome {
            IssueOutcome::Created(issue) => (
                format!("#{}", issue.number),
                issue.html_url.clone().unwrap_or_default(),
            ),
            IssueOutcome::Failed(err) => ("failed".to_string(), err.to_string()),
            IssueOutcome::Skipped { reason } => ("skipped".to_string(), reason.as_str().to_string()),
        };

        let status_cell = if use_colors {
            Cell::new(status).fg(outcome_color(&result.outcome))
        } else {
            Cell::new(status)
        };

        table.add_row(vec![
            Cell::new(result.position + 1),
            Cell::new(truncate(&result.proposal.title, TITLE_WIDTH)),
            status_cell,
            Cell::new(details),
        ]);
    }

    table
}

fn outcome_color(outcome: &IssueOutcome) -> Color {
    if outcome.is_created() {
        Color::Green
    } else if outcome.is_failed() {
        Color::Red
    } else {
        Color::Yellow
    }
}
