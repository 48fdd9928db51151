//! Prompt assembly for the lived-experience narrative.

use crate::context::NarrativeContext;

/// Most active nodes listed in the prompt before truncation.
const MAX_PROMPT_NODES: usize = 20;

/// Build the fixed futurist prompt for a month's context.
pub fn prompt_for(context: &NarrativeContext) -> String {
    let node_lines = context
        .active_nodes
        .iter()
        .take(MAX_PROMPT_NODES)
        .map(|node| format!("- {} ({})", node.title, node.status.as_str()))
        .collect::<Vec<_>>()
        .join("\n");

    let status_lines = context
        .status_breakdown
        .iter()
        .map(|(status, count)| format!("- {}: {} breakthroughs", status.as_str(), count))
        .collect::<Vec<_>>()
        .join("\n");

    let impacts = context
        .top_impacts
        .iter()
        .map(|area| area.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let prediction_lines = context
        .top_predictions
        .iter()
        .map(|title| format!("- {}", title))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a futurist writing a vivid "lived experience" narrative for someone living in {month}.

Based on the following technological breakthroughs that have occurred or are underway, write a compelling 3-4 paragraph narrative describing what daily life is like for an average person in a developed country.

Active Technology Nodes ({count} total):
{nodes}

Status Breakdown:
{statuses}

Most Affected Life Areas:
{impacts}

Key Predictions for this Month:
{predictions}

Write in second person ("you wake up...", "your morning starts...") and make it concrete and sensory. Focus on:
1. How the morning routine has changed
2. How work/productivity has evolved
3. How social life and relationships have shifted
4. What feels normal vs what still feels novel

Be specific about technologies in use but keep the tone human and relatable. Aim for 300-400 words."#,
        month = context.month_label,
        count = context.active_nodes.len(),
        nodes = node_lines,
        statuses = status_lines,
        impacts = impacts,
        predictions = prediction_lines,
    )
}
