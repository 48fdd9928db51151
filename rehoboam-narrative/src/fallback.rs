//! Deterministic offline summary.
//!
//! Built from the same context as the prompt so the UI always has
//! something to show when no backend is reachable. Pure templating; the
//! same context always yields the same text.

use crate::context::NarrativeContext;

/// Compose the templated lived-experience summary.
pub fn fallback_summary(context: &NarrativeContext) -> String {
    let notable_tech = if context.active_nodes.is_empty() {
        "subtle background systems".to_string()
    } else {
        context
            .active_nodes
            .iter()
            .take(3)
            .map(|node| node.title.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let focus_areas = if context.top_impacts.is_empty() {
        "everyday routines and work patterns".to_string()
    } else {
        context
            .top_impacts
            .iter()
            .map(|area| area.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let prediction_line = if context.top_predictions.is_empty() {
        "Headlines are a mix of incremental improvements and cautious optimism.".to_string()
    } else {
        format!(
            "The month's headlines orbit predictions like {}.",
            context.top_predictions.join(", ")
        )
    };

    let tech_line = if context.active_nodes.is_empty() {
        "Even without a single headline technology, your devices quietly coordinate the day \
         in ways that would have felt uncanny a few years ago."
            .to_string()
    } else {
        format!(
            "Technologies such as {} quietly hum in the background, stitched together by \
             steady deployment teams.",
            notable_tech
        )
    };

    [
        format!(
            "It's {}, and your day is quietly shaped by {}. You wake to a home that already \
             knows your schedule, adjusts the lights, and queues up a breakfast that matches \
             your health preferences. Commuting is less stressful as automation handles most \
             logistics, letting you reclaim mental space for reflection.",
            context.month_label, notable_tech
        ),
        format!(
            "Work has become a conversation with systems rather than a grind through \
             interfaces. Agents prepare briefs and drafts, leaving you to edit and steer. \
             Collaboration happens asynchronously with teammates and their tools, and the \
             biggest change is how quickly ideas turn into tested pilots. The focus areas \
             that feel most different are {}.",
            focus_areas
        ),
        format!(
            "Social life keeps pace with the technology curve. Some interactions feel \
             hyper-mediated, but there is still novelty in the way gatherings blend physical \
             and digital presence. {} {} The month feels like a waypoint rather than a \
             destination.",
            prediction_line, tech_line
        ),
    ]
    .join("\n\n")
}
