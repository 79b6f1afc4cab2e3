use chrono::Local;

use reportbot_core::types::{ActivitySummary, ReportType, Tone};

use crate::templates::{render_section, Template};

/// Apps mentioned in the prompt; the rest of the summary is noise at
/// generation time.
const MAX_PROMPT_APPS: usize = 5;

/// Assemble the generation prompt from today's activity, user notes,
/// and stored templates.
pub fn build_prompt(
    report_type: ReportType,
    summary: &ActivitySummary,
    notes: &str,
    tone: Tone,
    templates: &[Template],
) -> String {
    let today = Local::now().format("%B %d, %Y");

    let top_apps = if summary.top_apps.is_empty() {
        "No activity tracked yet".to_string()
    } else {
        summary
            .top_apps
            .iter()
            .take(MAX_PROMPT_APPS)
            .map(|a| format!("{} ({} min)", a.app, a.seconds / 60))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let template_section = if templates.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nHere are examples of past reports to match the style and format:\n{}",
            render_section(templates)
        )
    };

    let notes = if notes.is_empty() { "None" } else { notes };

    format!(
        "You are a professional report assistant. Generate a {report_type} report for {today}.\n\
         \n\
         Tone: {tone}\n\
         Main apps used today: {top_apps}\n\
         Additional notes from the user: {notes}\
         {template_section}\n\
         \n\
         Instructions:\n\
         - Match the structure and style of the example reports above if provided\n\
         - Highlight key accomplishments and tasks completed\n\
         - Keep it concise and ready to send to a team\n\
         - Use bullet points where appropriate\n\
         - If it's a social media post, make it engaging and on-brand\n\
         \n\
         Generate the report now:"
    )
}
