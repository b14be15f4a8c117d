//! Bad prompt report
//!
//! Plain-text export of the prompts players flagged, suitable for pasting into
//! an email or an issue.

/// Subject line used when the report is sent somewhere
pub const REPORT_SUBJECT: &str = "Bad People - Bad Prompts List";

/// Format the flagged prompts, or None when there is nothing to report
pub fn bad_prompt_report(bad_prompts: &[String]) -> Option<String> {
    if bad_prompts.is_empty() {
        return None;
    }

    Some(format!(
        "Here are the prompts that didn't work well:\n\n{}\n\nTotal: {} prompts",
        bad_prompts.join("\n"),
        bad_prompts.len()
    ))
}
