//! Plain-text rendering of a session.
//!
//! The shortlist is printed in the order the service returned it. Nothing is
//! sorted, filtered or merged here.

use crate::criteria::Criteria;
use crate::files::FileSet;
use crate::scoring_client::ResultEntry;
use crate::session::Session;
use crate::submission::Submission;

pub const SHORTLIST_HEADING: &str = "Shortlisted Resumes";

/// `"name: score"`, with the score written the way JSON numbers read.
pub fn render_entry(entry: &ResultEntry) -> String {
    format!("{}: {}", entry.name, entry.score)
}

/// Shortlist lines for a completed submission; empty otherwise.
pub fn render_results(submission: &Submission) -> Vec<String> {
    submission.results().iter().map(render_entry).collect()
}

pub fn total_weight_line(criteria: &Criteria) -> String {
    format!("Total Weight: {}%", criteria.total_weight())
}

pub fn file_count_line(files: &FileSet) -> Option<String> {
    (!files.is_empty()).then(|| format!("{} resume(s) uploaded", files.len()))
}

/// Full text view: upload count, weight total, status line and shortlist.
pub fn render_session(session: &Session) -> String {
    let mut lines = Vec::new();
    lines.extend(file_count_line(&session.files));
    lines.push(total_weight_line(&session.criteria));
    if let Some(message) = session.submission().message() {
        lines.push(message.to_string());
    }

    let results = render_results(session.submission());
    if !results.is_empty() {
        lines.push(String::new());
        lines.push(SHORTLIST_HEADING.to_string());
        lines.extend(results.into_iter().map(|r| format!("  {r}")));
    }
    lines.join("\n")
}
