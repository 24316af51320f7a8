//! Markdown rendering of pull requests as checklist lines.
//!
//! One record becomes one line:
//!
//! ```text
//! - [ ] [Fix bug](https://github.com/org/repo/pull/1) #github-pr
//! - [x] [Add docs](https://github.com/org/repo/pull/2) #github-pr
//! ```
//!
//! Rendering is a pure function of its input: the same records always
//! produce the same bytes, in the same order.

use std::borrow::Cow;

use crate::domain::models::{HeaderPolicy, PullRequestRecord};

/// Tag appended to every task line.
pub const TASK_TAG: &str = "#github-pr";

/// Content written when the task file is first created.
pub const TASK_FILE_HEADER: &str = "# GitHub Pull Requests\n\n";

/// Render a single task line, without the trailing newline.
pub fn render_task_line(record: &PullRequestRecord) -> String {
    format!(
        "- [{}] [{}]({}) {TASK_TAG}",
        record.state.task_mark(),
        escape_link_text(&record.title),
        escape_link_target(&record.url),
    )
}

/// Render all records, each line newline-terminated.
pub fn render_tasks(records: &[PullRequestRecord]) -> String {
    records.iter().fold(String::new(), |mut out, record| {
        out.push_str(&render_task_line(record));
        out.push('\n');
        out
    })
}

/// Full file content for a write under the given header policy.
pub fn render_document(records: &[PullRequestRecord], policy: HeaderPolicy) -> String {
    let tasks = render_tasks(records);
    match policy {
        HeaderPolicy::Discard => tasks,
        HeaderPolicy::Keep => format!("{TASK_FILE_HEADER}{tasks}"),
    }
}

/// Escape characters that would end the link text early or break the line.
fn escape_link_text(title: &str) -> Cow<'_, str> {
    if !title.contains(['\\', '[', ']', '\n', '\r']) {
        return Cow::Borrowed(title);
    }

    let mut escaped = String::with_capacity(title.len() + 8);
    for ch in title.chars() {
        match ch {
            '\\' | '[' | ']' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '\n' | '\r' => escaped.push(' '),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

/// Percent-encode characters that would end the link target early.
fn escape_link_target(url: &str) -> Cow<'_, str> {
    if !url.contains([' ', '(', ')', '\n', '\r']) {
        return Cow::Borrowed(url);
    }

    let mut escaped = String::with_capacity(url.len() + 8);
    for ch in url.chars() {
        match ch {
            ' ' => escaped.push_str("%20"),
            '(' => escaped.push_str("%28"),
            ')' => escaped.push_str("%29"),
            '\n' | '\r' => {}
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}
