use pr_to_task::domain::models::{HeaderPolicy, PullRequestRecord, PullRequestState};
use pr_to_task::services::{render_document, render_tasks, TASK_FILE_HEADER};
use proptest::prelude::*;

fn record_strategy() -> impl Strategy<Value = (String, bool)> {
    ("[a-zA-Z0-9 _`*\\[\\]\\\\()\n\r-]{0,40}", any::<bool>())
}

fn build_records(raw: &[(String, bool)]) -> Vec<PullRequestRecord> {
    raw.iter()
        .enumerate()
        .map(|(i, (title, closed))| {
            let state = if *closed {
                PullRequestState::Closed
            } else {
                PullRequestState::Open
            };
            PullRequestRecord::new(title.clone(), format!("https://github.com/o/r/pull/{i}"), state)
        })
        .collect()
}

proptest! {
    /// Property: one line per record, in input order
    ///
    /// Titles with brackets, backslashes or line breaks never split a task
    /// across lines or reorder the output.
    #[test]
    fn prop_one_line_per_record_in_order(
        raw in prop::collection::vec(record_strategy(), 0..30)
    ) {
        let records = build_records(&raw);
        let rendered = render_tasks(&records);
        let lines: Vec<&str> = rendered.lines().collect();

        prop_assert_eq!(lines.len(), records.len());
        for (i, line) in lines.iter().enumerate() {
            let expected_suffix = format!("(https://github.com/o/r/pull/{i}) #github-pr");
            prop_assert!(line.ends_with(&expected_suffix), "line {} = {:?}", i, line);
        }
    }

    /// Property: the checkbox mirrors the state
    #[test]
    fn prop_checkbox_matches_state(
        raw in prop::collection::vec(record_strategy(), 1..30)
    ) {
        let records = build_records(&raw);
        let rendered = render_tasks(&records);

        for (record, line) in records.iter().zip(rendered.lines()) {
            let expected = if record.state.is_closed() { "- [x] [" } else { "- [ ] [" };
            prop_assert!(line.starts_with(expected));
        }
    }

    /// Property: rendering is deterministic and the header policy only
    /// adds a prefix
    #[test]
    fn prop_render_is_deterministic(
        raw in prop::collection::vec(record_strategy(), 0..20)
    ) {
        let records = build_records(&raw);
        let discard = render_document(&records, HeaderPolicy::Discard);

        prop_assert_eq!(&discard, &render_document(&records, HeaderPolicy::Discard));
        prop_assert_eq!(
            render_document(&records, HeaderPolicy::Keep),
            format!("{TASK_FILE_HEADER}{discard}")
        );
        prop_assert_eq!(discard.is_empty(), records.is_empty());
    }
}
