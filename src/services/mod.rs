//! Service layer: rendering, writing and the sync run that ties them to
//! the fetcher.

pub mod sync_service;
pub mod task_renderer;
pub mod task_writer;

pub use sync_service::{PrTaskSync, SyncReport, SyncSettings, NOTICE_DONE, NOTICE_STARTED};
pub use task_renderer::{
    render_document, render_task_line, render_tasks, TASK_FILE_HEADER, TASK_TAG,
};
pub use task_writer::{apply, ApplyOutcome};
