use async_trait::async_trait;

use crate::domain::errors::SyncResult;
use crate::domain::models::PullRequestRecord;

/// Port for anything that can answer a pull-request search.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Run one search with `filter` appended to `is:pull-request`.
    ///
    /// Records come back in the order the remote service returned them.
    /// Only the first page of results is read.
    async fn fetch(&self, filter: &str) -> SyncResult<Vec<PullRequestRecord>>;
}
