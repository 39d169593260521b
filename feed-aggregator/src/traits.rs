use crate::types::{Result, SourceDescriptor};
use async_trait::async_trait;

/// Retrieves the raw feed document for one source.
///
/// Implementations must treat a non-2xx status or a non-XML payload as an
/// error; the orchestrator turns any error into an empty contribution for
/// that source.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Name used in logs and run reports
    fn fetcher_name(&self) -> String;

    async fn fetch(&self, source: &SourceDescriptor) -> Result<String>;
}
