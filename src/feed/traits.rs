use crate::models::RawAd;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for all listing feed sources
/// This allows easy addition of new feeds (other groups, marketplaces) in the future
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Collect the currently visible listings from the source
    async fn collect(&self) -> Result<Vec<RawAd>>;

    /// Get the name of the feed source
    fn source_name(&self) -> &'static str;
}
