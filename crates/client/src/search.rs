use crate::error::Result;
use async_trait::async_trait;
use ua_model::SearchHit;

/// Dashboard repository search.
#[async_trait]
pub trait DashboardSearch: Send + Sync {
    /// Hits matching `query`, best match first. An empty query lists the
    /// whole catalogue.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
}
