use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Query parameters of a backend resource call, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceParams(Vec<(String, String)>);

impl ResourceParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.0.push((key.into(), value.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A connected backend data source exposing the generic "get resource" call.
#[async_trait]
pub trait ResourceHandle: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(None)` when the backend answered without data (empty body or
    /// JSON `null`).
    async fn get_resource(&self, resource: &str, params: &ResourceParams) -> Result<Option<Value>>;
}

/// Host-side registry resolving a configured data source name to a handle.
#[async_trait]
pub trait DataSourceRegistry: Send + Sync {
    async fn get(&self, name: &str) -> Result<Arc<dyn ResourceHandle>>;
}
