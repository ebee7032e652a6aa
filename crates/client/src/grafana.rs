//! Grafana HTTP implementations of the registry, resource handle and search.

use crate::config::GrafanaConfig;
use crate::error::{ClientError, Result};
use crate::handle::{DataSourceRegistry, ResourceHandle, ResourceParams};
use crate::search::DashboardSearch;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use ua_model::SearchHit;

#[derive(Debug, Deserialize)]
struct DataSourceInfo {
    uid: String,
    #[serde(default)]
    name: String,
}

/// Shared HTTP client bound to one Grafana instance.
#[derive(Debug, Clone)]
pub struct GrafanaApi {
    client: Client,
    config: Arc<GrafanaConfig>,
}

impl GrafanaApi {
    pub fn new(config: GrafanaConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Handle for a data source whose uid is already known.
    pub fn data_source(&self, uid: impl Into<String>, name: impl Into<String>) -> GrafanaDataSource {
        GrafanaDataSource {
            api: self.clone(),
            uid: uid.into(),
            name: name.into(),
        }
    }

    fn request(&self, segments: &[&str]) -> Result<RequestBuilder> {
        let request = self.client.get(self.config.endpoint(segments)?);
        Ok(match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }
}

#[async_trait]
impl DataSourceRegistry for GrafanaApi {
    async fn get(&self, name: &str) -> Result<Arc<dyn ResourceHandle>> {
        let response = self
            .request(&["api", "datasources", "name", name])?
            .send()
            .await?;
        let body = read_body("datasource", response)
            .await
            .map_err(|err| ClientError::Registry(format!("'{name}': {err}")))?
            .ok_or_else(|| ClientError::Registry(format!("'{name}': empty response")))?;
        let info: DataSourceInfo =
            serde_json::from_value(body).map_err(|err| ClientError::decode("datasource", err))?;
        let display = if info.name.is_empty() { name.to_string() } else { info.name };
        log::debug!("Data source '{display}' has uid {}", info.uid);
        Ok(Arc::new(self.data_source(info.uid, display)))
    }
}

#[async_trait]
impl DashboardSearch for GrafanaApi {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        log::debug!("Dashboard search '{query}'");
        let response = self.request(&["api", "search"])?.query(&[("query", query)]).send().await?;
        match read_body("search", response).await? {
            Some(body) => serde_json::from_value(body).map_err(|err| ClientError::decode("search", err)),
            None => Ok(Vec::new()),
        }
    }
}

/// Backend resource endpoint of one Grafana data source.
#[derive(Debug, Clone)]
pub struct GrafanaDataSource {
    api: GrafanaApi,
    uid: String,
    name: String,
}

#[async_trait]
impl ResourceHandle for GrafanaDataSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_resource(&self, resource: &str, params: &ResourceParams) -> Result<Option<Value>> {
        let response = self
            .api
            .request(&["api", "datasources", "uid", self.uid.as_str(), "resources", resource])?
            .query(params.pairs())
            .send()
            .await?;
        read_body(resource, response).await
    }
}

async fn read_body(resource: &str, response: Response) -> Result<Option<Value>> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(ClientError::backend(
            resource,
            format!("HTTP {status}: {}", text.trim()),
        ));
    }
    if text.trim().is_empty() {
        return Ok(None);
    }
    let value: Value =
        serde_json::from_str(&text).map_err(|err| ClientError::decode(resource, err))?;
    Ok(if value.is_null() { None } else { Some(value) })
}
