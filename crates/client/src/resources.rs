use crate::cache::BackendHandleCache;
use crate::error::{ClientError, Result};
use crate::handle::ResourceParams;
use crate::lookup::Lookup;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use ua_model::{DashboardDescriptor, MappingRequest, MappingResult, Node, NodeClassMask};

/// Backend resource names.
pub mod resource {
    pub const BROWSE: &str = "browse";
    pub const BROWSE_REFERENCE_TARGETS: &str = "browsereferencetargets";
    pub const IS_NODE_PRESENT: &str = "isnodepresent";
    pub const GET_DASHBOARD: &str = "getdashboard";
    pub const ADD_DASHBOARD_MAPPING: &str = "adddashboardmapping";
    pub const GET_NAMESPACES: &str = "getnamespaces";
}

/// Typed access to the backend resource endpoints through the cached handle.
///
/// Every call returns `Lookup::NotConnected` immediately while the handle is
/// still being resolved.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    cache: Arc<BackendHandleCache>,
    perspective: String,
}

impl ResourceClient {
    pub fn new(cache: Arc<BackendHandleCache>, perspective: impl Into<String>) -> Self {
        Self {
            cache,
            perspective: perspective.into(),
        }
    }

    pub fn cache(&self) -> &Arc<BackendHandleCache> {
        &self.cache
    }

    pub fn perspective(&self) -> &str {
        &self.perspective
    }

    /// Children of `node_id`, optionally restricted to a node class mask.
    pub async fn browse(
        &self,
        node_id: &str,
        node_class_mask: Option<NodeClassMask>,
    ) -> Result<Lookup<Vec<Node>>> {
        let mut params = ResourceParams::new().with("nodeId", node_id);
        if let Some(mask) = node_class_mask {
            params = params.with("nodeClassMask", mask.bits());
        }
        let nodes = self.fetch::<Vec<Node>>(resource::BROWSE, params).await?;
        Ok(non_empty(nodes))
    }

    /// Targets of `reference_type_id` references starting at `node_id`.
    pub async fn browse_reference_targets(
        &self,
        node_id: &str,
        reference_type_id: &str,
    ) -> Result<Lookup<Vec<Node>>> {
        let params = ResourceParams::new()
            .with("nodeId", node_id)
            .with("referenceId", reference_type_id);
        let nodes = self
            .fetch::<Vec<Node>>(resource::BROWSE_REFERENCE_TARGETS, params)
            .await?;
        Ok(non_empty(nodes))
    }

    /// Whether the server knows `node_id`. Anything but a literal `true`
    /// counts as absent.
    pub async fn is_node_present(&self, node_id: &str) -> Result<Lookup<bool>> {
        let params = ResourceParams::new().with("nodeId", node_id);
        let present = self.call(resource::IS_NODE_PRESENT, params).await?;
        Ok(match present {
            Lookup::NotConnected => Lookup::NotConnected,
            Lookup::Found(value) => Lookup::Found(value == Value::Bool(true)),
            Lookup::Empty => Lookup::Found(false),
        })
    }

    /// Dashboard hint mapped to `node_id` for the configured perspective.
    pub async fn dashboard_descriptor(&self, node_id: &str) -> Result<Lookup<DashboardDescriptor>> {
        let params = ResourceParams::new()
            .with("nodeId", node_id)
            .with("perspective", &self.perspective);
        self.fetch(resource::GET_DASHBOARD, params).await
    }

    /// Persist a node to dashboard association. Without a target dashboard
    /// nothing is sent and the result is `false`.
    pub async fn add_dashboard_mapping(&self, request: &MappingRequest) -> Result<Lookup<bool>> {
        let Some(dashboard) = request.dashboard.as_deref() else {
            log::info!("No dashboard selected for '{}', mapping skipped", request.node_id);
            return Ok(Lookup::Found(false));
        };
        let interfaces = serde_json::to_string(&request.interfaces)
            .map_err(|err| ClientError::decode(resource::ADD_DASHBOARD_MAPPING, err))?;
        let params = ResourceParams::new()
            .with("nodeId", &request.node_id)
            .with("typeNodeId", &request.type_node_id)
            .with("useType", request.use_type)
            .with("interfaces", interfaces)
            .with("dashboard", dashboard)
            .with(
                "existingDashboard",
                request.existing_dashboard.as_deref().unwrap_or_default(),
            )
            .with("perspective", &self.perspective);
        let result = self
            .fetch::<MappingResult>(resource::ADD_DASHBOARD_MAPPING, params)
            .await?;
        Ok(result.map(|r| r.success))
    }

    /// Namespace table of the server.
    pub async fn namespaces(&self) -> Result<Lookup<Vec<String>>> {
        let namespaces = self
            .fetch::<Vec<String>>(resource::GET_NAMESPACES, ResourceParams::new())
            .await?;
        Ok(non_empty(namespaces))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: ResourceParams,
    ) -> Result<Lookup<T>> {
        match self.call(resource, params).await? {
            Lookup::Found(value) => serde_json::from_value(value)
                .map(Lookup::Found)
                .map_err(|err| ClientError::decode(resource, err)),
            Lookup::Empty => Ok(Lookup::Empty),
            Lookup::NotConnected => Ok(Lookup::NotConnected),
        }
    }

    async fn call(&self, resource: &str, params: ResourceParams) -> Result<Lookup<Value>> {
        let Some(handle) = self.cache.handle() else {
            log::debug!("{resource}: data source '{}' not ready", self.cache.data_source());
            return Ok(Lookup::NotConnected);
        };
        log::debug!("{resource} {:?}", params.pairs());
        match handle.get_resource(resource, &params).await {
            Ok(Some(Value::Null)) | Ok(None) => Ok(Lookup::Empty),
            Ok(Some(value)) => Ok(Lookup::Found(value)),
            Err(err) => {
                log::debug!("{resource} failed: {err}");
                Err(err)
            }
        }
    }
}

fn non_empty<T>(items: Lookup<Vec<T>>) -> Lookup<Vec<T>> {
    match items {
        Lookup::Found(items) if items.is_empty() => Lookup::Empty,
        other => other,
    }
}
