//! In-memory backend: a recorded address-space snapshot served through the
//! same traits as the HTTP implementation. Every call is logged so callers
//! can assert what reached the backend.

use crate::error::{ClientError, Result};
use crate::handle::{DataSourceRegistry, ResourceHandle, ResourceParams};
use crate::resources::resource;
use crate::search::DashboardSearch;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use ua_model::{DashboardDescriptor, MappingResult, Node, NodeClass, SearchHit};

/// One recorded resource call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceCall {
    pub resource: String,
    pub params: ResourceParams,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceFixture {
    pub node_id: String,
    pub reference_id: String,
    pub targets: Vec<Node>,
}

/// JSON snapshot of a server, as accepted by `--fixture`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemoryFixture {
    pub name: String,
    pub children: HashMap<String, Vec<Node>>,
    pub references: Vec<ReferenceFixture>,
    pub present: Vec<String>,
    pub dashboards: HashMap<String, DashboardDescriptor>,
    pub namespaces: Vec<String>,
    pub catalog: Vec<SearchHit>,
}

impl MemoryFixture {
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(std::io::Error::other)
    }

    pub fn into_parts(self) -> (MemoryDataSource, MemorySearch) {
        let mut source = MemoryDataSource::new(if self.name.is_empty() {
            "fixture".to_string()
        } else {
            self.name
        });
        for (parent, nodes) in self.children {
            source = source.with_children(parent, nodes);
        }
        for reference in self.references {
            source = source.with_references(reference.node_id, reference.reference_id, reference.targets);
        }
        for node_id in self.present {
            source = source.with_present(node_id);
        }
        for (node_id, descriptor) in self.dashboards {
            source = source.with_dashboard(node_id, descriptor);
        }
        source = source.with_namespaces(self.namespaces);
        (source, MemorySearch::new(self.catalog))
    }
}

/// Address-space snapshot implementing [`ResourceHandle`].
#[derive(Debug, Default)]
pub struct MemoryDataSource {
    name: String,
    children: HashMap<String, Vec<Node>>,
    references: HashMap<(String, String), Vec<Node>>,
    present: HashSet<String>,
    dashboards: HashMap<String, DashboardDescriptor>,
    namespaces: Vec<String>,
    failing: HashSet<String>,
    calls: Mutex<Vec<ResourceCall>>,
    mappings: Mutex<Vec<ResourceParams>>,
}

impl MemoryDataSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_children(mut self, parent: impl Into<String>, nodes: Vec<Node>) -> Self {
        self.children.insert(parent.into(), nodes);
        self
    }

    pub fn with_references(
        mut self,
        node_id: impl Into<String>,
        reference_id: impl Into<String>,
        targets: Vec<Node>,
    ) -> Self {
        self.references.insert((node_id.into(), reference_id.into()), targets);
        self
    }

    pub fn with_present(mut self, node_id: impl Into<String>) -> Self {
        self.present.insert(node_id.into());
        self
    }

    pub fn with_dashboard(mut self, node_id: impl Into<String>, descriptor: DashboardDescriptor) -> Self {
        self.dashboards.insert(node_id.into(), descriptor);
        self
    }

    pub fn with_namespaces(mut self, namespaces: Vec<String>) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// Make every call to `resource` fail with a backend error.
    pub fn failing(mut self, resource: impl Into<String>) -> Self {
        self.failing.insert(resource.into());
        self
    }

    pub fn calls(&self) -> Vec<ResourceCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub fn calls_to(&self, resource: &str) -> Vec<ResourceCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.resource == resource)
            .collect()
    }

    pub fn call_count(&self, resource: &str) -> usize {
        self.calls_to(resource).len()
    }

    /// Parameters of every accepted `adddashboardmapping` call.
    pub fn mappings(&self) -> Vec<ResourceParams> {
        self.mappings.lock().expect("mappings mutex poisoned").clone()
    }

    fn browse(&self, params: &ResourceParams) -> Option<Value> {
        let node_id = params.get("nodeId")?;
        let mask = params
            .get("nodeClassMask")
            .and_then(|raw| raw.parse::<u32>().ok());
        let children = self.children.get(node_id)?;
        let filtered: Vec<&Node> = children
            .iter()
            .filter(|node| match mask {
                Some(mask) => node.node_class != NodeClass::Unspecified && mask & node.node_class.bits() != 0,
                None => true,
            })
            .collect();
        serde_json::to_value(filtered).ok()
    }

    fn reference_targets(&self, params: &ResourceParams) -> Option<Value> {
        let key = (
            params.get("nodeId")?.to_string(),
            params.get("referenceId")?.to_string(),
        );
        serde_json::to_value(self.references.get(&key)?).ok()
    }
}

#[async_trait]
impl ResourceHandle for MemoryDataSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_resource(&self, name: &str, params: &ResourceParams) -> Result<Option<Value>> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(ResourceCall {
                resource: name.to_string(),
                params: params.clone(),
            });
        if self.failing.contains(name) {
            return Err(ClientError::backend(name, "simulated failure"));
        }
        let value = match name {
            resource::BROWSE => self.browse(params),
            resource::BROWSE_REFERENCE_TARGETS => self.reference_targets(params),
            resource::IS_NODE_PRESENT => params
                .get("nodeId")
                .map(|id| Value::Bool(self.present.contains(id))),
            resource::GET_DASHBOARD => params
                .get("nodeId")
                .and_then(|id| self.dashboards.get(id))
                .and_then(|descriptor| serde_json::to_value(descriptor).ok()),
            resource::GET_NAMESPACES => serde_json::to_value(&self.namespaces).ok(),
            resource::ADD_DASHBOARD_MAPPING => {
                self.mappings
                    .lock()
                    .expect("mappings mutex poisoned")
                    .push(params.clone());
                serde_json::to_value(MappingResult { success: true }).ok()
            }
            other => return Err(ClientError::backend(other, "unknown resource")),
        };
        Ok(value)
    }
}

/// Registry serving in-memory handles. Lookups can be held open to observe
/// the "not connected yet" window.
pub struct MemoryRegistry {
    sources: Mutex<HashMap<String, Arc<dyn ResourceHandle>>>,
    open: watch::Sender<bool>,
    lookups: AtomicUsize,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        let (open, _) = watch::channel(true);
        Self {
            sources: Mutex::new(HashMap::new()),
            open,
            lookups: AtomicUsize::new(0),
        }
    }

    /// Registry whose lookups block until [`MemoryRegistry::release`].
    pub fn held() -> Self {
        let registry = Self::new();
        registry.open.send_replace(false);
        registry
    }

    pub fn with_source(self, name: impl Into<String>, handle: Arc<dyn ResourceHandle>) -> Self {
        self.sources
            .lock()
            .expect("sources mutex poisoned")
            .insert(name.into(), handle);
        self
    }

    pub fn release(&self) {
        self.open.send_replace(true);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSourceRegistry for MemoryRegistry {
    async fn get(&self, name: &str) -> Result<Arc<dyn ResourceHandle>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let mut open = self.open.subscribe();
        let _ = open.wait_for(|open| *open).await;
        self.sources
            .lock()
            .expect("sources mutex poisoned")
            .get(name)
            .cloned()
            .ok_or_else(|| ClientError::Registry(format!("unknown data source '{name}'")))
    }
}

/// Dashboard catalogue with case-insensitive title matching.
#[derive(Debug, Default)]
pub struct MemorySearch {
    catalog: Vec<SearchHit>,
    fail: bool,
    queries: Mutex<Vec<String>>,
}

impl MemorySearch {
    pub fn new(catalog: Vec<SearchHit>) -> Self {
        Self {
            catalog,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("queries mutex poisoned").clone()
    }
}

#[async_trait]
impl DashboardSearch for MemorySearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        self.queries
            .lock()
            .expect("queries mutex poisoned")
            .push(query.to_string());
        if self.fail {
            return Err(ClientError::backend("search", "simulated failure"));
        }
        let needle = query.to_lowercase();
        Ok(self
            .catalog
            .iter()
            .filter(|hit| hit.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}
