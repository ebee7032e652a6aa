#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use ua_client::memory::{MemoryDataSource, MemoryRegistry, MemorySearch};
use ua_client::{BackendHandleCache, ResourceClient};
use ua_model::{BrowsePath, Node, NodeClass, QualifiedName, SearchHit};
use ua_panel::{LocationUpdate, PanelHost};

pub const DATA_SOURCE: &str = "opcua";

pub fn node(id: &str, class: NodeClass) -> Node {
    Node::new(id, QualifiedName::new(id, "urn:plant"), format!("{id} display"), class)
}

pub fn object(id: &str) -> Node {
    node(id, NodeClass::Object)
}

pub fn hit(title: &str, url: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        url: url.to_string(),
        ..Default::default()
    }
}

#[derive(Default)]
pub struct RecordingHost {
    pub selected: Mutex<Vec<(String, BrowsePath)>>,
    pub closed: Mutex<usize>,
    pub updates: Mutex<Vec<LocationUpdate>>,
}

impl RecordingHost {
    pub fn updates(&self) -> Vec<LocationUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub fn closed(&self) -> usize {
        *self.closed.lock().unwrap()
    }

    pub fn selected(&self) -> Vec<(String, BrowsePath)> {
        self.selected.lock().unwrap().clone()
    }
}

impl PanelHost for RecordingHost {
    fn node_selected(&self, node: &Node, browse_path: &BrowsePath) {
        self.selected
            .lock()
            .unwrap()
            .push((node.node_id.clone(), browse_path.clone()));
    }

    fn close_browser(&self) {
        *self.closed.lock().unwrap() += 1;
    }

    fn update_location(&self, update: LocationUpdate) {
        self.updates.lock().unwrap().push(update);
    }
}

pub fn registry(source: Arc<MemoryDataSource>) -> Arc<MemoryRegistry> {
    Arc::new(MemoryRegistry::new().with_source(DATA_SOURCE, source))
}

/// Client whose handle is already resolved.
pub async fn connected_client(source: Arc<MemoryDataSource>) -> ResourceClient {
    let cache = BackendHandleCache::new(registry(source), DATA_SOURCE);
    cache.connect().await.expect("connect");
    ResourceClient::new(cache, "Operator")
}

pub fn search(catalog: Vec<SearchHit>) -> Arc<MemorySearch> {
    Arc::new(MemorySearch::new(catalog))
}
