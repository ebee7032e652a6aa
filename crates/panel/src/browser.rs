use crate::config::{BrowseRoot, PanelOptions};
use crate::dedup::dedup_preserve_order;
use crate::host::PanelHost;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use ua_client::{ClientError, Lookup, ResourceClient, Result};
use ua_model::{BrowsePath, Node, NodeClassMask};

/// A node placed in the tree together with the path it was reached by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub node: Node,
    pub path: BrowsePath,
}

impl TreeEntry {
    /// Top-level entry: the path starts at the node itself.
    pub fn top_level(node: Node) -> Self {
        let path = BrowsePath::new().child(node.browse_name.clone());
        Self { node, path }
    }

    pub fn child(&self, node: Node) -> Self {
        let path = self.path.child(node.browse_name.clone());
        Self { node, path }
    }
}

type ChildrenCell = Arc<OnceCell<Vec<Node>>>;

struct TreeState {
    root: BrowseRoot,
    children: HashMap<String, ChildrenCell>,
    expanded: HashSet<String>,
}

impl TreeState {
    fn new(root: BrowseRoot) -> Self {
        Self {
            root,
            children: HashMap::new(),
            expanded: HashSet::new(),
        }
    }
}

enum Pending {
    NotConnected,
    Failed(ClientError),
}

/// Lazily expanded address-space tree.
///
/// Children of a node are fetched at most once per root; a failed or
/// not-yet-connected fetch leaves the node unfetched so the next expansion
/// retries it.
pub struct NodeBrowser {
    client: ResourceClient,
    host: Arc<dyn PanelHost>,
    ignore_root_node: bool,
    close_on_select: bool,
    state: Mutex<TreeState>,
}

impl NodeBrowser {
    pub fn new(client: ResourceClient, host: Arc<dyn PanelHost>, options: &PanelOptions) -> Self {
        Self {
            client,
            host,
            ignore_root_node: options.ignore_root_node,
            close_on_select: options.close_on_select,
            state: Mutex::new(TreeState::new(options.root)),
        }
    }

    pub fn root(&self) -> BrowseRoot {
        self.lock().root
    }

    /// Switch the tree to another root. Cached children and expansion state
    /// are dropped since node ids may not survive a backend reconnect.
    pub fn set_root(&self, root: BrowseRoot) {
        let mut state = self.lock();
        if state.root == root {
            return;
        }
        log::info!("Browse root changed {} -> {root}", state.root);
        *state = TreeState::new(root);
    }

    /// Children of `node_id`, fetched from the backend on first request only.
    pub async fn browse_children(&self, node_id: &str) -> Result<Lookup<Vec<Node>>> {
        let (cell, mask) = {
            let mut state = self.lock();
            let cell = state.children.entry(node_id.to_string()).or_default().clone();
            (cell, state.root.node_class_mask())
        };

        let fetched = cell
            .get_or_try_init(|| async {
                match self.fetch(node_id, mask).await {
                    Ok(Lookup::Found(nodes)) => Ok(nodes),
                    Ok(Lookup::Empty) => Ok(Vec::new()),
                    Ok(Lookup::NotConnected) => Err(Pending::NotConnected),
                    Err(err) => Err(Pending::Failed(err)),
                }
            })
            .await;

        match fetched {
            Ok(nodes) if nodes.is_empty() => Ok(Lookup::Empty),
            Ok(nodes) => Ok(Lookup::Found(nodes.clone())),
            Err(Pending::NotConnected) => Ok(Lookup::NotConnected),
            Err(Pending::Failed(err)) => {
                log::warn!("Browsing {node_id} failed: {err}");
                Err(err)
            }
        }
    }

    pub fn is_fetched(&self, node_id: &str) -> bool {
        self.lock()
            .children
            .get(node_id)
            .is_some_and(|cell| cell.initialized())
    }

    /// Entries shown at the top of the tree.
    pub async fn top_level(&self) -> Result<Lookup<Vec<TreeEntry>>> {
        let root = self.root().node();
        if !self.ignore_root_node {
            return Ok(Lookup::Found(vec![TreeEntry::top_level(root)]));
        }
        let children = self.browse_children(&root.node_id).await?;
        Ok(children.map(|nodes| nodes.into_iter().map(TreeEntry::top_level).collect()))
    }

    /// Expand `entry`, fetching its children if this is the first time.
    pub async fn expand(&self, entry: &TreeEntry) -> Result<Lookup<Vec<TreeEntry>>> {
        let children = self.browse_children(&entry.node.node_id).await?;
        if children.is_connected() {
            self.lock().expanded.insert(entry.node.node_id.clone());
        }
        Ok(children.map(|nodes| nodes.into_iter().map(|node| entry.child(node)).collect()))
    }

    pub fn collapse(&self, node_id: &str) {
        self.lock().expanded.remove(node_id);
    }

    pub fn is_expanded(&self, node_id: &str) -> bool {
        self.lock().expanded.contains(node_id)
    }

    /// Report a pick to the host. No resolution happens here.
    pub fn select(&self, node: &Node, browse_path: &BrowsePath) {
        log::debug!("Node selected: {} ({browse_path})", node.display_name);
        self.host.node_selected(node, browse_path);
        if self.close_on_select {
            self.host.close_browser();
        }
    }

    async fn fetch(&self, node_id: &str, mask: Option<NodeClassMask>) -> Result<Lookup<Vec<Node>>> {
        let children = self.client.browse(node_id, mask).await?;
        if mask.is_some() {
            return Ok(children);
        }
        Ok(children.map(dedup_preserve_order))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TreeState> {
        self.state.lock().expect("tree state mutex poisoned")
    }
}
