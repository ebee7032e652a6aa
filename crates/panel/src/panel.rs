use crate::browser::NodeBrowser;
use crate::capabilities::CapabilityResolver;
use crate::config::{BrowseRoot, PanelOptions};
use crate::error::{PanelError, Result};
use crate::host::{LocationUpdate, PanelHost};
use crate::resolver::DashboardResolver;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use ua_client::{BackendHandleCache, ClientError, DashboardSearch, DataSourceRegistry, Lookup, ResourceClient};
use ua_model::{BrowsePath, CapabilityList, DashboardData, Node};

/// What the panel currently displays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelState {
    pub selected_node: Option<Node>,
    pub selected_node_type: Option<Node>,
    pub browse_path: Option<BrowsePath>,
    pub mapped_dashboard: Option<DashboardData>,
    pub capabilities: Option<CapabilityList>,
}

/// Fate of one lookup triggered by a selection.
#[derive(Debug)]
pub enum StageOutcome {
    Applied,
    /// No backend handle yet; the displayed value was kept.
    NotConnected,
    /// A newer selection arrived first; the result was dropped.
    Superseded,
    /// Not requested for this panel mode.
    Skipped,
    /// The backend failed; the displayed value was kept.
    Failed(ClientError),
}

impl StageOutcome {
    pub fn error(&self) -> Option<&ClientError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct SelectionReport {
    pub sequence: u64,
    pub node_type: StageOutcome,
    pub dashboard: StageOutcome,
    pub capabilities: StageOutcome,
}

impl SelectionReport {
    pub fn errors(&self) -> impl Iterator<Item = &ClientError> {
        [&self.node_type, &self.dashboard, &self.capabilities]
            .into_iter()
            .filter_map(StageOutcome::error)
    }
}

/// One panel session: the tree, the resolvers and the displayed state.
///
/// Each selection gets a sequence number; a lookup only lands in the state
/// if no newer selection was made while it ran. The three lookups commit
/// independently, so the type may be visible before the dashboard.
pub struct BrowserPanel {
    options: PanelOptions,
    host: Arc<dyn PanelHost>,
    cache: Arc<BackendHandleCache>,
    client: ResourceClient,
    browser: NodeBrowser,
    resolver: DashboardResolver,
    capabilities: CapabilityResolver,
    sequence: AtomicU64,
    state: Mutex<PanelState>,
}

impl BrowserPanel {
    pub fn new(
        options: PanelOptions,
        registry: Arc<dyn DataSourceRegistry>,
        search: Arc<dyn DashboardSearch>,
        host: Arc<dyn PanelHost>,
    ) -> Result<Self> {
        options.validate().map_err(PanelError::InvalidConfig)?;
        let cache = BackendHandleCache::new(registry, options.data_source.clone());
        let client = ResourceClient::new(Arc::clone(&cache), options.perspective.clone());
        Ok(Self {
            browser: NodeBrowser::new(client.clone(), Arc::clone(&host), &options),
            resolver: DashboardResolver::new(client.clone(), search),
            capabilities: CapabilityResolver::new(client.clone()),
            client,
            options,
            host,
            cache,
            sequence: AtomicU64::new(0),
            state: Mutex::new(PanelState::default()),
        })
    }

    pub fn cache(&self) -> &Arc<BackendHandleCache> {
        &self.cache
    }

    /// Raw resource calls, for the mapping configuration flow.
    pub fn client(&self) -> &ResourceClient {
        &self.client
    }

    pub fn browser(&self) -> &NodeBrowser {
        &self.browser
    }

    pub fn resolver(&self) -> &DashboardResolver {
        &self.resolver
    }

    pub fn state(&self) -> PanelState {
        self.lock().clone()
    }

    pub fn set_root(&self, root: BrowseRoot) {
        self.browser.set_root(root);
    }

    /// Handle a pick from the tree: notify the host, then resolve type,
    /// dashboard and (in configuration mode) capabilities concurrently.
    pub async fn on_node_selected(&self, node: Node, browse_path: BrowsePath) -> SelectionReport {
        self.browser.select(&node, &browse_path);
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!("Selection #{sequence}: {} ({})", node.display_name, node.node_id);
        {
            let mut state = self.lock();
            state.selected_node = Some(node.clone());
            state.browse_path = Some(browse_path);
        }

        let (node_type, dashboard, capabilities) = tokio::join!(
            self.apply_node_type(sequence, &node),
            self.apply_dashboard(sequence, &node),
            self.apply_capabilities(sequence, &node),
        );
        SelectionReport {
            sequence,
            node_type,
            dashboard,
            capabilities,
        }
    }

    async fn apply_node_type(&self, sequence: u64, node: &Node) -> StageOutcome {
        match self.resolver.node_type(&node.node_id).await {
            Ok(Lookup::NotConnected) => StageOutcome::NotConnected,
            Ok(found) => self.commit(sequence, |state| {
                state.selected_node_type = found.into_option();
            }),
            Err(err) => {
                log::warn!("Type lookup for {} failed: {err}", node.node_id);
                StageOutcome::Failed(err)
            }
        }
    }

    async fn apply_dashboard(&self, sequence: u64, node: &Node) -> StageOutcome {
        match self.resolver.resolve(&node.node_id).await {
            Ok(Lookup::NotConnected) => StageOutcome::NotConnected,
            Ok(found) => {
                let dashboard = found.into_option();
                let update = LocationUpdate::for_selection(node, dashboard.as_ref());
                let outcome = self.commit(sequence, |state| state.mapped_dashboard = dashboard);
                if matches!(outcome, StageOutcome::Applied) {
                    self.host.update_location(update);
                }
                outcome
            }
            Err(err) => {
                log::warn!(
                    "Dashboard lookup for {} failed, keeping current dashboard: {err}",
                    node.node_id
                );
                StageOutcome::Failed(err)
            }
        }
    }

    async fn apply_capabilities(&self, sequence: u64, node: &Node) -> StageOutcome {
        if !self.options.config_mode {
            return StageOutcome::Skipped;
        }
        match self.capabilities.resolve(&node.node_id).await {
            Ok(Lookup::Found(list)) => self.commit(sequence, |state| state.capabilities = Some(list)),
            Ok(Lookup::Empty) => self.commit(sequence, |state| {
                state.capabilities = Some(CapabilityList::new());
            }),
            Ok(Lookup::NotConnected) => StageOutcome::NotConnected,
            Err(err) => {
                log::warn!("Capability lookup for {} failed: {err}", node.node_id);
                StageOutcome::Failed(err)
            }
        }
    }

    fn commit(&self, sequence: u64, apply: impl FnOnce(&mut PanelState)) -> StageOutcome {
        let mut state = self.lock();
        let latest = self.sequence.load(Ordering::SeqCst);
        if sequence != latest {
            log::debug!("Dropping result of selection #{sequence}, latest is #{latest}");
            return StageOutcome::Superseded;
        }
        apply(&mut state);
        StageOutcome::Applied
    }

    fn lock(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().expect("panel state mutex poisoned")
    }
}
