use std::sync::Arc;
use ua_client::{DashboardSearch, Lookup, ResourceClient, Result};
use ua_model::{ids, DashboardData, Node, SearchHit};

/// Resolves the type node and the operator dashboard of a selected node.
pub struct DashboardResolver {
    client: ResourceClient,
    search: Arc<dyn DashboardSearch>,
}

impl DashboardResolver {
    pub fn new(client: ResourceClient, search: Arc<dyn DashboardSearch>) -> Self {
        Self { client, search }
    }

    /// First `HasTypeDefinition` target of `node_id`.
    pub async fn node_type(&self, node_id: &str) -> Result<Lookup<Node>> {
        let targets = self
            .client
            .browse_reference_targets(node_id, ids::HAS_TYPE_DEFINITION)
            .await?;
        Ok(match targets {
            Lookup::Found(nodes) => nodes.into_iter().next().map_or(Lookup::Empty, Lookup::Found),
            Lookup::Empty => Lookup::Empty,
            Lookup::NotConnected => Lookup::NotConnected,
        })
    }

    /// Descriptor lookup, repository search by name, key overlay.
    ///
    /// `Empty` covers a missing descriptor, a blank name (no search is sent)
    /// and a search without hits.
    pub async fn resolve(&self, node_id: &str) -> Result<Lookup<DashboardData>> {
        let descriptor = match self.client.dashboard_descriptor(node_id).await? {
            Lookup::Found(descriptor) => descriptor,
            Lookup::Empty => {
                log::debug!("No dashboard descriptor for {node_id}");
                return Ok(Lookup::Empty);
            }
            Lookup::NotConnected => return Ok(Lookup::NotConnected),
        };
        if !descriptor.has_name() {
            log::debug!("Dashboard descriptor for {node_id} has no name");
            return Ok(Lookup::Empty);
        }

        let hits = self.search.search(&descriptor.name).await?;
        let Some(hit) = hits.into_iter().next() else {
            log::info!("Dashboard '{}' not found in repository", descriptor.name);
            return Ok(Lookup::Empty);
        };
        match DashboardData::resolve(hit, &descriptor) {
            Some(dashboard) => {
                log::debug!(
                    "Resolved '{}' -> {} ({} keys)",
                    dashboard.title,
                    dashboard.url,
                    dashboard.dash_keys.len()
                );
                Ok(Lookup::Found(dashboard))
            }
            None => {
                log::warn!("Search hit for '{}' lacks title or url", descriptor.name);
                Ok(Lookup::Empty)
            }
        }
    }

    /// First repository hit for `name`, without any descriptor overlay.
    pub async fn dashboard_by_name(&self, name: &str) -> Result<Option<SearchHit>> {
        Ok(self.search.search(name).await?.into_iter().next())
    }

    /// Whole dashboard catalogue, for the mapping configuration UI.
    pub async fn all_dashboards(&self) -> Result<Vec<SearchHit>> {
        self.search.search("").await
    }
}
