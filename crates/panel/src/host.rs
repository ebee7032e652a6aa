use serde::Serialize;
use std::collections::BTreeMap;
use ua_model::{BrowsePath, DashboardData, Node};

pub const VAR_INSTANCE_DISPLAY_NAME: &str = "var-InstanceDisplayName";
pub const VAR_OBJECT_ID: &str = "var-ObjectId";
pub const VAR_DASHBOARD_URL: &str = "var-DashboardUrl";

/// Merge-update of the host's shared query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationUpdate {
    pub query: BTreeMap<String, String>,
    pub partial: bool,
    pub replace: bool,
}

impl LocationUpdate {
    /// Display parameters for a resolved selection. The dashboard URL is
    /// empty when the node has no dashboard.
    pub fn for_selection(node: &Node, dashboard: Option<&DashboardData>) -> Self {
        let mut query = BTreeMap::new();
        query.insert(VAR_INSTANCE_DISPLAY_NAME.to_string(), node.display_name.clone());
        query.insert(VAR_OBJECT_ID.to_string(), node.node_id.clone());
        query.insert(
            VAR_DASHBOARD_URL.to_string(),
            dashboard.map(|d| d.url.clone()).unwrap_or_default(),
        );
        Self {
            query,
            partial: true,
            replace: true,
        }
    }
}

/// The panel host: receives notifications, never answers them.
pub trait PanelHost: Send + Sync {
    fn node_selected(&self, _node: &Node, _browse_path: &BrowsePath) {}

    fn close_browser(&self) {}

    fn update_location(&self, update: LocationUpdate);
}
