use std::sync::Mutex;
use ua_model::{BrowsePath, Node};
use ua_panel::{LocationUpdate, PanelHost};

/// Host for a terminal session: notifications go to the log, the last
/// location update is kept for printing.
#[derive(Debug, Default)]
pub struct ConsoleHost {
    location: Mutex<Option<LocationUpdate>>,
}

impl ConsoleHost {
    pub fn last_location(&self) -> Option<LocationUpdate> {
        self.location.lock().expect("location mutex poisoned").clone()
    }
}

impl PanelHost for ConsoleHost {
    fn node_selected(&self, node: &Node, browse_path: &BrowsePath) {
        log::debug!("Selected {} at {browse_path}", node.node_id);
    }

    fn update_location(&self, update: LocationUpdate) {
        let query: Vec<String> = update
            .query
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        log::info!("Location update: {}", query.join("&"));
        *self.location.lock().expect("location mutex poisoned") = Some(update);
    }
}
