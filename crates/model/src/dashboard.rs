use serde::{Deserialize, Serialize};

/// Backend-side hint naming the dashboard mapped to a node.
///
/// The name is not yet a dashboard: it has to be looked up in the dashboard
/// repository before anything can be displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dash_keys: Vec<String>,
}

impl DashboardDescriptor {
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}

/// One entry of the dashboard repository search (`/api/search`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dash_keys: Vec<String>,
}

/// A resolved, displayable dashboard.
///
/// Only built through [`DashboardData::resolve`], so a value always carries a
/// title, a url and the descriptor's keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub title: String,
    pub url: String,
    pub dash_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl DashboardData {
    /// Overlay the descriptor keys onto a search hit. Hits without a title or
    /// url cannot be displayed and yield `None`.
    pub fn resolve(hit: SearchHit, descriptor: &DashboardDescriptor) -> Option<Self> {
        if hit.title.is_empty() || hit.url.is_empty() {
            return None;
        }
        Some(Self {
            title: hit.title,
            url: hit.url,
            dash_keys: descriptor.dash_keys.clone(),
            id: hit.id,
            uid: hit.uid,
            tags: hit.tags,
        })
    }
}

/// Association persisted by `adddashboardmapping`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingRequest {
    pub node_id: String,
    pub type_node_id: String,
    /// Map the dashboard to the node's type instead of the instance.
    pub use_type: bool,
    pub interfaces: Vec<String>,
    pub dashboard: Option<String>,
    pub existing_dashboard: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingResult {
    #[serde(default)]
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolve_overwrites_dash_keys() {
        let descriptor = DashboardDescriptor {
            name: "Pump".to_string(),
            dash_keys: vec!["k1".to_string(), "k2".to_string()],
        };
        let hit = SearchHit {
            title: "Pump".to_string(),
            url: "/d/pump".to_string(),
            dash_keys: vec!["old".to_string()],
            ..Default::default()
        };
        let resolved = DashboardData::resolve(hit, &descriptor).unwrap();
        assert_eq!(resolved.title, "Pump");
        assert_eq!(resolved.url, "/d/pump");
        assert_eq!(resolved.dash_keys, vec!["k1".to_string(), "k2".to_string()]);
    }

    #[test]
    fn resolve_rejects_incomplete_hit() {
        let hit = SearchHit {
            title: "Pump".to_string(),
            ..Default::default()
        };
        assert!(DashboardData::resolve(hit, &DashboardDescriptor::default()).is_none());
    }

    #[test]
    fn descriptor_name_must_not_be_empty() {
        let descriptor: DashboardDescriptor = serde_json::from_str(r#"{ "name": "" }"#).unwrap();
        assert!(!descriptor.has_name());
        assert!(descriptor.dash_keys.is_empty());

        let missing: DashboardDescriptor = serde_json::from_str("{}").unwrap();
        assert!(!missing.has_name());
    }

    #[test]
    fn whitespace_name_is_still_a_name() {
        let descriptor: DashboardDescriptor = serde_json::from_str(r#"{ "name": "  " }"#).unwrap();
        assert!(descriptor.has_name());
    }

    #[test]
    fn search_hit_reads_grafana_fields() {
        let raw = r#"{
            "id": 7, "uid": "abc", "title": "Pump", "uri": "db/pump",
            "url": "/d/abc/pump", "type": "dash-db", "tags": ["plant"],
            "isStarred": false, "folderTitle": "Area 1"
        }"#;
        let hit: SearchHit = serde_json::from_str(raw).unwrap();
        assert_eq!(hit.id, Some(7));
        assert_eq!(hit.kind.as_deref(), Some("dash-db"));
        assert_eq!(hit.folder_title.as_deref(), Some("Area 1"));
    }
}
