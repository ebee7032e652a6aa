use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ua_model::{ids, Node, NodeClass, NodeClassMask};

/// Which part of the address space the tree starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrowseRoot {
    #[serde(alias = "objects")]
    Objects,
    #[default]
    #[serde(alias = "types")]
    Types,
}

impl BrowseRoot {
    pub fn node(self) -> Node {
        match self {
            Self::Objects => ids::objects_folder(),
            Self::Types => ids::types_folder(),
        }
    }

    /// The type hierarchy only lists objects and object types.
    pub fn node_class_mask(self) -> Option<NodeClassMask> {
        match self {
            Self::Objects => None,
            Self::Types => Some(NodeClass::Object | NodeClass::ObjectType),
        }
    }
}

impl FromStr for BrowseRoot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "objects" => Ok(Self::Objects),
            "types" => Ok(Self::Types),
            other => Err(format!("unknown browse root '{other}' (expected Objects or Types)")),
        }
    }
}

impl fmt::Display for BrowseRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Objects => f.write_str("Objects"),
            Self::Types => f.write_str("Types"),
        }
    }
}

/// Options of one panel instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelOptions {
    /// Root of the browse tree
    pub root: BrowseRoot,

    /// Show the root's children at top level instead of the root itself
    pub ignore_root_node: bool,

    /// Ask the host to dismiss the browser once a node is picked
    pub close_on_select: bool,

    /// Configuration mode also resolves interfaces and equipment classes
    pub config_mode: bool,

    /// Data source name looked up in the host registry
    pub data_source: String,

    /// Dashboard perspective requested from the backend
    pub perspective: String,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            root: BrowseRoot::Types,
            ignore_root_node: true,
            close_on_select: false,
            config_mode: false,
            data_source: "opcua".to_string(),
            perspective: "Operator".to_string(),
        }
    }
}

impl PanelOptions {
    pub fn validate(&self) -> Result<(), String> {
        if self.data_source.trim().is_empty() {
            return Err("data_source must not be empty".to_string());
        }
        if self.perspective.trim().is_empty() {
            return Err("perspective must not be empty".to_string());
        }
        Ok(())
    }
}
