use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

/// Namespaced browse name of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifiedName {
    pub name: String,
    #[serde(default)]
    pub namespace_url: String,
}

impl QualifiedName {
    pub fn new(name: impl Into<String>, namespace_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace_url: namespace_url.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Category of a node. Encoded on the wire as its bitmask value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u32")]
pub enum NodeClass {
    #[default]
    Unspecified,
    Object,
    Variable,
    Method,
    ObjectType,
    VariableType,
    ReferenceType,
    DataType,
    View,
}

impl NodeClass {
    pub const fn bits(self) -> u32 {
        match self {
            Self::Unspecified => 0,
            Self::Object => 1,
            Self::Variable => 2,
            Self::Method => 4,
            Self::ObjectType => 8,
            Self::VariableType => 16,
            Self::ReferenceType => 32,
            Self::DataType => 64,
            Self::View => 128,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "Unspecified",
            Self::Object => "Object",
            Self::Variable => "Variable",
            Self::Method => "Method",
            Self::ObjectType => "ObjectType",
            Self::VariableType => "VariableType",
            Self::ReferenceType => "ReferenceType",
            Self::DataType => "DataType",
            Self::View => "View",
        }
    }
}

impl From<i64> for NodeClass {
    fn from(value: i64) -> Self {
        match value {
            1 => Self::Object,
            2 => Self::Variable,
            4 => Self::Method,
            8 => Self::ObjectType,
            16 => Self::VariableType,
            32 => Self::ReferenceType,
            64 => Self::DataType,
            128 => Self::View,
            _ => Self::Unspecified,
        }
    }
}

impl From<NodeClass> for u32 {
    fn from(value: NodeClass) -> Self {
        value.bits()
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of node classes used to filter browse results on the server side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeClassMask(u32);

impl NodeClassMask {
    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, class: NodeClass) -> bool {
        let bits = class.bits();
        bits != 0 && self.0 & bits == bits
    }
}

impl From<NodeClass> for NodeClassMask {
    fn from(value: NodeClass) -> Self {
        Self(value.bits())
    }
}

impl BitOr for NodeClass {
    type Output = NodeClassMask;

    fn bitor(self, rhs: Self) -> NodeClassMask {
        NodeClassMask(self.bits() | rhs.bits())
    }
}

impl BitOr<NodeClass> for NodeClassMask {
    type Output = NodeClassMask;

    fn bitor(self, rhs: NodeClass) -> NodeClassMask {
        NodeClassMask(self.0 | rhs.bits())
    }
}

/// A node of the server address space as returned by `browse`.
///
/// Identity is `node_id`; two nodes with the same id are the same node even if
/// they were reached through different references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub node_id: String,
    #[serde(default)]
    pub browse_name: QualifiedName,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub is_forward: bool,
    #[serde(default)]
    pub node_class: NodeClass,
}

impl Node {
    pub fn new(
        node_id: impl Into<String>,
        browse_name: QualifiedName,
        display_name: impl Into<String>,
        node_class: NodeClass,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            browse_name,
            display_name: display_name.into(),
            is_forward: true,
            node_class,
        }
    }
}

/// Ordered qualified names from the configured root to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrowsePath(Vec<QualifiedName>);

impl BrowsePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path extended by one segment; `self` is left untouched.
    pub fn child(&self, name: QualifiedName) -> Self {
        let mut segments = self.0.clone();
        segments.push(name);
        Self(segments)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<QualifiedName>> for BrowsePath {
    fn from(value: Vec<QualifiedName>) -> Self {
        Self(value)
    }
}

impl fmt::Display for BrowsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
