use crate::ids;
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Optional reference kinds a server may or may not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CapabilityKind {
    Interface,
    EquipmentClass,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 2] = [Self::Interface, Self::EquipmentClass];

    /// Reference type whose presence gates this capability.
    pub fn reference_type_id(self) -> &'static str {
        match self {
            Self::Interface => ids::HAS_INTERFACE,
            Self::EquipmentClass => ids::DEFINED_BY_EQUIPMENT_CLASS,
        }
    }
}

/// Reference targets grouped by capability kind.
///
/// A kind is present only when its probe confirmed support on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityList(BTreeMap<CapabilityKind, Vec<Node>>);

impl CapabilityList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append targets under `kind`, creating the entry if needed.
    pub fn append(&mut self, kind: CapabilityKind, nodes: Vec<Node>) {
        self.0.entry(kind).or_default().extend(nodes);
    }

    pub fn get(&self, kind: CapabilityKind) -> Option<&[Node]> {
        self.0.get(&kind).map(Vec::as_slice)
    }

    pub fn contains(&self, kind: CapabilityKind) -> bool {
        self.0.contains_key(&kind)
    }

    /// All targets, interfaces first, as the mapping UI lists them.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.0.values().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
