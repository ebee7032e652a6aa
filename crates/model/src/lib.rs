//! # UA Model
//!
//! Data model shared by the UA browser panel crates: address-space nodes,
//! browse paths, dashboard descriptors and capability lists.
//!
//! ## Architecture
//!
//! ```text
//! Backend resource (JSON)
//!     │
//!     ├──> Node / QualifiedName / NodeClass
//!     │      └─> BrowsePath (root → selected node)
//!     │
//!     ├──> DashboardDescriptor (backend hint)
//!     │      └─> SearchHit ──> DashboardData (resolved)
//!     │
//!     └──> CapabilityList (Interface / EquipmentClass targets)
//! ```
//!
//! The crate performs no I/O. Wire names follow the backend (`nodeId`,
//! `browseName`, `dashKeys`, ...).

mod capability;
mod dashboard;
pub mod ids;
mod node;

pub use capability::{CapabilityKind, CapabilityList};
pub use dashboard::{DashboardData, DashboardDescriptor, MappingRequest, MappingResult, SearchHit};
pub use node::{BrowsePath, Node, NodeClass, NodeClassMask, QualifiedName};
