//! # UA Client
//!
//! Everything the panel needs to talk to an already-connected backend: the
//! late-bound data source handle, typed wrappers around the backend resource
//! endpoints, and the dashboard repository search.
//!
//! ## Architecture
//!
//! ```text
//! DataSourceRegistry ──(once per session)──> BackendHandleCache
//!                                                 │
//!                                                 ├─ Connecting  → Lookup::NotConnected
//!                                                 └─ Ready(handle)
//!                                                        │
//!                    ResourceClient ──get_resource──────┘
//!                      ├─ browse / browsereferencetargets
//!                      ├─ isnodepresent / getdashboard
//!                      └─ adddashboardmapping / getnamespaces
//!
//! DashboardSearch ──GET /api/search?query=──> SearchHit[]
//! ```
//!
//! Two implementations are provided: [`grafana`] over HTTP and [`memory`]
//! for fixtures and tests.

mod cache;
mod config;
mod error;
pub mod grafana;
mod handle;
mod lookup;
pub mod memory;
mod resources;
mod search;

pub use cache::{BackendHandleCache, HandleState};
pub use config::GrafanaConfig;
pub use error::{ClientError, Result};
pub use handle::{DataSourceRegistry, ResourceHandle, ResourceParams};
pub use lookup::Lookup;
pub use resources::{resource, ResourceClient};
pub use search::DashboardSearch;
