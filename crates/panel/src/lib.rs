//! # UA Panel
//!
//! Core of the UA browser panel: a lazily expanded address-space tree and the
//! pipeline that turns a selected node into its type, its operator dashboard
//! and (in configuration mode) its capability list.
//!
//! ## Architecture
//!
//! ```text
//! rendering layer ──click──> NodeBrowser ──(node, browse path)──> BrowserPanel
//!                               │                                    │ seq = n
//!                               └─ browse (fetch-once, dedup)        ├─ type lookup ───────┐
//!                                                                    ├─ DashboardResolver ─┼─> commit if seq == latest
//!                                                                    └─ CapabilityResolver ┘
//!                                                                         │
//!                                                  PanelHost::update_location (var-*)
//! ```
//!
//! Rendering, layout and persistence of mappings live outside this crate and
//! reach it through [`PanelHost`].

mod browser;
mod capabilities;
mod config;
mod dedup;
mod error;
mod host;
mod panel;
mod resolver;

pub use browser::{NodeBrowser, TreeEntry};
pub use capabilities::CapabilityResolver;
pub use config::{BrowseRoot, PanelOptions};
pub use dedup::dedup_preserve_order;
pub use error::{PanelError, Result};
pub use host::{LocationUpdate, PanelHost, VAR_DASHBOARD_URL, VAR_INSTANCE_DISPLAY_NAME, VAR_OBJECT_ID};
pub use panel::{BrowserPanel, PanelState, SelectionReport, StageOutcome};
pub use resolver::DashboardResolver;
