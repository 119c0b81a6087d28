//! Org chart widgets for egui
//!
//! `TreeView` draws a member list as a hierarchy of cards with connector
//! lines. In interactive mode cards can be dragged and the lines follow;
//! orphans and circular reporting chains go to a side panel.
//!
//! Key principle (same as the rest of egui): no callbacks. `TreeView::show`
//! returns the actions the user triggered this frame.

pub mod action;
pub mod config;
pub mod node_card;
pub mod style;
pub mod tree_view;
pub mod unassigned;

pub use action::{OrgChartAction, OrgChartCapabilities, OrgChartHandler};
pub use config::{global_settings, init_global_settings, ConfigError, OrgChartSettings};
pub use node_card::NodeCard;
pub use tree_view::{RenderMode, TreeView, TreeViewOptions, TreeViewOutput};
pub use unassigned::UnassignedPanel;

pub use org_chart_core;
