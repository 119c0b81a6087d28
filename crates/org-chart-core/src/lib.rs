//! Org chart engine
//!
//! Pure logic behind the interactive org chart, independent of any UI
//! toolkit:
//!
//! - `hierarchy`: flat member list to a forest of roots, reports and orphans
//! - `layout`: base card positions for the forest
//! - `drag`: per-card offset state machine
//! - `signal`: chart-scoped pub/sub connecting cards and connectors
//! - `geometry`: painted card rects keyed by member id
//! - `connector`: manager to report lines from live geometry
//!
//! The egui widgets live in `org-chart-egui`.

#![allow(clippy::should_implement_trait)]

pub mod connector;
pub mod drag;
pub mod geometry;
pub mod hierarchy;
pub mod layout;
pub mod model;
pub mod signal;

pub use connector::{ConnectorLine, ConnectorOverlay, ConnectorStyle};
pub use drag::CardDrag;
pub use geometry::{CardGeometry, GeometrySource};
pub use hierarchy::{
    build_hierarchy, Forest, ForestCache, HierarchyBuilder, HierarchyStats, Outline, TreeNode,
};
pub use layout::{LayoutSpacing, TreeLayout};
pub use model::{MemberId, MemberStatus, OrgChartNode, Role};
pub use signal::{ChartSignal, SignalFilter, SignalHub, Subscription};

/// Re-exported so callers can name positions without a direct emath dependency
pub use emath::{Pos2, Rect, Vec2};
