//! Connector overlay - manager to report lines from live card geometry
//!
//! The overlay keeps no positions of its own. On every `Drag` signal it marks
//! itself dirty; the next `refresh` reads the current card rects and rebuilds
//! each line from the manager's bottom-center to the report's top-center.
//! Edges whose cards are not on screen are skipped for that pass.

use crate::geometry::GeometrySource;
use crate::model::MemberId;
use crate::signal::{ChartSignal, SignalHub, Subscription};
use emath::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;

// =============================================================================
// LINE SHAPES
// =============================================================================

/// How a connector is routed between its two anchors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorStyle {
    Straight,
    /// Down, across, down
    #[default]
    Elbow,
    Curved,
}

impl ConnectorStyle {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "straight" | "line" => Self::Straight,
            "curved" | "curve" | "bezier" => Self::Curved,
            _ => Self::Elbow,
        }
    }
}

/// Segments used to flatten a curved connector
const CURVE_SEGMENTS: usize = 16;

/// Sideways pull of the curve's control point, relative to its length
const CURVE_STRENGTH: f32 = 0.12;

/// Quadratic bezier between two anchors
#[derive(Debug, Clone, Copy)]
pub struct ConnectorCurve {
    pub from: Pos2,
    pub to: Pos2,
    pub control: Pos2,
}

impl ConnectorCurve {
    pub fn new(from: Pos2, to: Pos2, strength: f32) -> Self {
        let delta = to - from;
        let perpendicular = Vec2::new(-delta.y, delta.x).normalized();
        let control = from + delta * 0.5 + perpendicular * delta.length() * strength;
        Self { from, to, control }
    }

    /// Point at parameter t in 0..=1
    pub fn point_at(&self, t: f32) -> Pos2 {
        let mt = 1.0 - t;
        let from = self.from.to_vec2() * (mt * mt);
        let control = self.control.to_vec2() * (2.0 * mt * t);
        let to = self.to.to_vec2() * (t * t);
        (from + control + to).to_pos2()
    }

    pub fn flatten(&self, segments: usize) -> Vec<Pos2> {
        let segments = segments.max(1);
        let mut points: Vec<Pos2> = (0..=segments)
            .map(|i| self.point_at(i as f32 / segments as f32))
            .collect();
        // Anchors exactly on the card edges, whatever the float error
        points[0] = self.from;
        points[segments] = self.to;
        points
    }
}

/// Polyline for one connector, always starting at `from` and ending at `to`
pub fn route(style: ConnectorStyle, from: Pos2, to: Pos2) -> Vec<Pos2> {
    match style {
        ConnectorStyle::Straight => vec![from, to],
        ConnectorStyle::Elbow => {
            let mid_y = (from.y + to.y) / 2.0;
            vec![from, Pos2::new(from.x, mid_y), Pos2::new(to.x, mid_y), to]
        }
        ConnectorStyle::Curved => {
            ConnectorCurve::new(from, to, CURVE_STRENGTH).flatten(CURVE_SEGMENTS)
        }
    }
}

/// Manager side anchor
pub fn manager_anchor(rect: Rect) -> Pos2 {
    rect.center_bottom()
}

/// Report side anchor
pub fn report_anchor(rect: Rect) -> Pos2 {
    rect.center_top()
}

// =============================================================================
// OVERLAY
// =============================================================================

/// One drawn connector
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorLine {
    pub manager: MemberId,
    pub report: MemberId,
    pub from: Pos2,
    pub to: Pos2,
    pub path: Vec<Pos2>,
}

/// Lines over the cards, recomputed whenever the hub says something moved
#[derive(Debug)]
pub struct ConnectorOverlay {
    edges: Vec<(MemberId, MemberId)>,
    style: ConnectorStyle,
    lines: Vec<ConnectorLine>,
    dirty: Rc<Cell<bool>>,
    refreshes: u64,
    _subscription: Subscription,
}

impl ConnectorOverlay {
    /// Subscribe to `Drag` on `hub`; the first `refresh` always draws
    pub fn mount(hub: &SignalHub, edges: Vec<(MemberId, MemberId)>) -> Self {
        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        let subscription = hub.subscribe(ChartSignal::Drag, move |_| flag.set(true));
        tracing::debug!(edges = edges.len(), "Connector overlay mounted");
        Self {
            edges,
            style: ConnectorStyle::default(),
            lines: Vec::new(),
            dirty,
            refreshes: 0,
            _subscription: subscription,
        }
    }

    pub fn with_style(mut self, style: ConnectorStyle) -> Self {
        self.style = style;
        self
    }

    pub fn set_style(&mut self, style: ConnectorStyle) {
        if self.style != style {
            self.style = style;
            self.dirty.set(true);
        }
    }

    pub fn style(&self) -> ConnectorStyle {
        self.style
    }

    /// Replace the manager -> report pairs (the forest changed)
    pub fn set_edges(&mut self, edges: Vec<(MemberId, MemberId)>) {
        self.edges = edges;
        self.dirty.set(true);
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    /// How many times lines have been rebuilt
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }

    /// Rebuild lines if a signal arrived since the last pass.
    /// Returns true when the lines were recomputed.
    pub fn refresh(&mut self, geometry: &impl GeometrySource) -> bool {
        if !self.dirty.replace(false) {
            return false;
        }

        let mut lines = Vec::with_capacity(self.edges.len());
        for (manager, report) in &self.edges {
            let (Some(manager_rect), Some(report_rect)) =
                (geometry.card_rect(manager), geometry.card_rect(report))
            else {
                tracing::trace!(%manager, %report, "Connector skipped, card not painted");
                continue;
            };
            let from = manager_anchor(manager_rect);
            let to = report_anchor(report_rect);
            lines.push(ConnectorLine {
                manager: manager.clone(),
                report: report.clone(),
                from,
                to,
                path: route(self.style, from, to),
            });
        }

        self.lines = lines;
        self.refreshes += 1;
        true
    }

    pub fn lines(&self) -> &[ConnectorLine] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emath::{pos2, vec2};
    use std::collections::HashMap;

    fn card(x: f32, y: f32) -> Rect {
        Rect::from_min_size(pos2(x, y), vec2(100.0, 40.0))
    }

    #[test]
    fn routes_start_and_end_on_anchors() {
        let from = pos2(50.0, 40.0);
        let to = pos2(180.0, 120.0);
        for style in [ConnectorStyle::Straight, ConnectorStyle::Elbow, ConnectorStyle::Curved] {
            let path = route(style, from, to);
            assert_eq!(path.first(), Some(&from));
            assert_eq!(path.last(), Some(&to));
        }
    }

    #[test]
    fn mount_draws_once_then_waits_for_drag() {
        let hub = SignalHub::new();
        let mut overlay = ConnectorOverlay::mount(&hub, vec![("a".into(), "b".into())]);
        let mut geo: HashMap<MemberId, Rect> = HashMap::new();
        geo.insert("a".into(), card(0.0, 0.0));
        geo.insert("b".into(), card(0.0, 100.0));

        assert!(overlay.refresh(&geo));
        assert_eq!(overlay.lines().len(), 1);
        assert!(!overlay.refresh(&geo));

        geo.insert("b".into(), card(60.0, 100.0));
        hub.publish(ChartSignal::Drag);
        assert!(overlay.refresh(&geo));
        assert_eq!(overlay.lines()[0].to, pos2(110.0, 100.0));
    }

    #[test]
    fn reset_signal_alone_does_not_redraw() {
        let hub = SignalHub::new();
        let mut overlay = ConnectorOverlay::mount(&hub, Vec::new());
        let geo: HashMap<MemberId, Rect> = HashMap::new();
        overlay.refresh(&geo);
        hub.publish(ChartSignal::Reset);
        assert!(!overlay.is_dirty());
    }

    #[test]
    fn missing_card_skips_edge() {
        let hub = SignalHub::new();
        let mut overlay = ConnectorOverlay::mount(
            &hub,
            vec![("a".into(), "b".into()), ("a".into(), "ghost".into())],
        );
        let mut geo: HashMap<MemberId, Rect> = HashMap::new();
        geo.insert("a".into(), card(0.0, 0.0));
        geo.insert("b".into(), card(0.0, 100.0));
        overlay.refresh(&geo);
        assert_eq!(overlay.lines().len(), 1);
        assert_eq!(overlay.lines()[0].report, MemberId::from("b"));
    }

    #[test]
    fn dropping_overlay_unsubscribes() {
        let hub = SignalHub::new();
        let overlay = ConnectorOverlay::mount(&hub, Vec::new());
        assert_eq!(hub.subscriber_count(), 1);
        drop(overlay);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn style_parsing_falls_back_to_elbow() {
        assert_eq!(ConnectorStyle::from_str("Bezier"), ConnectorStyle::Curved);
        assert_eq!(ConnectorStyle::from_str("straight"), ConnectorStyle::Straight);
        assert_eq!(ConnectorStyle::from_str("zigzag"), ConnectorStyle::Elbow);
    }
}
