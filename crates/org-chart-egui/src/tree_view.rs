//! Tree view - the org chart as a whole
//!
//! Owns everything scoped to one chart: the signal hub, the forest cache,
//! the cached layout, one `NodeCard` per laid-out member, the geometry the
//! cards record while painting, and (in interactive mode) the connector
//! overlay.
//!
//! Frame order:
//! 1. flush signals deferred in the previous frame
//! 2. rebuild forest/layout/cards if the member list changed
//! 3. reserve a shape slot for the lines, paint cards on top of it
//! 4. refresh the overlay from the recorded geometry and fill the slot

use crate::action::{OrgChartAction, OrgChartCapabilities};
use crate::config::{global_settings, OrgChartSettings};
use crate::node_card::{CardFrame, NodeCard};
use crate::style;
use crate::unassigned::UnassignedPanel;
use egui::{RichText, ScrollArea, Sense, Shape, Ui, Vec2};
use org_chart_core::connector::{ConnectorLine, ConnectorOverlay};
use org_chart_core::geometry::CardGeometry;
use org_chart_core::hierarchy::{Forest, ForestCache, HierarchyStats};
use org_chart_core::layout::TreeLayout;
use org_chart_core::model::{MemberId, OrgChartNode};
use org_chart_core::signal::{ChartSignal, SignalHub};
use std::collections::HashMap;
use std::sync::Arc;

// =============================================================================
// OPTIONS + OUTPUT
// =============================================================================

/// Static: the layout draws its own lines and cards stay put.
/// Interactive: cards drag and the overlay draws the lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Static,
    Interactive,
}

impl RenderMode {
    pub fn from_draggable(draggable: bool) -> Self {
        if draggable {
            Self::Interactive
        } else {
            Self::Static
        }
    }

    pub fn is_draggable(&self) -> bool {
        matches!(self, Self::Interactive)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeViewOptions {
    pub mode: RenderMode,
    pub compact: bool,
    pub capabilities: OrgChartCapabilities,
}

#[derive(Debug, Clone)]
pub struct TreeViewOutput {
    pub actions: Vec<OrgChartAction>,
    pub stats: HierarchyStats,
    /// The forest the frame was drawn from, for dispatching `actions`
    pub forest: Arc<Forest>,
}

// =============================================================================
// TREE VIEW
// =============================================================================

pub struct TreeView {
    settings: OrgChartSettings,
    hub: SignalHub,
    cache: ForestCache,
    layout: TreeLayout,
    /// (forest generation, compact) the layout was computed for
    layout_key: Option<(u64, bool)>,
    cards: HashMap<MemberId, NodeCard>,
    geometry: CardGeometry,
    overlay: Option<ConnectorOverlay>,
    mode: RenderMode,
    origin: Option<Vec2>,
}

impl Default for TreeView {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeView {
    pub fn new() -> Self {
        Self::with_settings(global_settings().clone())
    }

    pub fn with_settings(settings: OrgChartSettings) -> Self {
        Self {
            cache: ForestCache::new(settings.hierarchy.builder()),
            settings,
            hub: SignalHub::new(),
            layout: TreeLayout::default(),
            layout_key: None,
            cards: HashMap::new(),
            geometry: CardGeometry::new(),
            overlay: None,
            mode: RenderMode::Static,
            origin: None,
        }
    }

    /// This chart's signal hub
    pub fn hub(&self) -> &SignalHub {
        &self.hub
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn card_offset(&self, id: &MemberId) -> Option<Vec2> {
        self.cards.get(id).map(NodeCard::offset)
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// Lines drawn by the overlay last frame (empty in static mode)
    pub fn connector_lines(&self) -> &[ConnectorLine] {
        self.overlay.as_ref().map(|o| o.lines()).unwrap_or(&[])
    }

    pub fn geometry(&self) -> &CardGeometry {
        &self.geometry
    }

    /// Zero every card offset; lines follow after the next painted frame
    pub fn reset_positions(&self, ctx: &egui::Context) {
        tracing::debug!(cards = self.cards.len(), "Resetting card positions");
        self.hub.reset();
        ctx.request_repaint();
    }

    pub fn show(
        &mut self,
        ui: &mut Ui,
        members: &Arc<[OrgChartNode]>,
        options: &TreeViewOptions,
    ) -> TreeViewOutput {
        self.hub.begin_frame();

        let forest = self.cache.get(members);
        self.sync(&forest, options.compact);
        self.apply_mode(options.mode, &forest);

        let mut actions = Vec::new();
        if forest.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label(RichText::new("No team members yet").weak().size(14.0));
            });
        } else {
            if UnassignedPanel::is_needed(&forest) {
                egui::SidePanel::right(ui.id().with("org_chart_unassigned"))
                    .resizable(false)
                    .exact_width(self.settings.spacing.panel_width)
                    .show_inside(ui, |ui| {
                        actions.extend(UnassignedPanel::new(&forest).show(
                            ui,
                            options.capabilities,
                            &self.settings.card,
                        ));
                    });
            }

            ScrollArea::both()
                .id_salt("org_chart_tree_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| self.paint_tree(ui, &forest, options, &mut actions));
        }

        if self.hub.has_deferred() {
            ui.ctx().request_repaint();
        }

        TreeViewOutput {
            actions,
            stats: forest.stats(),
            forest,
        }
    }

    /// Bring layout, cards and overlay edges in line with the forest
    fn sync(&mut self, forest: &Forest, compact: bool) {
        let key = (self.cache.generation(), compact);
        if self.layout_key == Some(key) {
            return;
        }
        let forest_changed = self.layout_key.map(|(generation, _)| generation) != Some(key.0);
        self.layout_key = Some(key);

        let card_size = self.settings.card.size(compact);
        self.layout = TreeLayout::compute(forest, &self.settings.spacing.layout(), card_size);

        if forest_changed {
            let layout = &self.layout;
            self.cards.retain(|id, _| layout.rect(id).is_some());
            for id in layout.order() {
                if !self.cards.contains_key(id) {
                    self.cards.insert(id.clone(), NodeCard::new(id.clone(), &self.hub));
                }
            }
            self.geometry.retain(|id| layout.rect(id).is_some());
            if let Some(overlay) = &mut self.overlay {
                overlay.set_edges(forest.edges());
            }
            tracing::debug!(
                cards = self.cards.len(),
                stats = ?forest.stats(),
                "Org chart synced to new member list"
            );
        }

        // Base rects moved, so the lines must follow
        self.hub.publish(ChartSignal::Drag);
    }

    fn apply_mode(&mut self, mode: RenderMode, forest: &Forest) {
        if mode != self.mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "Org chart render mode changed");
        }
        match mode {
            RenderMode::Interactive => {
                if self.overlay.is_none() {
                    let overlay = ConnectorOverlay::mount(&self.hub, forest.edges())
                        .with_style(self.settings.connector.style);
                    self.overlay = Some(overlay);
                }
            }
            RenderMode::Static => {
                if self.overlay.take().is_some() {
                    // Static cards sit at their layout positions
                    self.hub.publish(ChartSignal::Reset);
                }
            }
        }
        self.mode = mode;
    }

    fn paint_tree(
        &mut self,
        ui: &mut Ui,
        forest: &Forest,
        options: &TreeViewOptions,
        actions: &mut Vec<OrgChartAction>,
    ) {
        let margin = self.settings.spacing.margin;
        let size = self.layout.bounds().size() + Vec2::splat(margin * 2.0);
        let (canvas, _) = ui.allocate_exact_size(size, Sense::hover());
        let origin = canvas.min.to_vec2() + Vec2::splat(margin);

        // Scrolled or resized: card rects change without any drag
        if self.origin.is_some_and(|prev| prev != origin) {
            self.hub.publish(ChartSignal::Drag);
        }
        self.origin = Some(origin);

        // Lines go in before the cards so they end up underneath
        let line_slot = ui.painter().add(Shape::Noop);

        let draggable = options.mode.is_draggable();
        let mut frame = CardFrame {
            hub: &self.hub,
            geometry: &mut self.geometry,
            origin,
            draggable,
            compact: options.compact,
            capabilities: options.capabilities,
            settings: &self.settings.card,
        };
        for id in self.layout.order() {
            let (Some(node), Some(base), Some(card)) =
                (forest.node(id), self.layout.rect(id), self.cards.get(id))
            else {
                continue;
            };
            let response = card.show(ui, node, base, &mut frame);
            if let Some(action) = response.action {
                actions.push(action);
            }
        }

        let stroke = style::connector_stroke(ui.visuals(), self.settings.connector.width);
        let lines: Vec<Shape> = match &mut self.overlay {
            Some(overlay) => {
                overlay.set_style(self.settings.connector.style);
                overlay.refresh(&self.geometry);
                overlay
                    .lines()
                    .iter()
                    .map(|line| Shape::line(line.path.clone(), stroke))
                    .collect()
            }
            None => self
                .layout
                .static_segments()
                .iter()
                .map(|[a, b]| Shape::line_segment([*a + origin, *b + origin], stroke))
                .collect(),
        };
        ui.painter().set(line_slot, Shape::Vec(lines));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_mode_follows_draggable_flag() {
        assert_eq!(RenderMode::from_draggable(true), RenderMode::Interactive);
        assert_eq!(RenderMode::from_draggable(false), RenderMode::Static);
        assert!(!RenderMode::default().is_draggable());
    }
}
