//! Tree layout - base positions for every card in the forest
//!
//! Classic "parent label over children" placement: a subtree is as wide as
//! its children side by side (or its own card if wider), the parent sits
//! centered above them, and each level is one card height plus a gap further
//! down. Several roots hang under an invisible synthetic root that has no
//! card and no stem.
//!
//! Positions are relative to the chart origin (top-left at 0,0). Drag
//! offsets are applied on top by the card widget; the layout never changes
//! while cards move.

use crate::hierarchy::{Forest, TreeNode};
use crate::model::MemberId;
use emath::{pos2, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default card size
pub const CARD_WIDTH: f32 = 160.0;
pub const CARD_HEIGHT: f32 = 70.0;

/// Card size in compact mode (avatar + name)
pub const COMPACT_CARD_WIDTH: f32 = 140.0;
pub const COMPACT_CARD_HEIGHT: f32 = 36.0;

/// Gap between sibling subtrees
pub const H_SPACING: f32 = 40.0;
/// Gap between levels
pub const V_SPACING: f32 = 60.0;

/// Gaps used by [`TreeLayout::compute`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSpacing {
    pub horizontal: f32,
    pub vertical: f32,
}

impl Default for LayoutSpacing {
    fn default() -> Self {
        Self {
            horizontal: H_SPACING,
            vertical: V_SPACING,
        }
    }
}

/// Base rects and static connector segments for one forest
#[derive(Debug, Clone)]
pub struct TreeLayout {
    rects: HashMap<MemberId, Rect>,
    /// Paint order: pre-order from the roots
    order: Vec<MemberId>,
    bounds: Rect,
    static_segments: Vec<[Pos2; 2]>,
    synthetic_root: bool,
    card_size: Vec2,
}

impl TreeLayout {
    pub fn compute(forest: &Forest, spacing: &LayoutSpacing, card_size: Vec2) -> Self {
        let mut builder = LayoutBuilder {
            spacing: *spacing,
            card_size,
            widths: HashMap::with_capacity(forest.len()),
            layout: TreeLayout {
                card_size,
                ..Self::default()
            },
        };

        let roots: Vec<TreeNode<'_>> = forest.roots().collect();
        for root in &roots {
            builder.measure(*root);
        }

        // More than one root: lay them out as children of an invisible root
        builder.layout.synthetic_root = roots.len() > 1;
        let mut left = 0.0;
        for root in &roots {
            let width = builder.width_of(root.id());
            builder.place(*root, left);
            left += width + spacing.horizontal;
        }

        if builder.layout.rects.is_empty() {
            builder.layout.bounds = Rect::from_min_size(Pos2::ZERO, Vec2::ZERO);
        }

        tracing::debug!(
            cards = builder.layout.rects.len(),
            width = builder.layout.bounds.width(),
            height = builder.layout.bounds.height(),
            synthetic_root = builder.layout.synthetic_root,
            "Computed tree layout"
        );
        builder.layout
    }

    /// Base rect of a member's card, relative to the chart origin
    pub fn rect(&self, id: &MemberId) -> Option<Rect> {
        self.rects.get(id).copied()
    }

    /// Members in paint order (managers before their reports)
    pub fn order(&self) -> &[MemberId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Size the chart needs
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The layout's own connector segments, drawn in static mode
    pub fn static_segments(&self) -> &[[Pos2; 2]] {
        &self.static_segments
    }

    pub fn has_synthetic_root(&self) -> bool {
        self.synthetic_root
    }

    pub fn card_size(&self) -> Vec2 {
        self.card_size
    }
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self {
            rects: HashMap::new(),
            order: Vec::new(),
            bounds: Rect::NOTHING,
            static_segments: Vec::new(),
            synthetic_root: false,
            card_size: Vec2::ZERO,
        }
    }
}

struct LayoutBuilder {
    spacing: LayoutSpacing,
    card_size: Vec2,
    widths: HashMap<MemberId, f32>,
    layout: TreeLayout,
}

impl LayoutBuilder {
    /// Subtree widths, children before parents
    fn measure(&mut self, root: TreeNode<'_>) {
        let mut stack = vec![(root, false)];
        while let Some((node, expanded)) = stack.pop() {
            if !expanded {
                stack.push((node, true));
                stack.extend(node.children().map(|child| (child, false)));
                continue;
            }
            let mut children_width = 0.0;
            let mut count = 0;
            for child in node.children() {
                children_width += self.width_of(child.id());
                count += 1;
            }
            if count > 1 {
                children_width += (count - 1) as f32 * self.spacing.horizontal;
            }
            self.widths
                .insert(node.id().clone(), children_width.max(self.card_size.x));
        }
    }

    fn width_of(&self, id: &MemberId) -> f32 {
        self.widths.get(id).copied().unwrap_or(self.card_size.x)
    }

    fn level_top(&self, depth: usize) -> f32 {
        depth as f32 * (self.card_size.y + self.spacing.vertical)
    }

    /// Pre-order placement; managers land in `order` before their reports
    fn place(&mut self, root: TreeNode<'_>, left: f32) {
        let mut stack = vec![(root, left, 0usize)];
        while let Some((node, left, depth)) = stack.pop() {
            let width = self.width_of(node.id());
            let center_x = left + width / 2.0;
            let rect = Rect::from_min_size(
                pos2(center_x - self.card_size.x / 2.0, self.level_top(depth)),
                self.card_size,
            );
            self.layout.rects.insert(node.id().clone(), rect);
            self.layout.order.push(node.id().clone());
            self.layout.bounds = self.layout.bounds.union(rect);

            if !node.has_children() {
                continue;
            }

            let children: Vec<TreeNode<'_>> = node.children().collect();
            let widths: Vec<f32> = children.iter().map(|c| self.width_of(c.id())).collect();
            let total = widths.iter().sum::<f32>()
                + (children.len() - 1) as f32 * self.spacing.horizontal;

            let bar_y = rect.bottom() + self.spacing.vertical / 2.0;
            let child_top = self.level_top(depth + 1);
            self.layout
                .static_segments
                .push([rect.center_bottom(), pos2(center_x, bar_y)]);

            let mut child_left = center_x - total / 2.0;
            let mut placed = Vec::with_capacity(children.len());
            for (child, child_width) in children.into_iter().zip(widths) {
                let child_center = child_left + child_width / 2.0;
                self.layout
                    .static_segments
                    .push([pos2(child_center, bar_y), pos2(child_center, child_top)]);
                placed.push((child, child_left, child_center));
                child_left += child_width + self.spacing.horizontal;
            }

            if let (Some(first), Some(last)) = (placed.first(), placed.last()) {
                if first.2 != last.2 {
                    self.layout
                        .static_segments
                        .push([pos2(first.2, bar_y), pos2(last.2, bar_y)]);
                }
            }

            // Reversed so the first report is placed next
            stack.extend(
                placed
                    .into_iter()
                    .rev()
                    .map(|(child, child_left, _)| (child, child_left, depth + 1)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build_hierarchy;
    use crate::model::OrgChartNode;
    use emath::vec2;
    use pretty_assertions::assert_eq;

    fn layout(nodes: &[OrgChartNode]) -> TreeLayout {
        TreeLayout::compute(
            &build_hierarchy(nodes),
            &LayoutSpacing::default(),
            vec2(CARD_WIDTH, CARD_HEIGHT),
        )
    }

    #[test]
    fn parent_centered_over_children() {
        let nodes = vec![
            OrgChartNode::new("a"),
            OrgChartNode::new("b").reporting_to("a"),
            OrgChartNode::new("c").reporting_to("a"),
        ];
        let layout = layout(&nodes);
        let a = layout.rect(&"a".into()).unwrap();
        let b = layout.rect(&"b".into()).unwrap();
        let c = layout.rect(&"c".into()).unwrap();

        assert_eq!(a.min, pos2(100.0, 0.0));
        assert_eq!(b.min, pos2(0.0, 130.0));
        assert_eq!(c.min, pos2(200.0, 130.0));
        assert_eq!(a.center().x, (b.center().x + c.center().x) / 2.0);
        assert_eq!(layout.bounds(), Rect::from_min_max(pos2(0.0, 0.0), pos2(360.0, 200.0)));
        assert!(!layout.has_synthetic_root());
        // stem, two drops, one bar
        assert_eq!(layout.static_segments().len(), 4);
        assert_eq!(layout.order().len(), 3);
    }

    #[test]
    fn multiple_roots_share_the_top_row_without_lines() {
        let nodes = vec![
            OrgChartNode::new("a"),
            OrgChartNode::new("b"),
        ];
        let layout = layout(&nodes);
        assert!(layout.has_synthetic_root());
        assert_eq!(layout.rect(&"a".into()).unwrap().min, pos2(0.0, 0.0));
        assert_eq!(layout.rect(&"b".into()).unwrap().min, pos2(200.0, 0.0));
        assert!(layout.static_segments().is_empty());
    }

    #[test]
    fn orphans_are_not_laid_out() {
        let nodes = vec![
            OrgChartNode::new("a"),
            OrgChartNode::new("b").reporting_to("a"),
            OrgChartNode::new("loner"),
        ];
        let layout = layout(&nodes);
        assert_eq!(layout.len(), 2);
        assert!(layout.rect(&"loner".into()).is_none());
    }

    #[test]
    fn empty_forest_has_empty_bounds() {
        let layout = layout(&[]);
        assert!(layout.is_empty());
        assert_eq!(layout.bounds().size(), Vec2::ZERO);
    }

    #[test]
    fn wide_subtrees_do_not_overlap() {
        let mut nodes = vec![OrgChartNode::new("root")];
        for m in ["m1", "m2"] {
            nodes.push(OrgChartNode::new(m).reporting_to("root"));
            for i in 0..3 {
                nodes.push(OrgChartNode::new(format!("{m}-{i}")).reporting_to(m));
            }
        }
        let layout = layout(&nodes);
        let rects: Vec<Rect> = layout.order().iter().filter_map(|id| layout.rect(id)).collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(*b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn long_reporting_chain_lays_out_every_level() {
        let mut nodes = vec![OrgChartNode::new("m0")];
        for i in 1..20_000 {
            nodes.push(OrgChartNode::new(format!("m{i}")).reporting_to(format!("m{}", i - 1)));
        }
        let layout = layout(&nodes);
        assert_eq!(layout.len(), 20_000);
        assert_eq!(layout.order().first(), Some(&"m0".into()));
        assert_eq!(layout.order().last(), Some(&"m19999".into()));

        let deepest = layout.rect(&"m19999".into()).unwrap();
        assert_eq!(deepest.min, pos2(0.0, 19_999.0 * 130.0));
        // one stem and one drop per manager
        assert_eq!(layout.static_segments().len(), 2 * 19_999);
    }

    #[test]
    fn paint_order_is_preorder() {
        let nodes = vec![
            OrgChartNode::new("a"),
            OrgChartNode::new("b").reporting_to("a"),
            OrgChartNode::new("c").reporting_to("a"),
            OrgChartNode::new("b1").reporting_to("b"),
        ];
        let layout = layout(&nodes);
        let order: Vec<&str> = layout.order().iter().map(|id| id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "b1", "c"]);
    }
}
