//! Side panel for members outside the tree
//!
//! Orphans (no manager, nobody reporting to them) and members caught in a
//! circular reporting chain. Shown only when one of the lists is non-empty.

use crate::action::{OrgChartAction, OrgChartCapabilities};
use crate::config::CardSettings;
use crate::node_card::member_chip;
use egui::{RichText, ScrollArea, Ui};
use org_chart_core::hierarchy::{Forest, TreeNode};

pub struct UnassignedPanel<'a> {
    forest: &'a Forest,
}

impl<'a> UnassignedPanel<'a> {
    pub fn new(forest: &'a Forest) -> Self {
        Self { forest }
    }

    /// Orphans only mean something next to a real hierarchy; circular
    /// chains are always listed
    pub fn is_needed(forest: &Forest) -> bool {
        Self::shows_orphans(forest) || forest.detached_count() > 0
    }

    fn shows_orphans(forest: &Forest) -> bool {
        forest.has_hierarchy() && forest.orphan_count() > 0
    }

    pub fn show(
        self,
        ui: &mut Ui,
        capabilities: OrgChartCapabilities,
        settings: &CardSettings,
    ) -> Vec<OrgChartAction> {
        let mut actions = Vec::new();
        ScrollArea::vertical()
            .id_salt("org_chart_unassigned_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let orphans = Self::shows_orphans(self.forest);
                if orphans {
                    section(
                        ui,
                        "Unassigned",
                        self.forest.orphans(),
                        self.forest.orphan_count(),
                        capabilities,
                        settings,
                        &mut actions,
                    );
                }
                if self.forest.detached_count() > 0 {
                    if orphans {
                        ui.add_space(12.0);
                    }
                    section(
                        ui,
                        "Circular reporting",
                        self.forest.detached(),
                        self.forest.detached_count(),
                        capabilities,
                        settings,
                        &mut actions,
                    );
                }
            });
        actions
    }
}

fn section<'f>(
    ui: &mut Ui,
    title: &str,
    members: impl Iterator<Item = TreeNode<'f>>,
    count: usize,
    capabilities: OrgChartCapabilities,
    settings: &CardSettings,
    actions: &mut Vec<OrgChartAction>,
) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(title).strong());
        ui.label(RichText::new(count.to_string()).weak());
    });
    ui.add_space(4.0);
    for member in members {
        if let Some(action) = member_chip(ui, member.node(), capabilities, settings) {
            actions.push(action);
        }
        ui.add_space(4.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use org_chart_core::hierarchy::build_hierarchy;
    use org_chart_core::model::{OrgChartNode, Role};

    #[test]
    fn needed_only_for_orphans_or_cycles() {
        let tree = build_hierarchy(&[
            OrgChartNode::new("a"),
            OrgChartNode::new("b").reporting_to("a"),
        ]);
        assert!(!UnassignedPanel::is_needed(&tree));

        let with_orphan = build_hierarchy(&[
            OrgChartNode::new("ceo").with_role(Role::Executive),
            OrgChartNode::new("loner"),
        ]);
        assert!(UnassignedPanel::is_needed(&with_orphan));

        let with_cycle = build_hierarchy(&[
            OrgChartNode::new("a"),
            OrgChartNode::new("b").reporting_to("a"),
            OrgChartNode::new("x").reporting_to("y"),
            OrgChartNode::new("y").reporting_to("x"),
        ]);
        assert_eq!(with_cycle.detached_count(), 2);
        assert!(UnassignedPanel::is_needed(&with_cycle));
    }

    #[test]
    fn show_without_clicks_yields_no_actions() {
        let forest = build_hierarchy(&[
            OrgChartNode::new("ceo").with_role(Role::Executive),
            OrgChartNode::new("loner").with_name("Lo Ner"),
        ]);
        let ctx = egui::Context::default();
        let mut actions = vec![];
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                actions = UnassignedPanel::new(&forest).show(
                    ui,
                    OrgChartCapabilities::all(),
                    &CardSettings::default(),
                );
            });
        });
        assert!(actions.is_empty());
    }
}
