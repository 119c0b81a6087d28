//! Org chart viewer application

use crate::manager_picker::{ManagerPickerModal, ManagerPickerResult};
use crate::members::with_manager;
use egui::{Color32, RichText};
use org_chart_core::hierarchy::HierarchyStats;
use org_chart_core::model::{MemberId, OrgChartNode};
use org_chart_egui::{OrgChartHandler, RenderMode, TreeView, TreeViewOptions};
use std::sync::Arc;

pub struct OrgChartApp {
    members: Arc<[OrgChartNode]>,
    view: TreeView,
    options: TreeViewOptions,
    picker: ManagerPickerModal,
    stats: HierarchyStats,
    /// Member whose manager the user wants to change (picker opens after dispatch)
    edit_request: Option<MemberId>,
    status: Option<String>,
}

impl OrgChartApp {
    pub fn new(members: Arc<[OrgChartNode]>, options: TreeViewOptions) -> Self {
        Self {
            members,
            view: TreeView::new(),
            options,
            picker: ManagerPickerModal::new(),
            stats: HierarchyStats::default(),
            edit_request: None,
            status: None,
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Team");
            ui.separator();

            let mut draggable = self.options.mode.is_draggable();
            if ui.checkbox(&mut draggable, "Rearrange").changed() {
                self.options.mode = RenderMode::from_draggable(draggable);
            }
            ui.checkbox(&mut self.options.compact, "Compact");

            let reset = ui.add_enabled(draggable, egui::Button::new("Reset positions"));
            if reset.clicked() {
                self.view.reset_positions(ui.ctx());
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let s = &self.stats;
                ui.label(
                    RichText::new(format!(
                        "{} members · {} unassigned · {} pending",
                        s.members,
                        s.orphans + s.detached,
                        s.pending
                    ))
                    .color(Color32::GRAY),
                );
            });
        });
    }

    fn apply_manager_change(&mut self, member: MemberId, manager: Option<MemberId>) {
        tracing::info!(
            %member,
            manager = manager.as_ref().map(MemberId::as_str).unwrap_or("none"),
            "Manager changed"
        );
        self.members = with_manager(&self.members, &member, manager);
        self.status = Some(format!("Updated reporting line for {member}"));
    }
}

impl OrgChartHandler for OrgChartApp {
    fn on_resend_invite(&mut self, id: &MemberId) {
        // No mail transport in the viewer; the request is only recorded
        tracing::info!(member = %id, "Resend invite requested");
        self.status = Some(format!("Invitation re-sent to {id}"));
    }

    fn on_edit_manager(&mut self, node: &OrgChartNode) {
        if self.options.capabilities.can_edit_hierarchy {
            self.edit_request = Some(node.id.clone());
        }
    }
}

impl eframe::App for OrgChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("org_chart_toolbar").show(ctx, |ui| self.toolbar(ui));

        if let Some(status) = &self.status {
            egui::TopBottomPanel::bottom("org_chart_status").show(ctx, |ui| {
                ui.label(RichText::new(status).size(11.0).color(Color32::GRAY));
            });
        }

        let output = egui::CentralPanel::default()
            .show(ctx, |ui| self.view.show(ui, &self.members, &self.options))
            .inner;
        self.stats = output.stats;

        for action in output.actions {
            action.dispatch(&output.forest, self);
        }

        if let Some(id) = self.edit_request.take() {
            if let Some(node) = output.forest.node(&id) {
                self.picker.open(node, &output.forest);
            }
        }

        match self.picker.ui(ctx) {
            ManagerPickerResult::Selected { member, manager } => {
                self.apply_manager_change(member, manager)
            }
            ManagerPickerResult::Closed | ManagerPickerResult::None => {}
        }
    }
}
