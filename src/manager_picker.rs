//! Change-manager modal
//!
//! Opened for an `EditManager` action. Lists every member that can become
//! the manager without creating a reporting cycle, plus "No manager".

use egui::{Color32, RichText, ScrollArea, TextEdit};
use org_chart_core::hierarchy::Forest;
use org_chart_core::model::{MemberId, OrgChartNode};

/// One selectable manager
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: MemberId,
    pub name: String,
    pub title: Option<String>,
}

impl Candidate {
    fn from_node(node: &OrgChartNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.display_name().to_string(),
            title: node.title.clone(),
        }
    }

    fn matches(&self, query_lower: &str) -> bool {
        self.name.to_lowercase().contains(query_lower)
            || self
                .title
                .as_ref()
                .is_some_and(|t| t.to_lowercase().contains(query_lower))
    }
}

/// Result from the picker
#[derive(Debug, Clone, PartialEq)]
pub enum ManagerPickerResult {
    None,
    /// `manager: None` means "reports to nobody"
    Selected {
        member: MemberId,
        manager: Option<MemberId>,
    },
    Closed,
}

#[derive(Default)]
pub struct ManagerPickerModal {
    member: Option<(MemberId, String)>,
    current_manager: Option<MemberId>,
    query: String,
    candidates: Vec<Candidate>,
    filtered: Vec<Candidate>,
}

impl ManagerPickerModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, node: &OrgChartNode, forest: &Forest) {
        self.member = Some((node.id.clone(), node.display_name().to_string()));
        self.current_manager = forest.manager_of(&node.id).map(|m| m.id.clone());
        self.query.clear();
        self.candidates = forest
            .manager_candidates(&node.id)
            .into_iter()
            .map(Candidate::from_node)
            .collect();
        self.filtered = self.candidates.clone();
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn is_open(&self) -> bool {
        self.member.is_some()
    }

    fn update_filter(&mut self) {
        let query_lower = self.query.trim().to_lowercase();
        self.filtered = self
            .candidates
            .iter()
            .filter(|c| c.matches(&query_lower))
            .cloned()
            .collect();
    }

    pub fn ui(&mut self, ctx: &egui::Context) -> ManagerPickerResult {
        let Some((member, member_name)) = self.member.clone() else {
            return ManagerPickerResult::None;
        };

        let mut result = ManagerPickerResult::None;
        let mut query_changed = false;

        egui::Window::new("Change manager")
            .collapsible(false)
            .resizable(true)
            .default_width(360.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(RichText::new(format!("Who does {member_name} report to?")).strong());
                ui.separator();

                let response = ui.add(
                    TextEdit::singleline(&mut self.query)
                        .hint_text("Filter by name or title...")
                        .desired_width(ui.available_width()),
                );
                if response.changed() {
                    query_changed = true;
                }
                if !response.has_focus() {
                    response.request_focus();
                }

                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    result = ManagerPickerResult::Closed;
                }

                ui.add_space(6.0);
                ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
                    let none_selected = self.current_manager.is_none();
                    if ui
                        .selectable_label(none_selected, RichText::new("No manager").italics())
                        .clicked()
                    {
                        result = ManagerPickerResult::Selected {
                            member: member.clone(),
                            manager: None,
                        };
                    }

                    if self.filtered.is_empty() && !self.query.is_empty() {
                        ui.label(
                            RichText::new("No matching members")
                                .color(Color32::from_rgb(251, 191, 36)),
                        );
                    }

                    for candidate in &self.filtered {
                        let current = self.current_manager.as_ref() == Some(&candidate.id);
                        let text = match &candidate.title {
                            Some(title) => format!("{} · {}", candidate.name, title),
                            None => candidate.name.clone(),
                        };
                        if ui.selectable_label(current, text).clicked() {
                            result = ManagerPickerResult::Selected {
                                member: member.clone(),
                                manager: Some(candidate.id.clone()),
                            };
                        }
                    }
                });

                ui.separator();
                if ui.button("Cancel").clicked() {
                    result = ManagerPickerResult::Closed;
                }
            });

        if query_changed {
            self.update_filter();
        }
        if result != ManagerPickerResult::None {
            self.close();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use org_chart_core::hierarchy::build_hierarchy;
    use pretty_assertions::assert_eq;

    fn forest() -> Forest {
        build_hierarchy(&[
            OrgChartNode::new("a").with_name("Ada Boss"),
            OrgChartNode::new("b").with_name("Bo Middle").reporting_to("a"),
            OrgChartNode::new("c").with_name("Cy Junior").reporting_to("b"),
            OrgChartNode::new("d").with_name("Di Peer"),
        ])
    }

    #[test]
    fn open_lists_only_safe_managers() {
        let forest = forest();
        let mut picker = ManagerPickerModal::new();
        picker.open(forest.node(&"b".into()).unwrap(), &forest);
        assert!(picker.is_open());
        let ids: Vec<&str> = picker.candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
        assert_eq!(picker.current_manager, Some(MemberId::from("a")));
    }

    #[test]
    fn filter_matches_name_case_insensitively() {
        let forest = forest();
        let mut picker = ManagerPickerModal::new();
        picker.open(forest.node(&"c".into()).unwrap(), &forest);
        picker.query = "PEER".to_string();
        picker.update_filter();
        let names: Vec<&str> = picker.filtered.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Di Peer"]);
    }

    #[test]
    fn closed_picker_does_nothing() {
        let mut picker = ManagerPickerModal::new();
        let ctx = egui::Context::default();
        let mut result = ManagerPickerResult::Closed;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            result = picker.ui(ctx);
        });
        assert_eq!(result, ManagerPickerResult::None);
    }
}
