use eframe::egui::{self, RichText, Ui};

use classviz::label::reference_url;
use classviz::layout::NodeKey;
use classviz::state::{Action, Relation};
use classviz::util::format_count;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let mut actions = Vec::new();
        ui.heading("Class Details");
        ui.add_space(6.0);

        if self.view.detail.property_class.is_active() {
            self.draw_property_summary(ui, &mut actions);
            ui.separator();
        }

        match self.view.detail.focusing_uri.clone() {
            Some(uri) => self.draw_class(ui, &uri, &mut actions),
            None if self.view.detail.property_class.is_active() => {
                ui.label("Click a domain or range class to inspect it.");
            }
            None => {
                ui.label("Click a circle, pick a search result or a property relation.");
            }
        }

        for action in actions {
            self.dispatch(action);
        }
    }

    fn draw_property_summary(&self, ui: &mut Ui, actions: &mut Vec<Action>) {
        let property = &self.view.detail.property_class;
        if let Some(uri) = &property.uri {
            ui.label(RichText::new(uri.as_str()).strong());
        }
        let side = |uri: &Option<String>| uri.as_deref().map_or_else(|| "(any)".to_owned(), |uri| self.class_label(uri));
        ui.label(format!("Domain: {}", side(&property.domain)));
        ui.label(format!("Range: {}", side(&property.range)));
        if ui.button("Leave property view").clicked() {
            actions.push(Action::SelectPropertyClass(None, None));
            actions.push(Action::ShowPropertyClass {
                uri: None,
                domain: None,
                range: None,
            });
        }
    }

    fn draw_class(&self, ui: &mut Ui, uri: &str, actions: &mut Vec<Action>) {
        let detail = self.content.classes.get(uri);

        ui.label(RichText::new(self.class_label(uri)).strong());
        match reference_url(uri, &self.content.prefixes) {
            Some(url) => {
                ui.hyperlink_to(uri, url);
            }
            None => {
                ui.small(uri);
            }
        }
        if let Some(count) = detail.and_then(|detail| detail.entities) {
            ui.label(format!("Instances: {}", format_count(count)));
        }

        self.draw_breadcrumbs(ui, actions);

        if let Some(detail) = detail
            && !detail.parents().is_empty()
        {
            ui.separator();
            let heading = if detail.has_multiple_inheritance() {
                "Super classes (multiple inheritance)"
            } else {
                "Super classes"
            };
            ui.label(RichText::new(heading).strong());
            for parent in detail.parents() {
                if ui.link(self.class_label(parent)).on_hover_text(parent.as_str()).clicked() {
                    actions.push(Action::ShowParentClassesUri(Some(parent.clone())));
                }
            }
        }

        ui.separator();
        let show_tree = self.view.detail.show_tree;
        if ui.selectable_label(show_tree, "Inheritance tree").clicked() {
            actions.push(if show_tree { Action::HideTree } else { Action::ShowTree });
        }

        ui.separator();
        ui.label(RichText::new("Relations").strong());
        ui.horizontal(|ui| {
            let detail_state = &self.view.detail;
            if ui.selectable_label(detail_state.show_right_hand, "As subject").clicked() {
                actions.push(Action::ShowRightHandSide);
            }
            if ui.selectable_label(detail_state.show_left_hand, "As object").clicked() {
                actions.push(Action::ShowLeftHandSide);
            }
            if ui.button("All").clicked() {
                actions.push(Action::ShowAllAssociated);
            }
        });

        let Some(detail) = detail else {
            return;
        };
        egui::ScrollArea::vertical()
            .id_salt("relation_list")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if self.view.detail.show_right_hand {
                    for pair in detail.rhs() {
                        let (predicate, object) = pair;
                        let text = format!("{predicate} → {}", self.class_label(object));
                        self.relation_row(ui, pair, text, actions);
                    }
                }
                if self.view.detail.show_left_hand {
                    for pair in detail.lhs() {
                        let (subject, predicate) = pair;
                        let text = format!("{} → {predicate}", self.class_label(subject));
                        self.relation_row(ui, pair, text, actions);
                    }
                }
            });
    }

    fn relation_row(&self, ui: &mut Ui, pair: &Relation, text: String, actions: &mut Vec<Action>) {
        let selected = self.view.detail.showing_relation.as_ref() == Some(pair);
        if ui.selectable_label(selected, text).clicked() {
            actions.push(Action::ShowRelation((!selected).then(|| pair.clone())));
        }
    }

    fn draw_breadcrumbs(&self, ui: &mut Ui, actions: &mut Vec<Action>) {
        let crumbs: Vec<NodeKey> = self.graph.breadcrumbs(self.graph.target_key());
        if crumbs.len() < 2 {
            return;
        }

        let property_view = self.view.detail.property_class.is_active();
        ui.horizontal_wrapped(|ui| {
            for (position, key) in crumbs.iter().enumerate() {
                let Some(node) = self.graph.node(*key) else {
                    continue;
                };
                if position > 0 {
                    ui.label("›");
                }
                if ui.link(self.class_label(&node.uri)).clicked() {
                    let (key, uri) = (Some(node.key), Some(node.uri.clone()));
                    actions.push(if property_view {
                        Action::FocusPropertyClass { key, uri }
                    } else {
                        Action::FocusCircle { key, uri }
                    });
                }
            }
        });
    }
}
