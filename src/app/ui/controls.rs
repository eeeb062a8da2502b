use eframe::egui::{self, Key, RichText, Ui};

use classviz::config::MIN_SEARCH_QUERY_BYTES;
use classviz::state::Action;
use classviz::util::format_count;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        let mut actions = Vec::new();

        ui.heading("Search");
        ui.add_space(4.0);
        self.draw_search(ui, &mut actions);

        ui.separator();
        ui.heading("Properties");
        ui.add_space(4.0);
        self.draw_properties(ui, &mut actions);

        for action in actions {
            self.dispatch(action);
        }
    }

    fn draw_search(&mut self, ui: &mut Ui, actions: &mut Vec<Action>) {
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.query)
                .hint_text("Class label or URI")
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            self.search_debounce.schedule(self.query.clone(), self.now);
        }

        if response.has_focus() {
            ui.input(|input| {
                if input.key_pressed(Key::ArrowDown) {
                    actions.push(Action::NextCandidate);
                }
                if input.key_pressed(Key::ArrowUp) {
                    actions.push(Action::PrevCandidate);
                }
                if input.key_pressed(Key::Escape) {
                    actions.push(Action::HideCandidate);
                }
            });
        }
        if response.lost_focus()
            && ui.input(|input| input.key_pressed(Key::Enter))
            && let Some(candidate) = self.view.search.selected_candidate()
        {
            actions.push(Action::ConfirmCandidate(candidate.uri.clone()));
        }

        let query_len = self.query.trim().len();
        if query_len > 0 && query_len < MIN_SEARCH_QUERY_BYTES {
            ui.small(format!("Type at least {MIN_SEARCH_QUERY_BYTES} characters."));
        }

        let candidates = &self.view.search.candidates;
        if !candidates.is_empty() {
            let selected = self.view.search.selected;
            egui::ScrollArea::vertical()
                .id_salt("search_candidates")
                .max_height(260.0)
                .auto_shrink([false, true])
                .show_rows(ui, 22.0, candidates.len(), |ui, row_range| {
                    for index in row_range {
                        let Some(candidate) = candidates.get(index) else {
                            continue;
                        };
                        let text = match candidate.entities {
                            Some(count) => format!("{}  ({})", candidate.label, format_count(count)),
                            None => candidate.label.clone(),
                        };
                        let row = ui
                            .selectable_label(selected == Some(index), text)
                            .on_hover_text(candidate.uri.as_str());
                        if row.clicked() {
                            actions.push(Action::ConfirmCandidate(candidate.uri.clone()));
                        } else if row.hovered() && selected != Some(index) {
                            actions.push(Action::SelectCandidate(index));
                        }
                    }
                });
        } else if self.view.search.query.as_deref().is_some_and(|query| query.trim().len() >= MIN_SEARCH_QUERY_BYTES) {
            ui.small("No matching classes.");
        }

        if let Some(uri) = &self.view.detail.searching_uri {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(format!("Showing every occurrence of {}", self.class_label(uri)));
                if ui.small_button("Clear").clicked() {
                    actions.push(Action::FocusCircle { key: None, uri: None });
                }
            });
        }
    }

    fn draw_properties(&self, ui: &mut Ui, actions: &mut Vec<Action>) {
        if self.content.properties.is_empty() {
            ui.label("This dataset declares no properties.");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("property_list")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (index, property) in self.content.properties.iter().enumerate() {
                    let open = self.view.property.is_open(index);
                    let header = format!("{}  ({})", property.uri, format_count(property.triples));
                    if ui.selectable_label(open, RichText::new(header).strong()).clicked() {
                        actions.push(if open {
                            Action::CloseProperty(index)
                        } else {
                            Action::ShowProperty(index)
                        });
                    }
                    if !open {
                        continue;
                    }

                    ui.indent(("property_relations", index), |ui| {
                        for (relation_index, relation) in property.class_relations.iter().enumerate() {
                            let selected = self.view.property.selected_class == (Some(index), Some(relation_index));
                            let subject = relation
                                .subject_class
                                .as_deref()
                                .map_or_else(|| "(any)".to_owned(), |uri| self.class_label(uri));
                            let object = match (&relation.object_class, &relation.object_datatype) {
                                (Some(uri), _) => self.class_label(uri),
                                (None, Some(datatype)) => datatype.clone(),
                                (None, None) => "(any)".to_owned(),
                            };
                            let text = format!("{subject} → {object}  ({})", format_count(relation.triples));
                            if ui.selectable_label(selected, text).clicked() {
                                actions.push(Action::SelectPropertyClass(Some(index), Some(relation_index)));
                                actions.push(Action::ShowPropertyClass {
                                    uri: Some(property.uri.clone()),
                                    domain: relation.subject_class.clone(),
                                    range: relation.object_class.clone(),
                                });
                            }
                        }
                    });
                }
            });
    }
}
