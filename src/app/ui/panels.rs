use eframe::egui::{self, Align, Context, Layout, Sense, Slider, Stroke, vec2};

use classviz::state::Action;
use classviz::util::format_count;

use super::super::ViewModel;
use super::super::render_utils::{ARROW_HOVER_COLOR, LEGEND, class_fill, class_stroke};

impl ViewModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        self.advance(ctx);

        let mut actions = Vec::new();
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui, &mut actions));

        if !self.view.ui.property_pane.is_hidden() {
            egui::SidePanel::left("controls")
                .resizable(true)
                .default_width(350.0)
                .show(ctx, |ui| self.draw_controls(ui));
        }

        if !self.view.ui.detail_pane.is_hidden() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(360.0)
                .show(ctx, |ui| self.draw_details(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));

        self.draw_legend(ctx, &mut actions);
        self.draw_filter(ctx, &mut actions);
        self.draw_tree_window(ctx);

        for action in actions {
            self.dispatch(action);
        }
    }

    fn draw_top_bar(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.horizontal(|ui| {
            ui.heading("classviz");
            ui.separator();
            if let Some(meta) = &self.content.meta_data {
                if let Some(classes) = meta.classes {
                    ui.label(format!("classes: {}", format_count(classes)));
                }
                if let Some(properties) = meta.properties {
                    ui.label(format!("properties: {}", format_count(properties)));
                }
                if let Some(triples) = meta.triples {
                    ui.label(format!("triples: {}", format_count(triples)));
                }
                if let Some(date) = &meta.crawl_date {
                    ui.label(format!("crawled: {date}"));
                }
            }
            if let Some(endpoint) = self.content.endpoint() {
                ui.hyperlink_to(endpoint, endpoint);
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.selectable_label(!self.view.ui.detail_pane.is_hidden(), "Details").clicked() {
                    actions.push(Action::HideDetailPane);
                }
                if ui.selectable_label(!self.view.ui.property_pane.is_hidden(), "Search").clicked() {
                    actions.push(Action::HidePropertyPane);
                }
                if ui.selectable_label(self.view.filter.showing_conditions, "Filter").clicked() {
                    actions.push(Action::ShowConditions);
                }
                if ui.selectable_label(self.view.legend.showing_legend, "Legend").clicked() {
                    actions.push(Action::ShowLegend);
                }
            });
        });
    }

    fn draw_legend(&self, ctx: &Context, actions: &mut Vec<Action>) {
        if !self.view.legend.showing_legend {
            return;
        }

        let mut open = true;
        egui::Window::new("Legend")
            .open(&mut open)
            .resizable(false)
            .default_pos([24.0, 96.0])
            .show(ctx, |ui| {
                for (class, description) in LEGEND {
                    ui.horizontal(|ui| {
                        let (rect, _) = ui.allocate_exact_size(vec2(16.0, 16.0), Sense::hover());
                        ui.painter()
                            .circle(rect.center(), 7.0, class_fill(class), class_stroke(class));
                        ui.label(description);
                    });
                }
                ui.horizontal(|ui| {
                    let (rect, _) = ui.allocate_exact_size(vec2(16.0, 16.0), Sense::hover());
                    ui.painter().circle_stroke(
                        rect.center(),
                        7.0,
                        Stroke::new(1.5, ARROW_HOVER_COLOR),
                    );
                    ui.label("Highlighted (kept visible when small)");
                });
            });

        if !open {
            actions.push(Action::ShowLegend);
        }
    }

    fn draw_filter(&mut self, ctx: &Context, actions: &mut Vec<Action>) {
        if !self.view.filter.showing_conditions {
            return;
        }

        let max_entities = self
            .content
            .classes
            .values()
            .filter_map(|detail| detail.entities)
            .max()
            .unwrap_or(1)
            .max(2);

        let mut open = true;
        let draft = &mut self.filter_draft;
        let applied = self.view.filter.lower_limit_of_class_entities;
        egui::Window::new("Filter")
            .open(&mut open)
            .resizable(false)
            .default_pos([24.0, 360.0])
            .show(ctx, |ui| {
                ui.label("Hide classes without sub classes that have fewer instances than:");
                let response = ui.add(Slider::new(&mut *draft, 1..=max_entities).logarithmic(true));
                let settled = response.drag_stopped() || (response.changed() && !response.dragged());
                if settled && *draft != applied {
                    actions.push(Action::FilterClasses(*draft));
                }
                if applied > 1 && ui.button("Show every class").clicked() {
                    *draft = 1;
                    actions.push(Action::FilterClasses(1));
                }
            });

        if !open {
            actions.push(Action::ShowConditions);
        }
    }
}
