use eframe::egui::{self, Pos2, Rect, Ui, Vec2};

use classviz::graph::UpdateOutcome;
use classviz::label::reference_url;
use classviz::layout::ROOT_KEY;
use classviz::sparql::{class_instances_query, triples_query};
use classviz::state::{Action, AnchorRect, DetailState};

use super::super::render_utils::to_point;
use super::super::{ContextTarget, ViewModel};

impl ViewModel {
    /// Keeps the viewport in step with the canvas; refits unless the user
    /// has zoomed by hand.
    pub(in crate::app) fn handle_canvas_resize(&mut self, rect: Rect) {
        let (width, height) = (rect.width() as f64, rect.height() as f64);
        if self.view.ui.width == Some(width) && self.view.ui.height == Some(height) {
            return;
        }

        if self.graph.on_resize(width, height, width.min(height)) {
            let detail = DetailState {
                show_tree: false,
                ..self.view.detail.clone()
            };
            if let UpdateOutcome::Dispatch(action) = self.graph.update(&detail, false, self.now) {
                self.dispatch(action);
            }
            self.applied_detail = Some(detail);
        }
        self.dispatch(Action::Resize { width, height });
    }

    pub(in crate::app) fn handle_graph_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let anchor = to_point(rect.min, pointer);
        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.graph.zoom_at(zoom_factor as f64, anchor.x, anchor.y);
        self.after_camera_moved();
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if !response.dragged() {
            return;
        }
        let delta = response.drag_delta();
        if delta != Vec2::ZERO {
            self.graph.pan_by(delta.x as f64, delta.y as f64);
            self.after_camera_moved();
        }
    }

    fn after_camera_moved(&mut self) {
        self.settle_debounce.schedule((), self.now);
        if self.view.tooltip.uri.is_some() {
            self.dispatch(Action::HideTooltip);
        }
    }

    pub(in crate::app) fn track_hover(&mut self, response: &egui::Response) {
        match response.hover_pos() {
            Some(pointer) if response.ctx.input(|input| input.pointer.is_moving()) => {
                self.hover_debounce.schedule(pointer, self.now);
            }
            Some(_) => {}
            None => {
                self.hover_debounce.cancel();
                if self.view.tooltip.uri.is_some() {
                    self.dispatch(Action::HideTooltip);
                }
            }
        }
    }

    /// Shows the tooltip of the circle under `pointer`, or hides it.
    pub(in crate::app) fn evaluate_hover(&mut self, pointer: Pos2) {
        let point = to_point(self.canvas_rect.min, pointer);
        let hit = self
            .graph
            .frame()
            .hit_test(point)
            .filter(|circle| circle.key != ROOT_KEY)
            .and_then(|circle| {
                let node = self.graph.node(circle.key)?;
                Some((node.uri.clone(), circle.center, circle.radius))
            });

        let action = match hit {
            Some((uri, _, _)) if self.view.tooltip.uri.as_deref() == Some(uri.as_str()) => return,
            Some((uri, center, radius)) => Action::ShowTooltip {
                uri,
                anchor: AnchorRect::around(center.x, center.y, radius),
            },
            None if self.view.tooltip.uri.is_some() => Action::HideTooltip,
            None => return,
        };
        self.dispatch(action);
    }

    pub(in crate::app) fn handle_context_menu(&mut self, response: &egui::Response, origin: Pos2) {
        if response.secondary_clicked() {
            self.context_target = response
                .interact_pointer_pos()
                .and_then(|pointer| self.context_target_at(to_point(origin, pointer)));
        }
        let Some(target) = self.context_target.clone() else {
            return;
        };

        response.context_menu(|ui| self.draw_context_menu(ui, &target));
    }

    fn context_target_at(&self, point: classviz::geometry::Point) -> Option<ContextTarget> {
        if let Some(line) = self.hovered_line.and_then(|index| self.graph.frame().lines.get(index)) {
            return self.graph.triple_for(line).map(ContextTarget::Relation);
        }
        let circle = self
            .graph
            .frame()
            .hit_test(point)
            .filter(|circle| circle.key != ROOT_KEY)?;
        Some(ContextTarget::Class(self.graph.node(circle.key)?.uri.clone()))
    }

    fn draw_context_menu(&self, ui: &mut Ui, target: &ContextTarget) {
        let expand = |uri: &str| reference_url(uri, &self.content.prefixes).unwrap_or_else(|| uri.to_owned());
        if let Some(endpoint) = self.content.endpoint() {
            ui.small(format!("Endpoint: {endpoint}"));
        }

        match target {
            ContextTarget::Class(uri) => {
                ui.strong(self.class_label(uri));
                if ui.button("Copy instance query").clicked() {
                    ui.ctx().copy_text(class_instances_query(&expand(uri)));
                    ui.close();
                }
                if let Some(url) = reference_url(uri, &self.content.prefixes) {
                    ui.hyperlink_to("Open class URI", url);
                }
            }
            ContextTarget::Relation(triple) => {
                ui.strong(format!(
                    "{} → {}",
                    self.class_label(&triple.subject),
                    self.class_label(&triple.object)
                ));
                if ui.button("Copy triple query").clicked() {
                    let predicates: Vec<String> = triple.predicates.iter().map(|predicate| expand(predicate)).collect();
                    ui.ctx()
                        .copy_text(triples_query(&expand(&triple.subject), &predicates, &expand(&triple.object)));
                    ui.close();
                }
            }
        }
    }
}
