use eframe::egui::{self, Align2, Color32, Context, FontId, Painter, Pos2, Rect, Sense, Stroke, Ui, vec2};

use classviz::geometry::Point;
use classviz::graph::NodeClass;
use classviz::label::preferred_label;
use classviz::layout::ROOT_KEY;
use classviz::state::{Action, tooltip_position};
use classviz::util::format_count;

use super::super::ViewModel;
use super::super::render_utils::{
    ARROW_COLOR, ARROW_HOVER_COLOR, BACKGROUND, blend_color, circle_visible, class_fill, class_stroke, distance_to_polyline,
    draw_relation, path_polylines, to_point, to_pos,
};

const TOOLTIP_WIDTH: f64 = 240.0;
const TOOLTIP_HEIGHT: f64 = 64.0;
const LINE_HOVER_DISTANCE: f32 = 6.0;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.canvas_rect = rect;
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, BACKGROUND);

        self.handle_canvas_resize(rect);
        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);
        self.track_hover(&response);

        let origin = rect.min;
        let mut pending = Vec::new();

        self.paint_circles(&painter, rect);
        self.hovered_line = self.paint_relations(&painter, origin, response.hover_pos());
        self.paint_labels(ui, &painter, origin, &mut pending);
        self.paint_tooltip(ui.ctx(), origin);
        self.paint_predicates(ui.ctx(), origin);

        if response.clicked()
            && let Some(pointer) = response.interact_pointer_pos()
        {
            pending.push(self.click_action(to_point(origin, pointer)));
        }
        self.handle_context_menu(&response, origin);

        for action in pending {
            self.dispatch(action);
        }
    }

    fn paint_circles(&self, painter: &Painter, rect: Rect) {
        let origin = rect.min;
        let hovered = self.view.tooltip.uri.as_deref();
        for circle in &self.graph.frame().circles {
            if circle.hidden {
                continue;
            }
            let center = to_pos(origin, circle.center);
            let radius = circle.radius as f32;
            if !circle_visible(rect, center, radius) {
                continue;
            }

            let mut fill = class_fill(circle.class);
            if hovered.is_some_and(|uri| self.graph.node(circle.key).is_some_and(|node| node.uri == uri)) {
                fill = blend_color(fill, Color32::WHITE, 0.2);
            }
            painter.circle(center, radius, fill, class_stroke(circle.class));
            if circle.highlighted {
                painter.circle_stroke(center, radius + 2.0, Stroke::new(1.5, ARROW_HOVER_COLOR));
            }
        }
    }

    /// Paints the arrows and returns the one under the pointer.
    fn paint_relations(&self, painter: &Painter, origin: Pos2, pointer: Option<Pos2>) -> Option<usize> {
        let mut hovered = None;
        for (index, line) in self.graph.frame().lines.iter().enumerate() {
            let polylines = path_polylines(&line.path, origin);
            let near = pointer.is_some_and(|pointer| {
                polylines
                    .iter()
                    .any(|polyline| distance_to_polyline(pointer, polyline) <= LINE_HOVER_DISTANCE)
            });
            if near && line.kind.carries_predicates() {
                hovered = Some(index);
            }

            let color = if near { ARROW_HOVER_COLOR } else { ARROW_COLOR };
            for polyline in &polylines {
                draw_relation(painter, polyline, line.kind, color);
            }
        }
        hovered
    }

    fn paint_labels(&self, ui: &Ui, painter: &Painter, origin: Pos2, pending: &mut Vec<Action>) {
        for label in &self.graph.frame().labels {
            let Some(node) = self.graph.node(label.key) else {
                continue;
            };
            let text = self.class_label(&node.uri);
            let align = if label.on_top {
                Align2::CENTER_TOP
            } else {
                Align2::CENTER_CENTER
            };
            let size = if label.emphasized { 15.0 } else { 12.0 };
            let color = match label.class {
                NodeClass::Focusing | NodeClass::Searching => Color32::from_gray(20),
                _ => Color32::from_gray(238),
            };
            let text_rect = painter.text(
                to_pos(origin, label.position),
                align,
                text,
                FontId::proportional(size),
                color,
            );

            if label.tree_button {
                let button_rect = painter
                    .text(
                        text_rect.center_bottom() + vec2(0.0, 6.0),
                        Align2::CENTER_TOP,
                        "Show tree",
                        FontId::proportional(11.0),
                        ARROW_HOVER_COLOR,
                    )
                    .expand(3.0);
                painter.rect_stroke(
                    button_rect,
                    3.0,
                    Stroke::new(1.0, ARROW_HOVER_COLOR),
                    egui::StrokeKind::Outside,
                );
                let button = ui.interact(button_rect, ui.id().with(("tree_button", label.key)), Sense::click());
                if button.on_hover_text("Open the inheritance tree of this class").clicked() {
                    pending.push(Action::ShowTree);
                }
            }
        }
    }

    fn paint_tooltip(&self, ctx: &Context, origin: Pos2) {
        let (Some(uri), Some(anchor)) = (&self.view.tooltip.uri, &self.view.tooltip.anchor) else {
            return;
        };
        let placement = tooltip_position(anchor, TOOLTIP_WIDTH, TOOLTIP_HEIGHT);
        let entities = self.content.classes.get(uri).and_then(|detail| detail.entities);

        egui::Area::new(egui::Id::new("class_tooltip"))
            .order(egui::Order::Tooltip)
            .interactable(false)
            .fixed_pos(to_pos(origin, Point::new(placement.x, placement.y)))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_width(TOOLTIP_WIDTH as f32 - 16.0);
                    ui.strong(self.class_label(uri));
                    ui.small(uri.as_str());
                    if let Some(count) = entities {
                        ui.label(format!("{} instances", format_count(count)));
                    }
                });
            });
    }

    fn paint_predicates(&self, ctx: &Context, origin: Pos2) {
        let Some(line) = self.hovered_line.and_then(|index| self.graph.frame().lines.get(index)) else {
            return;
        };
        let Some(anchor) = line.anchor() else {
            return;
        };
        let predicates = match self.graph.triple_for(line) {
            Some(triple) => triple.predicates,
            None => self.graph.predicates_for(line.partner),
        };
        if predicates.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("predicate_popup"))
            .order(egui::Order::Tooltip)
            .interactable(false)
            .pivot(Align2::CENTER_BOTTOM)
            .fixed_pos(to_pos(origin, anchor) - vec2(0.0, 8.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    for predicate in &predicates {
                        ui.label(predicate.as_str());
                    }
                });
            });
    }

    /// Clicking a circle focuses it, clicking it again or the background
    /// returns to the overview.
    fn click_action(&self, point: Point) -> Action {
        let hit = self
            .graph
            .frame()
            .hit_test(point)
            .filter(|circle| circle.key != ROOT_KEY)
            .and_then(|circle| self.graph.node(circle.key));
        let property_view = self.view.detail.property_class.is_active();
        let focused = self.view.detail.focusing_uri.as_ref().and(self.graph.target_key());

        let (key, uri) = match hit {
            Some(node) if focused != Some(node.key) => {
                (Some(node.key), Some(node.uri.clone()))
            }
            _ => (None, None),
        };
        if property_view {
            Action::FocusPropertyClass { key, uri }
        } else {
            Action::FocusCircle { key, uri }
        }
    }

    pub(in crate::app) fn class_label(&self, uri: &str) -> String {
        preferred_label(uri, &self.config.locale, &self.content.classes, &self.content.labels)
    }
}
