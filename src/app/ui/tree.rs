use eframe::egui::{self, Align2, Color32, Context, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, Ui, vec2};

use classviz::geometry::Point;
use classviz::layout::NodeKey;
use classviz::state::Action;
use classviz::tree::{GlyphCircle, GlyphRole, InfoLevel, StrokeStyle, TreeConnector};

use super::super::ViewModel;
use super::super::render_utils::{BACKGROUND, clip_polyline, fade, to_pos, visible_span};

const TREE_PADDING: f32 = 40.0;
const GLYPH_RADIUS: f32 = 7.0;

enum TreeToggle {
    Depth(usize),
    Children(NodeKey),
}

fn role_color(role: GlyphRole) -> Color32 {
    match role {
        GlyphRole::Focusing => Color32::from_rgb(245, 206, 93),
        GlyphRole::Parent => Color32::from_rgb(241, 146, 94),
        GlyphRole::MultipleInheritance => Color32::from_rgb(196, 142, 220),
        GlyphRole::Normal => Color32::from_rgb(103, 150, 196),
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_tree_window(&mut self, ctx: &Context) {
        if !self.view.detail.show_tree {
            return;
        }

        let mut open = true;
        let mut actions = Vec::new();
        let mut toggles = Vec::new();
        let title = self
            .tree
            .focusing_node()
            .map_or_else(|| "Inheritance tree".to_owned(), |node| self.class_label(&node.uri));

        egui::Window::new("Inheritance tree")
            .id(egui::Id::new("inheritance_tree"))
            .open(&mut open)
            .default_size([760.0, 540.0])
            .show(ctx, |ui| {
                ui.label(egui::RichText::new(title).strong());
                egui::ScrollArea::both()
                    .id_salt("tree_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| self.draw_tree_scene(ui, &mut actions, &mut toggles));
            });

        if !open {
            actions.push(Action::HideTree);
        }
        for toggle in toggles {
            match toggle {
                TreeToggle::Depth(depth) => self.tree.toggle_depth(depth, self.now),
                TreeToggle::Children(key) => self.tree.toggle_children(key, self.now),
            }
        }
        if self.tree.is_animating() {
            ctx.request_repaint();
        }
        for action in actions {
            self.dispatch(action);
        }
    }

    fn draw_tree_scene(&self, ui: &mut Ui, actions: &mut Vec<Action>, toggles: &mut Vec<TreeToggle>) {
        let scene = self.tree.scene();
        let (width, height) = scene.extent();
        let size = vec2(width as f32 + TREE_PADDING * 4.0, height as f32 + TREE_PADDING);
        let (rect, _) = ui.allocate_exact_size(size.max(ui.available_size()), Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, BACKGROUND);
        let origin = rect.min + vec2(TREE_PADDING, 0.0);

        for info in &scene.infos {
            let heading = match info.level {
                InfoLevel::Parent => "Super classes",
                InfoLevel::Child => "Sub classes",
                InfoLevel::Grandchild => "Their sub classes",
            };
            let at = to_pos(origin, Point::new(info.x, 12.0));
            let text_rect = painter.text(
                at,
                Align2::CENTER_TOP,
                format!("{heading}: {}", info.count),
                FontId::proportional(12.0),
                Color32::from_gray(220),
            );
            if let Some(on) = info.toggle {
                let button = switch(ui, &painter, text_rect.center_bottom() + vec2(0.0, 10.0), on, ("tree_level", info.x as i64));
                if button {
                    toggles.push(TreeToggle::Depth(info.level.depth().unsigned_abs()));
                }
            }
        }

        for (index, connector) in scene.connectors.iter().enumerate() {
            if !self.tree.is_connector_drawn(index) {
                continue;
            }
            let Some(glyph) = scene.glyphs.get(connector.glyph) else {
                continue;
            };
            let y = self.tree.glyph_y(connector.glyph).unwrap_or(glyph.y);
            let base = to_pos(origin, Point::new(glyph.x, y));
            let opacity = self.tree.glyph_opacity(connector.glyph);
            self.paint_connector(&painter, base, index, connector, fade(Color32::from_gray(170), opacity));
        }

        for (index, glyph) in scene.glyphs.iter().enumerate() {
            if !self.tree.is_glyph_drawn(index) {
                continue;
            }
            let y = self.tree.glyph_y(index).unwrap_or(glyph.y);
            let center = to_pos(origin, Point::new(glyph.x, y));
            let opacity = self.tree.glyph_opacity(index);
            let color = fade(role_color(glyph.role), opacity);

            match glyph.circle {
                GlyphCircle::HiddenChildren => painter.circle_filled(center, GLYPH_RADIUS, color),
                GlyphCircle::Leaf => painter.circle(center, GLYPH_RADIUS, BACKGROUND, Stroke::new(2.0, color)),
            };
            if glyph.multiple_inheritance_source {
                painter.extend(Shape::dashed_line(
                    &circle_outline(center, GLYPH_RADIUS + 4.0),
                    Stroke::new(1.0, color),
                    3.0,
                    3.0,
                ));
            }

            let mut hit = Rect::from_center_size(center, vec2(GLYPH_RADIUS * 2.0, GLYPH_RADIUS * 2.0));
            if glyph.shows_label() {
                let label_rect = painter.text(
                    center + vec2(GLYPH_RADIUS + 6.0, 0.0),
                    Align2::LEFT_CENTER,
                    self.class_label(&glyph.uri),
                    FontId::proportional(13.0),
                    fade(Color32::from_gray(235), opacity),
                );
                hit = hit.union(label_rect);
            }

            if glyph.removing {
                continue;
            }
            let response = ui
                .interact(hit, ui.id().with(("tree_glyph", index)), Sense::click())
                .on_hover_text(glyph.uri.as_str());
            if response.clicked() && glyph.role != GlyphRole::Focusing {
                actions.push(Action::FocusCircle {
                    key: Some(glyph.key),
                    uri: Some(glyph.uri.clone()),
                });
            }
            if let Some(on) = glyph.child_toggle
                && switch(ui, &painter, center + vec2(0.0, GLYPH_RADIUS + 12.0), on, ("tree_children", index as i64))
            {
                toggles.push(TreeToggle::Children(glyph.key));
            }
        }
    }

    fn paint_connector(&self, painter: &Painter, base: Pos2, index: usize, connector: &TreeConnector, color: Color32) {
        let polylines = connector.path.flatten(16);
        let stroke = Stroke::new(1.5, color);

        match connector.style {
            StrokeStyle::Solid => {
                let (from, to) = visible_span(connector.length, self.tree.connector_dash_offset(index));
                let mut travelled = 0.0;
                for line in &polylines {
                    let length: f64 = line.windows(2).map(|pair| pair[0].distance(pair[1])).sum();
                    let clipped = clip_polyline(line, from - travelled, to - travelled);
                    travelled += length;
                    if clipped.len() >= 2 {
                        painter.add(Shape::line(
                            clipped.into_iter().map(|point| to_pos(base, point)).collect(),
                            stroke,
                        ));
                    }
                }
            }
            StrokeStyle::Dotted | StrokeStyle::Dashed => {
                for line in &polylines {
                    let points: Vec<Pos2> = line.iter().map(|point| to_pos(base, *point)).collect();
                    if connector.style == StrokeStyle::Dotted {
                        painter.extend(Shape::dotted_line(&points, color, 6.0, 1.2));
                    } else {
                        painter.extend(Shape::dashed_line(&points, stroke, 6.0, 4.0));
                    }
                }
            }
        }
    }
}

/// Small on/off pill; returns `true` when clicked.
fn switch(ui: &Ui, painter: &Painter, center: Pos2, on: bool, id: (&str, i64)) -> bool {
    let rect = Rect::from_center_size(center, vec2(26.0, 12.0));
    let track = if on {
        Color32::from_rgb(98, 190, 138)
    } else {
        Color32::from_gray(90)
    };
    painter.rect_filled(rect, 6.0, track);
    let knob = if on { rect.right_center() - vec2(6.0, 0.0) } else { rect.left_center() + vec2(6.0, 0.0) };
    painter.circle_filled(knob, 4.5, Color32::from_gray(240));

    ui.interact(rect, ui.id().with(id), Sense::click())
        .on_hover_text(if on { "Hide sub classes" } else { "Show sub classes" })
        .clicked()
}

fn circle_outline(center: Pos2, radius: f32) -> Vec<Pos2> {
    (0..=32)
        .map(|step| {
            let angle = step as f32 / 32.0 * std::f32::consts::TAU;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect()
}
