use eframe::egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2, pos2};

use classviz::geometry::{Path, Point};
use classviz::graph::{LineKind, NodeClass};

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
pub(super) const ARROW_COLOR: Color32 = Color32::from_rgb(241, 146, 94);
pub(super) const ARROW_HOVER_COLOR: Color32 = Color32::from_rgb(246, 206, 104);

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn fade(color: Color32, opacity: f64) -> Color32 {
    color.gamma_multiply(opacity.clamp(0.0, 1.0) as f32)
}

pub(super) fn class_fill(class: NodeClass) -> Color32 {
    match class {
        NodeClass::Root => Color32::from_rgb(28, 34, 42),
        NodeClass::Node => Color32::from_rgb(48, 62, 78),
        NodeClass::Leaf => Color32::from_rgb(103, 150, 196),
        NodeClass::HiddenChildren => Color32::from_rgb(72, 96, 122),
        NodeClass::Focusing => Color32::from_rgb(245, 206, 93),
        NodeClass::Searching => Color32::from_rgb(103, 196, 255),
        NodeClass::DomainNode | NodeClass::DomainLeaf => Color32::from_rgb(98, 190, 138),
        NodeClass::RangeNode | NodeClass::RangeLeaf => Color32::from_rgb(226, 120, 120),
        NodeClass::DomainRangeNode | NodeClass::DomainRangeLeaf => Color32::from_rgb(196, 142, 220),
        NodeClass::Both => Color32::from_rgb(241, 146, 94),
    }
}

pub(super) fn class_stroke(class: NodeClass) -> Stroke {
    match class {
        NodeClass::Root => Stroke::NONE,
        NodeClass::Focusing | NodeClass::Searching => Stroke::new(2.0, Color32::from_gray(245)),
        _ => Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
    }
}

/// Role names and fills shown in the legend window.
pub(super) const LEGEND: [(NodeClass, &str); 8] = [
    (NodeClass::Node, "Class with shown sub classes"),
    (NodeClass::HiddenChildren, "Class with hidden sub classes"),
    (NodeClass::Leaf, "Class without sub classes"),
    (NodeClass::Focusing, "Focused class"),
    (NodeClass::Searching, "Search match"),
    (NodeClass::DomainLeaf, "Property domain"),
    (NodeClass::RangeLeaf, "Property range"),
    (NodeClass::Both, "Related both ways"),
];

pub(super) fn to_pos(origin: Pos2, point: Point) -> Pos2 {
    pos2(origin.x + point.x as f32, origin.y + point.y as f32)
}

pub(super) fn to_point(origin: Pos2, pos: Pos2) -> Point {
    Point::new((pos.x - origin.x) as f64, (pos.y - origin.y) as f64)
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Part of a `length`-long path that a dash offset leaves visible. A
/// positive offset hides the tail, a negative one the head.
pub(super) fn visible_span(length: f64, dash_offset: f64) -> (f64, f64) {
    if dash_offset >= 0.0 {
        (0.0, (length - dash_offset).max(0.0))
    } else {
        ((-dash_offset).min(length), length)
    }
}

/// Cuts the `[from, to]` arc-length window out of a polyline.
pub(super) fn clip_polyline(points: &[Point], from: f64, to: f64) -> Vec<Point> {
    let mut clipped = Vec::new();
    let mut travelled = 0.0;
    for pair in points.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let segment = start.distance(end);
        let (seg_from, seg_to) = (travelled, travelled + segment);
        travelled = seg_to;
        if seg_to < from || seg_from > to || segment == 0.0 {
            continue;
        }

        let at = |distance: f64| {
            let t = ((distance - seg_from) / segment).clamp(0.0, 1.0);
            Point::new(start.x + (end.x - start.x) * t, start.y + (end.y - start.y) * t)
        };
        if clipped.is_empty() {
            clipped.push(at(from.max(seg_from)));
        }
        clipped.push(at(to.min(seg_to)));
    }
    clipped
}

pub(super) fn path_polylines(path: &Path, origin: Pos2) -> Vec<Vec<Pos2>> {
    path.flatten(24)
        .into_iter()
        .map(|line| line.into_iter().map(|point| to_pos(origin, point)).collect())
        .collect()
}

/// Filled triangle pointing at `tip`, coming from `from`.
pub(super) fn arrow_head(painter: &Painter, tip: Pos2, from: Pos2, size: f32, color: Color32) {
    let direction = (tip - from).normalized();
    if !direction.is_finite() || direction == Vec2::ZERO {
        return;
    }
    let normal = direction.rot90() * (size * 0.5);
    let base = tip - direction * size;
    painter.add(Shape::convex_polygon(
        vec![tip, base + normal, base - normal],
        color,
        Stroke::NONE,
    ));
}

pub(super) fn draw_relation(painter: &Painter, polyline: &[Pos2], kind: LineKind, color: Color32) {
    if polyline.len() < 2 {
        return;
    }
    let stroke = Stroke::new(2.0, color);
    if kind == LineKind::Same {
        painter.extend(Shape::dashed_line(polyline, stroke, 6.0, 4.0));
        return;
    }
    painter.add(Shape::line(polyline.to_vec(), stroke));

    let last = polyline.len() - 1;
    if kind.arrow_at_end() {
        arrow_head(painter, polyline[last], polyline[last - 1], 10.0, color);
    }
    if kind.arrow_at_start() {
        arrow_head(painter, polyline[0], polyline[1], 10.0, color);
    }
}

/// Distance from `point` to the closest segment of `polyline`.
pub(super) fn distance_to_polyline(point: Pos2, polyline: &[Pos2]) -> f32 {
    polyline
        .windows(2)
        .map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            let ab = b - a;
            let length_sq = ab.length_sq();
            if length_sq <= f32::EPSILON {
                return point.distance(a);
            }
            let t = ((point - a).dot(ab) / length_sq).clamp(0.0, 1.0);
            point.distance(a + ab * t)
        })
        .fold(f32::INFINITY, f32::min)
}
