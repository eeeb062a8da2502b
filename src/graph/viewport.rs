use crate::config::{HIGHLIGHTING_MIN_SIZE, SHOW_TEXT_MIN_CIRCLE_DIAMETER};
use crate::geometry::Point;
use crate::layout::LayoutNode;

/// Share of the canvas a lone leaf occupies after fitting.
const LONE_LEAF_RATIO: f64 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraAxis {
    Scale,
    TranslateX,
    TranslateY,
}

/// Linear data-to-screen mapping: `screen = data * scale + translate`.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub diameter: f64,
    /// Diameter at first mount; bounds how far the user may zoom out.
    pub initial_root_size: f64,
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub manually_zoomed: bool,
}

impl Viewport {
    pub fn new(width: f64, height: f64, diameter: f64) -> Self {
        Self {
            width,
            height,
            diameter,
            initial_root_size: diameter,
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            manually_zoomed: false,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64, diameter: f64) {
        self.width = width;
        self.height = height;
        self.diameter = diameter;
    }

    pub fn set_diameter(&mut self, diameter: f64) {
        self.diameter = diameter;
    }

    pub fn x(&self, x: f64) -> f64 {
        x * self.scale + self.translate_x
    }

    pub fn y(&self, y: f64) -> f64 {
        y * self.scale + self.translate_y
    }

    pub fn r(&self, r: f64) -> f64 {
        r * self.scale
    }

    pub fn to_screen(&self, point: Point) -> Point {
        Point::new(self.x(point.x), self.y(point.y))
    }

    pub fn to_data(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.translate_x) / self.scale,
            (screen.y - self.translate_y) / self.scale,
        )
    }

    pub fn min_scale(&self) -> f64 {
        if self.initial_root_size > 0.0 {
            self.diameter / self.initial_root_size
        } else {
            0.0
        }
    }

    /// Whether a data-space point falls inside the canvas.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let left = -self.translate_x / self.scale;
        let right = (self.width - self.translate_x) / self.scale;
        let top = -self.translate_y / self.scale;
        let bottom = (self.height - self.translate_y) / self.scale;
        (left..=right).contains(&x) && (top..=bottom).contains(&y)
    }

    /// Large enough on screen and centred inside the canvas.
    pub fn shows_label(&self, node: &LayoutNode) -> bool {
        self.r(node.r) >= SHOW_TEXT_MIN_CIRCLE_DIAMETER && self.contains(node.x, node.y)
    }

    /// Zooms so the bounding box of `circles` fills the circle diameter,
    /// centred on the canvas. Returns `false` when nothing could be fitted.
    pub fn fit(&mut self, circles: &[&LayoutNode]) -> bool {
        let Some(first) = circles.first() else {
            return false;
        };
        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for circle in circles {
            min_x = min_x.min(circle.x - circle.r);
            max_x = max_x.max(circle.x + circle.r);
            min_y = min_y.min(circle.y - circle.r);
            max_y = max_y.max(circle.y + circle.r);
        }

        let range = (max_x - min_x).max(max_y - min_y);
        if !(range.is_finite() && range > 0.0) {
            return false;
        }
        let margin = if circles.len() > 1 { HIGHLIGHTING_MIN_SIZE } else { 0.0 };
        let ratio = if circles.len() == 1 && !first.has_children() {
            LONE_LEAF_RATIO
        } else {
            1.0
        };

        self.scale = (self.diameter * ratio - margin) / range;
        self.translate_x = self.width / 2.0 - (min_x + max_x) / 2.0 * self.scale;
        self.translate_y = self.height / 2.0 - (min_y + max_y) / 2.0 * self.scale;
        true
    }

    pub fn zoom_at(&mut self, factor: f64, anchor_x: f64, anchor_y: f64) {
        let anchor = self.to_data(Point::new(anchor_x, anchor_y));
        self.scale = (self.scale * factor).max(self.min_scale());
        self.translate_x = anchor_x - anchor.x * self.scale;
        self.translate_y = anchor_y - anchor.y * self.scale;
        self.manually_zoomed = true;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.translate_x += dx;
        self.translate_y += dy;
        self.manually_zoomed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(x: f64, y: f64, r: f64, children: Vec<usize>) -> LayoutNode {
        LayoutNode {
            key: 1,
            uri: "A".to_owned(),
            depth: 1,
            x,
            y,
            r,
            original_x: x,
            original_y: y,
            original_r: r,
            value: 1.0,
            parent: Some(0),
            children,
            label_y: 0.0,
            is_label_on_top: false,
        }
    }

    #[test]
    fn mapping_round_trips() {
        let mut viewport = Viewport::new(800.0, 600.0, 600.0);
        viewport.scale = 2.0;
        viewport.translate_x = 10.0;
        viewport.translate_y = -20.0;

        let screen = viewport.to_screen(Point::new(5.0, 7.0));
        assert_eq!(screen, Point::new(20.0, -6.0));
        assert_eq!(viewport.to_data(screen), Point::new(5.0, 7.0));
        assert_eq!(viewport.r(3.0), 6.0);
    }

    #[test]
    fn fitting_a_node_with_children_centres_it() {
        let mut viewport = Viewport::new(800.0, 600.0, 600.0);
        let node = circle(100.0, 100.0, 50.0, vec![2]);
        assert!(viewport.fit(&[&node]));

        assert_eq!(viewport.scale, 6.0);
        assert_eq!(viewport.x(100.0), 400.0);
        assert_eq!(viewport.y(100.0), 300.0);
    }

    #[test]
    fn fitting_a_lone_leaf_leaves_room() {
        let mut viewport = Viewport::new(600.0, 600.0, 600.0);
        let leaf = circle(0.0, 0.0, 10.0, vec![]);
        viewport.fit(&[&leaf]);
        assert!((viewport.r(leaf.r) * 2.0 - 420.0).abs() < 1e-9);
    }

    #[test]
    fn fitting_several_circles_subtracts_margin() {
        let mut viewport = Viewport::new(600.0, 600.0, 600.0);
        let a = circle(0.0, 0.0, 10.0, vec![]);
        let b = circle(30.0, 0.0, 10.0, vec![]);
        viewport.fit(&[&a, &b]);
        assert!((viewport.scale - (600.0 - HIGHLIGHTING_MIN_SIZE) / 50.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_fit_is_ignored() {
        let mut viewport = Viewport::new(600.0, 600.0, 600.0);
        let dot = circle(5.0, 5.0, 0.0, vec![]);
        assert!(!viewport.fit(&[&dot]));
        assert!(!viewport.fit(&[]));
        assert_eq!(viewport.scale, 1.0);
    }

    #[test]
    fn zoom_keeps_anchor_and_respects_floor() {
        let mut viewport = Viewport::new(600.0, 600.0, 600.0);
        viewport.zoom_at(2.0, 300.0, 150.0);
        assert_eq!(viewport.to_data(Point::new(300.0, 150.0)), Point::new(300.0, 150.0));
        assert_eq!(viewport.scale, 2.0);
        assert!(viewport.manually_zoomed);

        viewport.zoom_at(0.01, 0.0, 0.0);
        assert_eq!(viewport.scale, viewport.min_scale());
    }

    #[test]
    fn labels_need_size_and_on_screen_centre() {
        let viewport = Viewport::new(600.0, 600.0, 600.0);
        assert!(viewport.shows_label(&circle(100.0, 100.0, 60.0, vec![])));
        assert!(!viewport.shows_label(&circle(100.0, 100.0, 59.0, vec![])));
        assert!(!viewport.shows_label(&circle(-10.0, 100.0, 80.0, vec![])));
    }
}
