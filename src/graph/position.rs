use super::classify::normal_class;
use super::labels::emphasized_labels;
use super::lines::{RelationLine, relation_line};
use super::viewport::Viewport;
use super::{GraphRepository, NodeClass};
use crate::config::{HIGHLIGHTING_MIN_SIZE, SHOW_TEXT_MAX_CIRCLE_DIAMETER};
use crate::geometry::Point;
use crate::layout::NodeKey;

#[derive(Clone, Debug, PartialEq)]
pub struct CircleShape {
    pub key: NodeKey,
    pub center: Point,
    pub radius: f64,
    pub class: NodeClass,
    pub highlighted: bool,
    /// Collapsed into its stack top.
    pub hidden: bool,
}

impl CircleShape {
    pub fn contains(&self, point: Point) -> bool {
        self.center.distance(point) <= self.radius
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelShape {
    pub key: NodeKey,
    pub position: Point,
    pub class: NodeClass,
    /// Anchored at the top edge instead of the centre.
    pub on_top: bool,
    pub emphasized: bool,
    pub tree_button: bool,
}

/// Everything the circle view paints, in screen coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Paint order: later circles cover earlier ones.
    pub circles: Vec<CircleShape>,
    pub labels: Vec<LabelShape>,
    pub lines: Vec<RelationLine>,
}

impl Frame {
    pub fn circle(&self, key: NodeKey) -> Option<&CircleShape> {
        self.circles.iter().find(|circle| circle.key == key)
    }

    /// Top-most drawn circle under `point`.
    pub fn hit_test(&self, point: Point) -> Option<&CircleShape> {
        self.circles
            .iter()
            .rev()
            .find(|circle| !circle.hidden && circle.contains(point))
    }
}

impl GraphRepository {
    pub(super) fn refresh_frame(&mut self) {
        let viewport = self.displayed_viewport();
        self.frame = self.build_frame(&viewport);
    }

    fn build_frame(&self, viewport: &Viewport) -> Frame {
        Frame {
            circles: self.circle_shapes(viewport),
            labels: self.label_shapes(viewport),
            lines: self.relation_lines(viewport),
        }
    }

    fn class_of(&self, key: NodeKey) -> NodeClass {
        self.node_classes
            .get(&key)
            .copied()
            .unwrap_or_else(|| normal_class(&self.nodes[key], &self.visible))
    }

    fn circle_shapes(&self, viewport: &Viewport) -> Vec<CircleShape> {
        let mut keys: Vec<NodeKey> = self.visible.iter().copied().collect();
        keys.sort_by_key(|key| (self.children_of_highlight.contains(key), self.nodes[*key].depth));

        keys.into_iter()
            .map(|key| {
                let node = &self.nodes[key];
                let highlighted = self.uris_to_highlight.contains(&node.uri);
                let floor = if highlighted { HIGHLIGHTING_MIN_SIZE / 2.0 } else { 0.0 };
                CircleShape {
                    key,
                    center: viewport.to_screen(Point::new(node.x, node.y)),
                    radius: viewport.r(node.r).max(floor),
                    class: self.class_of(key),
                    highlighted,
                    hidden: self.hidden_stacked.contains(&key),
                }
            })
            .collect()
    }

    fn label_shapes(&self, viewport: &Viewport) -> Vec<LabelShape> {
        let labelled: Vec<NodeKey> = self
            .visible
            .iter()
            .copied()
            .filter(|&key| {
                let node = &self.nodes[key];
                if node.is_root() || self.hidden_stacked.contains(&key) {
                    return false;
                }
                let fits = self.target_key == Some(key)
                    || node.first_child().is_none_or(|child| !self.visible.contains(&child))
                    || viewport.r(node.r) <= SHOW_TEXT_MAX_CIRCLE_DIAMETER;
                fits && viewport.shows_label(node)
            })
            .collect();
        let emphasized = emphasized_labels(&self.nodes, &labelled);

        labelled
            .into_iter()
            .map(|key| {
                let node = &self.nodes[key];
                LabelShape {
                    key,
                    position: viewport.to_screen(Point::new(node.x, node.y + node.label_y)),
                    class: self.class_of(key),
                    on_top: node.is_label_on_top,
                    emphasized: emphasized.contains(&key),
                    tree_button: self.tree_button == Some(key),
                }
            })
            .collect()
    }

    fn relation_lines(&self, viewport: &Viewport) -> Vec<RelationLine> {
        let Some(focused) = self.target_node() else {
            return Vec::new();
        };
        self.relations
            .iter()
            .filter_map(|(kind, partner)| relation_line(kind, focused, self.nodes.get(partner)?, viewport))
            .collect()
    }
}
