use std::collections::HashSet;

use super::GraphRepository;
use crate::config::COLLIDED_LABEL_MARGIN;
use crate::layout::{LayoutNode, NodeKey};

/// Centres closer than this count as the same point.
const SAME_CENTRE_EPSILON: f64 = 1e-9;

impl GraphRepository {
    /// Lifts the label of a multi-child node when one of its children sits
    /// at the same height, so the two labels do not overlap.
    pub(super) fn avoid_collided_label(&mut self) {
        if self.visible.is_empty() {
            return;
        }

        for node in &mut self.nodes {
            if !node.is_label_on_top {
                node.label_y = 0.0;
            }
        }

        let mut deepest_first: Vec<NodeKey> = self.visible.iter().copied().collect();
        deepest_first.sort_by_key(|&key| std::cmp::Reverse(self.nodes[key].depth));

        for key in deepest_first {
            let node = &self.nodes[key];
            if !node.has_children() || node.is_root() || node.is_label_on_top {
                continue;
            }
            let collided = node
                .children
                .iter()
                .any(|&child| (self.nodes[child].y - node.y).abs() < SAME_CENTRE_EPSILON);
            if !collided {
                continue;
            }

            let highest_child_label = node
                .children
                .iter()
                .map(|&child| &self.nodes[child])
                .filter(|child| !child.is_label_on_top)
                .map(|child| child.label_y)
                .fold(None, |max: Option<f64>, y| Some(max.map_or(y, |max| max.max(y))))
                .unwrap_or(0.0);
            let scale = node.r / self.viewport.diameter;
            self.nodes[key].label_y = highest_child_label - scale * COLLIDED_LABEL_MARGIN;
        }
    }
}

/// Labelled non-leaf nodes that are the top-most labelled occurrence of
/// their chain.
pub(crate) fn emphasized_labels(nodes: &[LayoutNode], labelled: &[NodeKey]) -> HashSet<NodeKey> {
    let labelled_uris: HashSet<&str> = labelled.iter().map(|&key| nodes[key].uri.as_str()).collect();

    let upper_parent = |mut key: NodeKey| {
        while let Some(parent) = nodes[key].parent.map(|parent| &nodes[parent]) {
            if parent.depth == 0 || !labelled_uris.contains(parent.uri.as_str()) {
                break;
            }
            key = parent.key;
        }
        key
    };
    let upper_uris: HashSet<&str> = labelled
        .iter()
        .map(|&key| nodes[upper_parent(key)].uri.as_str())
        .collect();

    labelled
        .iter()
        .copied()
        .filter(|&key| nodes[key].has_children() && upper_uris.contains(nodes[key].uri.as_str()))
        .collect()
}
