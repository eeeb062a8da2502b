use super::LayoutNode;
use crate::config::{STACKED_CHILD_MARGIN, STACKED_LABEL_MARGIN};

/// Nests sole children slightly below their parent and rescales every other
/// child by its parent's shrink ratio. Parents are visited before children.
pub(super) fn avoid_stacked_circles(nodes: &mut [LayoutNode], diameter: f64) {
    for index in 0..nodes.len() {
        let node = &mut nodes[index];
        node.original_r = node.r;
        node.original_x = node.x;
        node.original_y = node.y;

        let Some(parent_index) = node.parent else {
            continue;
        };
        let parent = nodes[parent_index].clone_geometry();

        if parent.children == 1 {
            let scale = parent.r / diameter;
            let node = &mut nodes[index];
            node.r = (parent.r - scale * STACKED_CHILD_MARGIN).max(0.0);
            node.x = parent.x;
            node.y = parent.y + scale * STACKED_CHILD_MARGIN;

            let parent = &mut nodes[parent_index];
            parent.label_y = -parent.r + scale * STACKED_LABEL_MARGIN;
            parent.is_label_on_top = true;
        } else {
            let ratio = if parent.original_r > 0.0 {
                parent.r / parent.original_r
            } else {
                1.0
            };
            let node = &mut nodes[index];
            node.r *= ratio;
            node.x = parent.x - (parent.original_x - node.x) * ratio;
            node.y = parent.y - (parent.original_y - node.y) * ratio;
        }
    }
}

struct ParentGeometry {
    x: f64,
    y: f64,
    r: f64,
    original_x: f64,
    original_y: f64,
    original_r: f64,
    children: usize,
}

impl LayoutNode {
    fn clone_geometry(&self) -> ParentGeometry {
        ParentGeometry {
            x: self.x,
            y: self.y,
            r: self.r,
            original_x: self.original_x,
            original_y: self.original_y,
            original_r: self.original_r,
            children: self.children.len(),
        }
    }
}
