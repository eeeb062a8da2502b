//! Circle-packing layout of the inheritance forest.
//!
//! The forest is wrapped under a synthetic root (depth 0, empty URI),
//! packed, de-stacked and finally stored as an arena whose index equals the
//! node key.

use tracing::debug;

use crate::dataset::{Classes, Structure};

mod destack;
mod pack;

use pack::{Circle, Lcg, pack_siblings};

pub type NodeKey = usize;

pub const ROOT_KEY: NodeKey = 0;

/// Weight of a class without a known instance count.
pub const DEFAULT_NODE_WEIGHT: f64 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub key: NodeKey,
    pub uri: String,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub original_x: f64,
    pub original_y: f64,
    pub original_r: f64,
    pub value: f64,
    pub parent: Option<NodeKey>,
    pub children: Vec<NodeKey>,
    /// Offset applied to the label so it floats above nested circles.
    pub label_y: f64,
    /// Set on a parent whose sole child was nested below it.
    pub is_label_on_top: bool,
}

impl LayoutNode {
    fn new(uri: String, depth: usize, parent: Option<NodeKey>) -> Self {
        Self {
            key: 0,
            uri,
            depth,
            x: 0.0,
            y: 0.0,
            r: 0.0,
            original_x: 0.0,
            original_y: 0.0,
            original_r: 0.0,
            value: 0.0,
            parent,
            children: Vec::new(),
            label_y: 0.0,
            is_label_on_top: false,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    pub fn first_child(&self) -> Option<NodeKey> {
        self.children.first().copied()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    pub diameter: f64,
}

impl Layout {
    pub fn build(structure: &[Structure], classes: &Classes, diameter: f64) -> Self {
        let diameter = if diameter > 0.0 { diameter } else { 1.0 };
        let mut nodes = build_arena(structure);

        weigh(&mut nodes, classes);
        pack(&mut nodes, diameter);
        destack::avoid_stacked_circles(&mut nodes, diameter);
        let nodes = assign_keys(nodes);

        debug!(nodes = nodes.len(), diameter, "packed class hierarchy");
        Self { nodes, diameter }
    }

    pub fn root(&self) -> Option<&LayoutNode> {
        self.nodes.first()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

fn build_arena(structure: &[Structure]) -> Vec<LayoutNode> {
    fn push(nodes: &mut Vec<LayoutNode>, item: &Structure, depth: usize, parent: NodeKey) {
        let index = nodes.len();
        nodes.push(LayoutNode::new(item.uri.clone(), depth, Some(parent)));
        nodes[parent].children.push(index);
        for child in item.children.iter().flatten() {
            push(nodes, child, depth + 1, index);
        }
    }

    let mut nodes = vec![LayoutNode::new(String::new(), 0, None)];
    for item in structure {
        push(&mut nodes, item, 1, ROOT_KEY);
    }
    nodes
}

/// Sums weights bottom-up and orders every child list by ascending weight.
fn weigh(nodes: &mut [LayoutNode], classes: &Classes) {
    for index in (0..nodes.len()).rev() {
        let own = classes
            .get(&nodes[index].uri)
            .and_then(|detail| detail.entities)
            .filter(|&count| count > 0)
            .map_or(DEFAULT_NODE_WEIGHT, |count| count as f64);
        let children: f64 = nodes[index]
            .children
            .iter()
            .map(|&child| nodes[child].value)
            .sum();
        nodes[index].value = own + children;
    }

    for index in 0..nodes.len() {
        let mut children = std::mem::take(&mut nodes[index].children);
        children.sort_by(|&a, &b| nodes[a].value.total_cmp(&nodes[b].value));
        nodes[index].children = children;
    }
}

fn pack(nodes: &mut [LayoutNode], diameter: f64) {
    let mut rng = Lcg::new();

    // Arena order is a pre-order walk, so reverse order visits children first.
    for index in (0..nodes.len()).rev() {
        if !nodes[index].has_children() {
            nodes[index].r = nodes[index].value.max(0.0).sqrt();
            continue;
        }

        let mut circles: Vec<Circle> = nodes[index]
            .children
            .iter()
            .map(|&child| Circle::new(0.0, 0.0, nodes[child].r))
            .collect();
        let radius = pack_siblings(&mut circles, &mut rng);
        for (slot, &child) in nodes[index].children.clone().iter().enumerate() {
            nodes[child].x = circles[slot].x;
            nodes[child].y = circles[slot].y;
        }
        nodes[index].r = radius;
    }

    let root_r = nodes[ROOT_KEY].r;
    let k = if root_r > 0.0 { diameter / (2.0 * root_r) } else { 1.0 };
    nodes[ROOT_KEY].x = diameter / 2.0;
    nodes[ROOT_KEY].y = diameter / 2.0;
    for index in 0..nodes.len() {
        nodes[index].r *= k;
        if let Some(parent) = nodes[index].parent {
            nodes[index].x = nodes[parent].x + k * nodes[index].x;
            nodes[index].y = nodes[parent].y + k * nodes[index].y;
        }
    }
}

/// Re-walks the tree in pre-order, stable-sorts by depth and renumbers so
/// that the arena index is the dense key.
fn assign_keys(nodes: Vec<LayoutNode>) -> Vec<LayoutNode> {
    let mut order = Vec::with_capacity(nodes.len());
    let mut stack = vec![ROOT_KEY];
    while let Some(index) = stack.pop() {
        order.push(index);
        stack.extend(nodes[index].children.iter().rev());
    }
    order.sort_by_key(|&index| nodes[index].depth);

    let mut key_of = vec![0; nodes.len()];
    for (key, &index) in order.iter().enumerate() {
        key_of[index] = key;
    }

    let mut slots: Vec<Option<LayoutNode>> = nodes.into_iter().map(Some).collect();
    order
        .iter()
        .enumerate()
        .filter_map(|(key, &index)| {
            let mut node = slots[index].take()?;
            node.key = key;
            node.parent = node.parent.map(|parent| key_of[parent]);
            node.children = node.children.iter().map(|&child| key_of[child]).collect();
            Some(node)
        })
        .collect()
}
