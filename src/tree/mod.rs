//! Pedigree view of the focused class: its lineal ancestors, siblings and
//! up to two levels of descendants, laid out as a left-to-right tree.
//!
//! [`TreeRepository`] recomputes the visible nodes whenever the focus or a
//! display toggle changes, diffs them against the previous set and turns
//! the result into a [`TreeScene`] plus animation records for the
//! transition.

mod diff;
mod scene;
mod state;

pub use diff::TreeDiff;
pub use scene::{
    ClassInfo, ConnectorKind, GlyphCircle, GlyphRole, InfoLevel, StrokeStyle, TreeConnector, TreeGlyph,
    TreeScene, TreeTarget,
};
pub use state::TreeState;

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::animation::{AnimationKind, AnimationStatus, Animator};
use crate::config::{DEFAULT_MAX_DEPTH, TREE_MARGIN_Y, ViewerConfig};
use crate::dataset::Classes;
use crate::layout::{Layout, LayoutNode, NodeKey, ROOT_KEY};
use crate::node::{depth_diff, find_key_node, flatten_children, is_lineal_child, lineal_ascendants, root_node};

/// One visible occurrence in the tree. Multiple-inheritance stubs reuse
/// the key of the super class they stand for.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    pub key: NodeKey,
    pub uri: String,
    pub depth: usize,
    pub tree_y: f64,
    pub old_tree_y: Option<f64>,
    pub multiple_inheritance_source: bool,
}

impl TreeNode {
    pub fn has_moved(&self) -> bool {
        self.old_tree_y.is_some_and(|old| old != self.tree_y)
    }
}

pub struct TreeRepository {
    nodes: Vec<LayoutNode>,
    classes: Classes,
    /// Classes named as a super class by some other class.
    super_class_uris: HashSet<String>,
    focusing_key: Option<NodeKey>,
    multiple_inheritance: Vec<NodeKey>,
    multiple_inheritance_uris: Vec<String>,
    /// Lineal ascendants and the focused node, deepest first.
    focusing_ascendants: Vec<NodeKey>,
    lineal_ascendant_uris: Vec<String>,
    tree_y: HashMap<NodeKey, f64>,
    old_tree_y: HashMap<NodeKey, f64>,
    state: TreeState,
    tree_nodes: Vec<TreeNode>,
    diff: TreeDiff,
    scene: TreeScene,
    animator: Animator<TreeTarget>,
}

impl TreeRepository {
    pub fn new(layout: &Layout, classes: Classes, config: &ViewerConfig) -> Self {
        let mut repository = Self {
            nodes: Vec::new(),
            classes: Classes::new(),
            super_class_uris: HashSet::new(),
            focusing_key: None,
            multiple_inheritance: Vec::new(),
            multiple_inheritance_uris: Vec::new(),
            focusing_ascendants: Vec::new(),
            lineal_ascendant_uris: Vec::new(),
            tree_y: HashMap::new(),
            old_tree_y: HashMap::new(),
            state: TreeState::default(),
            tree_nodes: Vec::new(),
            diff: TreeDiff::default(),
            scene: TreeScene::default(),
            animator: Animator::new(config.tree_animation_secs),
        };
        repository.replace_layout(layout, classes);
        repository
    }

    /// Takes a new arena and class index. The view is cleared until the
    /// next [`show`](Self::show).
    pub fn replace_layout(&mut self, layout: &Layout, classes: Classes) {
        self.nodes = layout.nodes.clone();
        self.super_class_uris = classes
            .values()
            .flat_map(|detail| detail.parents().iter().cloned())
            .collect();
        self.classes = classes;
        self.focusing_key = None;
        self.multiple_inheritance.clear();
        self.multiple_inheritance_uris.clear();
        self.focusing_ascendants.clear();
        self.lineal_ascendant_uris.clear();
        self.tree_y.clear();
        self.old_tree_y.clear();
        self.state = TreeState::default();
        self.tree_nodes.clear();
        self.diff = TreeDiff::default();
        self.scene = TreeScene::default();
        self.animator.cancel();
    }

    /// Centres the tree on `focusing_key`. Returns `false` when there is
    /// nothing to show (no focus or the synthetic root), in which case the
    /// tree pane should close.
    pub fn show(&mut self, focusing_key: Option<NodeKey>, now: f64) -> bool {
        let Some(key) = focusing_key.filter(|&key| key != ROOT_KEY && key < self.nodes.len()) else {
            return false;
        };
        if self.focusing_key != Some(key) || self.tree_nodes.is_empty() {
            self.set_focusing_node(key);
            let uri = self.nodes[key].uri.clone();
            self.state.refocus(&uri);
            self.recompute(now);
        }
        true
    }

    /// Flips the level switch of the class information header.
    pub fn toggle_depth(&mut self, depth: usize, now: f64) {
        let Some(focusing) = self.focusing_node() else {
            return;
        };
        let candidates: Vec<(String, isize)> = self
            .nodes
            .iter()
            .filter(|node| shows_display_button(&self.nodes, node, focusing))
            .chain(std::iter::once(focusing))
            .map(|node| (node.uri.clone(), depth_diff(node, focusing)))
            .collect();
        self.state.toggle_depth(depth, &candidates);
        self.recompute(now);
    }

    /// Flips the child switch drawn under `key`.
    pub fn toggle_children(&mut self, key: NodeKey, now: f64) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        let uri = node.uri.clone();
        self.state.toggle_hidden(&uri);
        self.recompute(now);
    }

    /// Advances the transition. Returns `true` while a repaint is needed.
    pub fn tick(&mut self, now: f64) -> bool {
        !matches!(self.animator.tick(now), AnimationStatus::Idle)
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    pub fn focusing_node(&self) -> Option<&LayoutNode> {
        find_key_node(&self.nodes, self.focusing_key)
    }

    pub fn focusing_key(&self) -> Option<NodeKey> {
        self.focusing_key
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn state(&self) -> &TreeState {
        &self.state
    }

    pub fn tree_nodes(&self) -> &[TreeNode] {
        &self.tree_nodes
    }

    pub fn diff(&self) -> &TreeDiff {
        &self.diff
    }

    pub fn scene(&self) -> &TreeScene {
        &self.scene
    }

    pub fn multiple_inheritance_uris(&self) -> &[String] {
        &self.multiple_inheritance_uris
    }

    /// Vertical offset of `glyph` as currently drawn.
    pub fn glyph_y(&self, glyph: usize) -> Option<f64> {
        let base = self.scene.glyphs.get(glyph)?.y;
        Some(
            self.animator
                .value(&TreeTarget::Glyph(glyph), AnimationKind::Translate)
                .unwrap_or(base),
        )
    }

    pub fn glyph_opacity(&self, glyph: usize) -> f64 {
        self.animator
            .value(&TreeTarget::Glyph(glyph), AnimationKind::Opacity)
            .unwrap_or(1.0)
    }

    /// Dash offset of `connector`: `0` draws it whole, its length hides it.
    pub fn connector_dash_offset(&self, connector: usize) -> f64 {
        let target = TreeTarget::Connector(connector);
        self.animator
            .value(&target, AnimationKind::DashOffset)
            .or_else(|| self.animator.value(&target, AnimationKind::Delta))
            .or_else(|| self.scene.connectors.get(connector).map(|connector| connector.dash_offset))
            .unwrap_or(0.0)
    }

    /// Outgoing elements stay on screen only while the transition runs.
    pub fn is_glyph_drawn(&self, glyph: usize) -> bool {
        self.scene
            .glyphs
            .get(glyph)
            .is_some_and(|glyph| !glyph.removing || self.animator.is_running())
    }

    pub fn is_connector_drawn(&self, connector: usize) -> bool {
        self.scene
            .connectors
            .get(connector)
            .is_some_and(|connector| !connector.removing || self.animator.is_running())
    }

    /// Super-class occurrences of `key`'s class other than its own parent.
    pub fn multiple_inheritance_nodes(&self, key: NodeKey) -> Vec<NodeKey> {
        let Some(node) = self.nodes.get(key) else {
            return Vec::new();
        };
        let Some(detail) = self.classes.get(&node.uri) else {
            return Vec::new();
        };
        let own_parent = node.parent.and_then(|parent| self.nodes.get(parent)).map(|parent| parent.uri.as_str());
        let super_classes = detail.parents();
        self.nodes
            .iter()
            .filter(|candidate| super_classes.contains(&candidate.uri))
            .filter(|candidate| own_parent != Some(candidate.uri.as_str()))
            .map(|candidate| candidate.key)
            .collect()
    }

    fn set_focusing_node(&mut self, key: NodeKey) {
        self.focusing_key = Some(key);
        self.multiple_inheritance = self.multiple_inheritance_nodes(key);
        self.multiple_inheritance_uris = self.uris(&self.multiple_inheritance);

        let lineal = lineal_ascendants(&self.nodes, key);
        self.lineal_ascendant_uris = self.uris(&lineal);
        let mut ascendants = lineal;
        ascendants.push(key);
        ascendants.sort_by_key(|&ascendant| Reverse(self.nodes[ascendant].depth));
        self.focusing_ascendants = ascendants;
    }

    fn uris(&self, keys: &[NodeKey]) -> Vec<String> {
        keys.iter().map(|&key| self.nodes[key].uri.clone()).collect()
    }

    fn recompute(&mut self, now: f64) {
        let displayed = self.displayed_offsets();
        let old = std::mem::take(&mut self.tree_nodes);
        let new = self.compute_tree_nodes();

        let root_uri = |nodes: &[TreeNode]| {
            nodes
                .iter()
                .find(|node| node.depth == 1)
                .map(|node| node.uri.clone())
        };
        let same_root = !old.is_empty() && root_uri(&old) == root_uri(&new);
        let (diff, removed) = if same_root {
            let diff = TreeDiff::between(&old, &new, &self.multiple_inheritance_uris);
            let removed: Vec<TreeNode> = old.into_iter().filter(|node| diff.removes(&node.uri)).collect();
            (diff, removed)
        } else {
            (TreeDiff::from_scratch(&new, &self.multiple_inheritance_uris), Vec::new())
        };
        debug!(
            visible = new.len(),
            append = diff.append.len(),
            remove = diff.remove.len(),
            moved = diff.moved.len(),
            same_root,
            "tree recomputed"
        );

        self.diff = diff;
        self.tree_nodes = new;
        let (scene, records) = self.build_scene(&removed, &displayed);
        self.scene = scene;
        self.animator.start(records, now);
    }

    /// Currently drawn offsets of the glyphs, to start moves from.
    fn displayed_offsets(&self) -> HashMap<(NodeKey, bool), f64> {
        self.scene
            .glyphs
            .iter()
            .enumerate()
            .filter(|(_, glyph)| !glyph.removing)
            .filter_map(|(index, glyph)| {
                Some(((glyph.key, glyph.multiple_inheritance_source), self.glyph_y(index)?))
            })
            .collect()
    }

    /// Visible tree nodes for the current focus and toggles, with fresh
    /// vertical slots.
    fn compute_tree_nodes(&mut self) -> Vec<TreeNode> {
        let Some(focusing) = self.focusing_node() else {
            return Vec::new();
        };
        let focusing_key = focusing.key;
        let focusing_parent_depth = focusing
            .parent
            .and_then(|parent| self.nodes.get(parent))
            .map_or(0, |parent| parent.depth);
        let Some(root_key) = root_node(&self.nodes, focusing_key).map(|root| root.key) else {
            return Vec::new();
        };

        let keys: Vec<NodeKey> = flatten_children(&self.nodes, root_key)
            .into_iter()
            .filter(|&key| self.is_tree_node(key, focusing_key))
            .collect();
        let uris: HashSet<String> = keys.iter().map(|&key| self.nodes[key].uri.clone()).collect();

        self.old_tree_y = std::mem::take(&mut self.tree_y);
        let mut cursor = 0.0;
        self.assign_tree_y(root_key, 0, &uris, &mut cursor);

        let focusing_y = self.tree_y.get(&focusing_key).copied().unwrap_or(0.0);
        let mut tree_nodes: Vec<TreeNode> = keys
            .iter()
            .map(|&key| TreeNode {
                key,
                uri: self.nodes[key].uri.clone(),
                depth: self.nodes[key].depth,
                tree_y: self.tree_y.get(&key).copied().unwrap_or(0.0),
                old_tree_y: self.old_tree_y.get(&key).copied(),
                multiple_inheritance_source: false,
            })
            .collect();
        tree_nodes.extend(self.multiple_inheritance.iter().enumerate().map(|(index, &key)| TreeNode {
            key,
            uri: self.nodes[key].uri.clone(),
            depth: focusing_parent_depth,
            tree_y: focusing_y + TREE_MARGIN_Y / 2.0 * (index + 1) as f64,
            old_tree_y: self.tree_y.get(&key).copied(),
            multiple_inheritance_source: true,
        }));
        tree_nodes
    }

    fn is_tree_node(&self, key: NodeKey, focusing_key: NodeKey) -> bool {
        let node = &self.nodes[key];
        let focusing = &self.nodes[focusing_key];

        if node.depth != 1 {
            let Some(ascendant) = self.closest_focusing_ascendant(key) else {
                // another branch of a multiply inherited class
                return false;
            };
            if depth_diff(node, &self.nodes[ascendant]) > DEFAULT_MAX_DEPTH as isize {
                return false;
            }
        }

        let parent = node.parent.and_then(|parent| self.nodes.get(parent));
        if depth_diff(node, focusing) > self.state.max_depth as isize {
            // below the level switch, unless the parent's own switch is on
            let opened = parent.is_some_and(|parent| {
                shows_display_button(&self.nodes, parent, focusing) && !self.state.is_hidden(&parent.uri)
            });
            if !opened {
                return false;
            }
        }
        parent.is_some_and(|parent| !self.state.is_hidden(&parent.uri))
    }

    fn assign_tree_y(&mut self, key: NodeKey, child_index: usize, uris: &HashSet<String>, cursor: &mut f64) {
        if !uris.contains(&self.nodes[key].uri) {
            return;
        }
        if child_index > 0 {
            *cursor += TREE_MARGIN_Y;
        }
        self.tree_y.insert(key, *cursor);
        if self.focusing_key == Some(key) && !self.multiple_inheritance.is_empty() {
            *cursor += TREE_MARGIN_Y / 2.0 * self.multiple_inheritance.len() as f64;
        }
        for (index, child) in self.sorted_children(key).into_iter().enumerate() {
            self.assign_tree_y(child, index, uris, cursor);
        }
    }

    /// Children with the largest families first, leaves last.
    fn sorted_children(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut children = self.nodes[key].children.clone();
        children.sort_by_key(|&child| {
            let grandchildren = self.nodes[child].children.len();
            (grandchildren == 0, Reverse(grandchildren))
        });
        children
    }

    /// Nearest ancestor of `key` sharing its class with one of the focused
    /// node's lineal ascendants (or the focused node itself).
    fn closest_focusing_ascendant(&self, key: NodeKey) -> Option<NodeKey> {
        let mut current = self.nodes.get(key)?;
        loop {
            let parent = self.nodes.get(current.parent?)?;
            if let Some(&ascendant) = self
                .focusing_ascendants
                .iter()
                .find(|&&ascendant| self.nodes[ascendant].uri == parent.uri)
            {
                return Some(ascendant);
            }
            current = parent;
        }
    }
}

/// A class gets a child switch when it has children and sits level with
/// the focused class or directly below it.
fn shows_display_button(nodes: &[LayoutNode], node: &LayoutNode, focusing: &LayoutNode) -> bool {
    node.key != focusing.key
        && node.has_children()
        && (depth_diff(node, focusing) == 0 || is_lineal_child(nodes, node, focusing))
}
