//! Circle view: which classes are visible, how each is classed, and where
//! circles, labels and relation arrows land on screen.
//!
//! [`GraphRepository`] owns the laid-out nodes and every value derived from
//! the current [`DetailState`](crate::state::DetailState). Painters only
//! read its [`Frame`].

mod classify;
mod focus;
mod labels;
mod lines;
mod position;
mod stacked;
mod viewport;
mod visibility;

pub use classify::NodeClass;
pub use focus::{RelationContext, RelationPartition, Triple, UpdateOutcome, partition_relations};
pub use lines::{LineKind, RelationLine};
pub use position::{CircleShape, Frame, LabelShape};
pub use viewport::{CameraAxis, Viewport};

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::animation::{AnimationKind, AnimationStatus, Animator};
use crate::config::ViewerConfig;
use crate::dataset::Classes;
use crate::layout::{Layout, LayoutNode, NodeKey};
use crate::node::find_key_node;

use lines::RelationSets;

pub struct GraphRepository {
    nodes: Vec<LayoutNode>,
    classes: Classes,
    target_key: Option<NodeKey>,
    visible: BTreeSet<NodeKey>,
    node_classes: HashMap<NodeKey, NodeClass>,
    relations: RelationSets,
    context: RelationContext,
    tree_button: Option<NodeKey>,
    uris_to_highlight: HashSet<String>,
    children_of_highlight: HashSet<NodeKey>,
    hidden_stacked: HashSet<NodeKey>,
    viewport: Viewport,
    camera: Animator<CameraAxis>,
    frame: Frame,
    updating: bool,
}

impl GraphRepository {
    pub fn new(layout: Layout, classes: Classes, config: &ViewerConfig) -> Self {
        let viewport = Viewport::new(layout.diameter, layout.diameter, layout.diameter);
        let mut repository = Self {
            nodes: layout.nodes,
            classes,
            target_key: None,
            visible: BTreeSet::new(),
            node_classes: HashMap::new(),
            relations: RelationSets::default(),
            context: RelationContext::None,
            tree_button: None,
            uris_to_highlight: HashSet::new(),
            children_of_highlight: HashSet::new(),
            hidden_stacked: HashSet::new(),
            viewport,
            camera: Animator::new(config.graph_transition_secs),
            frame: Frame::default(),
            updating: false,
        };
        repository.refresh_frame();
        repository
    }

    /// Swaps in a freshly packed layout (new dataset or new diameter).
    /// Derived state is dropped until the next [`update`](Self::update).
    pub fn replace_layout(&mut self, layout: Layout, classes: Classes) {
        self.nodes = layout.nodes;
        self.classes = classes;
        self.viewport.set_diameter(layout.diameter);
        self.target_key = None;
        self.visible.clear();
        self.node_classes.clear();
        self.relations = RelationSets::default();
        self.context = RelationContext::None;
        self.tree_button = None;
        self.uris_to_highlight.clear();
        self.children_of_highlight.clear();
        self.hidden_stacked.clear();
        self.camera.cancel();
        self.refresh_frame();
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn node(&self, key: NodeKey) -> Option<&LayoutNode> {
        self.nodes.get(key)
    }

    pub fn classes(&self) -> &Classes {
        &self.classes
    }

    pub fn target_key(&self) -> Option<NodeKey> {
        self.target_key
    }

    pub fn target_node(&self) -> Option<&LayoutNode> {
        find_key_node(&self.nodes, self.target_key)
    }

    pub fn visible_keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.visible.iter().copied()
    }

    pub fn is_visible(&self, key: NodeKey) -> bool {
        self.visible.contains(&key)
    }

    pub fn node_class(&self, key: NodeKey) -> Option<NodeClass> {
        self.node_classes.get(&key).copied()
    }

    pub fn is_highlighted(&self, uri: &str) -> bool {
        self.uris_to_highlight.contains(uri)
    }

    pub fn is_hidden_by_stack(&self, key: NodeKey) -> bool {
        self.hidden_stacked.contains(&key)
    }

    /// Node whose label carries the "open tree view" affordance.
    pub fn tree_button_key(&self) -> Option<NodeKey> {
        self.tree_button
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Settled viewport; the camera may still be travelling towards it.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn is_animating(&self) -> bool {
        self.camera.is_running()
    }

    /// Advances the camera transition. Returns `true` while a repaint is needed.
    pub fn tick(&mut self, now: f64) -> bool {
        match self.camera.tick(now) {
            AnimationStatus::Idle => false,
            AnimationStatus::Running(_) | AnimationStatus::Finished => {
                self.refresh_frame();
                true
            }
        }
    }

    /// Records the new canvas size. Returns `true` when the caller should
    /// re-run [`update`](Self::update) because the user has not taken over
    /// the zoom.
    pub fn on_resize(&mut self, width: f64, height: f64, diameter: f64) -> bool {
        self.viewport.resize(width, height, diameter);
        self.refresh_frame();
        !self.viewport.manually_zoomed
    }

    /// Scales around `anchor` (screen coordinates) by `factor`.
    pub fn zoom_at(&mut self, factor: f64, anchor_x: f64, anchor_y: f64) {
        self.take_over_camera();
        self.viewport.zoom_at(factor, anchor_x, anchor_y);
        self.refresh_frame();
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.take_over_camera();
        self.viewport.pan_by(dx, dy);
        self.refresh_frame();
    }

    /// Runs once zooming has paused: re-evaluates which stacked chains fit.
    pub fn settle(&mut self) {
        self.hide_stacked_nodes();
        self.refresh_frame();
    }

    fn take_over_camera(&mut self) {
        if self.camera.is_running() {
            self.viewport = self.displayed_viewport();
            self.camera.cancel();
        }
    }

    /// Viewport as currently drawn, mid-transition included.
    pub fn displayed_viewport(&self) -> Viewport {
        let mut shown = self.viewport.clone();
        if self.camera.is_running() {
            let axis = |axis: CameraAxis| self.camera.value(&axis, AnimationKind::Camera);
            shown.scale = axis(CameraAxis::Scale).unwrap_or(shown.scale);
            shown.translate_x = axis(CameraAxis::TranslateX).unwrap_or(shown.translate_x);
            shown.translate_y = axis(CameraAxis::TranslateY).unwrap_or(shown.translate_y);
        }
        shown
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::dataset::Structure;

    pub(crate) fn repository(structure: Vec<Structure>, classes: Classes) -> GraphRepository {
        let layout = Layout::build(&structure, &classes, 1000.0);
        let mut repository = GraphRepository::new(layout, classes, &ViewerConfig::default());
        repository.on_resize(1000.0, 1000.0, 1000.0);
        repository
    }

    pub(crate) fn key_of(repository: &GraphRepository, uri: &str) -> NodeKey {
        repository
            .nodes()
            .iter()
            .find(|node| node.uri == uri)
            .map(|node| node.key)
            .unwrap_or_else(|| panic!("no node for {uri}"))
    }

    pub(crate) fn visible_uris(repository: &GraphRepository) -> Vec<String> {
        let mut uris: Vec<String> = repository
            .visible_keys()
            .map(|key| repository.nodes()[key].uri.clone())
            .filter(|uri| !uri.is_empty())
            .collect();
        uris.sort();
        uris.dedup();
        uris
    }
}
