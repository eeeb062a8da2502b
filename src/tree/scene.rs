use std::collections::HashMap;

use super::{TreeNode, TreeRepository, shows_display_button};
use crate::animation::{AnimationKind, AnimationRecord};
use crate::config::{DEFAULT_MAX_DEPTH, TREE_BRIDGE_RADIUS, TREE_HEADER_HEIGHT, TREE_MARGIN_X, TREE_MARGIN_Y};
use crate::geometry::{Path, Point};
use crate::layout::NodeKey;
use crate::node::{depth_diff, has_parent};

/// Element of a [`TreeScene`] an animation record drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeTarget {
    Glyph(usize),
    Connector(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphRole {
    Focusing,
    Parent,
    MultipleInheritance,
    Normal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphCircle {
    Leaf,
    /// The class is a super class of something, drawn filled.
    HiddenChildren,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TreeGlyph {
    pub key: NodeKey,
    pub uri: String,
    pub x: f64,
    pub y: f64,
    pub role: GlyphRole,
    pub circle: GlyphCircle,
    pub multiple_inheritance_source: bool,
    /// `Some(on)` when the glyph carries a child display switch.
    pub child_toggle: Option<bool>,
    pub removing: bool,
}

impl TreeGlyph {
    pub fn shows_label(&self) -> bool {
        !self.removing
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectorKind {
    /// Vertical fan from a parent down to its last child.
    Fan,
    /// Horizontal stub into a child.
    Stub,
    /// "Has more children" hint past the last shown level.
    ChildrenDots,
    Inheritance,
    /// Route from the top-level ancestor down to the focused class.
    LinealPath,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeStyle {
    Solid,
    Dotted,
    Dashed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TreeConnector {
    /// Index of the glyph the path is relative to.
    pub glyph: usize,
    pub kind: ConnectorKind,
    pub style: StrokeStyle,
    pub path: Path,
    pub length: f64,
    /// Dash offset when no animation drives the connector.
    pub dash_offset: f64,
    pub removing: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfoLevel {
    Parent,
    Child,
    Grandchild,
}

impl InfoLevel {
    /// Column offset relative to the focused class.
    pub fn depth(self) -> isize {
        match self {
            Self::Parent => -1,
            Self::Child => 1,
            Self::Grandchild => 2,
        }
    }
}

/// Column header above the tree: how many related classes a level has.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassInfo {
    pub level: InfoLevel,
    pub x: f64,
    pub count: usize,
    /// State of the level switch; parents have none.
    pub toggle: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeScene {
    pub glyphs: Vec<TreeGlyph>,
    pub connectors: Vec<TreeConnector>,
    pub infos: Vec<ClassInfo>,
}

impl TreeScene {
    /// Right and bottom extent of everything drawn.
    pub fn extent(&self) -> (f64, f64) {
        self.glyphs.iter().fold((0.0_f64, 0.0_f64), |(width, height), glyph| {
            (width.max(glyph.x + TREE_MARGIN_X / 2.0), height.max(glyph.y + TREE_MARGIN_Y / 2.0))
        })
    }
}

type Records = Vec<AnimationRecord<TreeTarget>>;

impl TreeRepository {
    pub(super) fn build_scene(
        &self,
        removed: &[TreeNode],
        displayed: &HashMap<(NodeKey, bool), f64>,
    ) -> (TreeScene, Records) {
        let mut scene = TreeScene {
            infos: self.class_infos(),
            ..TreeScene::default()
        };
        let mut records = Records::new();

        let mut drawable: Vec<&TreeNode> = self.tree_nodes.iter().chain(removed).collect();
        // lineal ascendants and the focused class paint over normal paths
        drawable.sort_by_key(|node| (self.is_lineal_ascendant_uri(&node.uri), self.is_focusing(node)));

        for node in &drawable {
            let index = scene.glyphs.len();
            let glyph = self.glyph(node);
            let target = TreeTarget::Glyph(index);

            if self.diff.moves(&node.uri)
                && let Some(old) = node.old_tree_y
            {
                let from = displayed
                    .get(&(node.key, node.multiple_inheritance_source))
                    .copied()
                    .unwrap_or(old + TREE_HEADER_HEIGHT);
                records.push(AnimationRecord::new(target, AnimationKind::Translate, from, glyph.y));
            }
            if glyph.removing {
                records.push(AnimationRecord::new(target, AnimationKind::Opacity, 1.0, 0.0));
            } else if self.diff.appends(&node.uri) {
                records.push(AnimationRecord::new(target, AnimationKind::Opacity, 0.0, 1.0));
            }

            let removing = glyph.removing;
            scene.glyphs.push(glyph);
            self.push_fan(&mut scene, &mut records, index, node, removing);
            self.push_stub(&mut scene, &mut records, index, node, removing);
            self.push_children_dots(&mut scene, index, node, removing);
        }

        self.push_inheritance(&mut scene, &mut records);
        self.push_lineal_path(&mut scene, &mut records);
        (scene, records)
    }

    fn is_lineal_ascendant_uri(&self, uri: &str) -> bool {
        self.lineal_ascendant_uris.iter().any(|lineal| lineal == uri)
    }

    fn is_focusing(&self, node: &TreeNode) -> bool {
        !node.multiple_inheritance_source && self.focusing_key == Some(node.key)
    }

    fn glyph(&self, node: &TreeNode) -> TreeGlyph {
        let role = if self.is_focusing(node) {
            GlyphRole::Focusing
        } else if self.is_lineal_ascendant_uri(&node.uri) {
            GlyphRole::Parent
        } else if self.multiple_inheritance_uris.contains(&node.uri) {
            GlyphRole::MultipleInheritance
        } else {
            GlyphRole::Normal
        };
        let circle = if self.super_class_uris.contains(&node.uri) {
            GlyphCircle::HiddenChildren
        } else {
            GlyphCircle::Leaf
        };

        TreeGlyph {
            key: node.key,
            uri: node.uri.clone(),
            x: node.depth as f64 * TREE_MARGIN_X,
            y: node.tree_y + TREE_HEADER_HEIGHT,
            role,
            circle,
            multiple_inheritance_source: node.multiple_inheritance_source,
            child_toggle: self.child_toggle(node),
            removing: self.diff.removes(&node.uri),
        }
    }

    fn child_toggle(&self, node: &TreeNode) -> Option<bool> {
        let focusing = self.focusing_node()?;
        let layout_node = self.nodes.get(node.key)?;
        if node.multiple_inheritance_source || !shows_display_button(&self.nodes, layout_node, focusing) {
            return None;
        }
        let ascendant = self.closest_focusing_ascendant(node.key)?;
        (depth_diff(layout_node, &self.nodes[ascendant]) < DEFAULT_MAX_DEPTH as isize)
            .then(|| !self.state.is_hidden(&node.uri))
    }

    /// Whether the children of `key` are drawn.
    fn is_visible_parent(&self, key: NodeKey) -> bool {
        let (Some(node), Some(focusing)) = (self.nodes.get(key), self.focusing_node()) else {
            return false;
        };
        if node.depth == 1 {
            return !(node.key == focusing.key && self.state.max_depth == 0);
        }
        let hidden = self.state.is_hidden(&node.uri);
        let shows_children = depth_diff(node, focusing) < self.state.max_depth as isize
            || (shows_display_button(&self.nodes, node, focusing) && !hidden);
        shows_children
            && !hidden
            && self
                .closest_focusing_ascendant(key)
                .is_some_and(|ascendant| depth_diff(node, &self.nodes[ascendant]) <= 1)
    }

    fn push_fan(&self, scene: &mut TreeScene, records: &mut Records, glyph: usize, node: &TreeNode, removing: bool) {
        let Some(layout_node) = self.nodes.get(node.key) else {
            return;
        };
        if node.multiple_inheritance_source || layout_node.children.len() <= 1 || !self.is_visible_parent(node.key) {
            return;
        }
        let Some(&last) = self.sorted_children(node.key).last() else {
            return;
        };

        let last_y = self.tree_y.get(&last).copied().unwrap_or(0.0);
        let last_old_y = self.old_tree_y.get(&last).copied();
        let partially_moved = layout_node
            .children
            .iter()
            .any(|&child| self.diff.moves(&self.nodes[child].uri));
        let delta = last_old_y.filter(|_| partially_moved).map(|old| last_y - old);

        let bottom = match (delta, last_old_y) {
            (Some(delta), Some(old)) if delta < 0.0 => old,
            _ => last_y,
        } - node.tree_y;
        let path = Path::new(Point::new(0.0, 0.0))
            .horizontal(TREE_MARGIN_X / 2.0)
            .vertical(bottom);
        let length = path.total_length();

        let dash_offset = match delta {
            Some(delta) => delta.max(0.0),
            None if self.diff.appends(&node.uri) => length,
            None => 0.0,
        };
        let animated = self.diff.appends(&node.uri)
            || self.diff.removes(&node.uri)
            || layout_node
                .children
                .iter()
                .any(|&child| self.diff.touches(&self.nodes[child].uri));

        let index = scene.connectors.len();
        if animated {
            let target = TreeTarget::Connector(index);
            records.push(match delta {
                Some(delta) if delta > 0.0 => AnimationRecord::new(target, AnimationKind::Delta, delta, 0.0),
                Some(delta) => AnimationRecord::new(target, AnimationKind::Delta, 0.0, -delta),
                None => draw_record(target, length, removing),
            });
        }
        scene.connectors.push(TreeConnector {
            glyph,
            kind: ConnectorKind::Fan,
            style: StrokeStyle::Solid,
            path,
            length,
            dash_offset,
            removing,
        });
    }

    fn push_stub(&self, scene: &mut TreeScene, records: &mut Records, glyph: usize, node: &TreeNode, removing: bool) {
        let Some(layout_node) = self.nodes.get(node.key) else {
            return;
        };
        if node.multiple_inheritance_source || !has_parent(layout_node) {
            return;
        }
        let sole_child = layout_node
            .parent
            .and_then(|parent| self.nodes.get(parent))
            .is_some_and(|parent| parent.children.len() == 1);
        let start = if sole_child { -TREE_MARGIN_X } else { -TREE_MARGIN_X / 2.0 };
        let path = Path::new(Point::new(start, 0.0)).horizontal(0.0);
        let length = path.total_length();

        let appended = self.diff.appends(&node.uri);
        let index = scene.connectors.len();
        if appended || removing {
            records.push(draw_record(TreeTarget::Connector(index), length, removing));
        }
        scene.connectors.push(TreeConnector {
            glyph,
            kind: ConnectorKind::Stub,
            style: StrokeStyle::Solid,
            path,
            length,
            dash_offset: if appended { length } else { 0.0 },
            removing,
        });
    }

    fn push_children_dots(&self, scene: &mut TreeScene, glyph: usize, node: &TreeNode, removing: bool) {
        let Some(layout_node) = self.nodes.get(node.key) else {
            return;
        };
        if layout_node.depth == 1 || !layout_node.has_children() {
            return;
        }
        let at_last_level = self
            .closest_focusing_ascendant(node.key)
            .is_some_and(|ascendant| depth_diff(layout_node, &self.nodes[ascendant]) == DEFAULT_MAX_DEPTH as isize);
        if !at_last_level {
            return;
        }
        let path = Path::new(Point::new(20.0, 0.0)).horizontal(50.0);
        scene.connectors.push(TreeConnector {
            glyph,
            kind: ConnectorKind::ChildrenDots,
            style: StrokeStyle::Dotted,
            length: path.total_length(),
            path,
            dash_offset: 0.0,
            removing,
        });
    }

    /// Dashed links from the focused class to its other super classes.
    /// When a sibling chain below the focused class would cross them, the
    /// horizontal link hops over the fan with a small arc.
    fn push_inheritance(&self, scene: &mut TreeScene, records: &mut Records) {
        let count = self.multiple_inheritance_uris.len();
        if count == 0 {
            return;
        }
        let Some(focusing) = self.focusing_node() else {
            return;
        };
        let focusing_y = self.tree_y.get(&focusing.key).copied().unwrap_or(0.0);
        let bridge = focusing
            .parent
            .and_then(|parent| self.nodes.get(parent))
            .map(|parent| {
                parent
                    .children
                    .iter()
                    .filter_map(|child| self.tree_y.get(child))
                    .any(|&y| y > focusing_y)
            })
            .unwrap_or(false);

        let branch_width = TREE_MARGIN_X / 2.0;
        let branch_height = TREE_MARGIN_Y / 2.0;
        let spine_x = if bridge { branch_width / 2.0 } else { branch_width };
        let spine = Path::new(Point::new(spine_x, 0.0)).vertical(branch_height * (count - 1) as f64);
        let entry = if bridge {
            Path::new(Point::new(TREE_MARGIN_X, -branch_height))
                .vertical(0.0)
                .horizontal(branch_width + TREE_BRIDGE_RADIUS)
                .arc(TREE_BRIDGE_RADIUS, true, false, Point::new(branch_width - TREE_BRIDGE_RADIUS, 0.0))
                .horizontal(0.0)
        } else {
            Path::new(Point::new(TREE_MARGIN_X, -branch_height))
                .vertical(0.0)
                .horizontal(0.0)
        };
        let stub = Path::new(Point::new(spine_x, 0.0)).horizontal(0.0);

        let sources: Vec<usize> = scene
            .glyphs
            .iter()
            .enumerate()
            .filter(|(_, glyph)| glyph.multiple_inheritance_source && self.multiple_inheritance_uris.contains(&glyph.uri))
            .map(|(index, _)| index)
            .collect();
        for (position, &glyph) in sources.iter().enumerate() {
            let paths = if position == 0 {
                vec![entry.clone(), spine.clone()]
            } else {
                vec![stub.clone()]
            };
            for path in paths {
                let length = path.total_length();
                if length == 0.0 {
                    continue;
                }
                let index = scene.connectors.len();
                records.push(draw_record(TreeTarget::Connector(index), length, false));
                scene.connectors.push(TreeConnector {
                    glyph,
                    kind: ConnectorKind::Inheritance,
                    style: StrokeStyle::Dashed,
                    path,
                    length,
                    dash_offset: length,
                    removing: false,
                });
            }
        }
    }

    fn push_lineal_path(&self, scene: &mut TreeScene, records: &mut Records) {
        let Some(focusing) = self.focusing_node() else {
            return;
        };
        if focusing.depth <= 1 {
            return;
        }
        let Some(glyph) = scene.glyphs.iter().position(|glyph| {
            !glyph.removing
                && !glyph.multiple_inheritance_source
                && self.nodes.get(glyph.key).is_some_and(|node| node.depth == 1)
                && (glyph.role == GlyphRole::Parent || glyph.role == GlyphRole::Focusing)
        }) else {
            return;
        };

        // (polygonal, dy) per ancestor, from the top level down
        let mut steps = Vec::new();
        let mut current = focusing.parent.and_then(|parent| self.nodes.get(parent));
        while let Some(node) = current.filter(|node| node.depth > 0) {
            let child_y = node
                .children
                .iter()
                .find(|&&child| child == focusing.key || self.is_lineal_ascendant_uri(&self.nodes[child].uri))
                .and_then(|child| self.tree_y.get(child))
                .copied()
                .unwrap_or(0.0);
            let dy = child_y - self.tree_y.get(&node.key).copied().unwrap_or(0.0);
            steps.push((node.children.len() > 1 && dy > 0.0, dy));
            current = node.parent.and_then(|parent| self.nodes.get(parent));
        }
        steps.reverse();

        let (mut x, mut y) = (0.0, 0.0);
        let mut path = Path::new(Point::new(0.0, 0.0));
        for (polygonal, dy) in steps {
            y += dy;
            if polygonal {
                x += TREE_MARGIN_X / 2.0;
                path = path.horizontal(x).vertical(y);
                x += TREE_MARGIN_X / 2.0;
                path = path.horizontal(x);
            } else {
                x += TREE_MARGIN_X;
                path = path.horizontal(x).vertical(y);
            }
        }

        let length = path.total_length();
        let index = scene.connectors.len();
        records.push(draw_record(TreeTarget::Connector(index), length, false));
        scene.connectors.push(TreeConnector {
            glyph,
            kind: ConnectorKind::LinealPath,
            style: StrokeStyle::Solid,
            path,
            length,
            dash_offset: length,
            removing: false,
        });
    }

    /// Counts shown above the parent, child and grandchild columns.
    pub fn class_infos(&self) -> Vec<ClassInfo> {
        let Some(focusing) = self.focusing_node() else {
            return Vec::new();
        };
        let column = |level: InfoLevel| (level.depth() + focusing.depth as isize) as f64 * TREE_MARGIN_X;
        let toggle = |level: InfoLevel| Some(self.state.level_on(level.depth().unsigned_abs()));

        let mut infos = Vec::new();
        if has_parent(focusing) {
            let count = self
                .classes
                .get(&focusing.uri)
                .map_or(0, |detail| detail.parents().len());
            infos.push(ClassInfo {
                level: InfoLevel::Parent,
                x: column(InfoLevel::Parent),
                count,
                toggle: None,
            });
        }
        if focusing.has_children() {
            infos.push(ClassInfo {
                level: InfoLevel::Child,
                x: column(InfoLevel::Child),
                count: focusing.children.len(),
                toggle: toggle(InfoLevel::Child),
            });
        }
        let grandchildren: usize = focusing
            .children
            .iter()
            .map(|&child| self.nodes[child].children.len())
            .sum();
        if grandchildren > 0 {
            infos.push(ClassInfo {
                level: InfoLevel::Grandchild,
                x: column(InfoLevel::Grandchild),
                count: grandchildren,
                toggle: toggle(InfoLevel::Grandchild),
            });
        }
        infos
    }
}

/// Draws a connector in, or erases it when it is on its way out.
fn draw_record(target: TreeTarget, length: f64, erase: bool) -> AnimationRecord<TreeTarget> {
    if erase {
        AnimationRecord::new(target, AnimationKind::DashOffset, 0.0, length)
    } else {
        AnimationRecord::new(target, AnimationKind::DashOffset, length, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{TREE_MARGIN_X, TREE_MARGIN_Y, ViewerConfig};
    use crate::dataset::{ClassDetail, Classes, Structure};
    use crate::layout::{Layout, NodeKey};
    use crate::tree::{ConnectorKind, GlyphRole, InfoLevel, TreeRepository};

    fn key_of(tree: &TreeRepository, uri: &str) -> NodeKey {
        tree.nodes()
            .iter()
            .find(|node| node.uri == uri)
            .map(|node| node.key)
            .unwrap()
    }

    fn family() -> Vec<Structure> {
        // A > B > {C > {G}, D}, A > E
        vec![Structure::with_children(
            "A",
            vec![
                Structure::with_children(
                    "B",
                    vec![Structure::with_children("C", vec![Structure::leaf("G")]), Structure::leaf("D")],
                ),
                Structure::leaf("E"),
            ],
        )]
    }

    fn shown(structure: Vec<Structure>, classes: Classes, focus: &str) -> TreeRepository {
        let layout = Layout::build(&structure, &classes, 1000.0);
        let mut tree = TreeRepository::new(&layout, classes, &ViewerConfig::default());
        let key = key_of(&tree, focus);
        tree.show(Some(key), 0.0);
        tree
    }

    #[test]
    fn focus_and_ancestors_paint_over_the_rest() {
        let tree = shown(family(), Classes::new(), "B");
        let scene = tree.scene();
        let roles: Vec<GlyphRole> = scene.glyphs.iter().map(|glyph| glyph.role).collect();
        assert_eq!(roles[roles.len() - 2..], [GlyphRole::Focusing, GlyphRole::Parent]);
        assert!(roles[..roles.len() - 2].iter().all(|role| *role == GlyphRole::Normal));
        let a = scene.glyphs.iter().find(|glyph| glyph.uri == "A").unwrap();
        assert_eq!(a.role, GlyphRole::Parent);
        assert_eq!(a.x, TREE_MARGIN_X);
    }

    #[test]
    fn lineal_path_reaches_the_focused_column() {
        let tree = shown(family(), Classes::new(), "C");
        let path = tree
            .scene()
            .connectors
            .iter()
            .find(|connector| connector.kind == ConnectorKind::LinealPath)
            .unwrap();
        // A -> B and B -> C both run straight: two columns to the right
        assert_eq!(path.length, 2.0 * TREE_MARGIN_X);
        assert_eq!(tree.connector_dash_offset(tree.scene().connectors.len() - 1), path.length);
    }

    #[test]
    fn child_switch_sits_on_siblings_and_children() {
        let tree = shown(family(), Classes::new(), "D");
        let toggle = |uri: &str| {
            tree.scene()
                .glyphs
                .iter()
                .find(|glyph| glyph.uri == uri)
                .and_then(|glyph| glyph.child_toggle)
        };
        assert_eq!(toggle("C"), Some(true));
        assert_eq!(toggle("D"), None);
        assert_eq!(toggle("A"), None);
    }

    #[test]
    fn header_counts_related_classes() {
        let mut classes = Classes::new();
        classes.insert(
            "B".to_owned(),
            ClassDetail {
                sub_class_of: Some(vec!["A".to_owned()]),
                ..ClassDetail::default()
            },
        );
        let tree = shown(family(), classes, "B");
        let infos = tree.class_infos();
        let levels: Vec<(InfoLevel, usize, Option<bool>)> =
            infos.iter().map(|info| (info.level, info.count, info.toggle)).collect();
        assert_eq!(
            levels,
            vec![
                (InfoLevel::Parent, 1, None),
                (InfoLevel::Child, 2, Some(true)),
                (InfoLevel::Grandchild, 1, Some(true)),
            ]
        );
        assert_eq!(infos[0].x, TREE_MARGIN_X);
    }

    #[test]
    fn fans_start_hidden_when_appended() {
        let tree = shown(family(), Classes::new(), "B");
        let (index, fan) = tree
            .scene()
            .connectors
            .iter()
            .enumerate()
            .find(|(_, connector)| connector.kind == ConnectorKind::Fan && tree.scene().glyphs[connector.glyph].uri == "B")
            .unwrap();
        assert_eq!(fan.length, TREE_MARGIN_X / 2.0 + TREE_MARGIN_Y);
        assert_eq!(tree.connector_dash_offset(index), fan.length);
    }

    #[test]
    fn removed_glyphs_fade_out_then_vanish() {
        let mut tree = shown(family(), Classes::new(), "B");
        tree.tick(1.0);
        tree.toggle_depth(2, 2.0);

        let (index, _) = tree
            .scene()
            .glyphs
            .iter()
            .enumerate()
            .find(|(_, glyph)| glyph.uri == "G")
            .unwrap();
        assert!(tree.scene().glyphs[index].removing);
        assert!(tree.is_glyph_drawn(index));
        assert_eq!(tree.glyph_opacity(index), 1.0);

        tree.tick(3.0);
        assert!(!tree.is_glyph_drawn(index));
    }
}
