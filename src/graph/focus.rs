use std::collections::HashSet;

use tracing::{debug, warn};

use super::classify::{PropertyEndpoints, focus_class, property_class, search_class};
use super::lines::{LineKind, RelationLine, RelationSets};
use super::viewport::{CameraAxis, Viewport};
use super::visibility::{breadth_first, top_level, union, visibility_cone};
use super::GraphRepository;
use crate::animation::{AnimationKind, AnimationRecord};
use crate::dataset::ClassDetail;
use crate::layout::{LayoutNode, NodeKey, ROOT_KEY};
use crate::node::{find_key_node, find_uri_node, find_uri_nodes, flatten_children, flatten_parents};
use crate::state::{Action, DetailState, Relation};

/// Relation partners of a class, split by direction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelationPartition {
    /// Objects of triples whose subject is the class.
    pub rhs: Vec<String>,
    /// Subjects of triples whose object is the class.
    pub lhs: Vec<String>,
    /// Partners found on both sides.
    pub both: Vec<String>,
    /// The class relates to itself.
    pub is_oneself: bool,
}

/// Splits the partners of `target_uri`. An explicit `relation` pair
/// overrides the side toggles; the target itself never appears in the
/// resulting lists.
pub fn partition_relations(
    target_uri: &str,
    detail: Option<&ClassDetail>,
    show_rhs: bool,
    show_lhs: bool,
    relation: Option<&Relation>,
) -> RelationPartition {
    let rhs_pairs = detail.map_or(&[][..], ClassDetail::rhs);
    let lhs_pairs = detail.map_or(&[][..], ClassDetail::lhs);
    let picked = |pairs: &[(String, String)], enabled: bool| -> Vec<(String, String)> {
        match relation {
            Some(relation) => pairs.iter().filter(|pair| *pair == relation).cloned().collect(),
            None if enabled => pairs.to_vec(),
            None => Vec::new(),
        }
    };

    let mut rhs: Vec<String> = picked(rhs_pairs, show_rhs)
        .into_iter()
        .map(|(_, object)| object)
        .collect();
    let mut lhs: Vec<String> = picked(lhs_pairs, show_lhs)
        .into_iter()
        .map(|(subject, _)| subject)
        .collect();

    let is_oneself = rhs.iter().chain(&lhs).any(|uri| uri == target_uri);
    for side in [&mut rhs, &mut lhs] {
        let mut seen = HashSet::new();
        side.retain(|uri| uri != target_uri && seen.insert(uri.clone()));
    }

    let both: Vec<String> = rhs.iter().filter(|uri| lhs.contains(uri)).cloned().collect();
    rhs.retain(|uri| !both.contains(uri));
    lhs.retain(|uri| !both.contains(uri));

    RelationPartition {
        rhs,
        lhs,
        both,
        is_oneself,
    }
}

/// What the arrows currently describe.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RelationContext {
    #[default]
    None,
    Focus {
        show_rhs: bool,
        show_lhs: bool,
        relation: Option<Relation>,
    },
    Property {
        uri: Option<String>,
        domain: Option<String>,
        range: Option<String>,
    },
}

/// `subject predicates object`, as prefixed URIs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Triple {
    pub subject: String,
    pub predicates: Vec<String>,
    pub object: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UpdateOutcome {
    Shown,
    /// The view resolved to a state change the host must reduce
    /// (a search with exactly one match focuses that circle).
    Dispatch(Action),
    /// An update was already in progress.
    Busy,
}

impl GraphRepository {
    /// Shows `target_key` with its relation partners and returns the nodes
    /// to fit: the target followed by rhs, lhs and two-way partners.
    pub fn focus(
        &mut self,
        target_key: Option<NodeKey>,
        show_rhs: bool,
        show_lhs: bool,
        relation: Option<&Relation>,
    ) -> Vec<NodeKey> {
        let Some(target) = find_key_node(&self.nodes, target_key) else {
            return Vec::new();
        };
        let target_key = target.key;
        let target_uri = target.uri.clone();

        let partition = partition_relations(
            &target_uri,
            self.classes.get(&target_uri),
            show_rhs,
            show_lhs,
            relation,
        );
        let rhs_nodes = self.keys_with_uri_in(&partition.rhs);
        let lhs_nodes = self.keys_with_uri_in(&partition.lhs);
        let both_nodes = self.keys_with_uri_in(&partition.both);
        let self_nodes: Vec<NodeKey> = if show_rhs || show_lhs {
            self.nodes
                .iter()
                .filter(|node| node.uri == target_uri && node.key != target_key)
                .map(|node| node.key)
                .collect()
        } else {
            Vec::new()
        };

        let topic = union([
            self_nodes.clone(),
            rhs_nodes.clone(),
            lhs_nodes.clone(),
            both_nodes.clone(),
        ]);
        self.visible = union([
            top_level(&self.nodes),
            visibility_cone(&self.nodes, &[target_key]),
            visibility_cone(&self.nodes, &topic),
        ])
        .into_iter()
        .collect();

        self.relations = RelationSets {
            same: self_nodes,
            right: rhs_nodes.clone(),
            left: lhs_nodes.clone(),
            both: both_nodes.clone(),
            self_loop: if partition.is_oneself { vec![target_key] } else { Vec::new() },
        };
        self.context = RelationContext::Focus {
            show_rhs,
            show_lhs,
            relation: relation.cloned(),
        };
        self.tree_button = (!show_rhs && !show_lhs && relation.is_none() && target_key != ROOT_KEY)
            .then_some(target_key);

        self.avoid_collided_label();
        self.node_classes = self
            .visible
            .iter()
            .map(|&key| (key, focus_class(&self.nodes[key], &target_uri, &partition, &self.visible)))
            .collect();

        debug!(
            target = %target_uri,
            visible = self.visible.len(),
            rhs = partition.rhs.len(),
            lhs = partition.lhs.len(),
            both = partition.both.len(),
            "focused class"
        );
        union([vec![target_key], rhs_nodes, lhs_nodes, both_nodes])
    }

    /// Shows the domain and range classes of a property and returns the
    /// nodes to fit.
    pub fn show_property_class(
        &mut self,
        uri: Option<&str>,
        domain: Option<&str>,
        range: Option<&str>,
    ) -> Vec<NodeKey> {
        let domain_nodes = domain.map_or_else(Vec::new, |domain| self.keys_with_uri(domain));
        let range_nodes = range.map_or_else(Vec::new, |range| self.keys_with_uri(range));
        self.target_key = domain_nodes.first().copied();

        let single_parent = |uri: Option<&str>| {
            uri.and_then(|uri| self.classes.get(uri))
                .is_some_and(|detail| detail.parents().len() <= 1)
        };
        let can_draw_triple = single_parent(domain) && single_parent(range);

        self.relations = RelationSets::default();
        if let (Some(domain), Some(range), Some(&object)) = (domain, range, range_nodes.first())
            && can_draw_triple
        {
            if domain == range {
                self.relations.self_loop = vec![object];
            } else {
                self.relations.right = vec![object];
            }
        }
        self.tree_button = None;
        self.context = RelationContext::Property {
            uri: uri.map(str::to_owned),
            domain: domain.map(str::to_owned),
            range: range.map(str::to_owned),
        };

        let focus_roots = union([
            visibility_cone(&self.nodes, &domain_nodes),
            visibility_cone(&self.nodes, &range_nodes),
        ]);
        self.visible = union([top_level(&self.nodes), focus_roots.clone()])
            .into_iter()
            .collect();
        self.avoid_collided_label();

        let endpoints = PropertyEndpoints {
            domain,
            range,
            domain_children: breadth_first(&self.nodes, &domain_nodes, 2).into_iter().collect(),
            range_children: if domain == range {
                HashSet::new()
            } else {
                breadth_first(&self.nodes, &range_nodes, 2).into_iter().collect()
            },
        };
        self.node_classes = self
            .visible
            .iter()
            .map(|&key| (key, property_class(&self.nodes[key], &endpoints, &self.visible)))
            .collect();

        debug!(?domain, ?range, visible = self.visible.len(), "showing property classes");
        union([domain_nodes, range_nodes, focus_roots])
    }

    /// Shows every occurrence of `uri` and returns the matches.
    pub fn search(&mut self, uri: &str) -> Vec<NodeKey> {
        let matched = self.keys_with_uri(uri);
        self.visible = union([top_level(&self.nodes), visibility_cone(&self.nodes, &matched)])
            .into_iter()
            .collect();
        self.avoid_collided_label();
        self.node_classes = self
            .visible
            .iter()
            .map(|&key| (key, search_class(&self.nodes[key], uri, &self.visible)))
            .collect();

        debug!(uri, matches = matched.len(), "searched class");
        matched
    }

    /// Re-derives the whole view from `detail`: picks the active mode,
    /// recomputes visibility and classes, fits the camera and rebuilds the
    /// frame.
    pub fn update(&mut self, detail: &DetailState, animate: bool, now: f64) -> UpdateOutcome {
        if self.updating {
            warn!("graph update requested while another one is running");
            return UpdateOutcome::Busy;
        }
        self.updating = true;
        let outcome = self.apply_detail(detail, animate, now);
        self.updating = false;
        outcome
    }

    fn apply_detail(&mut self, detail: &DetailState, animate: bool, now: f64) -> UpdateOutcome {
        self.viewport.manually_zoomed = false;
        let focusing_key = self.resolve_focus(detail);
        self.target_key = focusing_key;
        self.update_highlight(detail);

        if detail.focusing_uri.is_some() {
            let circles = match &detail.showing_relation {
                Some(relation) => self.focus(focusing_key, true, true, Some(relation)),
                None => self.focus(
                    focusing_key,
                    detail.show_right_hand,
                    detail.show_left_hand,
                    None,
                ),
            };
            debug!(mode = "focus", circles = circles.len(), "graph update");
            self.show_circles(&circles, animate, now);
            return UpdateOutcome::Shown;
        }

        let property = &detail.property_class;
        if property.is_active() {
            self.clear_relations();
            let circles = self.show_property_class(
                property.uri.as_deref(),
                property.domain.as_deref(),
                property.range.as_deref(),
            );
            if !circles.is_empty() {
                debug!(mode = "property", circles = circles.len(), "graph update");
                self.show_circles(&circles, animate, now);
                return UpdateOutcome::Shown;
            }
        }

        if let Some(searching) = &detail.searching_uri {
            self.clear_relations();
            let matched = self.search(searching);
            if let [only] = matched.as_slice() {
                debug!(mode = "search", "single match, focusing it");
                return UpdateOutcome::Dispatch(Action::FocusCircle {
                    key: Some(*only),
                    uri: Some(searching.clone()),
                });
            }
            if !matched.is_empty() {
                debug!(mode = "search", circles = matched.len(), "graph update");
                self.show_circles(&matched, animate, now);
                return UpdateOutcome::Shown;
            }
        }

        let circles = self.focus(Some(ROOT_KEY), false, false, None);
        debug!(mode = "overview", "graph update");
        self.show_circles(&circles, animate, now);
        UpdateOutcome::Shown
    }

    /// Key of the focused occurrence. Keys change whenever the layout is
    /// rebuilt, so a key naming another class than `focusing_uri` is
    /// dropped in favour of the first occurrence of that URI.
    fn resolve_focus(&self, detail: &DetailState) -> Option<NodeKey> {
        let uri = detail.focusing_uri.as_deref();
        detail
            .focusing_circle_key
            .filter(|&key| {
                self.nodes
                    .get(key)
                    .is_some_and(|node| uri.is_none_or(|uri| node.uri == uri))
            })
            .or_else(|| find_uri_node(&self.nodes, uri).map(|node| node.key))
    }

    fn clear_relations(&mut self) {
        self.relations = RelationSets::default();
        self.context = RelationContext::None;
        self.tree_button = None;
    }

    fn show_circles(&mut self, circles: &[NodeKey], animate: bool, now: f64) {
        let from = self.displayed_viewport();
        let fitted: Vec<&LayoutNode> = circles.iter().filter_map(|&key| self.nodes.get(key)).collect();
        self.viewport.fit(&fitted);

        let records = camera_records(&from, &self.viewport);
        if animate && !records.is_empty() {
            self.camera.start(records, now);
        } else {
            self.camera.cancel();
        }
        self.hide_stacked_nodes();
        self.refresh_frame();
    }

    /// Collects the classes that get a highlight ring: the active search,
    /// property endpoints, the focused class and its shown partners.
    pub(super) fn update_highlight(&mut self, detail: &DetailState) {
        let target_detail = self.target_node().and_then(|target| self.classes.get(&target.uri));
        let mut candidates: HashSet<&str> = [
            detail.searching_uri.as_deref(),
            detail.property_class.domain.as_deref(),
            detail.property_class.range.as_deref(),
            detail.focusing_uri.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if let Some(target_detail) = target_detail {
            if detail.show_right_hand {
                candidates.extend(target_detail.rhs().iter().map(|(_, object)| object.as_str()));
            }
            if detail.show_left_hand {
                candidates.extend(target_detail.lhs().iter().map(|(subject, _)| subject.as_str()));
            }
        }

        let highlighted: Vec<NodeKey> = self
            .nodes
            .iter()
            .filter(|node| node.key != ROOT_KEY && candidates.contains(node.uri.as_str()))
            .map(|node| node.key)
            .collect();
        let uris: HashSet<String> = highlighted.iter().map(|&key| self.nodes[key].uri.clone()).collect();
        let children: HashSet<NodeKey> = highlighted
            .iter()
            .flat_map(|&key| flatten_children(&self.nodes, key))
            .collect();

        self.uris_to_highlight = uris;
        self.children_of_highlight = children;
    }

    /// Predicates linking the focused class and `partner`, for the arrow
    /// popup.
    pub fn predicates_for(&self, partner: NodeKey) -> Vec<String> {
        match &self.context {
            RelationContext::None => Vec::new(),
            RelationContext::Property { uri, .. } => uri.iter().cloned().collect(),
            RelationContext::Focus {
                show_rhs,
                show_lhs,
                relation,
            } => {
                let (Some(target), Some(partner)) = (self.target_node(), self.nodes.get(partner)) else {
                    return Vec::new();
                };
                let Some(detail) = self.classes.get(&target.uri) else {
                    return Vec::new();
                };
                let matches = |pair: &(String, String), partner_side: &String| match relation {
                    Some(relation) => pair == relation,
                    None => *partner_side == partner.uri,
                };

                let rhs = detail
                    .rhs()
                    .iter()
                    .filter(|pair| *show_rhs && matches(*pair, &pair.1))
                    .map(|(predicate, _)| predicate.clone());
                let lhs = detail
                    .lhs()
                    .iter()
                    .filter(|pair| *show_lhs && matches(*pair, &pair.0))
                    .map(|(_, predicate)| predicate.clone());
                rhs.chain(lhs).collect()
            }
        }
    }

    /// Triple an arrow stands for, used to build its instance query.
    pub fn triple_for(&self, line: &RelationLine) -> Option<Triple> {
        match &self.context {
            RelationContext::None => None,
            RelationContext::Property { uri, domain, range } => {
                let (uri, domain) = (uri.clone()?, domain.clone()?);
                let object = match line.kind {
                    LineKind::SelfLoop => domain.clone(),
                    _ => range.clone()?,
                };
                Some(Triple {
                    subject: domain,
                    predicates: vec![uri],
                    object,
                })
            }
            RelationContext::Focus { .. } => {
                let focused = self.target_node()?.uri.clone();
                let partner = self.nodes.get(line.partner)?.uri.clone();
                let predicates = self.predicates_for(line.partner);
                let (subject, object) = match line.kind {
                    LineKind::Same => return None,
                    LineKind::Left => (partner, focused),
                    LineKind::SelfLoop => (partner.clone(), partner),
                    LineKind::Right | LineKind::Both => (focused, partner),
                };
                Some(Triple {
                    subject,
                    predicates,
                    object,
                })
            }
        }
    }

    /// Ancestors of `focusing_key` below the synthetic root, ending with
    /// the node itself.
    pub fn breadcrumbs(&self, focusing_key: Option<NodeKey>) -> Vec<NodeKey> {
        let Some(key) = focusing_key.filter(|&key| key != ROOT_KEY && key < self.nodes.len()) else {
            return Vec::new();
        };
        flatten_parents(&self.nodes, key).into_iter().skip(1).collect()
    }

    fn keys_with_uri(&self, uri: &str) -> Vec<NodeKey> {
        find_uri_nodes(&self.nodes, uri).into_iter().map(|node| node.key).collect()
    }

    fn keys_with_uri_in(&self, uris: &[String]) -> Vec<NodeKey> {
        if uris.is_empty() {
            return Vec::new();
        }
        let uris: HashSet<&str> = uris.iter().map(String::as_str).collect();
        self.nodes
            .iter()
            .filter(|node| uris.contains(node.uri.as_str()))
            .map(|node| node.key)
            .collect()
    }
}

fn camera_records(from: &Viewport, to: &Viewport) -> Vec<AnimationRecord<CameraAxis>> {
    [
        (CameraAxis::Scale, from.scale, to.scale),
        (CameraAxis::TranslateX, from.translate_x, to.translate_x),
        (CameraAxis::TranslateY, from.translate_y, to.translate_y),
    ]
    .into_iter()
    .filter(|(_, start, end)| start != end)
    .map(|(axis, start, end)| AnimationRecord::new(axis, AnimationKind::Camera, start, end))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeClass;
    use crate::dataset::{Classes, Structure};
    use crate::graph::test_support::{key_of, repository, visible_uris};
    use crate::layout::Layout;
    use crate::state::PropertyClass;

    fn pairs(items: &[(&str, &str)]) -> Option<Vec<(String, String)>> {
        Some(items.iter().map(|(a, b)| ((*a).to_owned(), (*b).to_owned())).collect())
    }

    fn structure() -> Vec<Structure> {
        vec![
            Structure::with_children("A", vec![Structure::leaf("B"), Structure::leaf("C")]),
            Structure::with_children(
                "D",
                vec![Structure::with_children("E", vec![Structure::leaf("G")]), Structure::leaf("F")],
            ),
        ]
    }

    fn classes() -> Classes {
        let mut classes = Classes::new();
        classes.insert(
            "B".to_owned(),
            ClassDetail {
                rhs: pairs(&[("p", "C"), ("q", "G"), ("r", "B")]),
                lhs: pairs(&[("G", "s"), ("F", "t")]),
                ..ClassDetail::default()
            },
        );
        classes
    }

    fn focusing(graph: &GraphRepository, uri: &str) -> DetailState {
        DetailState {
            focusing_uri: Some(uri.to_owned()),
            focusing_circle_key: Some(key_of(graph, uri)),
            ..DetailState::default()
        }
    }

    #[test]
    fn partition_splits_sides_and_detects_self() {
        let classes = classes();
        let partition = partition_relations("B", classes.get("B"), true, true, None);
        assert_eq!(partition.rhs, vec!["C".to_owned()]);
        assert_eq!(partition.lhs, vec!["F".to_owned()]);
        assert_eq!(partition.both, vec!["G".to_owned()]);
        assert!(partition.is_oneself);

        let rhs_only = partition_relations("B", classes.get("B"), true, false, None);
        assert_eq!(rhs_only.rhs, vec!["C".to_owned(), "G".to_owned()]);
        assert!(rhs_only.lhs.is_empty());
    }

    #[test]
    fn explicit_relation_overrides_side_toggles() {
        let classes = classes();
        let relation = ("q".to_owned(), "G".to_owned());
        let partition = partition_relations("B", classes.get("B"), false, false, Some(&relation));
        assert_eq!(partition.rhs, vec!["G".to_owned()]);
        assert!(partition.lhs.is_empty());
        assert!(!partition.is_oneself);
    }

    #[test]
    fn unknown_class_has_no_partners() {
        assert_eq!(
            partition_relations("X", None, true, true, None),
            RelationPartition::default()
        );
    }

    #[test]
    fn focus_reveals_partners_and_offers_tree_button() {
        let mut graph = repository(structure(), classes());
        let b = key_of(&graph, "B");
        let circles = graph.focus(Some(b), true, false, None);

        assert_eq!(circles[0], b);
        assert!(circles.contains(&key_of(&graph, "G")));
        assert!(visible_uris(&graph).contains(&"G".to_owned()));
        assert_eq!(graph.node_class(b), Some(NodeClass::Focusing));
        assert_eq!(graph.node_class(key_of(&graph, "G")), Some(NodeClass::RangeLeaf));
        assert_eq!(graph.tree_button_key(), None);

        graph.focus(Some(b), false, false, None);
        assert_eq!(graph.tree_button_key(), Some(b));
        assert!(graph.relations.right.is_empty());
    }

    #[test]
    fn repeated_update_is_stable() {
        let mut graph = repository(structure(), classes());
        let mut detail = focusing(&graph, "B");
        detail.show_left_hand = true;

        assert_eq!(graph.update(&detail, false, 0.0), UpdateOutcome::Shown);
        let first_visible = visible_uris(&graph);
        let first_viewport = graph.viewport().clone();
        graph.update(&detail, false, 0.0);
        assert_eq!(visible_uris(&graph), first_visible);
        assert_eq!(graph.viewport(), &first_viewport);
    }

    #[test]
    fn returning_to_overview_restores_the_view() {
        let mut graph = repository(structure(), classes());
        graph.update(&DetailState::default(), false, 0.0);
        let overview = visible_uris(&graph);
        let overview_scale = graph.viewport().scale;

        graph.update(&focusing(&graph, "G"), false, 0.0);
        assert!(graph.viewport().scale > overview_scale);

        graph.update(&DetailState::default(), false, 0.0);
        assert_eq!(visible_uris(&graph), overview);
        assert_eq!(graph.viewport().scale, overview_scale);
    }

    #[test]
    fn key_is_resolved_from_uri() {
        let mut graph = repository(structure(), classes());
        let detail = DetailState {
            focusing_uri: Some("E".to_owned()),
            ..DetailState::default()
        };
        graph.update(&detail, false, 0.0);
        assert_eq!(graph.target_key(), Some(key_of(&graph, "E")));
        assert!(graph.is_highlighted("E"));
    }

    #[test]
    fn single_search_match_asks_for_focus() {
        let mut graph = repository(structure(), classes());
        let detail = DetailState {
            searching_uri: Some("F".to_owned()),
            ..DetailState::default()
        };
        let outcome = graph.update(&detail, false, 0.0);
        assert_eq!(
            outcome,
            UpdateOutcome::Dispatch(Action::FocusCircle {
                key: Some(key_of(&graph, "F")),
                uri: Some("F".to_owned()),
            })
        );
    }

    #[test]
    fn unknown_search_falls_back_to_overview() {
        let mut graph = repository(structure(), classes());
        let detail = DetailState {
            searching_uri: Some("nothing".to_owned()),
            ..DetailState::default()
        };
        assert_eq!(graph.update(&detail, false, 0.0), UpdateOutcome::Shown);
        assert_eq!(graph.node_class(ROOT_KEY), Some(NodeClass::Root));
    }

    #[test]
    fn property_classes_draw_one_arrow() {
        let mut classes = classes();
        classes.insert("F".to_owned(), ClassDetail::default());
        let mut graph = repository(structure(), classes);
        let detail = DetailState {
            property_class: PropertyClass {
                uri: Some("p".to_owned()),
                domain: Some("B".to_owned()),
                range: Some("F".to_owned()),
            },
            ..DetailState::default()
        };
        graph.update(&detail, false, 0.0);

        let b = key_of(&graph, "B");
        let f = key_of(&graph, "F");
        assert_eq!(graph.target_key(), Some(b));
        assert!(graph.node_class(b).is_some_and(NodeClass::is_domain));
        assert!(graph.node_class(f).is_some_and(NodeClass::is_range));
        assert_eq!(graph.frame().lines.len(), 1);

        let line = graph.frame().lines[0].clone();
        assert_eq!(graph.predicates_for(line.partner), vec!["p".to_owned()]);
        assert_eq!(
            graph.triple_for(&line),
            Some(Triple {
                subject: "B".to_owned(),
                predicates: vec!["p".to_owned()],
                object: "F".to_owned(),
            })
        );
    }

    #[test]
    fn left_arrow_triple_points_at_focus() {
        let mut graph = repository(structure(), classes());
        let mut detail = focusing(&graph, "B");
        detail.show_left_hand = true;
        graph.update(&detail, false, 0.0);

        let f = key_of(&graph, "F");
        let line = graph
            .frame()
            .lines
            .iter()
            .find(|line| line.partner == f)
            .cloned()
            .unwrap();
        assert_eq!(line.kind, LineKind::Left);
        assert_eq!(
            graph.triple_for(&line),
            Some(Triple {
                subject: "F".to_owned(),
                predicates: vec!["t".to_owned()],
                object: "B".to_owned(),
            })
        );
    }

    #[test]
    fn breadcrumbs_skip_the_synthetic_root() {
        let graph = repository(structure(), classes());
        let g = key_of(&graph, "G");
        let trail: Vec<&str> = graph
            .breadcrumbs(Some(g))
            .into_iter()
            .map(|key| graph.nodes()[key].uri.as_str())
            .collect();
        assert_eq!(trail, vec!["D", "E", "G"]);
        assert!(graph.breadcrumbs(Some(ROOT_KEY)).is_empty());
        assert!(graph.breadcrumbs(None).is_empty());
    }

    #[test]
    fn animated_update_moves_the_camera() {
        let mut graph = repository(structure(), classes());
        graph.update(&DetailState::default(), false, 0.0);
        graph.update(&focusing(&graph, "G"), true, 0.0);
        assert!(graph.is_animating());
        assert!(graph.displayed_viewport().scale < graph.viewport().scale);
    }

    #[test]
    fn stale_key_after_rebuild_falls_back_to_uri() {
        let mut graph = repository(structure(), classes());
        let detail = focusing(&graph, "B");
        graph.update(&detail, false, 0.0);

        let rebuild = |graph: &mut GraphRepository, forest: Vec<Structure>| {
            let layout = Layout::build(&forest, &classes(), 1000.0);
            graph.replace_layout(layout, classes());
            graph.update(&detail, false, 0.0);
            graph.target_node().map(|node| node.uri.clone())
        };

        let reordered = vec![
            Structure::with_children("D", vec![Structure::leaf("G"), Structure::leaf("F")]),
            Structure::with_children("A", vec![Structure::leaf("C"), Structure::leaf("B")]),
        ];
        assert_eq!(rebuild(&mut graph, reordered).as_deref(), Some("B"));

        let smaller = vec![Structure::leaf("B")];
        assert_eq!(rebuild(&mut graph, smaller).as_deref(), Some("B"));
        assert_eq!(graph.breadcrumbs(graph.target_key()).len(), 1);
    }
}
