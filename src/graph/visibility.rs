//! Which nodes a set of targets pulls into view.

use std::collections::{HashSet, VecDeque};

use crate::layout::{LayoutNode, NodeKey};
use crate::node::{children_and_grandchildren, parents_recursive};

/// Depth of the nodes that are always drawn.
const TOP_LEVEL_DEPTH: usize = 2;

pub(crate) fn top_level(nodes: &[LayoutNode]) -> Vec<NodeKey> {
    nodes
        .iter()
        .filter(|node| node.depth <= TOP_LEVEL_DEPTH)
        .map(|node| node.key)
        .collect()
}

/// Siblings along every target's ancestor path, the targets' children
/// and grandchildren, plus whole single-child chains hanging below
/// label-on-top nodes.
pub(crate) fn visibility_cone(nodes: &[LayoutNode], targets: &[NodeKey]) -> Vec<NodeKey> {
    let route = targets.iter().flat_map(|&target| {
        let mut chain = parents_recursive(nodes, target);
        chain.push(target);
        chain
    });

    let mut cone: Vec<NodeKey> = route
        .flat_map(|key| children_and_grandchildren(nodes, key))
        .collect();
    for &target in targets {
        if let Some(node) = nodes.get(target) {
            cone.extend_from_slice(&node.children);
        }
    }

    let mut stacked = Vec::new();
    for &key in &cone {
        if nodes[key].is_label_on_top {
            collect_stacked_chain(nodes, key, &mut stacked);
        }
    }
    stacked.extend(cone);
    stacked
}

fn collect_stacked_chain(nodes: &[LayoutNode], key: NodeKey, out: &mut Vec<NodeKey>) {
    let node = &nodes[key];
    if let [only_child] = node.children.as_slice() {
        collect_stacked_chain(nodes, *only_child, out);
    }
    out.push(key);
}

/// Each root and its descendants up to `levels` below it, shallow roots first.
pub(crate) fn breadth_first(nodes: &[LayoutNode], roots: &[NodeKey], levels: usize) -> Vec<NodeKey> {
    let mut sorted: Vec<NodeKey> = union([roots.to_vec()]);
    sorted.sort_by_key(|&key| nodes[key].depth);

    let mut result = Vec::new();
    for root in sorted {
        let limit = nodes[root].depth + levels;
        let mut queue = VecDeque::from([root]);
        while let Some(key) = queue.pop_front() {
            let node = &nodes[key];
            if node.depth > limit {
                break;
            }
            result.push(key);
            queue.extend(node.children.iter().copied());
        }
    }
    result
}

/// Concatenation without duplicates, first occurrence wins.
pub(crate) fn union<I>(parts: I) -> Vec<NodeKey>
where
    I: IntoIterator<Item = Vec<NodeKey>>,
{
    let mut seen = HashSet::new();
    parts
        .into_iter()
        .flatten()
        .filter(|key| seen.insert(*key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Classes, Structure};
    use crate::layout::Layout;
    use crate::node::find_uri_node;

    fn key(layout: &Layout, uri: &str) -> NodeKey {
        find_uri_node(&layout.nodes, Some(uri)).map(|node| node.key).unwrap()
    }

    fn uris(layout: &Layout, keys: &[NodeKey]) -> Vec<String> {
        let mut uris: Vec<String> = keys.iter().map(|&k| layout.nodes[k].uri.clone()).collect();
        uris.sort();
        uris.dedup();
        uris
    }

    fn deep_layout() -> Layout {
        // A > B > {C > {D > E, F}, G}
        let structure = vec![Structure::with_children(
            "A",
            vec![Structure::with_children(
                "B",
                vec![
                    Structure::with_children(
                        "C",
                        vec![
                            Structure::with_children("D", vec![Structure::leaf("E")]),
                            Structure::leaf("F"),
                        ],
                    ),
                    Structure::leaf("G"),
                ],
            )],
        )];
        Layout::build(&structure, &Classes::new(), 1000.0)
    }

    #[test]
    fn top_level_stops_at_depth_two() {
        let layout = deep_layout();
        assert_eq!(uris(&layout, &top_level(&layout.nodes)), ["", "A", "B"]);
    }

    #[test]
    fn cone_covers_path_siblings_and_grandchildren() {
        let layout = deep_layout();
        let cone = visibility_cone(&layout.nodes, &[key(&layout, "C")]);
        assert_eq!(uris(&layout, &cone), ["A", "B", "C", "D", "E", "F", "G"]);

        let cone = visibility_cone(&layout.nodes, &[key(&layout, "A")]);
        assert_eq!(uris(&layout, &cone), ["A", "B", "C", "G"]);
    }

    #[test]
    fn stacked_chain_is_pulled_in_whole() {
        // D has a single child E, so D carries its label on top.
        let layout = deep_layout();
        assert!(layout.nodes[key(&layout, "D")].is_label_on_top);

        let mut chain = Vec::new();
        collect_stacked_chain(&layout.nodes, key(&layout, "D"), &mut chain);
        assert_eq!(uris(&layout, &chain), ["D", "E"]);
    }

    #[test]
    fn breadth_first_limits_levels() {
        let layout = deep_layout();
        let found = breadth_first(&layout.nodes, &[key(&layout, "B")], 2);
        assert_eq!(uris(&layout, &found), ["B", "C", "D", "F", "G"]);
    }

    #[test]
    fn union_keeps_first_occurrence() {
        assert_eq!(union([vec![3, 1], vec![1, 2, 3], vec![4]]), [3, 1, 2, 4]);
    }
}
