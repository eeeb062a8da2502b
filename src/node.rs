//! Read-only traversal helpers over the layout arena.
//!
//! Lookups tolerate missing keys and URIs by returning `None` or an empty
//! list.

use crate::layout::{LayoutNode, NodeKey, ROOT_KEY};

pub fn find_key_node(nodes: &[LayoutNode], key: Option<NodeKey>) -> Option<&LayoutNode> {
    nodes.get(key?)
}

pub fn find_uri_node<'a>(nodes: &'a [LayoutNode], uri: Option<&str>) -> Option<&'a LayoutNode> {
    let uri = uri.filter(|uri| !uri.is_empty())?;
    nodes.iter().find(|node| node.uri == uri)
}

pub fn find_uri_nodes<'a>(nodes: &'a [LayoutNode], uri: &str) -> Vec<&'a LayoutNode> {
    nodes.iter().filter(|node| node.uri == uri).collect()
}

fn parent_of<'a>(nodes: &'a [LayoutNode], node: &LayoutNode) -> Option<&'a LayoutNode> {
    node.parent.and_then(|key| nodes.get(key))
}

/// Descendants in post-order followed by `node` itself.
pub fn flatten_children(nodes: &[LayoutNode], key: NodeKey) -> Vec<NodeKey> {
    let mut out = Vec::new();
    collect_post_order(nodes, key, &mut out);
    out
}

fn collect_post_order(nodes: &[LayoutNode], key: NodeKey, out: &mut Vec<NodeKey>) {
    let Some(node) = nodes.get(key) else {
        return;
    };
    for &child in &node.children {
        collect_post_order(nodes, child, out);
    }
    out.push(key);
}

/// Ancestor chain from the root down to and including `key`.
pub fn flatten_parents(nodes: &[LayoutNode], key: NodeKey) -> Vec<NodeKey> {
    let mut chain = parents_recursive(nodes, key);
    if key < nodes.len() {
        chain.push(key);
    }
    chain
}

/// Strict ancestors ordered from the root downwards.
pub fn parents_recursive(nodes: &[LayoutNode], key: NodeKey) -> Vec<NodeKey> {
    let mut chain = Vec::new();
    let mut current = nodes.get(key).and_then(|node| node.parent);
    while let Some(parent) = current {
        chain.push(parent);
        current = nodes.get(parent).and_then(|node| node.parent);
    }
    chain.reverse();
    chain
}

/// Each child followed by that child's own children.
pub fn children_and_grandchildren(nodes: &[LayoutNode], key: NodeKey) -> Vec<NodeKey> {
    let Some(node) = nodes.get(key) else {
        return Vec::new();
    };
    node.children
        .iter()
        .flat_map(|&child| std::iter::once(child).chain(nodes[child].children.iter().copied()))
        .collect()
}

/// Top-level (depth 1) ancestor of `key`, or the node itself when it is
/// already top-level or the root.
pub fn root_node(nodes: &[LayoutNode], key: NodeKey) -> Option<&LayoutNode> {
    let mut node = nodes.get(key)?;
    while node.depth > 1 {
        match parent_of(nodes, node) {
            Some(parent) => node = parent,
            None => break,
        }
    }
    Some(node)
}

/// Ancestors below the synthetic root.
pub fn lineal_ascendants(nodes: &[LayoutNode], key: NodeKey) -> Vec<NodeKey> {
    parents_recursive(nodes, key)
        .into_iter()
        .filter(|&parent| nodes[parent].depth > 0)
        .collect()
}

pub fn is_lineal_child(nodes: &[LayoutNode], node: &LayoutNode, focusing: &LayoutNode) -> bool {
    parent_of(nodes, node).is_some_and(|parent| parent.uri == focusing.uri)
}

pub fn depth_diff(upper: &LayoutNode, node: &LayoutNode) -> isize {
    upper.depth as isize - node.depth as isize
}

pub fn has_parent(node: &LayoutNode) -> bool {
    node.parent.is_some_and(|parent| parent != ROOT_KEY)
}

pub fn node_uris(nodes: &[LayoutNode], keys: &[NodeKey]) -> Vec<String> {
    keys.iter()
        .filter_map(|&key| nodes.get(key))
        .map(|node| node.uri.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Classes, Structure};
    use crate::layout::Layout;

    fn layout() -> Layout {
        let forest = vec![
            Structure::with_children(
                "A",
                vec![
                    Structure::with_children("B", vec![Structure::leaf("C"), Structure::leaf("D")]),
                    Structure::leaf("E"),
                ],
            ),
            Structure::leaf("F"),
        ];
        Layout::build(&forest, &Classes::new(), 400.0)
    }

    fn key(layout: &Layout, uri: &str) -> NodeKey {
        find_uri_node(&layout.nodes, Some(uri)).unwrap().key
    }

    fn uris(layout: &Layout, keys: &[NodeKey]) -> Vec<String> {
        let mut uris = node_uris(&layout.nodes, keys);
        uris.sort();
        uris
    }

    #[test]
    fn missing_lookups_are_empty() {
        let layout = layout();
        assert!(find_key_node(&layout.nodes, None).is_none());
        assert!(find_key_node(&layout.nodes, Some(999)).is_none());
        assert!(find_uri_node(&layout.nodes, None).is_none());
        assert!(find_uri_node(&layout.nodes, Some("")).is_none());
        assert!(flatten_children(&layout.nodes, 999).is_empty());
        assert!(flatten_parents(&layout.nodes, 999).is_empty());
        assert!(children_and_grandchildren(&layout.nodes, 999).is_empty());
    }

    #[test]
    fn flatten_children_ends_with_self() {
        let layout = layout();
        let b = key(&layout, "B");
        let flattened = flatten_children(&layout.nodes, b);
        assert_eq!(flattened.last(), Some(&b));
        assert_eq!(uris(&layout, &flattened), ["B", "C", "D"]);
    }

    #[test]
    fn ancestors_run_from_the_root() {
        let layout = layout();
        let c = key(&layout, "C");
        let chain = flatten_parents(&layout.nodes, c);
        let names: Vec<_> = chain.iter().map(|&k| layout.nodes[k].uri.as_str()).collect();
        assert_eq!(names, ["", "A", "B", "C"]);

        let lineal: Vec<_> = lineal_ascendants(&layout.nodes, c)
            .iter()
            .map(|&k| layout.nodes[k].uri.as_str())
            .collect();
        assert_eq!(lineal, ["A", "B"]);
        assert_eq!(root_node(&layout.nodes, c).map(|n| n.uri.as_str()), Some("A"));
    }

    #[test]
    fn grandchildren_are_included_once() {
        let layout = layout();
        let a = key(&layout, "A");
        assert_eq!(
            uris(&layout, &children_and_grandchildren(&layout.nodes, a)),
            ["B", "C", "D", "E"]
        );
    }

    #[test]
    fn relation_helpers() {
        let layout = layout();
        let nodes = &layout.nodes;
        let a = &nodes[key(&layout, "A")];
        let b = &nodes[key(&layout, "B")];
        let c = &nodes[key(&layout, "C")];

        assert_eq!(depth_diff(c, a), 2);
        assert_eq!(depth_diff(a, b), -1);
        assert!(is_lineal_child(nodes, b, a));
        assert!(!is_lineal_child(nodes, c, a));
        assert!(!has_parent(a));
        assert!(has_parent(b));
    }
}
