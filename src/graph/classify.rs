use std::collections::{BTreeSet, HashSet};

use super::focus::RelationPartition;
use crate::layout::{LayoutNode, NodeKey};

/// Visual role of a visible circle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeClass {
    Root,
    Node,
    Leaf,
    HiddenChildren,
    Focusing,
    Searching,
    DomainNode,
    DomainLeaf,
    RangeNode,
    RangeLeaf,
    DomainRangeNode,
    DomainRangeLeaf,
    Both,
}

impl NodeClass {
    pub fn name(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Node => "node",
            Self::Leaf => "leaf",
            Self::HiddenChildren => "hidden-children",
            Self::Focusing => "focusing",
            Self::Searching => "searching",
            Self::DomainNode => "domain-node",
            Self::DomainLeaf => "domain-leaf",
            Self::RangeNode => "range-node",
            Self::RangeLeaf => "range-leaf",
            Self::DomainRangeNode => "domain-range-node",
            Self::DomainRangeLeaf => "domain-range-leaf",
            Self::Both => "both-relation",
        }
    }

    /// Plain hierarchy roles that stacked-node hiding may rewrite.
    pub fn is_structural(self) -> bool {
        matches!(self, Self::Node | Self::Leaf | Self::HiddenChildren)
    }

    pub fn is_domain(self) -> bool {
        matches!(self, Self::DomainNode | Self::DomainLeaf)
    }

    pub fn is_range(self) -> bool {
        matches!(self, Self::RangeNode | Self::RangeLeaf)
    }
}

pub(crate) fn normal_class(node: &LayoutNode, visible: &BTreeSet<NodeKey>) -> NodeClass {
    if node.is_root() {
        return NodeClass::Root;
    }
    match node.first_child() {
        None => NodeClass::Leaf,
        Some(child) if visible.contains(&child) => NodeClass::Node,
        Some(_) => NodeClass::HiddenChildren,
    }
}

pub(crate) fn focus_class(
    node: &LayoutNode,
    target_uri: &str,
    partition: &RelationPartition,
    visible: &BTreeSet<NodeKey>,
) -> NodeClass {
    let uri = node.uri.as_str();
    if partition.both.iter().any(|partner| partner == uri) {
        NodeClass::Both
    } else if partition.rhs.iter().any(|partner| partner == uri) {
        NodeClass::RangeLeaf
    } else if partition.lhs.iter().any(|partner| partner == uri) {
        NodeClass::DomainLeaf
    } else if !node.is_root() && uri == target_uri {
        NodeClass::Focusing
    } else {
        normal_class(node, visible)
    }
}

pub(crate) fn search_class(node: &LayoutNode, searching: &str, visible: &BTreeSet<NodeKey>) -> NodeClass {
    if node.uri == searching {
        NodeClass::Searching
    } else {
        normal_class(node, visible)
    }
}

/// Endpoints of a property and the nodes within two levels below them.
pub(crate) struct PropertyEndpoints<'a> {
    pub domain: Option<&'a str>,
    pub range: Option<&'a str>,
    pub domain_children: HashSet<NodeKey>,
    pub range_children: HashSet<NodeKey>,
}

pub(crate) fn property_class(
    node: &LayoutNode,
    endpoints: &PropertyEndpoints<'_>,
    visible: &BTreeSet<NodeKey>,
) -> NodeClass {
    let uri = Some(node.uri.as_str()).filter(|uri| !uri.is_empty());
    let has_children = node.has_children();

    if endpoints.domain == endpoints.range {
        if uri.is_some() && uri == endpoints.domain {
            return if has_children {
                NodeClass::DomainRangeNode
            } else {
                NodeClass::DomainRangeLeaf
            };
        }
        if endpoints.domain_children.contains(&node.key) {
            return NodeClass::DomainRangeLeaf;
        }
        return normal_class(node, visible);
    }

    if uri.is_some() && uri == endpoints.domain {
        return if has_children { NodeClass::DomainNode } else { NodeClass::DomainLeaf };
    }
    if uri.is_some() && uri == endpoints.range {
        return if has_children { NodeClass::RangeNode } else { NodeClass::RangeLeaf };
    }
    if endpoints.domain_children.contains(&node.key) {
        return NodeClass::DomainLeaf;
    }
    if endpoints.range_children.contains(&node.key) {
        return NodeClass::RangeLeaf;
    }
    normal_class(node, visible)
}
