use std::collections::HashSet;

use super::{GraphRepository, NodeClass};
use crate::layout::{NodeKey, ROOT_KEY};
use crate::node::{children_and_grandchildren, flatten_children};

impl GraphRepository {
    /// Hides de-stacked chains whose top label no longer fits the canvas,
    /// except chains leading to highlighted or related classes.
    pub(super) fn hide_stacked_nodes(&mut self) {
        let hidden: Vec<NodeKey> = self
            .nodes
            .iter()
            .filter(|node| self.is_top_of_stack(node.key) && !self.viewport.shows_label(node))
            .filter_map(|node| node.first_child())
            .flat_map(|child| flatten_children(&self.nodes, child))
            .collect();

        let target_detail = self
            .target_node()
            .and_then(|target| self.classes.get(&target.uri));
        let keep: HashSet<NodeKey> = self
            .nodes
            .iter()
            .filter(|node| {
                self.uris_to_highlight.contains(&node.uri)
                    || target_detail.is_some_and(|detail| {
                        detail.lhs().iter().any(|(subject, _)| *subject == node.uri)
                            || detail.rhs().iter().any(|(_, object)| *object == node.uri)
                    })
            })
            .flat_map(|node| self.should_stay_visible(Some(node.key)))
            .collect();

        self.hidden_stacked = hidden.into_iter().filter(|key| !keep.contains(key)).collect();
        self.restyle_stack_tops();
    }

    fn is_top_of_stack(&self, key: NodeKey) -> bool {
        let node = &self.nodes[key];
        node.is_label_on_top
            && node
                .parent
                .is_some_and(|parent| !self.nodes[parent].is_label_on_top)
    }

    /// Nodes that must stay drawn so `key` remains reachable after its
    /// stack collapses.
    fn should_stay_visible(&self, key: Option<NodeKey>) -> Vec<NodeKey> {
        let Some(key) = key.filter(|&key| key != ROOT_KEY) else {
            return Vec::new();
        };
        let node = &self.nodes[key];
        let mut kept = self.should_stay_visible(node.parent);
        if !node.has_children() {
            return kept;
        }
        if kept.is_empty() {
            return if self.is_top_of_stack(key) {
                children_and_grandchildren(&self.nodes, key)
            } else {
                Vec::new()
            };
        }
        let mut visible = node.children.clone();
        visible.append(&mut kept);
        visible
    }

    /// Stack tops show whether their chain is currently collapsed.
    fn restyle_stack_tops(&mut self) {
        let restyled: Vec<(NodeKey, NodeClass)> = self
            .node_classes
            .iter()
            .filter(|(key, class)| class.is_structural() && self.nodes[**key].is_label_on_top)
            .filter_map(|(&key, _)| {
                let child = self.nodes[key].first_child()?;
                let class = if !self.hidden_stacked.contains(&child) {
                    NodeClass::Node
                } else if self.nodes[child].children.len() > 1 {
                    NodeClass::HiddenChildren
                } else {
                    NodeClass::Leaf
                };
                Some((key, class))
            })
            .collect();
        self.node_classes.extend(restyled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Classes, Structure};
    use crate::graph::test_support::{key_of, repository};

    fn stacked() -> Vec<Structure> {
        // A > B > {C, D}: B is nested inside A.
        vec![
            Structure::with_children(
                "A",
                vec![Structure::with_children("B", vec![Structure::leaf("C"), Structure::leaf("D")])],
            ),
            Structure::leaf("Z"),
        ]
    }

    #[test]
    fn small_stack_top_hides_its_chain() {
        let mut graph = repository(stacked(), Classes::new());
        let a = key_of(&graph, "A");
        let b = key_of(&graph, "B");
        graph.focus(Some(ROOT_KEY), false, false, None);

        // Zoomed far out, A's label cannot be shown.
        graph.viewport.scale = 0.01;
        graph.hide_stacked_nodes();
        assert!(graph.is_hidden_by_stack(b));
        assert!(graph.is_hidden_by_stack(key_of(&graph, "C")));
        assert!(!graph.is_hidden_by_stack(a));
        assert_eq!(graph.node_class(a), Some(NodeClass::HiddenChildren));

        graph.viewport.scale = 1.0;
        graph.hide_stacked_nodes();
        assert!(!graph.is_hidden_by_stack(b));
        assert_eq!(graph.node_class(a), Some(NodeClass::Node));
    }

    #[test]
    fn highlighted_descendant_keeps_chain() {
        let mut graph = repository(stacked(), Classes::new());
        let b = key_of(&graph, "B");
        let c = key_of(&graph, "C");
        graph.focus(Some(ROOT_KEY), false, false, None);
        graph.uris_to_highlight.insert("C".to_owned());

        graph.viewport.scale = 0.01;
        graph.hide_stacked_nodes();
        assert!(!graph.is_hidden_by_stack(b));
        assert!(!graph.is_hidden_by_stack(c));
    }
}
