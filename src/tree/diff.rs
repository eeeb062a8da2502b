use std::collections::HashSet;

use super::TreeNode;

/// Changes between two consecutive sets of visible tree nodes, by URI.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeDiff {
    pub append: Vec<String>,
    pub remove: Vec<String>,
    pub moved: Vec<String>,
}

impl TreeDiff {
    /// `extra_append` is added to the appended set even when already
    /// visible (multiple-inheritance stubs are redrawn on every change).
    pub fn between(old: &[TreeNode], new: &[TreeNode], extra_append: &[String]) -> Self {
        let old_uris: HashSet<&str> = old.iter().map(|node| node.uri.as_str()).collect();
        let new_uris: HashSet<&str> = new.iter().map(|node| node.uri.as_str()).collect();

        let mut append = unique(
            new.iter()
                .map(|node| node.uri.as_str())
                .filter(|uri| !old_uris.contains(uri)),
        );
        for uri in extra_append {
            if !append.contains(uri) {
                append.push(uri.clone());
            }
        }
        let remove = unique(
            old.iter()
                .map(|node| node.uri.as_str())
                .filter(|uri| !new_uris.contains(uri)),
        );
        let moved = unique(
            old.iter()
                .map(|node| node.uri.as_str())
                .filter(|uri| new_uris.contains(uri))
                .filter(|uri| {
                    new.iter()
                        .find(|node| node.uri == *uri)
                        .is_some_and(TreeNode::has_moved)
                }),
        );

        Self { append, remove, moved }
    }

    /// Every node of `new` counts as appended.
    pub fn from_scratch(new: &[TreeNode], extra_append: &[String]) -> Self {
        Self::between(&[], new, extra_append)
    }

    pub fn is_empty(&self) -> bool {
        self.append.is_empty() && self.remove.is_empty() && self.moved.is_empty()
    }

    pub fn appends(&self, uri: &str) -> bool {
        self.append.iter().any(|appended| appended == uri)
    }

    pub fn removes(&self, uri: &str) -> bool {
        self.remove.iter().any(|removed| removed == uri)
    }

    pub fn moves(&self, uri: &str) -> bool {
        self.moved.iter().any(|moved| moved == uri)
    }

    pub fn touches(&self, uri: &str) -> bool {
        self.appends(uri) || self.removes(uri) || self.moves(uri)
    }
}

fn unique<'a>(uris: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    uris.filter(|uri| seen.insert(*uri)).map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(uri: &str, tree_y: f64, old_tree_y: Option<f64>) -> TreeNode {
        TreeNode {
            key: 1,
            uri: uri.to_owned(),
            depth: 1,
            tree_y,
            old_tree_y,
            multiple_inheritance_source: false,
        }
    }

    #[test]
    fn partitions_by_membership_and_offset() {
        let old = vec![node("a", 0.0, None), node("b", 150.0, None), node("c", 300.0, None)];
        let new = vec![
            node("a", 0.0, Some(0.0)),
            node("c", 150.0, Some(300.0)),
            node("d", 300.0, None),
        ];
        let diff = TreeDiff::between(&old, &new, &[]);
        assert_eq!(diff.append, vec!["d".to_owned()]);
        assert_eq!(diff.remove, vec!["b".to_owned()]);
        assert_eq!(diff.moved, vec!["c".to_owned()]);
    }

    #[test]
    fn extra_appends_are_not_duplicated() {
        let new = vec![node("a", 0.0, None), node("m", 75.0, None)];
        let diff = TreeDiff::from_scratch(&new, &["m".to_owned()]);
        assert_eq!(diff.append, vec!["a".to_owned(), "m".to_owned()]);
        assert!(diff.remove.is_empty() && diff.moved.is_empty());
    }

    #[test]
    fn identical_snapshots_only_carry_extras() {
        let nodes = vec![node("a", 0.0, Some(0.0))];
        assert!(TreeDiff::between(&nodes, &nodes, &[]).is_empty());
    }
}
