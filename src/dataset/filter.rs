use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::{Content, DatasetError, Prefixes, Structure};

/// Classes and namespaces excluded before the layout ever sees the dataset.
#[derive(Clone, Debug, Default)]
pub struct Blacklist {
    classes: HashSet<String>,
    prefixes: Vec<String>,
}

impl Blacklist {
    pub fn new(classes: &str, prefixes: &str) -> Self {
        Self {
            classes: entries(classes).collect(),
            prefixes: entries(prefixes).collect(),
        }
    }

    pub fn from_files(
        classes: Option<&Path>,
        prefixes: Option<&Path>,
    ) -> Result<Self, DatasetError> {
        let read = |path: Option<&Path>| -> Result<String, DatasetError> {
            match path {
                Some(path) => fs::read_to_string(path).map_err(|source| DatasetError::Blacklist {
                    path: path.to_path_buf(),
                    source,
                }),
                None => Ok(String::new()),
            }
        };
        Ok(Self::new(&read(classes)?, &read(prefixes)?))
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.prefixes.is_empty()
    }

    /// `uri` is a `prefix:local` name; unknown prefixes never match.
    pub fn has(&self, uri: &str, prefixes: &Prefixes) -> bool {
        let (prefix_key, local) = uri.split_once(':').unwrap_or((uri, ""));
        let Some(namespace) = prefixes.get(prefix_key) else {
            return false;
        };

        self.classes.contains(&format!("{namespace}{local}"))
            || self
                .prefixes
                .iter()
                .any(|item| namespace.starts_with(item.as_str()))
    }
}

fn entries(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
}

/// Removes every class matching `condition` from the structure, the class
/// index and the property relations.
pub fn filter_content(content: &mut Content, condition: impl Fn(&str) -> bool) -> usize {
    let before = content.classes.len();

    content.inheritance_structure = filter_structure(
        std::mem::take(&mut content.inheritance_structure),
        &condition,
    );
    content.classes.retain(|uri, _| !condition(uri));
    for property in &mut content.properties {
        property.class_relations.retain(|relation| {
            let subject = relation.subject_class.as_deref().is_some_and(&condition);
            let object = relation.object_class.as_deref().is_some_and(&condition);
            !subject && !object
        });
    }

    before - content.classes.len()
}

fn filter_structure(children: Vec<Structure>, condition: &impl Fn(&str) -> bool) -> Vec<Structure> {
    children
        .into_iter()
        .filter(|node| !condition(&node.uri))
        .map(|mut node| {
            if let Some(grandchildren) = node.children.take() {
                node.children = Some(filter_structure(grandchildren, condition));
            }
            node
        })
        .collect()
}

/// Hides leaf classes whose instance count is unknown or below `limit`.
/// A limit of 1 or less leaves the dataset untouched.
pub fn filter_by_entities(content: &Content, limit: u64) -> Content {
    let mut next = content.clone();
    if limit <= 1 {
        return next;
    }

    let hidden: HashSet<String> = content
        .inheritance_structure
        .iter()
        .flat_map(Structure::flatten)
        .filter(|node| {
            let entities = content.classes.get(&node.uri).and_then(|detail| detail.entities);
            !node.has_children() && entities.is_none_or(|count| count < limit)
        })
        .map(|node| node.uri.clone())
        .collect();

    let removed = filter_content(&mut next, |uri| hidden.contains(uri));
    tracing::debug!(limit, hidden = hidden.len(), removed, "filtered classes by entities");
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{ClassDetail, ClassRelation, Property};

    fn prefixes() -> Prefixes {
        Prefixes::from([
            ("ex".to_owned(), "http://example.org/".to_owned()),
            ("skip".to_owned(), "http://skip.example.com/ns#".to_owned()),
        ])
    }

    fn sample() -> Content {
        let class = |entities: Option<u64>| ClassDetail {
            entities,
            ..ClassDetail::default()
        };
        Content {
            inheritance_structure: vec![Structure::with_children(
                "ex:A",
                vec![Structure::leaf("ex:B"), Structure::leaf("skip:C")],
            )],
            classes: [
                ("ex:A".to_owned(), class(Some(100))),
                ("ex:B".to_owned(), class(Some(50))),
                ("skip:C".to_owned(), class(None)),
            ]
            .into(),
            properties: vec![Property {
                uri: "ex:p".to_owned(),
                triples: 1,
                class_relations: vec![
                    ClassRelation {
                        subject_class: Some("ex:A".to_owned()),
                        object_class: Some("skip:C".to_owned()),
                        ..ClassRelation::default()
                    },
                    ClassRelation {
                        subject_class: Some("ex:A".to_owned()),
                        object_class: Some("ex:B".to_owned()),
                        ..ClassRelation::default()
                    },
                ],
            }],
            prefixes: prefixes(),
            ..Content::default()
        }
    }

    #[test]
    fn blacklist_matches_expanded_class_and_namespace() {
        let blacklist = Blacklist::new("http://example.org/B\n", "http://skip.example.com/\n");
        let prefixes = prefixes();

        assert!(blacklist.has("ex:B", &prefixes));
        assert!(blacklist.has("skip:C", &prefixes));
        assert!(!blacklist.has("ex:A", &prefixes));
        assert!(!blacklist.has("unknown:B", &prefixes));
    }

    #[test]
    fn filter_content_drops_structure_classes_and_relations() {
        let mut content = sample();
        let blacklist = Blacklist::new("", "http://skip.example.com/");
        let prefixes = content.prefixes.clone();

        let removed = filter_content(&mut content, |uri| blacklist.has(uri, &prefixes));

        assert_eq!(removed, 1);
        let uris: Vec<_> = content.inheritance_structure[0]
            .flatten()
            .into_iter()
            .map(|node| node.uri.as_str())
            .collect();
        assert_eq!(uris, ["ex:A", "ex:B"]);
        assert_eq!(content.properties[0].class_relations.len(), 1);
    }

    #[test]
    fn entity_limit_hides_small_and_unknown_leaves() {
        let content = sample();

        let filtered = filter_by_entities(&content, 60);
        assert!(filtered.classes.contains_key("ex:A"));
        assert!(!filtered.classes.contains_key("ex:B"));
        assert!(!filtered.classes.contains_key("skip:C"));
        assert!(filtered.properties[0].class_relations.is_empty());

        let untouched = filter_by_entities(&content, 1);
        assert_eq!(untouched, content);
    }
}
