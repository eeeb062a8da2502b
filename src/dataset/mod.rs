//! In-memory dataset handed to the engine: class index, inheritance forest,
//! properties and prefixes.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

mod filter;

pub use filter::{Blacklist, filter_by_entities, filter_content};

/// Language code to display string.
pub type Label = HashMap<String, String>;
pub type Labels = HashMap<String, Label>;
pub type Classes = HashMap<String, ClassDetail>;
pub type Prefixes = HashMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read blacklist {path}: {source}")]
    Blacklist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Raw recursive inheritance tree.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Structure {
    pub uri: String,
    #[serde(default)]
    pub children: Option<Vec<Structure>>,
}

impl Structure {
    pub fn leaf(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            children: None,
        }
    }

    pub fn with_children(uri: impl Into<String>, children: Vec<Structure>) -> Self {
        Self {
            uri: uri.into(),
            children: Some(children),
        }
    }

    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    /// Pre-order walk over this node and all of its descendants.
    pub fn flatten(&self) -> Vec<&Structure> {
        let mut out = vec![self];
        for child in self.children.iter().flatten() {
            out.extend(child.flatten());
        }
        out
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ClassDetail {
    #[serde(default)]
    pub entities: Option<u64>,
    #[serde(default)]
    pub label: Option<Label>,
    #[serde(default, rename = "subClassOf")]
    pub sub_class_of: Option<Vec<String>>,
    /// `(predicate, object class)` pairs where this class is the subject.
    #[serde(default)]
    pub rhs: Option<Vec<(String, String)>>,
    /// `(subject class, predicate)` pairs where this class is the object.
    #[serde(default)]
    pub lhs: Option<Vec<(String, String)>>,
}

impl ClassDetail {
    pub fn rhs(&self) -> &[(String, String)] {
        self.rhs.as_deref().unwrap_or_default()
    }

    pub fn lhs(&self) -> &[(String, String)] {
        self.lhs.as_deref().unwrap_or_default()
    }

    pub fn parents(&self) -> &[String] {
        self.sub_class_of.as_deref().unwrap_or_default()
    }

    pub fn has_multiple_inheritance(&self) -> bool {
        self.parents().len() > 1
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ClassRelation {
    #[serde(default)]
    pub subject_class: Option<String>,
    #[serde(default)]
    pub object_class: Option<String>,
    #[serde(default)]
    pub object_datatype: Option<String>,
    #[serde(default)]
    pub triples: u64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Property {
    pub uri: String,
    #[serde(default)]
    pub triples: u64,
    #[serde(default)]
    pub class_relations: Vec<ClassRelation>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Metadata {
    #[serde(default)]
    pub properties: Option<u64>,
    #[serde(default)]
    pub triples: Option<u64>,
    #[serde(default)]
    pub classes: Option<u64>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub crawl_date: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default)]
    pub inheritance_structure: Vec<Structure>,
    #[serde(default)]
    pub classes: Classes,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub prefixes: Prefixes,
    #[serde(default)]
    pub meta_data: Option<Metadata>,
    #[serde(default)]
    pub labels: Labels,
}

impl Content {
    pub fn from_json_str(raw: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let raw = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = Self::from_json_str(&raw)?;
        tracing::debug!(
            path = %path.display(),
            classes = content.classes.len(),
            properties = content.properties.len(),
            "loaded dataset"
        );
        Ok(content)
    }

    pub fn is_empty(&self) -> bool {
        self.inheritance_structure.is_empty()
            && self.properties.is_empty()
            && self.classes.is_empty()
            && self.prefixes.is_empty()
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.meta_data.as_ref()?.endpoint.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_class_detail_pairs() {
        let raw = r#"{
            "inheritance_structure": [{"uri": "ex:A", "children": [{"uri": "ex:B"}]}],
            "classes": {
                "ex:A": {"entities": 10, "label": {"en": "A"}, "rhs": [["ex:p", "ex:B"]]},
                "ex:B": {"subClassOf": ["ex:A"], "lhs": [["ex:A", "ex:p"]]}
            },
            "properties": [{"uri": "ex:p", "triples": 3, "class_relations": [
                {"subject_class": "ex:A", "object_class": "ex:B", "object_datatype": null, "triples": 3}
            ]}],
            "prefixes": {"ex": "http://example.org/"},
            "meta_data": {"endpoint": "http://example.org/sparql"}
        }"#;

        let content = Content::from_json_str(raw).expect("valid dataset");
        assert_eq!(content.inheritance_structure[0].flatten().len(), 2);
        assert_eq!(content.classes["ex:A"].rhs()[0].1, "ex:B");
        assert_eq!(content.classes["ex:B"].lhs()[0].0, "ex:A");
        assert_eq!(content.classes["ex:B"].parents(), ["ex:A".to_owned()]);
        assert_eq!(content.endpoint(), Some("http://example.org/sparql"));
        assert!(content.labels.is_empty());
    }

    #[test]
    fn rejects_malformed_json() {
        let error = Content::from_json_str("{\"classes\": 3}").unwrap_err();
        assert!(matches!(error, DatasetError::Json(_)));
    }
}
