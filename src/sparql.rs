//! SPARQL snippets offered from the context menu of circles and arrows.

pub fn class_instances_query(class_uri: &str) -> String {
    format!("SELECT ?i\nWHERE {{\n  ?i a <{class_uri}> .\n}}\nLIMIT 20")
}

/// Triples linking `domain` instances to `range` instances through any of
/// `predicates`.
pub fn triples_query(domain: &str, predicates: &[String], range: &str) -> String {
    let path = predicates
        .iter()
        .map(|predicate| format!("<{predicate}>"))
        .collect::<Vec<_>>()
        .join("|");

    format!(
        "SELECT ?sbj ?obj\nWHERE {{\n  ?sbj {path} ?obj .\n  ?sbj a <{domain}> .\n  ?obj a <{range}> .\n}}\nLIMIT 20"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_instance_query() {
        let query = class_instances_query("http://example.org/Person");
        assert!(query.starts_with("SELECT ?i\n"));
        assert!(query.contains("?i a <http://example.org/Person> ."));
        assert!(query.ends_with("LIMIT 20"));
    }

    #[test]
    fn joins_predicates_as_alternative_path() {
        let predicates = vec!["http://ex.org/p1".to_owned(), "http://ex.org/p2".to_owned()];
        let query = triples_query("http://ex.org/A", &predicates, "http://ex.org/B");

        assert!(query.contains("?sbj <http://ex.org/p1>|<http://ex.org/p2> ?obj ."));
        assert!(query.contains("?sbj a <http://ex.org/A> ."));
        assert!(query.contains("?obj a <http://ex.org/B> ."));
    }
}
