use crate::dataset::{Classes, Labels, Prefixes};

/// Last fragment or path segment of `uri`, ignoring a trailing delimiter.
pub fn omit_uri(uri: &str) -> &str {
    if uri.is_empty() {
        return uri;
    }

    let trimmed = uri.strip_suffix(['#', '/']).unwrap_or(uri);
    if let Some((_, fragment)) = trimmed.rsplit_once('#') {
        return fragment;
    }

    let without_scheme = trimmed
        .rsplit_once("://")
        .map_or(trimmed, |(_, rest)| rest);
    if let Some((_, segment)) = without_scheme.rsplit_once('/') {
        return segment;
    }

    uri
}

/// Label for `uri` in `locale`, falling back to English, the untagged
/// label and finally the shortened URI. A label present but empty in the
/// first matching language is returned as is.
pub fn preferred_label(uri: &str, locale: &str, classes: &Classes, labels: &Labels) -> String {
    let short = omit_uri(uri);
    let label = labels
        .get(uri)
        .or_else(|| labels.get(short))
        .or_else(|| classes.get(uri).and_then(|detail| detail.label.as_ref()))
        .or_else(|| classes.get(short).and_then(|detail| detail.label.as_ref()));

    label
        .and_then(|label| {
            label
                .get(locale)
                .or_else(|| label.get("en"))
                .or_else(|| label.get(""))
        })
        .cloned()
        .unwrap_or_else(|| short.to_owned())
}

/// Expands a `prefix:local` name into a full URI for outbound links.
pub fn reference_url(uri: &str, prefixes: &Prefixes) -> Option<String> {
    if uri.is_empty() {
        return None;
    }
    if uri.starts_with("http") {
        return Some(uri.to_owned());
    }

    let (prefix, local) = uri.split_once(':')?;
    prefixes
        .get(prefix)
        .map(|namespace| format!("{namespace}{local}"))
}
