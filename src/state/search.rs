use std::cmp::Ordering;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::Action;
use crate::config::MIN_SEARCH_QUERY_BYTES;
use crate::dataset::{ClassDetail, Classes};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Language of `label`, `None` when the label is the URI itself.
    pub language: Option<String>,
    pub label: String,
    pub uri: String,
    pub entities: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    pub candidates: Vec<Candidate>,
    pub selected: Option<usize>,
    pub query: Option<String>,
}

impl SearchState {
    pub(super) fn reduce(&mut self, action: &Action, classes: &Classes) {
        match action {
            Action::UpdateQuery(query) => {
                self.candidates = search_candidates(query, classes);
                self.selected = if self.candidates.is_empty() { None } else { Some(0) };
                self.query = Some(query.clone());
            }
            Action::PrevCandidate if !self.candidates.is_empty() => {
                let last = self.candidates.len() - 1;
                self.selected = Some(match self.selected {
                    Some(0) => last,
                    Some(index) => index - 1,
                    None => 0,
                });
            }
            Action::NextCandidate if !self.candidates.is_empty() => {
                let last = self.candidates.len() - 1;
                self.selected = Some(match self.selected {
                    Some(index) if index >= last => 0,
                    Some(index) => index + 1,
                    None => 0,
                });
            }
            Action::SelectCandidate(index) => self.selected = Some(*index),
            Action::ConfirmCandidate(_) => self.candidates.clear(),
            Action::HideCandidate => {
                self.candidates.clear();
                self.selected = None;
                self.query = None;
            }
            _ => {}
        }
    }

    pub fn selected_candidate(&self) -> Option<&Candidate> {
        self.candidates.get(self.selected?)
    }
}

/// Classes whose URI or `ja`/`en` label contains `query`, most populated first.
pub fn search_candidates(query: &str, classes: &Classes) -> Vec<Candidate> {
    if query.trim().is_empty() || query.len() < MIN_SEARCH_QUERY_BYTES {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    let contains = |text: &str| text.to_lowercase().contains(&needle);
    let matcher = SkimMatcherV2::default();

    let mut ranked: Vec<(Candidate, i64)> = classes
        .iter()
        .filter(|(uri, detail)| {
            contains(uri.as_str())
                || label_in(detail, "ja").is_some_and(contains)
                || label_in(detail, "en").is_some_and(contains)
        })
        .map(|(uri, detail)| {
            let candidate = candidate_for(uri, detail);
            let score = fuzzy_match_score(&matcher, &candidate.label, query)
                .max(fuzzy_match_score(&matcher, uri, query))
                .unwrap_or(0);
            (candidate, score)
        })
        .collect();

    ranked.sort_by(|(a, a_score), (b, b_score)| {
        compare_entities(a.entities, b.entities)
            .then_with(|| b_score.cmp(a_score))
            .then_with(|| a.uri.cmp(&b.uri))
    });
    ranked.into_iter().map(|(candidate, _)| candidate).collect()
}

fn label_in<'a>(detail: &'a ClassDetail, language: &str) -> Option<&'a str> {
    detail
        .label
        .as_ref()?
        .get(language)
        .map(String::as_str)
        .filter(|label| !label.is_empty())
}

fn candidate_for(uri: &str, detail: &ClassDetail) -> Candidate {
    let preferred = ["ja", "en"]
        .into_iter()
        .find_map(|language| label_in(detail, language).map(|label| (language, label)));
    let (language, label) = match preferred {
        Some((language, label)) => (Some(language.to_owned()), label.to_owned()),
        None => (None, uri.to_owned()),
    };
    Candidate {
        language,
        label,
        uri: uri.to_owned(),
        entities: detail.entities,
    }
}

/// Descending by entity count, unknown counts last.
fn compare_entities(a: Option<u64>, b: Option<u64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}
