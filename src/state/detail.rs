use super::Action;
use crate::layout::{NodeKey, ROOT_KEY};

/// `(predicate, partner class)` pair picked from a relation list.
pub type Relation = (String, String);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyClass {
    pub uri: Option<String>,
    pub domain: Option<String>,
    pub range: Option<String>,
}

impl PropertyClass {
    pub fn is_active(&self) -> bool {
        self.domain.is_some() || self.range.is_some()
    }
}

/// Which view mode is active and what it points at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetailState {
    pub focusing_uri: Option<String>,
    pub focusing_circle_key: Option<NodeKey>,
    pub show_parent_classes_uri: Option<String>,
    pub property_class: PropertyClass,
    pub show_right_hand: bool,
    pub show_left_hand: bool,
    pub showing_relation: Option<Relation>,
    pub searching_uri: Option<String>,
    pub show_tree: bool,
}

impl DetailState {
    pub(super) fn reduce(&mut self, action: &Action) {
        match action {
            Action::ShowParentClassesUri(uri) => {
                self.focusing_uri = uri.clone();
                self.show_parent_classes_uri = uri.clone();
                self.property_class = PropertyClass::default();
                self.searching_uri = None;
            }
            Action::FocusCircle { key, uri } => {
                self.focusing_circle_key = *key;
                self.focusing_uri = uri.clone();
                self.property_class = PropertyClass::default();
                self.show_right_hand = false;
                self.show_left_hand = false;
                self.showing_relation = None;
                self.searching_uri = None;
            }
            Action::FocusPropertyClass { key, uri } => {
                self.focusing_circle_key = *key;
                self.focusing_uri = uri.clone();
                self.searching_uri = None;
            }
            Action::ShowPropertyClass { uri, domain, range } => {
                self.focusing_uri = None;
                self.show_parent_classes_uri = None;
                self.show_right_hand = false;
                self.show_left_hand = false;
                self.property_class = PropertyClass {
                    uri: uri.clone(),
                    domain: domain.clone(),
                    range: range.clone(),
                };
                self.searching_uri = None;
                self.show_tree = false;
            }
            Action::ShowAllAssociated => {
                self.show_right_hand = true;
                self.show_left_hand = true;
                self.showing_relation = None;
                self.show_tree = false;
            }
            Action::ShowRightHandSide => {
                if self.showing_relation.is_some() {
                    self.show_right_hand = true;
                    self.show_left_hand = false;
                    self.showing_relation = None;
                    return;
                }
                let collapse = self.show_right_hand && !self.show_left_hand && self.is_property_focus();
                self.show_right_hand = !self.show_right_hand;
                self.after_side_toggle(collapse);
            }
            Action::ShowLeftHandSide => {
                if self.showing_relation.is_some() {
                    self.show_right_hand = false;
                    self.show_left_hand = true;
                    self.showing_relation = None;
                    return;
                }
                let collapse = self.show_left_hand && !self.show_right_hand && self.is_property_focus();
                self.show_left_hand = !self.show_left_hand;
                self.after_side_toggle(collapse);
            }
            Action::ShowRelation(relation) => self.showing_relation = relation.clone(),
            Action::ShowTree => self.show_tree = true,
            Action::HideTree => self.show_tree = false,
            Action::ConfirmCandidate(uri) => {
                self.focusing_uri = None;
                self.focusing_circle_key = None;
                self.searching_uri = Some(uri.clone());
                self.show_tree = false;
                self.property_class = PropertyClass::default();
            }
            _ => {}
        }
    }

    /// Closing the last open side of a class focused inside the property
    /// view drops that focus as well.
    fn after_side_toggle(&mut self, collapse: bool) {
        self.showing_relation = None;
        self.show_tree = false;
        if collapse {
            self.focusing_circle_key = None;
            self.focusing_uri = None;
        }
    }

    fn is_property_focus(&self) -> bool {
        self.property_class.domain.is_some()
            && self.property_class.range.is_some()
            && self.focusing_circle_key.is_some_and(|key| key != ROOT_KEY)
            && self.focusing_uri.as_deref().is_some_and(|uri| !uri.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focused(key: NodeKey, uri: &str) -> DetailState {
        let mut state = DetailState::default();
        state.reduce(&Action::FocusCircle {
            key: Some(key),
            uri: Some(uri.to_owned()),
        });
        state
    }

    fn property_view() -> DetailState {
        let mut state = DetailState::default();
        state.reduce(&Action::ShowPropertyClass {
            uri: Some("ex:p".to_owned()),
            domain: Some("ex:A".to_owned()),
            range: Some("ex:B".to_owned()),
        });
        state
    }

    #[test]
    fn focus_clears_other_modes() {
        let mut state = property_view();
        state.searching_uri = Some("ex:S".to_owned());
        state.show_right_hand = true;
        state.showing_relation = Some(("ex:p".to_owned(), "ex:B".to_owned()));
        state.show_tree = true;

        state.reduce(&Action::FocusCircle {
            key: Some(3),
            uri: Some("ex:A".to_owned()),
        });
        assert_eq!(state.focusing_circle_key, Some(3));
        assert_eq!(state.property_class, PropertyClass::default());
        assert!(!state.show_right_hand && !state.show_left_hand);
        assert_eq!(state.showing_relation, None);
        assert_eq!(state.searching_uri, None);
        assert!(state.show_tree);
    }

    #[test]
    fn right_hand_toggle_without_relation() {
        let mut state = focused(2, "ex:A");
        state.show_tree = true;
        state.reduce(&Action::ShowRightHandSide);
        assert!(state.show_right_hand);
        assert!(!state.show_tree);

        state.reduce(&Action::ShowRightHandSide);
        assert!(!state.show_right_hand);
        assert_eq!(state.focusing_circle_key, Some(2));
    }

    #[test]
    fn side_toggle_with_relation_selects_that_side() {
        let mut state = focused(2, "ex:A");
        state.reduce(&Action::ShowAllAssociated);
        state.reduce(&Action::ShowRelation(Some(("ex:p".to_owned(), "ex:B".to_owned()))));

        state.reduce(&Action::ShowLeftHandSide);
        assert!(!state.show_right_hand);
        assert!(state.show_left_hand);
        assert_eq!(state.showing_relation, None);
    }

    #[test]
    fn closing_last_side_in_property_view_drops_focus() {
        let mut state = property_view();
        state.reduce(&Action::FocusPropertyClass {
            key: Some(4),
            uri: Some("ex:A".to_owned()),
        });
        state.reduce(&Action::ShowLeftHandSide);
        assert!(state.show_left_hand);
        assert_eq!(state.focusing_circle_key, Some(4));

        state.reduce(&Action::ShowLeftHandSide);
        assert!(!state.show_left_hand);
        assert_eq!(state.focusing_circle_key, None);
        assert_eq!(state.focusing_uri, None);
        assert!(state.property_class.is_active());
    }

    #[test]
    fn closing_one_of_two_sides_keeps_focus() {
        let mut state = property_view();
        state.reduce(&Action::FocusPropertyClass {
            key: Some(4),
            uri: Some("ex:A".to_owned()),
        });
        state.reduce(&Action::ShowAllAssociated);
        state.reduce(&Action::ShowRightHandSide);
        assert!(!state.show_right_hand);
        assert_eq!(state.focusing_circle_key, Some(4));
    }

    #[test]
    fn confirm_candidate_switches_to_search() {
        let mut state = focused(2, "ex:A");
        state.show_tree = true;
        state.reduce(&Action::ConfirmCandidate("ex:S".to_owned()));
        assert_eq!(state.searching_uri.as_deref(), Some("ex:S"));
        assert_eq!(state.focusing_uri, None);
        assert_eq!(state.focusing_circle_key, None);
        assert!(!state.show_tree);
    }

    #[test]
    fn parent_classes_uri_focuses_by_uri() {
        let mut state = property_view();
        state.reduce(&Action::ShowParentClassesUri(Some("ex:P".to_owned())));
        assert_eq!(state.focusing_uri.as_deref(), Some("ex:P"));
        assert_eq!(state.show_parent_classes_uri.as_deref(), Some("ex:P"));
        assert!(!state.property_class.is_active());
    }

    #[test]
    fn tree_toggles_touch_nothing_else() {
        let mut state = focused(1, "ex:A");
        let before = state.clone();
        state.reduce(&Action::ShowTree);
        assert!(state.show_tree);
        state.reduce(&Action::HideTree);
        assert_eq!(state, before);
    }
}
