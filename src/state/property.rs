use super::Action;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyState {
    pub open_property_indexes: Vec<bool>,
    /// `(property row, class relation row)` selected in the property list.
    pub selected_class: (Option<usize>, Option<usize>),
}

impl PropertyState {
    pub(super) fn reduce(&mut self, action: &Action) {
        match *action {
            Action::ShowProperty(index) => self.set_open(index, true),
            Action::CloseProperty(index) => self.set_open(index, false),
            Action::SelectPropertyClass(property, relation) => {
                self.selected_class = (property, relation);
            }
            Action::ShowParentClassesUri(_)
            | Action::FocusCircle { .. }
            | Action::ConfirmCandidate(_) => self.selected_class = (None, None),
            _ => {}
        }
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open_property_indexes.get(index).copied().unwrap_or(false)
    }

    fn set_open(&mut self, index: usize, open: bool) {
        if self.open_property_indexes.len() <= index {
            self.open_property_indexes.resize(index + 1, false);
        }
        self.open_property_indexes[index] = open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_open_and_close_independently() {
        let mut property = PropertyState::default();
        property.reduce(&Action::ShowProperty(3));
        assert!(property.is_open(3));
        assert!(!property.is_open(0));
        assert!(!property.is_open(10));

        property.reduce(&Action::CloseProperty(3));
        assert!(!property.is_open(3));
    }

    #[test]
    fn focusing_a_class_clears_selection() {
        let mut property = PropertyState::default();
        property.reduce(&Action::SelectPropertyClass(Some(2), Some(1)));
        assert_eq!(property.selected_class, (Some(2), Some(1)));
        property.reduce(&Action::FocusCircle { key: Some(1), uri: None });
        assert_eq!(property.selected_class, (None, None));
    }
}
