use crate::config::DEFAULT_MAX_DEPTH;

/// Display toggles of the pedigree view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeState {
    /// Deepest level, relative to the focused class, shown by default.
    pub max_depth: usize,
    /// Classes whose children are collapsed.
    pub hidden_uris: Vec<String>,
}

impl Default for TreeState {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            hidden_uris: Vec::new(),
        }
    }
}

impl TreeState {
    pub fn is_hidden(&self, uri: &str) -> bool {
        self.hidden_uris.iter().any(|hidden| hidden == uri)
    }

    /// Flips the level switch for `depth`. `candidates` are the classes
    /// carrying a child toggle plus the focused class, paired with their
    /// depth relative to the focused class. Their individual switches
    /// follow the level.
    pub fn toggle_depth(&mut self, depth: usize, candidates: &[(String, isize)]) {
        let previous = self.max_depth;
        let next = if depth > previous { depth } else { depth.saturating_sub(1) };
        let next_signed = next as isize;

        if next < previous {
            for (uri, relative) in candidates {
                if *relative >= next_signed && !self.is_hidden(uri) {
                    self.hidden_uris.push(uri.clone());
                }
            }
        } else {
            self.hidden_uris.retain(|hidden| {
                !candidates
                    .iter()
                    .any(|(uri, relative)| uri == hidden && *relative < next_signed)
            });
        }
        self.max_depth = next;
    }

    /// Flips the child switch of a single class.
    pub fn toggle_hidden(&mut self, uri: &str) {
        if self.is_hidden(uri) {
            self.hidden_uris.retain(|hidden| hidden != uri);
        } else {
            self.hidden_uris.push(uri.to_owned());
        }
    }

    /// A new focus restores the default depth and always shows the
    /// children of the focused class.
    pub fn refocus(&mut self, focusing_uri: &str) {
        self.hidden_uris.retain(|hidden| hidden != focusing_uri);
        self.max_depth = DEFAULT_MAX_DEPTH;
    }

    /// Whether the level switch for `depth` is on.
    pub fn level_on(&self, depth: usize) -> bool {
        self.max_depth >= depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<(String, isize)> {
        vec![
            ("focus".to_owned(), 0),
            ("sibling".to_owned(), 0),
            ("child".to_owned(), 1),
        ]
    }

    #[test]
    fn turning_a_level_off_hides_its_toggles() {
        let mut state = TreeState::default();
        state.toggle_depth(2, &candidates());
        assert_eq!(state.max_depth, 1);
        assert_eq!(state.hidden_uris, vec!["child".to_owned()]);

        state.toggle_depth(1, &candidates());
        assert_eq!(state.max_depth, 0);
        assert!(state.is_hidden("focus") && state.is_hidden("sibling") && state.is_hidden("child"));
    }

    #[test]
    fn turning_a_level_on_restores_shallower_toggles() {
        let mut state = TreeState {
            max_depth: 0,
            hidden_uris: vec!["focus".to_owned(), "sibling".to_owned(), "child".to_owned()],
        };
        state.toggle_depth(1, &candidates());
        assert_eq!(state.max_depth, 1);
        assert_eq!(state.hidden_uris, vec!["child".to_owned()]);
        assert!(state.level_on(1) && !state.level_on(2));
    }

    #[test]
    fn refocus_resets_depth_and_unhides_focus() {
        let mut state = TreeState {
            max_depth: 0,
            hidden_uris: vec!["a".to_owned(), "b".to_owned()],
        };
        state.refocus("a");
        assert_eq!(state, TreeState {
            max_depth: DEFAULT_MAX_DEPTH,
            hidden_uris: vec!["b".to_owned()],
        });
    }

    #[test]
    fn single_toggle_flips() {
        let mut state = TreeState::default();
        state.toggle_hidden("x");
        assert!(state.is_hidden("x"));
        state.toggle_hidden("x");
        assert!(state.hidden_uris.is_empty());
    }
}
