use super::Action;

/// Entity-count filter applied before layout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub lower_limit_of_class_entities: u64,
    pub showing_conditions: bool,
}

impl FilterState {
    pub(super) fn reduce(&mut self, action: &Action) {
        match action {
            Action::FilterClasses(limit) => self.lower_limit_of_class_entities = *limit,
            Action::ShowConditions => self.showing_conditions = !self.showing_conditions,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LegendState;

    #[test]
    fn filter_and_legend_toggles() {
        let mut filter = FilterState::default();
        filter.reduce(&Action::FilterClasses(100));
        filter.reduce(&Action::ShowConditions);
        assert_eq!(filter.lower_limit_of_class_entities, 100);
        assert!(filter.showing_conditions);
        filter.reduce(&Action::ShowConditions);
        assert!(!filter.showing_conditions);

        let mut legend = LegendState::default();
        legend.reduce(&Action::ShowLegend);
        assert!(legend.showing_legend);
        legend.reduce(&Action::ShowLegend);
        assert!(!legend.showing_legend);
    }
}
