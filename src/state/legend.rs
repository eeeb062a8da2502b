use super::Action;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LegendState {
    pub showing_legend: bool,
}

impl LegendState {
    pub(super) fn reduce(&mut self, action: &Action) {
        if let Action::ShowLegend = action {
            self.showing_legend = !self.showing_legend;
        }
    }
}
