use super::Action;

/// Pane visibility; `Initial` means "never toggled".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaneVisibility {
    #[default]
    Initial,
    Visible,
    Hidden,
}

impl PaneVisibility {
    fn toggled(self) -> Self {
        match self {
            Self::Hidden => Self::Visible,
            Self::Initial | Self::Visible => Self::Hidden,
        }
    }

    pub fn is_hidden(self) -> bool {
        self == Self::Hidden
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UiState {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub circle_diameter: Option<f64>,
    pub property_pane: PaneVisibility,
    pub detail_pane: PaneVisibility,
}

impl UiState {
    pub(super) fn reduce(&mut self, action: &Action) {
        match *action {
            Action::Resize { width, height } => {
                self.width = Some(width);
                self.height = Some(height);
                self.circle_diameter = (width > 0.0 && height > 0.0).then(|| width.min(height));
            }
            Action::HideDetailPane => self.detail_pane = self.detail_pane.toggled(),
            Action::HidePropertyPane => self.property_pane = self.property_pane.toggled(),
            _ => {}
        }
    }
}
