use super::Action;
use crate::config::TOOLTIP_ARROW_SIZE;

/// Screen rectangle of the element a tooltip points at.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnchorRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl AnchorRect {
    pub fn around(center_x: f64, center_y: f64, radius: f64) -> Self {
        Self {
            left: center_x - radius,
            top: center_y - radius,
            right: center_x + radius,
            bottom: center_y + radius,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipState {
    pub uri: Option<String>,
    pub anchor: Option<AnchorRect>,
}

impl TooltipState {
    pub(super) fn reduce(&mut self, action: &Action) {
        match action {
            Action::ShowTooltip { uri, anchor } => {
                self.uri = Some(uri.clone());
                self.anchor = Some(*anchor);
            }
            Action::HideTooltip => *self = Self::default(),
            _ => {}
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipPlacement {
    pub x: f64,
    pub y: f64,
    /// The tooltip hangs below the anchor with its arrow pointing up.
    pub on_bottom: bool,
}

/// Centres a `width`x`height` tooltip over `anchor`; it goes above unless
/// there is no room between the anchor and the top edge.
pub fn tooltip_position(anchor: &AnchorRect, width: f64, height: f64) -> TooltipPlacement {
    let on_bottom = anchor.bottom < height;
    let y = if on_bottom {
        anchor.bottom + TOOLTIP_ARROW_SIZE
    } else {
        anchor.top - height - TOOLTIP_ARROW_SIZE
    };
    TooltipPlacement {
        x: (anchor.left + anchor.right - width) / 2.0,
        y,
        on_bottom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tooltip_sits_above_when_room() {
        let anchor = AnchorRect::around(300.0, 400.0, 20.0);
        let placement = tooltip_position(&anchor, 100.0, 80.0);
        assert_eq!(placement.x, 250.0);
        assert_eq!(placement.y, 380.0 - 80.0 - TOOLTIP_ARROW_SIZE);
        assert!(!placement.on_bottom);
    }

    #[test]
    fn tooltip_flips_below_near_top_edge() {
        let anchor = AnchorRect::around(300.0, 30.0, 20.0);
        let placement = tooltip_position(&anchor, 100.0, 80.0);
        assert!(placement.on_bottom);
        assert_eq!(placement.y, 50.0 + TOOLTIP_ARROW_SIZE);
    }

    #[test]
    fn hide_resets_state() {
        let mut state = TooltipState::default();
        state.reduce(&Action::ShowTooltip {
            uri: "ex:A".to_owned(),
            anchor: AnchorRect::default(),
        });
        assert_eq!(state.uri.as_deref(), Some("ex:A"));
        state.reduce(&Action::HideTooltip);
        assert_eq!(state, TooltipState::default());
    }
}
