use std::time::Duration;

/// Diameter the hierarchy is packed at; the viewport scales it to the canvas.
pub const LAYOUT_DIAMETER: f64 = 1000.0;

pub const SHOW_TEXT_MIN_CIRCLE_DIAMETER: f64 = 60.0;
pub const SHOW_TEXT_MAX_CIRCLE_DIAMETER: f64 = SHOW_TEXT_MIN_CIRCLE_DIAMETER * 6.0;
/// Minimum on-screen diameter of a highlighted circle.
pub const HIGHLIGHTING_MIN_SIZE: f64 = 17.0;

/// Offset of a sole child below its parent, in layout pixels at full diameter.
pub const STACKED_CHILD_MARGIN: f64 = 50.0;
pub const STACKED_LABEL_MARGIN: f64 = 40.0;
pub const COLLIDED_LABEL_MARGIN: f64 = 60.0;
/// Extra screen gap under which two circles count as touching.
pub const TOUCHING_CIRCLE_GAP: f64 = 20.0;

pub const GRAPH_TRANSITION: Duration = Duration::from_millis(750);
pub const HOVER_DEBOUNCE: Duration = Duration::from_millis(100);
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(200);

pub const DEFAULT_MAX_DEPTH: usize = 2;
pub const TREE_ANIMATION_DURATION: Duration = Duration::from_millis(300);
pub const TREE_MARGIN_X: f64 = 200.0;
pub const TREE_MARGIN_Y: f64 = 150.0;
/// Vertical space taken by the class information header of the tree.
pub const TREE_HEADER_HEIGHT: f64 = 35.0 + 12.0 * 2.0 + 6.0 + 20.0 + 8.0;
pub const TREE_BRIDGE_RADIUS: f64 = 10.0;

pub const MIN_SEARCH_QUERY_BYTES: usize = 3;
pub const TOOLTIP_ARROW_SIZE: f64 = 25.0;
pub const DEFAULT_LOCALE: &str = "en";

/// Runtime knobs that the host may override.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    pub locale: String,
    pub lower_limit_of_entities: u64,
    pub graph_transition_secs: f64,
    pub tree_animation_secs: f64,
    pub search_debounce_secs: f64,
    pub hover_debounce_secs: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_owned(),
            lower_limit_of_entities: 1,
            graph_transition_secs: GRAPH_TRANSITION.as_secs_f64(),
            tree_animation_secs: TREE_ANIMATION_DURATION.as_secs_f64(),
            search_debounce_secs: SEARCH_DEBOUNCE.as_secs_f64(),
            hover_debounce_secs: HOVER_DEBOUNCE.as_secs_f64(),
        }
    }
}

impl ViewerConfig {
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_lower_limit(mut self, limit: u64) -> Self {
        self.lower_limit_of_entities = limit;
        self
    }
}
