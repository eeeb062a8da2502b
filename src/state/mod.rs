//! View-state slices and the actions that drive them.
//!
//! Every user gesture becomes an [`Action`]; [`ViewState::reduce`] is the
//! only writer of the slices. Repositories read [`DetailState`] snapshots.

mod detail;
mod filter;
mod legend;
mod property;
mod search;
mod tooltip;
mod ui;

pub use detail::{DetailState, PropertyClass, Relation};
pub use filter::FilterState;
pub use legend::LegendState;
pub use property::PropertyState;
pub use search::{Candidate, SearchState, search_candidates};
pub use tooltip::{AnchorRect, TooltipPlacement, TooltipState, tooltip_position};
pub use ui::{PaneVisibility, UiState};

use crate::dataset::Classes;
use crate::layout::NodeKey;

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    FocusCircle {
        key: Option<NodeKey>,
        uri: Option<String>,
    },
    /// Focus a class from inside the property view without leaving it.
    FocusPropertyClass {
        key: Option<NodeKey>,
        uri: Option<String>,
    },
    ShowParentClassesUri(Option<String>),
    ShowPropertyClass {
        uri: Option<String>,
        domain: Option<String>,
        range: Option<String>,
    },
    ShowAllAssociated,
    ShowRightHandSide,
    ShowLeftHandSide,
    ShowRelation(Option<Relation>),
    ShowTree,
    HideTree,

    UpdateQuery(String),
    PrevCandidate,
    NextCandidate,
    SelectCandidate(usize),
    ConfirmCandidate(String),
    HideCandidate,

    ShowTooltip {
        uri: String,
        anchor: AnchorRect,
    },
    HideTooltip,

    ShowLegend,

    FilterClasses(u64),
    ShowConditions,

    Resize {
        width: f64,
        height: f64,
    },
    HideDetailPane,
    HidePropertyPane,

    ShowProperty(usize),
    CloseProperty(usize),
    SelectPropertyClass(Option<usize>, Option<usize>),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub detail: DetailState,
    pub search: SearchState,
    pub tooltip: TooltipState,
    pub legend: LegendState,
    pub filter: FilterState,
    pub ui: UiState,
    pub property: PropertyState,
}

impl ViewState {
    /// Applies `action` to every slice. `classes` feeds search candidates.
    pub fn reduce(&mut self, action: &Action, classes: &Classes) {
        tracing::debug!(?action, "reduce");
        self.detail.reduce(action);
        self.search.reduce(action, classes);
        self.tooltip.reduce(action);
        self.legend.reduce(action);
        self.filter.reduce(action);
        self.ui.reduce(action);
        self.property.reduce(action);
    }
}
