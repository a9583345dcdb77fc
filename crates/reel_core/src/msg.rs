use crate::{DomainRecord, FilterKind, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the sheet URL input.
    InputChanged(String),
    /// User asked to load the current input.
    LoadClicked,
    /// A load finished, successfully or with an error description.
    LoadFinished {
        request_id: RequestId,
        result: Result<Vec<DomainRecord>, String>,
    },
    /// Add or remove one value from a filter.
    FilterToggled { kind: FilterKind, value: String },
    /// Drop every value of one filter.
    FilterCleared(FilterKind),
    /// Remove an active filter pill.
    FilterRemoved { kind: FilterKind, value: String },
    PageRequested(usize),
    NextPage,
    PrevPage,
    PageSizeChanged(usize),
    /// User picked a card.
    RecordSelected { id: usize },
    /// Keyboard navigation: move the selection by `delta` records.
    SelectOffset(isize),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
