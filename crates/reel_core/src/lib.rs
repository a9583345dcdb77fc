//! Reel core: pure state machine over a loaded record set.
mod effect;
mod filter;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use filter::{facet_values, ActiveFilters, FilterKind};
pub use msg::Msg;
pub use state::{AppState, LoadStatus, DEFAULT_PAGE_SIZE};
pub use update::update;
pub use view_model::{format_timestamp, AppViewModel, CardView, FilterPill, PreviewView};

pub use reel_engine::{DomainRecord, RequestId};
