use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(input) => {
            state.set_input(input);
            Vec::new()
        }
        Msg::LoadClicked => match state.begin_load() {
            Some((request_id, url)) => vec![Effect::LoadSheet { request_id, url }],
            None => Vec::new(),
        },
        Msg::LoadFinished { request_id, result } => {
            state.finish_load(request_id, result);
            Vec::new()
        }
        Msg::FilterToggled { kind, value } => {
            state.toggle_filter(kind, value);
            Vec::new()
        }
        Msg::FilterCleared(kind) => {
            state.clear_filter(kind);
            Vec::new()
        }
        Msg::FilterRemoved { kind, value } => {
            state.remove_filter(kind, &value);
            Vec::new()
        }
        Msg::PageRequested(page) => {
            state.go_to_page(page);
            Vec::new()
        }
        Msg::NextPage => {
            let next = state.page() + 1;
            state.go_to_page(next);
            Vec::new()
        }
        Msg::PrevPage => {
            let prev = state.page().saturating_sub(1);
            state.go_to_page(prev);
            Vec::new()
        }
        Msg::PageSizeChanged(size) => {
            state.set_page_size(size);
            Vec::new()
        }
        Msg::RecordSelected { id } => {
            state.select_id(id);
            Vec::new()
        }
        Msg::SelectOffset(delta) => {
            state.select_offset(delta);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
