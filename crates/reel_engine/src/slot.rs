use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

pub type ResponseHandler = Arc<dyn Fn(Value) + Send + Sync>;

/// Single-owner registration point for query-channel responses.
///
/// A response payload is delivered to whichever handler was registered most
/// recently. Each attempt registers its own handler and hands the returned
/// token back to [`ResponseSlot::restore`], which removes that handler and
/// leaves the one active before it in place. A finished attempt can never
/// receive a late payload, even when registrations overlap.
#[derive(Default)]
pub struct ResponseSlot {
    state: Mutex<SlotState>,
}

#[derive(Default)]
struct SlotState {
    handlers: Vec<(u64, ResponseHandler)>,
    next_id: u64,
}

/// Proof of registration returned by [`ResponseSlot::register`].
#[derive(Debug)]
#[must_use = "a registration must be restored"]
pub struct SlotToken {
    id: u64,
}

impl ResponseSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handler: ResponseHandler) -> SlotToken {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.handlers.push((id, handler));
        SlotToken { id }
    }

    /// Remove the handler registered under `token`, reinstating whatever was
    /// active before it. Returns `false` if it was already gone.
    pub fn restore(&self, token: SlotToken) -> bool {
        let mut state = self.lock();
        match state.handlers.iter().position(|(id, _)| *id == token.id) {
            Some(pos) => {
                state.handlers.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Deliver `payload` to the active handler, if any.
    pub fn dispatch(&self, payload: Value) -> bool {
        let handler = self.lock().handlers.last().map(|(_, handler)| handler.clone());
        match handler {
            Some(handler) => {
                handler(payload);
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self) -> bool {
        !self.lock().handlers.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        // A handler panicking on another thread must not wedge the slot.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for ResponseSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseSlot")
            .field("handlers", &self.lock().handlers.len())
            .finish()
    }
}
