//! Wires a shared store and event bus to an [`ActionChannel`].

use std::sync::{Arc, Mutex};

use crate::channel::{ActionChannel, HandlerId};
use crate::error::HandlerError;
use crate::events::EventBus;
use crate::store::AttributeStore;

pub type SharedStore = Arc<Mutex<AttributeStore>>;
pub type SharedBus = Arc<Mutex<EventBus>>;

/// Registers the store's request handler on `channel`.
///
/// The store lock is released before the event is emitted, so listeners may
/// read the store from inside their callback. Listeners must not lock the
/// bus itself. A rejected edit is reported to the channel and emits nothing.
pub fn connect(channel: &mut ActionChannel, store: SharedStore, bus: SharedBus) -> HandlerId {
    channel.register(move |request| {
        let outcome = {
            let mut store = store.lock().map_err(|_| HandlerError::Poisoned)?;
            store.handle_request(request)?
        };
        if let Some(outcome) = outcome {
            let mut bus = bus.lock().map_err(|_| HandlerError::Poisoned)?;
            bus.emit(&outcome.event());
        }
        Ok(())
    })
}

/// Shorthand for a new shared store and bus.
pub fn shared(store: AttributeStore) -> (SharedStore, SharedBus) {
    (Arc::new(Mutex::new(store)), Arc::new(Mutex::new(EventBus::new())))
}
