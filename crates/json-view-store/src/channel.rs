//! Process-wide publish point for viewer requests.

use std::collections::BTreeMap;

use log::warn;

use crate::error::{DispatchError, HandlerError};
use crate::request::Request;

pub type HandlerId = u64;

type Handler = Box<dyn FnMut(&Request) -> Result<(), HandlerError> + Send>;

/// Fans every dispatched request out to the registered handlers.
///
/// Handlers run synchronously in registration order. A failing handler does
/// not stop the ones after it; all failures are returned together once the
/// last handler has run.
pub struct ActionChannel {
    next_handler_id: HandlerId,
    handlers: BTreeMap<HandlerId, Handler>,
}

impl Default for ActionChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionChannel {
    pub fn new() -> Self {
        Self {
            next_handler_id: 1,
            handlers: BTreeMap::new(),
        }
    }

    pub fn register<F>(&mut self, handler: F) -> HandlerId
    where
        F: FnMut(&Request) -> Result<(), HandlerError> + Send + 'static,
    {
        let id = self.next_handler_id;
        self.next_handler_id = self.next_handler_id.saturating_add(1);
        self.handlers.insert(id, Box::new(handler));
        id
    }

    pub fn unregister(&mut self, handler_id: HandlerId) -> bool {
        self.handlers.remove(&handler_id).is_some()
    }

    pub fn dispatch(&mut self, request: &Request) -> Result<(), DispatchError> {
        let mut failures = Vec::new();
        for (id, handler) in self.handlers.iter_mut() {
            if let Err(err) = handler(request) {
                warn!(
                    "handler {id} failed on {} for '{}': {err}",
                    request.kind, request.rjv_id
                );
                failures.push((*id, err));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError { failures })
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
