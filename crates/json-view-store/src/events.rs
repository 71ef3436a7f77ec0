//! Instance-scoped change notifications.
//!
//! Events carry no payload: a listener re-reads the store when it hears
//! about its instance.

use std::collections::BTreeMap;
use std::fmt;

pub type SubscriptionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventClass {
    Reset,
    VariableUpdate,
    AddKeyRequest,
    EditKeyRequest,
}

impl EventClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventClass::Reset => "reset",
            EventClass::VariableUpdate => "variable-update",
            EventClass::AddKeyRequest => "add-key-request",
            EventClass::EditKeyRequest => "edit-key-request",
        }
    }

    /// Flat event name in the `"<class>-<instance>"` form used by
    /// string-keyed emitters.
    pub fn event_name(&self, rjv_id: &str) -> String {
        format!("{}-{rjv_id}", self.as_str())
    }
}

impl fmt::Display for EventClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreEvent {
    pub rjv_id: String,
    pub class: EventClass,
}

impl StoreEvent {
    pub fn new(rjv_id: impl Into<String>, class: EventClass) -> Self {
        Self {
            rjv_id: rjv_id.into(),
            class,
        }
    }

    pub fn name(&self) -> String {
        self.class.event_name(&self.rjv_id)
    }
}

struct Subscription {
    rjv_id: String,
    class: EventClass,
    listener: Box<dyn FnMut(&StoreEvent) + Send>,
}

/// Listeners keyed by `(instance id, event class)`.
#[derive(Default)]
pub struct EventBus {
    next_subscription_id: SubscriptionId,
    subscriptions: BTreeMap<SubscriptionId, Subscription>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, rjv_id: impl Into<String>, class: EventClass, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + Send + 'static,
    {
        self.next_subscription_id = self.next_subscription_id.saturating_add(1);
        let id = self.next_subscription_id;
        self.subscriptions.insert(
            id,
            Subscription {
                rjv_id: rjv_id.into(),
                class,
                listener: Box::new(listener),
            },
        );
        id
    }

    pub fn unsubscribe(&mut self, subscription_id: SubscriptionId) -> bool {
        self.subscriptions.remove(&subscription_id).is_some()
    }

    /// Notifies matching listeners in subscription order and returns how
    /// many were called.
    pub fn emit(&mut self, event: &StoreEvent) -> usize {
        let mut notified = 0;
        for sub in self.subscriptions.values_mut() {
            if sub.class == event.class && sub.rjv_id == event.rjv_id {
                (sub.listener)(event);
                notified += 1;
            }
        }
        notified
    }

    /// Drops every subscription of an instance.
    pub fn dispose(&mut self, rjv_id: &str) -> usize {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|_, sub| sub.rjv_id != rjv_id);
        before - self.subscriptions.len()
    }

    pub fn listener_count(&self, rjv_id: &str, class: EventClass) -> usize {
        self.subscriptions
            .values()
            .filter(|sub| sub.class == class && sub.rjv_id == rjv_id)
            .count()
    }
}
