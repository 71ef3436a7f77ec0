//! Attribute store and edit dispatch for interactive JSON viewers.
//!
//! Viewer components send [`Request`]s on an [`ActionChannel`]. The
//! [`AttributeStore`] handler applies them: display attributes are stored per
//! instance, and edit requests produce a new root through a copy-on-write
//! walk of the current one. Each handled request emits a [`StoreEvent`] for
//! its instance on the [`EventBus`], telling that instance's viewers to
//! re-read the store.
//!
//! # Example
//!
//! ```
//! use json_view_store::{connect, shared, ActionChannel, AttributeStore, EventClass, Request, RequestKind};
//! use json_view_value::Node;
//! use serde_json::json;
//!
//! let (store, bus) = shared(AttributeStore::new());
//! let mut channel = ActionChannel::new();
//! connect(&mut channel, store.clone(), bus.clone());
//!
//! store.lock().unwrap().set_src("viewer", Node::from(json!({"a": {"b": 1}})));
//! bus.lock().unwrap().subscribe("viewer", EventClass::VariableUpdate, |event| {
//!     assert_eq!(event.rjv_id, "viewer");
//! });
//!
//! channel
//!     .dispatch(
//!         &Request::new(RequestKind::VariableUpdated, "viewer")
//!             .with_namespace(["root", "a"])
//!             .with_name("b")
//!             .with_new_value(2i64),
//!     )
//!     .unwrap();
//!
//! let src = store.lock().unwrap().src("viewer").unwrap();
//! assert_eq!(src.to_value(), json!({"a": {"b": 2}}));
//! ```

pub mod channel;
pub mod config;
pub mod connect;
pub mod error;
pub mod events;
pub mod mutation;
pub mod request;
pub mod store;

pub use channel::{ActionChannel, HandlerId};
pub use config::StoreConfig;
pub use connect::{connect, shared, SharedBus, SharedStore};
pub use error::{DispatchError, HandlerError, MutationError, StoreError};
pub use events::{EventBus, EventClass, StoreEvent, SubscriptionId};
pub use mutation::update_src;
pub use request::{EditType, Request, RequestKind};
pub use store::{AttributeStore, Outcome, EDIT_KEY_REQUEST, NEW_KEY_REQUEST, VARIABLE_UPDATE};
