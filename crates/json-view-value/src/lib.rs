//! Shared JSON values for json-view.
//!
//! A [`Node`] is a JSON-like value whose containers are reference counted,
//! which makes every published document an immutable snapshot. Edits go
//! through [`clone_along`], which copies only the containers between the
//! root and the edited node, so the previous and next roots share every
//! other subtree.
//!
//! # Example
//!
//! ```
//! use json_view_value::{clone_along, get_mut, Node, PathSegment};
//! use serde_json::json;
//!
//! let before = Node::from(json!({"a": {"b": 1}, "c": [1, 2]}));
//! let path = [PathSegment::key("a")];
//!
//! let mut after = clone_along(&before, &path);
//! get_mut(&mut after, &path)
//!     .unwrap()
//!     .set_child(&PathSegment::key("b"), Node::from(2i64))
//!     .unwrap();
//!
//! assert_eq!(before.to_value(), json!({"a": {"b": 1}, "c": [1, 2]}));
//! assert_eq!(after.to_value(), json!({"a": {"b": 2}, "c": [1, 2]}));
//! assert!(after.get("c").unwrap().ptr_eq(before.get("c").unwrap()));
//! ```

pub mod cow;
pub mod error;
pub mod node;
pub mod path;

pub use cow::{clone_along, get_mut, set_in};
pub use error::PathError;
pub use node::{Array, Node, Object};
pub use path::{dotted, get, PathSegment};
