//! Error types for the store and its dispatch channel.

use json_view_value::PathError;
use thiserror::Error;

use crate::channel::HandlerId;

/// Why an edit could not produce a new root. The stored root is left as it
/// was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("path not found: '{path}'")]
    PathNotFound { path: String },
    #[error("cannot edit a {found} at '{path}'")]
    InvalidTarget { path: String, found: &'static str },
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),
    #[error(transparent)]
    Path(#[from] PathError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("edit failed for instance '{rjv_id}': {source}")]
    Mutation {
        rjv_id: String,
        #[source]
        source: MutationError,
    },
    #[error("request decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure reported by one channel handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("shared state lock poisoned")]
    Poisoned,
    #[error("{0}")]
    Other(String),
}

/// Every handler ran; these ones failed.
#[derive(Debug, Error)]
#[error("{} handler(s) failed during dispatch", .failures.len())]
pub struct DispatchError {
    pub failures: Vec<(HandlerId, HandlerError)>,
}
