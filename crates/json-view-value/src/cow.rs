//! Copy-on-write edits along a path.
//!
//! An edit first calls [`clone_along`], which copies only the containers on
//! the way from the root to the target. The copy is then edited in place
//! through [`get_mut`] / [`set_in`]; those containers are uniquely owned, so
//! `Arc::make_mut` does not copy them again. Everything off the path stays
//! shared with the previous root.

use std::sync::Arc;

use crate::error::PathError;
use crate::node::Node;
use crate::path::PathSegment;

/// Returns a new root in which every container from `root` down to and
/// including the node at `path` is a fresh shallow copy.
///
/// Cloning stops early where the path leaves the document; the containers
/// reached so far are still copied.
pub fn clone_along(root: &Node, path: &[PathSegment]) -> Node {
    let mut copy = root.shallow_clone();
    if let Some((head, rest)) = path.split_first() {
        if let Some(child) = root.child(head) {
            let child = clone_along(child, rest);
            if let Some(slot) = copy.child_mut(head) {
                *slot = child;
            }
        }
    }
    copy
}

/// Mutable access to the node at `path`, or `None` if any step is missing.
pub fn get_mut<'a>(node: &'a mut Node, path: &[PathSegment]) -> Option<&'a mut Node> {
    let mut current = node;
    for segment in path {
        current = current.child_mut(segment)?;
    }
    Some(current)
}

/// Writes `value` at `path`, creating intermediate containers.
///
/// A missing or scalar intermediate is replaced by an array when the next
/// segment reads as an index and by an object otherwise. Array steps may
/// append at the length but not skip past it. An empty path replaces `node`
/// itself.
pub fn set_in(node: &mut Node, path: &[PathSegment], value: Node) -> Result<(), PathError> {
    let Some((head, rest)) = path.split_first() else {
        *node = value;
        return Ok(());
    };
    if !node.is_container() {
        *node = container_for(head);
    }
    let found = node.kind();
    let child = match node {
        Node::Object(map) => Arc::make_mut(map)
            .entry(head.as_key().into_owned())
            .or_insert(Node::Null),
        Node::Array(arr) => {
            let index = head.as_index().ok_or_else(|| PathError::InvalidTarget {
                segment: head.to_string(),
                found,
            })?;
            let len = arr.len();
            if index > len {
                return Err(PathError::IndexOutOfBounds { index, len });
            }
            let arr = Arc::make_mut(arr);
            if index == len {
                arr.push(Node::Null);
            }
            &mut arr[index]
        }
        _ => {
            return Err(PathError::InvalidTarget {
                segment: head.to_string(),
                found,
            })
        }
    };
    set_in(child, rest, value)
}

fn container_for(segment: &PathSegment) -> Node {
    if segment.as_index().is_some() {
        Node::array()
    } else {
        Node::object()
    }
}
