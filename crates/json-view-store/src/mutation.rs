//! Path-scoped copy-on-write edits of a viewer's root.
//!
//! Every edit kind copies the containers between the root and the target
//! once, through [`clone_along`], and then branches on the request flags:
//!
//! 1. `variable_key_updated`: rename a key (arrays drop the element instead,
//!    positions cannot be renamed).
//! 2. `variable_removed`: delete a key or element.
//! 3. `object_update`: replace the whole subtree at the namespace.
//! 4. `name` set: write `new_value` under `name`.
//! 5. `name` unset: insert the single key of `new_value` with a `null`
//!    placeholder, filled in by a later update.

use std::sync::Arc;

use json_view_value::{clone_along, dotted, get, get_mut, set_in, Node, PathSegment};
use log::trace;

use crate::config::StoreConfig;
use crate::error::MutationError;
use crate::request::Request;

/// Computes the root that results from applying `request` to `src`.
///
/// `src` is never modified; the returned root shares every subtree that is
/// not on the request's path.
pub fn update_src(src: &Node, request: &Request, config: &StoreConfig) -> Result<Node, MutationError> {
    // The first segment is the viewer's root marker.
    let namespace = request.namespace.get(1..).unwrap_or_default();
    let parent_path = dotted(namespace);

    let existing = get(src, namespace);
    let mut updated = clone_along(src, namespace);
    trace!(
        "copied path '{parent_path}' ({} level(s)) for {}",
        namespace.len() + 1,
        request.kind
    );

    if request.variable_key_updated {
        let target = target_mut(&mut updated, namespace, &parent_path)?;
        rename(target, request, existing, config, &parent_path)?;
    } else if request.variable_removed {
        if let (Some(target), Some(name)) = (get_mut(&mut updated, namespace), &request.name) {
            target.remove_child(name);
        }
    } else if request.object_update {
        let value = request.new_value.clone().unwrap_or_default();
        if namespace.is_empty() {
            updated = value;
        } else {
            set_in(&mut updated, namespace, value)?;
        }
    } else if let Some(name) = &request.name {
        let target = target_mut(&mut updated, namespace, &parent_path)?;
        target.set_child(name, request.new_value.clone().unwrap_or_default())?;
    } else {
        let key = request
            .new_value
            .as_ref()
            .and_then(Node::as_object)
            .and_then(|entry| entry.keys().next())
            .ok_or(MutationError::InvalidRequest(
                "inserting a key needs a new_value object with one entry",
            ))?;
        let target = target_mut(&mut updated, namespace, &parent_path)?;
        target.set_child(&PathSegment::key(key.as_str()), Node::Null)?;
    }

    Ok(updated)
}

fn target_mut<'a>(root: &'a mut Node, namespace: &[PathSegment], parent_path: &str) -> Result<&'a mut Node, MutationError> {
    get_mut(root, namespace).ok_or_else(|| MutationError::PathNotFound {
        path: parent_path.to_string(),
    })
}

/// Renames `name` to `key_name` inside `target`. `existing` is the target
/// as it was before the edit.
fn rename(
    target: &mut Node,
    request: &Request,
    existing: Option<&Node>,
    config: &StoreConfig,
    parent_path: &str,
) -> Result<(), MutationError> {
    let name = request
        .name
        .as_ref()
        .ok_or(MutationError::InvalidRequest("renaming needs the current name"))?;

    if target.is_array() {
        target.remove_child(name);
        return Ok(());
    }
    let found = target.kind();
    let Node::Object(map) = target else {
        return Err(MutationError::InvalidTarget {
            path: parent_path.to_string(),
            found,
        });
    };

    let key_name = request
        .key_name
        .as_deref()
        .ok_or(MutationError::InvalidRequest("renaming needs a key_name"))?;
    let old_key = name.as_key();
    if key_name == old_key {
        return Ok(());
    }

    let taken = existing.is_some_and(|node| node.has_child(&PathSegment::key(key_name)));
    let new_key = if taken {
        format!("{key_name}{}", config.copy_suffix)
    } else {
        key_name.to_string()
    };

    let map = Arc::make_mut(map);
    let value = request
        .existing_value
        .clone()
        .or_else(|| map.get(&*old_key).cloned())
        .unwrap_or_default();
    // Renaming "y-copy" to a taken "y" lands back on "y-copy".
    let keep_old = new_key == old_key;
    map.insert(new_key, value);
    if !keep_old {
        map.shift_remove(&*old_key);
    }
    Ok(())
}
