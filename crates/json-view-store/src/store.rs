//! Per-instance display attributes and displayed roots.

use std::collections::HashMap;

use json_view_value::Node;
use log::{debug, info, warn};

use crate::config::StoreConfig;
use crate::events::{EventClass, StoreEvent};
use crate::mutation::update_src;
use crate::request::{EditType, Request, RequestKind};
use crate::StoreError;

/// Sub key of the action attribute holding the last applied edit.
pub const VARIABLE_UPDATE: &str = "variable-update";
/// Sub key of the action attribute holding the last add-key prompt.
pub const NEW_KEY_REQUEST: &str = "new-key-request";
/// Sub key of the action attribute holding the last edit-key prompt.
pub const EDIT_KEY_REQUEST: &str = "edit-key-request";

type Namespace = HashMap<String, HashMap<String, Node>>;

/// What handling one request produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub rjv_id: String,
    pub class: EventClass,
    /// The new root, for edit requests.
    pub updated_src: Option<Node>,
}

impl Outcome {
    pub fn event(&self) -> StoreEvent {
        StoreEvent::new(self.rjv_id.clone(), self.class)
    }
}

/// Display state for every viewer instance in the process.
///
/// Values are partitioned by instance id, then attribute name, then sub
/// key. The displayed root of an instance lives under `("global", "src")`.
#[derive(Debug, Default)]
pub struct AttributeStore {
    config: StoreConfig,
    objects: HashMap<String, Namespace>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            objects: HashMap::new(),
        }
    }

    pub fn set_attribute(&mut self, rjv_id: &str, name: &str, key: &str, value: Node) {
        insert(&mut self.objects, rjv_id, name, key, value);
    }

    /// Returns the stored value, or `fallback` when nothing is stored or the
    /// stored value is `null`.
    pub fn get_attribute(&self, rjv_id: &str, name: &str, key: &str, fallback: Node) -> Node {
        match self
            .objects
            .get(rjv_id)
            .and_then(|attrs| attrs.get(name))
            .and_then(|keys| keys.get(key))
        {
            Some(value) if !value.is_null() => value.clone(),
            _ => fallback,
        }
    }

    /// The displayed root of an instance, if one was set.
    pub fn src(&self, rjv_id: &str) -> Option<Node> {
        let value = self.get_attribute(rjv_id, &self.config.global_attribute, &self.config.src_key, Node::Null);
        (!value.is_null()).then_some(value)
    }

    pub fn set_src(&mut self, rjv_id: &str, src: Node) {
        insert(
            &mut self.objects,
            rjv_id,
            &self.config.global_attribute,
            &self.config.src_key,
            src,
        );
    }

    /// Releases everything stored for an instance.
    pub fn dispose(&mut self, rjv_id: &str) -> bool {
        let removed = self.objects.remove(rjv_id).is_some();
        if removed {
            info!("disposed attributes of '{rjv_id}'");
        }
        removed
    }

    pub fn instances(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    /// Applies one request. Unknown kinds return `Ok(None)` and change
    /// nothing. A failed edit leaves the instance untouched.
    pub fn handle_request(&mut self, request: &Request) -> Result<Option<Outcome>, StoreError> {
        let rjv_id = request.rjv_id.as_str();
        debug!("handling {} for '{rjv_id}'", request.kind);
        if let Some(edit_type) = request.kind.edit_type() {
            return self.apply_edit(request, edit_type).map(Some);
        }
        let outcome = match &request.kind {
            RequestKind::Reset => Outcome {
                rjv_id: rjv_id.to_string(),
                class: EventClass::Reset,
                updated_src: None,
            },
            RequestKind::AddKeyRequest => self.record_prompt(request, NEW_KEY_REQUEST, EventClass::AddKeyRequest),
            RequestKind::EditKeyRequest => self.record_prompt(request, EDIT_KEY_REQUEST, EventClass::EditKeyRequest),
            kind => {
                debug!("ignoring request kind '{kind}' for '{rjv_id}'");
                return Ok(None);
            }
        };
        Ok(Some(outcome))
    }

    fn apply_edit(&mut self, request: &Request, edit_type: EditType) -> Result<Outcome, StoreError> {
        let rjv_id = request.rjv_id.as_str();
        let src = self.src(rjv_id).unwrap_or_default();
        let updated = update_src(&src, request, &self.config).map_err(|source| {
            warn!("{} for '{rjv_id}' rejected: {source}", request.kind);
            StoreError::Mutation {
                rjv_id: rjv_id.to_string(),
                source,
            }
        })?;

        self.set_src(rjv_id, updated.clone());
        insert(
            &mut self.objects,
            rjv_id,
            &self.config.action_attribute,
            VARIABLE_UPDATE,
            request.action_record(edit_type, &updated),
        );
        Ok(Outcome {
            rjv_id: rjv_id.to_string(),
            class: EventClass::VariableUpdate,
            updated_src: Some(updated),
        })
    }

    fn record_prompt(&mut self, request: &Request, key: &str, class: EventClass) -> Outcome {
        let rjv_id = request.rjv_id.as_str();
        insert(
            &mut self.objects,
            rjv_id,
            &self.config.action_attribute,
            key,
            request.to_node(),
        );
        Outcome {
            rjv_id: rjv_id.to_string(),
            class,
            updated_src: None,
        }
    }
}

fn insert(objects: &mut HashMap<String, Namespace>, rjv_id: &str, name: &str, key: &str, value: Node) {
    objects
        .entry(rjv_id.to_string())
        .or_default()
        .entry(name.to_string())
        .or_default()
        .insert(key.to_string(), value);
}
