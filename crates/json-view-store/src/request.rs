//! Requests sent by viewer components.

use std::fmt;

use json_view_value::{Node, Object, PathSegment};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

/// What a request asks the store to do.
///
/// Kinds the store does not know are kept as [`RequestKind::Unknown`] so that
/// decoding never fails on them; the store ignores them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestKind {
    Reset,
    VariableUpdated,
    VariableRemoved,
    VariableAdded,
    VariableKeyUpdated,
    AddKeyRequest,
    EditKeyRequest,
    Unknown(String),
}

impl RequestKind {
    pub fn as_str(&self) -> &str {
        match self {
            RequestKind::Reset => "RESET",
            RequestKind::VariableUpdated => "VARIABLE_UPDATED",
            RequestKind::VariableRemoved => "VARIABLE_REMOVED",
            RequestKind::VariableAdded => "VARIABLE_ADDED",
            RequestKind::VariableKeyUpdated => "VARIABLE_KEY_UPDATED",
            RequestKind::AddKeyRequest => "ADD_KEY_REQUEST",
            RequestKind::EditKeyRequest => "EDIT_KEY_REQUEST",
            RequestKind::Unknown(name) => name,
        }
    }

    /// The edit type recorded for kinds that change the root.
    pub fn edit_type(&self) -> Option<EditType> {
        match self {
            RequestKind::VariableUpdated => Some(EditType::VariableEdited),
            RequestKind::VariableRemoved => Some(EditType::VariableRemoved),
            RequestKind::VariableAdded => Some(EditType::VariableAdded),
            RequestKind::VariableKeyUpdated => Some(EditType::VariableKeyAdded),
            _ => None,
        }
    }
}

impl From<&str> for RequestKind {
    fn from(name: &str) -> Self {
        match name {
            "RESET" => RequestKind::Reset,
            "VARIABLE_UPDATED" => RequestKind::VariableUpdated,
            "VARIABLE_REMOVED" => RequestKind::VariableRemoved,
            "VARIABLE_ADDED" => RequestKind::VariableAdded,
            "VARIABLE_KEY_UPDATED" => RequestKind::VariableKeyUpdated,
            // Older viewers send the long spellings.
            "ADD_KEY_REQUEST" | "ADD_VARIABLE_KEY_REQUEST" => RequestKind::AddKeyRequest,
            "EDIT_KEY_REQUEST" | "UPDATE_VARIABLE_KEY_REQUEST" => RequestKind::EditKeyRequest,
            other => RequestKind::Unknown(other.to_string()),
        }
    }
}

impl From<String> for RequestKind {
    fn from(name: String) -> Self {
        RequestKind::from(name.as_str())
    }
}

impl From<RequestKind> for String {
    fn from(kind: RequestKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag stored on the action record of an applied edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditType {
    VariableEdited,
    VariableRemoved,
    VariableAdded,
    VariableKeyAdded,
}

impl EditType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditType::VariableEdited => "variable-edited",
            EditType::VariableRemoved => "variable-removed",
            EditType::VariableAdded => "variable-added",
            EditType::VariableKeyAdded => "variable-key-added",
        }
    }
}

/// A request addressed to one viewer instance.
///
/// `namespace` starts with the viewer's root marker, which the store drops
/// before resolving the path. A `name` of `None` on an edit asks for a new
/// key taken from the single entry of `new_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub kind: RequestKind,
    #[serde(alias = "rjvId")]
    pub rjv_id: String,
    #[serde(default)]
    pub name: Option<PathSegment>,
    #[serde(default)]
    pub namespace: Vec<PathSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_value: Option<Node>,
    #[serde(default)]
    pub variable_key_updated: bool,
    #[serde(default)]
    pub variable_removed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    #[serde(default)]
    pub object_update: bool,
}

impl Request {
    pub fn new(kind: RequestKind, rjv_id: impl Into<String>) -> Self {
        Self {
            kind,
            rjv_id: rjv_id.into(),
            name: None,
            namespace: Vec::new(),
            new_value: None,
            existing_value: None,
            variable_key_updated: false,
            variable_removed: false,
            key_name: None,
            object_update: false,
        }
    }

    pub fn reset(rjv_id: impl Into<String>) -> Self {
        Self::new(RequestKind::Reset, rjv_id)
    }

    /// Decodes the JSON payload a viewer component sends.
    pub fn from_json(value: Value) -> Result<Self, StoreError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn with_name(mut self, name: impl Into<PathSegment>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_namespace<I, S>(mut self, namespace: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        self.namespace = namespace.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_new_value(mut self, value: impl Into<Node>) -> Self {
        self.new_value = Some(value.into());
        self
    }

    pub fn with_existing_value(mut self, value: impl Into<Node>) -> Self {
        self.existing_value = Some(value.into());
        self
    }

    pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = Some(key_name.into());
        self
    }

    pub fn key_updated(mut self) -> Self {
        self.variable_key_updated = true;
        self
    }

    pub fn removed(mut self) -> Self {
        self.variable_removed = true;
        self
    }

    pub fn object_update(mut self) -> Self {
        self.object_update = true;
        self
    }

    /// The request as stored under the action attribute. Values are shared,
    /// not copied.
    pub fn to_node(&self) -> Node {
        let mut record = Object::new();
        record.insert("kind".to_string(), Node::from(self.kind.as_str()));
        record.insert("rjv_id".to_string(), Node::from(self.rjv_id.as_str()));
        record.insert(
            "name".to_string(),
            match &self.name {
                Some(PathSegment::Key(k)) => Node::from(k.as_str()),
                Some(PathSegment::Index(i)) => Node::from(*i as u64),
                None => Node::Null,
            },
        );
        record.insert(
            "namespace".to_string(),
            self.namespace
                .iter()
                .map(|segment| match segment {
                    PathSegment::Key(k) => Node::from(k.as_str()),
                    PathSegment::Index(i) => Node::from(*i as u64),
                })
                .collect(),
        );
        record.insert("new_value".to_string(), self.new_value.clone().unwrap_or_default());
        record.insert(
            "existing_value".to_string(),
            self.existing_value.clone().unwrap_or_default(),
        );
        record.insert(
            "variable_key_updated".to_string(),
            Node::from(self.variable_key_updated),
        );
        record.insert("variable_removed".to_string(), Node::from(self.variable_removed));
        record.insert(
            "key_name".to_string(),
            self.key_name.as_deref().map_or(Node::Null, Node::from),
        );
        record.insert("object_update".to_string(), Node::from(self.object_update));
        Node::from(record)
    }

    /// The record kept after an edit: the request plus its edit type and
    /// the root it produced.
    pub fn action_record(&self, edit_type: EditType, updated_src: &Node) -> Node {
        let mut record = match self.to_node() {
            Node::Object(map) => Object::clone(&map),
            _ => Object::new(),
        };
        record.insert("type".to_string(), Node::from(edit_type.as_str()));
        record.insert("updated_src".to_string(), updated_src.clone());
        Node::from(record)
    }
}
