//! Shared JSON-like values.
//!
//! [`Node`] carries the same shapes as [`serde_json::Value`], but container
//! children live behind an [`Arc`]. Cloning a node is a pointer copy, so two
//! versions of a document can share every subtree an edit did not touch.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

use crate::error::PathError;
use crate::path::PathSegment;

/// Object children, in insertion order.
pub type Object = IndexMap<String, Node>;

/// Array children.
pub type Array = Vec<Node>;

/// An immutable, cheaply clonable JSON value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Arc<Array>),
    Object(Arc<Object>),
}

impl Node {
    /// An empty object node.
    pub fn object() -> Self {
        Node::Object(Arc::new(Object::new()))
    }

    /// An empty array node.
    pub fn array() -> Self {
        Node::Array(Arc::new(Array::new()))
    }

    /// The JSON type name of this node.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "boolean",
            Node::Number(_) => "number",
            Node::String(_) => "string",
            Node::Array(_) => "array",
            Node::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Node::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Node::Object(_))
    }

    pub fn is_container(&self) -> bool {
        self.is_array() || self.is_object()
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Node::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Node::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up an object member by key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_object()?.get(key)
    }

    /// Resolves one path segment against this node.
    ///
    /// Index segments address object keys by their decimal spelling, and key
    /// segments address array elements when they parse as an index.
    pub fn child(&self, segment: &PathSegment) -> Option<&Node> {
        match self {
            Node::Object(map) => map.get(&*segment.as_key()),
            Node::Array(arr) => arr.get(segment.as_index()?),
            _ => None,
        }
    }

    /// Returns `true` when `segment` names an existing child.
    pub fn has_child(&self, segment: &PathSegment) -> bool {
        self.child(segment).is_some()
    }

    /// Mutable access to a child, copying this container first if it is
    /// shared with another version.
    pub fn child_mut(&mut self, segment: &PathSegment) -> Option<&mut Node> {
        match self {
            Node::Object(map) => Arc::make_mut(map).get_mut(&*segment.as_key()),
            Node::Array(arr) => {
                let index = segment.as_index()?;
                Arc::make_mut(arr).get_mut(index)
            }
            _ => None,
        }
    }

    /// Writes `value` under `segment`.
    ///
    /// Objects insert or overwrite the key. Arrays overwrite the element and
    /// append when the index equals the length; anything further is an error.
    pub fn set_child(&mut self, segment: &PathSegment, value: Node) -> Result<(), PathError> {
        let found = self.kind();
        match self {
            Node::Object(map) => {
                Arc::make_mut(map).insert(segment.as_key().into_owned(), value);
                Ok(())
            }
            Node::Array(arr) => {
                let index = segment.as_index().ok_or_else(|| PathError::InvalidTarget {
                    segment: segment.to_string(),
                    found,
                })?;
                let len = arr.len();
                if index > len {
                    return Err(PathError::IndexOutOfBounds { index, len });
                }
                let arr = Arc::make_mut(arr);
                if index == len {
                    arr.push(value);
                } else {
                    arr[index] = value;
                }
                Ok(())
            }
            _ => Err(PathError::InvalidTarget {
                segment: segment.to_string(),
                found,
            }),
        }
    }

    /// Removes the child under `segment`, shifting later array elements
    /// down. Missing children and scalar nodes are left alone.
    pub fn remove_child(&mut self, segment: &PathSegment) -> Option<Node> {
        match self {
            Node::Object(map) => {
                let key = segment.as_key();
                if !map.contains_key(&*key) {
                    return None;
                }
                Arc::make_mut(map).shift_remove(&*key)
            }
            Node::Array(arr) => {
                let index = segment.as_index()?;
                if index >= arr.len() {
                    return None;
                }
                Some(Arc::make_mut(arr).remove(index))
            }
            _ => None,
        }
    }

    /// Copies this container one level deep. Children stay shared.
    pub fn shallow_clone(&self) -> Node {
        match self {
            Node::Array(arr) => Node::Array(Arc::new(Array::clone(arr))),
            Node::Object(map) => Node::Object(Arc::new(Object::clone(map))),
            other => other.clone(),
        }
    }

    /// Reference identity for containers. Scalars never compare identical.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Array(a), Node::Array(b)) => Arc::ptr_eq(a, b),
            (Node::Object(a), Node::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Converts into an owned [`serde_json::Value`], copying every level.
    pub fn to_value(&self) -> Value {
        match self {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => Value::Number(n.clone()),
            Node::String(s) => Value::String(s.clone()),
            Node::Array(arr) => Value::Array(arr.iter().map(Node::to_value).collect()),
            Node::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect(),
            ),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::Number(n),
            Value::String(s) => Node::String(s),
            Value::Array(arr) => arr.into_iter().map(Node::from).collect::<Array>().into(),
            Value::Object(map) => map.into_iter().map(|(k, v)| (k, Node::from(v))).collect(),
        }
    }
}

impl From<&Value> for Node {
    fn from(value: &Value) -> Self {
        Node::from(value.clone())
    }
}

impl From<&Node> for Value {
    fn from(node: &Node) -> Self {
        node.to_value()
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Bool(b)
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::Number(n.into())
    }
}

impl From<u64> for Node {
    fn from(n: u64) -> Self {
        Node::Number(n.into())
    }
}

impl From<f64> for Node {
    /// Non-finite floats have no JSON spelling and become `Null`.
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Node::Null, Node::Number)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_owned())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::String(s)
    }
}

impl From<Array> for Node {
    fn from(arr: Array) -> Self {
        Node::Array(Arc::new(arr))
    }
}

impl From<Object> for Node {
    fn from(map: Object) -> Self {
        Node::Object(Arc::new(map))
    }
}

impl FromIterator<(String, Node)> for Node {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Node::Object(Arc::new(iter.into_iter().collect()))
    }
}

impl FromIterator<Node> for Node {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Node::Array(Arc::new(iter.into_iter().collect()))
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Number(n) => n.serialize(serializer),
            Node::String(s) => serializer.serialize_str(s),
            Node::Array(arr) => serializer.collect_seq(arr.iter()),
            Node::Object(map) => serializer.collect_map(map.iter()),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Node::from)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
