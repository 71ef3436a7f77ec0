use serde::{Deserialize, Serialize};

/// Options for an [`AttributeStore`](crate::AttributeStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Appended to a renamed key when the new name is already taken.
    pub copy_suffix: String,
    /// Attribute holding the displayed root.
    pub global_attribute: String,
    /// Sub key of `global_attribute` that holds the root.
    pub src_key: String,
    /// Attribute holding the most recent request records.
    pub action_attribute: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            copy_suffix: "-copy".to_string(),
            global_attribute: "global".to_string(),
            src_key: "src".to_string(),
            action_attribute: "action".to_string(),
        }
    }
}
