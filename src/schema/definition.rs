//! Schema definition structures supplied by the embedding application.
//!
//! This is the abstract shape the core depends on: a named root plus a
//! tree of `{name, type, default, children}` nodes. How the application
//! authors it (code, YAML file, generated) is its own business.

use crate::types::{Kind, Value};
use serde::{Deserialize, Serialize};

/// A complete named configuration definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Root name; also the extension name persisted overrides are keyed by.
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<DefinitionNode>,
}

/// One entry in a definition tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionNode {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: Kind,
    /// Declared default. Required for scalar nodes, forbidden for arrays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Marks the node as user-editable on the configurator screen.
    #[serde(default)]
    pub configurator: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DefinitionNode>,
}

impl DefinitionNode {
    /// Shorthand for a scalar leaf.
    pub fn scalar(name: impl Into<String>, type_tag: Kind, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            type_tag,
            default: Some(default.into()),
            configurator: false,
            children: Vec::new(),
        }
    }

    /// Shorthand for an interior node.
    pub fn array(name: impl Into<String>, children: Vec<DefinitionNode>) -> Self {
        Self {
            name: name.into(),
            type_tag: Kind::Array,
            default: None,
            configurator: false,
            children,
        }
    }

    pub fn with_configurator(mut self) -> Self {
        self.configurator = true;
        self
    }
}
