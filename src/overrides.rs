//! Persisted override tree.
//!
//! An [`Extension`] is the root aggregate for one configurable unit,
//! unique per `(name, namespace)` in the store. Its [`OverrideNode`] tree
//! is independently shaped from the schema: the resolver combines the two
//! at lookup time and tolerates shapes the schema would not produce.

use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Root of a stored override tree, keyed by `(name, namespace)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Extension {
    /// Present once persisted.
    pub id: Option<i64>,
    /// Matches the schema tree's root name.
    pub name: String,
    pub namespace: String,
    pub nodes: Vec<OverrideNode>,
}

impl Extension {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            namespace: namespace.into(),
            nodes: Vec::new(),
        }
    }

    /// Direct child by name.
    pub fn get(&self, name: &str) -> Option<&OverrideNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Walk a dotted path (already split) down the tree and return the raw
    /// leaf value at its end.
    ///
    /// Dead ends yield `None`: a missing child, a leaf reached while
    /// segments remain, or an interior node at the end of the path.
    pub fn lookup(&self, path: &[&str]) -> Option<&str> {
        let (first, rest) = path.split_first()?;
        let mut node = self.get(first)?;
        for segment in rest {
            node = node.get(segment)?;
        }
        node.value()
    }

    /// Nested map form of the whole tree, leaves as JSON scalars.
    pub fn config_tree(&self) -> JsonValue {
        let mut map = Map::new();
        for node in &self.nodes {
            map.insert(node.name.clone(), node.json_value());
        }
        JsonValue::Object(map)
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}[{}]", self.name, self.namespace)
        }
    }
}

/// Explicit leaf/interior discriminator.
///
/// Replaces value-emptiness sniffing: an empty string is a legitimate
/// leaf value and never means "has children".
#[derive(Debug, Clone, PartialEq)]
pub enum NodeBody {
    Leaf(String),
    Interior(Vec<OverrideNode>),
}

/// One stored override entry. Children are owned; the parent link only
/// exists as a column in the persisted rows.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideNode {
    /// Present once persisted.
    pub id: Option<i64>,
    pub name: String,
    pub body: NodeBody,
}

impl OverrideNode {
    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            body: NodeBody::Leaf(value.into()),
        }
    }

    pub fn interior(name: impl Into<String>, children: Vec<OverrideNode>) -> Self {
        Self {
            id: None,
            name: name.into(),
            body: NodeBody::Interior(children),
        }
    }

    /// Raw stored value; `None` for interior nodes.
    pub fn value(&self) -> Option<&str> {
        match &self.body {
            NodeBody::Leaf(value) => Some(value),
            NodeBody::Interior(_) => None,
        }
    }

    /// Children; empty for leaves.
    pub fn children(&self) -> &[OverrideNode] {
        match &self.body {
            NodeBody::Leaf(_) => &[],
            NodeBody::Interior(children) => children,
        }
    }

    /// Direct child by name (first match wins).
    pub fn get(&self, name: &str) -> Option<&OverrideNode> {
        self.children().iter().find(|child| child.name == name)
    }

    fn json_value(&self) -> JsonValue {
        match &self.body {
            NodeBody::Interior(children) => {
                let mut map = Map::new();
                for child in children {
                    map.insert(child.name.clone(), child.json_value());
                }
                JsonValue::Object(map)
            }
            // Numeric-looking leaves export as numbers, everything else as
            // the raw string. Non-finite parses ("nan", "inf") stay strings;
            // JSON has no representation for them.
            NodeBody::Leaf(raw) => {
                if let Ok(i) = raw.parse::<i64>() {
                    JsonValue::from(i)
                } else if let Ok(x) = raw.parse::<f64>() {
                    if x.is_finite() {
                        JsonValue::from(x)
                    } else {
                        JsonValue::from(raw.clone())
                    }
                } else {
                    JsonValue::from(raw.clone())
                }
            }
        }
    }
}
