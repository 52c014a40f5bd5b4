//! Edit-screen support: the inverse of resolution.
//!
//! [`fields`] flattens a schema tree (plus the currently stored overrides)
//! into dotted-key rows an edit form can render; [`bind`] maps the
//! submitted dotted-key values back into a minimal [`OverrideNode`] tree
//! ready for [`crate::writer::OverrideWriter::replace`].

use crate::error::{ConfigError, Result};
use crate::overrides::{Extension, NodeBody, OverrideNode};
use crate::schema::SchemaNode;
use crate::types::{Kind, Value};
use std::collections::BTreeMap;

/// One editable row of a flattened schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Dotted path from the schema root's children downward.
    pub key: String,
    pub kind: Kind,
    pub default: Option<Value>,
    /// Raw stored override, when one exists.
    pub current: Option<String>,
    pub configurator: bool,
}

/// Flatten the scalar leaves of a schema tree into edit rows, pairing each
/// with its stored override from `extension` when present.
pub fn fields(schema: &SchemaNode, extension: Option<&Extension>) -> Vec<Field> {
    let mut out = Vec::new();
    collect(&schema.children, "", extension, &mut out);
    out
}

fn collect(nodes: &[SchemaNode], prefix: &str, extension: Option<&Extension>, out: &mut Vec<Field>) {
    for node in nodes {
        let key = if prefix.is_empty() {
            node.name.clone()
        } else {
            format!("{prefix}.{}", node.name)
        };
        if node.kind == Kind::Array {
            collect(&node.children, &key, extension, out);
        } else {
            let path: Vec<&str> = key.split('.').collect();
            let current = extension
                .and_then(|ext| ext.lookup(&path))
                .map(str::to_string);
            out.push(Field {
                key,
                kind: node.kind,
                default: node.default.clone(),
                current,
                configurator: node.configurator,
            });
        }
    }
}

/// Build the override tree for a submitted edit set.
///
/// Every key must address a schema node and every value must parse as the
/// node's kind; the submitted set is authoritative, so values equal to the
/// schema default are stored like any other.
pub fn bind(schema: &SchemaNode, values: &BTreeMap<String, String>) -> Result<Vec<OverrideNode>> {
    let mut roots = Vec::new();
    for (key, raw) in values {
        let path: Vec<&str> = key.split('.').collect();
        let target = schema
            .find(&path)
            .ok_or_else(|| ConfigError::KeyNotFound(key.clone()))?;
        // validation only; the stored form stays the raw string
        target.kind.coerce(key, raw)?;
        insert_path(&mut roots, &path, raw)?;
    }
    Ok(roots)
}

fn insert_path(nodes: &mut Vec<OverrideNode>, path: &[&str], raw: &str) -> Result<()> {
    let Some((first, rest)) = path.split_first() else {
        return Ok(());
    };

    if rest.is_empty() {
        match nodes.iter_mut().find(|node| node.name == *first) {
            Some(existing) => existing.body = NodeBody::Leaf(raw.to_string()),
            None => nodes.push(OverrideNode::leaf(*first, raw)),
        }
        return Ok(());
    }

    let node = match nodes.iter().position(|node| node.name == *first) {
        Some(i) => &mut nodes[i],
        None => {
            nodes.push(OverrideNode::interior(*first, Vec::new()));
            nodes.last_mut().unwrap()
        }
    };
    match &mut node.body {
        NodeBody::Interior(children) => insert_path(children, rest, raw),
        NodeBody::Leaf(_) => Err(ConfigError::Schema(format!(
            "{first} is both a value and a section in the submitted set"
        ))),
    }
}
