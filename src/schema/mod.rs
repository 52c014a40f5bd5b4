//! Typed schema tree: validation, path lookup, introspection.

pub mod definition;
pub mod provider;

use crate::error::{ConfigError, Result};
use crate::types::{Kind, Value};
use definition::{DefinitionNode, SchemaDefinition};

/// One node of the validated configuration schema.
///
/// Immutable after [`build`]; either a scalar leaf carrying a default and
/// no children, or an `Array` interior node carrying children and no
/// default.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub name: String,
    pub kind: Kind,
    pub default: Option<Value>,
    pub configurator: bool,
    pub children: Vec<SchemaNode>,
}

impl SchemaNode {
    /// Locate the target node for a dotted path split into segments.
    ///
    /// Each segment must match a child's name at the current level (first
    /// match in child order wins). Matching an interior node descends;
    /// matching a scalar stops there and returns it, even if segments
    /// remain -- the remaining segments are only meaningful against the
    /// override tree. Exhausting the path inside interior nodes is a miss.
    pub fn find(&self, path: &[&str]) -> Option<&SchemaNode> {
        let mut current = self;
        for segment in path {
            let child = current.children.iter().find(|c| c.name == *segment)?;
            if child.kind == Kind::Array {
                current = child;
            } else {
                return Some(child);
            }
        }
        None
    }
}

/// Validate a definition into a [`SchemaNode`] tree rooted at an `Array`.
pub fn build(def: &SchemaDefinition) -> Result<SchemaNode> {
    if def.name.is_empty() {
        return Err(ConfigError::Schema("definition has an empty root name".to_string()));
    }
    if def.nodes.is_empty() {
        return Err(ConfigError::Schema(format!(
            "definition {} declares no nodes",
            def.name
        )));
    }
    let children = def
        .nodes
        .iter()
        .map(|node| build_node(&def.name, node))
        .collect::<Result<Vec<_>>>()?;
    Ok(SchemaNode {
        name: def.name.clone(),
        kind: Kind::Array,
        default: None,
        configurator: false,
        children,
    })
}

fn build_node(parent: &str, def: &DefinitionNode) -> Result<SchemaNode> {
    if def.name.is_empty() {
        return Err(ConfigError::Schema(format!("{parent} has a child with an empty name")));
    }
    let path = format!("{parent}.{}", def.name);

    let (default, children) = match def.type_tag {
        Kind::Array => {
            if def.default.is_some() {
                return Err(ConfigError::Schema(format!(
                    "array node {path} declares a scalar default"
                )));
            }
            if def.children.is_empty() {
                return Err(ConfigError::Schema(format!(
                    "array node {path} has no children"
                )));
            }
            let children = def
                .children
                .iter()
                .map(|child| build_node(&path, child))
                .collect::<Result<Vec<_>>>()?;
            (None, children)
        }
        kind => {
            if !def.children.is_empty() {
                return Err(ConfigError::Schema(format!(
                    "scalar node {path} has children"
                )));
            }
            let default = match &def.default {
                Some(value) => normalize_default(&path, kind, value)?,
                None => {
                    return Err(ConfigError::Schema(format!(
                        "scalar node {path} has no default value"
                    )));
                }
            };
            (Some(default), Vec::new())
        }
    };

    Ok(SchemaNode {
        name: def.name.clone(),
        kind: def.type_tag,
        default,
        configurator: def.configurator,
        children,
    })
}

/// Check the declared default against the declared kind. Integer literals
/// are accepted for float nodes (YAML `3` parses as an int).
fn normalize_default(path: &str, kind: Kind, value: &Value) -> Result<Value> {
    match (kind, value) {
        (Kind::Float, Value::Int(i)) => Ok(Value::Float(*i as f64)),
        _ if value.kind() == kind => Ok(value.clone()),
        _ => Err(ConfigError::Schema(format!(
            "default for {path} is {} but node is declared {kind}",
            value.kind()
        ))),
    }
}

/// True if any node in the subtree is flagged user-editable.
///
/// A subtree with no children and no flags anywhere is not editable.
pub fn is_configurator_enabled(node: &SchemaNode) -> bool {
    node.children
        .iter()
        .any(|child| child.configurator || is_configurator_enabled(child))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_definition() -> SchemaDefinition {
        SchemaDefinition {
            name: "app".to_string(),
            nodes: vec![DefinitionNode::array(
                "db",
                vec![
                    DefinitionNode::scalar("host", Kind::Str, "localhost"),
                    DefinitionNode::scalar("port", Kind::Int, 5432i64),
                ],
            )],
        }
    }

    #[test]
    fn build_validates_and_keeps_structure() {
        let tree = build(&db_definition()).unwrap();
        assert_eq!(tree.name, "app");
        assert_eq!(tree.kind, Kind::Array);
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].children.len(), 2);
    }

    #[test]
    fn build_rejects_array_without_children() {
        let def = SchemaDefinition {
            name: "app".to_string(),
            nodes: vec![DefinitionNode::array("db", vec![])],
        };
        assert!(matches!(build(&def), Err(ConfigError::Schema(_))));
    }

    #[test]
    fn build_rejects_scalar_without_default() {
        let def = SchemaDefinition {
            name: "app".to_string(),
            nodes: vec![DefinitionNode {
                name: "host".to_string(),
                type_tag: Kind::Str,
                default: None,
                configurator: false,
                children: Vec::new(),
            }],
        };
        assert!(matches!(build(&def), Err(ConfigError::Schema(_))));
    }

    #[test]
    fn build_rejects_mismatched_default() {
        let def = SchemaDefinition {
            name: "app".to_string(),
            nodes: vec![DefinitionNode::scalar("port", Kind::Int, "5432")],
        };
        assert!(matches!(build(&def), Err(ConfigError::Schema(_))));
    }

    #[test]
    fn build_widens_int_default_for_float_node() {
        let def = SchemaDefinition {
            name: "app".to_string(),
            nodes: vec![DefinitionNode::scalar("ratio", Kind::Float, 2i64)],
        };
        let tree = build(&def).unwrap();
        assert_eq!(tree.children[0].default, Some(Value::Float(2.0)));
    }

    #[test]
    fn find_descends_interior_nodes_only() {
        let tree = build(&db_definition()).unwrap();
        let host = tree.find(&["db", "host"]).unwrap();
        assert_eq!(host.kind, Kind::Str);

        // A scalar match stops the walk even with segments left over.
        let early = tree.find(&["db", "host", "extra"]).unwrap();
        assert_eq!(early.name, "host");

        assert!(tree.find(&["db", "unknown"]).is_none());
        assert!(tree.find(&["db"]).is_none()); // interior node is not a target
        assert!(tree.find(&["nope", "host"]).is_none());
    }

    #[test]
    fn configurator_flag_is_found_anywhere_in_subtree() {
        let mut def = db_definition();
        assert!(!is_configurator_enabled(&build(&def).unwrap()));

        def.nodes[0].children[1] = def.nodes[0].children[1].clone().with_configurator();
        assert!(is_configurator_enabled(&build(&def).unwrap()));
    }

    #[test]
    fn configurator_is_false_for_leafless_flagless_tree() {
        let leaf = SchemaNode {
            name: "host".to_string(),
            kind: Kind::Str,
            default: Some(Value::Str("x".to_string())),
            configurator: false,
            children: Vec::new(),
        };
        assert!(!is_configurator_enabled(&leaf));
    }
}
