//! Effective-value resolution.
//!
//! Combines the two independently shaped trees: the typed schema tree
//! supplies the target node's kind and default, the stored override tree
//! supplies the raw value (when one exists).

use crate::error::{ConfigError, Result};
use crate::schema::provider::SchemaProvider;
use crate::schema::{self, SchemaNode};
use crate::store::OverrideStore;
use crate::types::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Read side of the engine. Stateless per call apart from the schema-tree
/// cache; collaborators are injected at construction.
pub struct Resolver<P, S> {
    provider: P,
    store: S,
    cache: Mutex<HashMap<String, Arc<SchemaNode>>>,
}

impl<P: SchemaProvider, S: OverrideStore> Resolver<P, S> {
    pub fn new(provider: P, store: S) -> Self {
        Self {
            provider,
            store,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve the effective typed value for a dotted key.
    ///
    /// The schema tree for `schema_id` names the target node; the override
    /// tree stored under `(root name, namespace)` is consulted for a raw
    /// value, which is coerced to the node's declared kind. Without an
    /// override the declared default is returned.
    ///
    /// Fails with [`ConfigError::KeyNotFound`] when the path matches no
    /// schema node and with [`ConfigError::TypeCoercion`] when a stored
    /// value does not parse -- a bad stored value never silently falls
    /// back to the default.
    pub fn value(&self, schema_id: &str, namespace: &str, key: &str) -> Result<Value> {
        let tree = self.schema_tree(schema_id)?;
        let path: Vec<&str> = key.split('.').collect();

        let target = tree
            .find(&path)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))?;

        if let Some(extension) = self.store.find(&tree.name, namespace)? {
            if let Some(raw) = extension.lookup(&path) {
                return target.kind.coerce(key, raw);
            }
        }

        match &target.default {
            Some(value) => Ok(value.clone()),
            // unreachable for trees built by schema::build; tolerated for
            // hand-assembled ones
            None => Err(ConfigError::Schema(format!("node {key} has no default value"))),
        }
    }

    /// The validated schema tree for an id, built on first use.
    pub fn schema_tree(&self, schema_id: &str) -> Result<Arc<SchemaNode>> {
        if let Some(tree) = self.cache.lock().unwrap().get(schema_id) {
            return Ok(Arc::clone(tree));
        }

        debug!(schema_id, "schema cache miss");
        let definition = self.provider.fetch(schema_id)?;
        let tree = Arc::new(schema::build(&definition)?);
        self.cache
            .lock()
            .unwrap()
            .insert(schema_id.to_string(), Arc::clone(&tree));
        Ok(tree)
    }
}
