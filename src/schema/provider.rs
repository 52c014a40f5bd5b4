//! Schema definition providers.
//!
//! The resolver only depends on the [`SchemaProvider`] trait; the two
//! implementations here cover the common cases of definitions registered
//! in code and definitions authored as YAML files.

use super::definition::SchemaDefinition;
use crate::error::{ConfigError, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// Supplies the definition registered under a schema id.
pub trait SchemaProvider {
    /// Unknown or unreadable ids fail with [`ConfigError::Schema`].
    fn fetch(&self, schema_id: &str) -> Result<SchemaDefinition>;
}

/// In-memory registry of definitions, keyed by schema id.
#[derive(Debug, Default)]
pub struct RegistryProvider {
    definitions: HashMap<String, SchemaDefinition>,
}

impl RegistryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, schema_id: impl Into<String>, definition: SchemaDefinition) {
        self.definitions.insert(schema_id.into(), definition);
    }
}

impl SchemaProvider for RegistryProvider {
    fn fetch(&self, schema_id: &str) -> Result<SchemaDefinition> {
        self.definitions
            .get(schema_id)
            .cloned()
            .ok_or_else(|| ConfigError::Schema(format!("no definition registered for {schema_id}")))
    }
}

/// Loads `<schema_id>.yaml` definitions from a directory.
#[derive(Debug, Clone)]
pub struct FileProvider {
    dir: PathBuf,
}

impl FileProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SchemaProvider for FileProvider {
    fn fetch(&self, schema_id: &str) -> Result<SchemaDefinition> {
        // Ids are file stems, never paths.
        if schema_id.is_empty() || schema_id.contains(['/', '\\', '.']) {
            return Err(ConfigError::Schema(format!("invalid schema id: {schema_id}")));
        }
        let path = self.dir.join(format!("{schema_id}.yaml"));
        let text = std::fs::read_to_string(&path).map_err(|e| {
            ConfigError::Schema(format!("cannot read definition {}: {e}", path.display()))
        })?;
        serde_yaml::from_str(&text).map_err(|e| {
            ConfigError::Schema(format!("invalid definition {}: {e}", path.display()))
        })
    }
}
