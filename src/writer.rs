//! Atomic override replacement.

use crate::error::Result;
use crate::overrides::Extension;
use crate::store::OverrideStore;
use tracing::info;

/// Write side of the engine: swaps an extension's stored tree for the
/// edited one. The store supplies the transaction boundary; this layer
/// only adds the audit log line.
pub struct OverrideWriter<S> {
    store: S,
}

impl<S: OverrideStore> OverrideWriter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Replace the stored tree with the extension's current nodes.
    ///
    /// Full replace, not a merge: any previously stored path absent from
    /// the new tree is cleared. Applying the same tree twice is
    /// observationally idempotent. On success the extension carries its
    /// persisted id.
    pub fn replace(&self, extension: &mut Extension) -> Result<i64> {
        info!("updating configuration - {extension}");
        let id = self.store.replace(extension)?;
        extension.id = Some(id);
        Ok(id)
    }
}
