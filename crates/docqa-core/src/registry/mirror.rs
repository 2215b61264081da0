//! Write-through persistence of the document registry.

use super::model::DocumentRegistry;
use super::store::KeyValueStore;
use crate::error::Result;
use std::sync::Arc;

/// Fixed key the registry is stored under.
pub const REGISTRY_KEY: &str = "uploadedFiles";

/// Mirrors a [`DocumentRegistry`] into a [`KeyValueStore`] as a JSON array
/// of filenames.
///
/// The mirror is a client-side belief, not backend truth. It is read once at
/// startup and rewritten in full on every registry mutation.
#[derive(Clone)]
pub struct RegistryMirror {
    store: Arc<dyn KeyValueStore>,
}

impl RegistryMirror {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Reads the persisted registry.
    ///
    /// Never fails: an absent key, an unreadable store or a value that does
    /// not decode as a JSON array of strings all yield an empty registry.
    pub fn load(&self) -> DocumentRegistry {
        let raw = match self.store.get(REGISTRY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return DocumentRegistry::new(),
            Err(e) => {
                tracing::warn!("[RegistryMirror] Failed to read registry mirror: {}", e);
                return DocumentRegistry::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(filenames) => {
                tracing::debug!("[RegistryMirror] Loaded {} document(s)", filenames.len());
                DocumentRegistry::from_filenames(filenames)
            }
            Err(e) => {
                tracing::warn!(
                    "[RegistryMirror] Discarding undecodable registry mirror: {}",
                    e
                );
                DocumentRegistry::new()
            }
        }
    }

    /// Writes the full filename sequence back to the store.
    pub fn persist(&self, registry: &DocumentRegistry) -> Result<()> {
        let encoded = serde_json::to_string(&registry.filenames())?;
        self.store.set(REGISTRY_KEY, &encoded)
    }

    /// Removes the mirror entirely.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(REGISTRY_KEY)
    }
}
