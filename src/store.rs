use crate::error::StoreError;
use ahash::AHashMap;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// The persistence collaborator as seen by the core: JSON blobs by key plus a per-module
/// completion flag. Each call is a single request/response; nothing is retried.
pub trait ContentStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
    fn set_completed(&mut self, module: &str, completed: bool) -> Result<(), StoreError>;
    fn is_completed(&self, module: &str) -> Result<bool, StoreError>;
}

/// An in-process store, optionally persisted to a bincode snapshot file.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: AHashMap<String, Value>,
    completed: AHashMap<String, bool>,
}

/// On-disk form. Blobs are kept as JSON text since bincode cannot encode arbitrary JSON values.
#[derive(Serialize, Deserialize)]
struct StoreSnapshot {
    blobs: Vec<(String, String)>,
    completed: Vec<(String, bool)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Published keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.blobs.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        let mut blobs = self
            .blobs
            .iter()
            .map(|(k, v)| {
                serde_json::to_string(v)
                    .map(|text| (k.clone(), text))
                    .map_err(|e| StoreError::Encode(format!("Could not encode '{}': {}", k, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        blobs.sort();
        let mut completed: Vec<(String, bool)> =
            self.completed.iter().map(|(k, v)| (k.clone(), *v)).collect();
        completed.sort();

        encode_to_vec(StoreSnapshot { blobs, completed }, standard())
            .map_err(|e| StoreError::Encode(format!("Serialization failed: {}", e)))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let (snapshot, _): (StoreSnapshot, usize) = decode_from_slice(bytes, standard())
            .map_err(|e| StoreError::Snapshot(format!("Deserialization failed: {}", e)))?;

        let blobs = snapshot
            .blobs
            .into_iter()
            .map(|(k, text)| {
                serde_json::from_str(&text)
                    .map(|v| (k.clone(), v))
                    .map_err(|e| StoreError::Snapshot(format!("Blob '{}' is not JSON: {}", k, e)))
            })
            .collect::<Result<AHashMap<_, _>, _>>()?;

        Ok(Self {
            blobs,
            completed: snapshot.completed.into_iter().collect(),
        })
    }

    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|e| {
            StoreError::Io(format!("Could not write to file '{}': {}", path.display(), e))
        })?;
        debug!(path = %path.display(), modules = self.blobs.len(), "Saved store snapshot");
        Ok(())
    }

    /// Loads a snapshot. A missing file is an empty store.
    pub fn from_snapshot(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let bytes = fs::read(path).map_err(|e| {
            StoreError::Io(format!("Could not read from file '{}': {}", path.display(), e))
        })?;
        Self::from_bytes(&bytes)
    }
}

impl ContentStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.blobs.insert(key.to_string(), value);
        Ok(())
    }

    fn set_completed(&mut self, module: &str, completed: bool) -> Result<(), StoreError> {
        self.completed.insert(module.to_string(), completed);
        Ok(())
    }

    fn is_completed(&self, module: &str) -> Result<bool, StoreError> {
        Ok(self.completed.get(module).copied().unwrap_or(false))
    }
}
