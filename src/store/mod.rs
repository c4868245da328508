//! Session Key-Value Store
//!
//! The quiz persists its state (game configuration, catalog caches) through
//! a small key-value contract with session-storage semantics: values live
//! for the duration of a session, there is no expiry, and removal is
//! explicit. Two implementations are provided: an in-process map and a
//! JSON-file-backed store so a terminal session can survive across
//! invocations.

use crate::{QuizbeatError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key-value contract for session persistence.
///
/// Methods take `&self`; implementations guard their state internally so a
/// store can be shared (`Arc<dyn SessionStore>`) between the setup flow and
/// the catalog caches.
pub trait SessionStore {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, overwriting any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key` (no-op if absent)
    fn remove(&self, key: &str);
}

/// In-process session store backed by a map.
///
/// The direct analogue of browser session storage for a single run.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

/// File-backed session store.
///
/// Keeps the full key-value map in memory and rewrites it as a single JSON
/// object after every mutation. Suitable for the small blobs the quiz
/// persists (one config record, two catalog caches).
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open a store at `path`, loading any existing contents.
    ///
    /// A missing file starts an empty session; a malformed file is a
    /// `Store` error rather than silent data loss.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| QuizbeatError::Store(format!("corrupt session file: {}", e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(FileStore {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
        let raw = serde_json::to_string(entries)
            .map_err(|e| QuizbeatError::Store(e.to_string()))?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_some() {
            // Removal failures are not user-actionable; the in-memory view
            // stays authoritative for the rest of the session.
            let _ = self.persist(&entries);
        }
    }
}
