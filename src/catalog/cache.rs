//! Session-persisted catalog caching
//!
//! Wraps any [`CatalogSource`] with two caches that live for the duration
//! of a session:
//!
//! - the bulk entry list, fetched once and persisted whole
//! - localized names, resolved lazily, shared, and append-only
//!
//! The name cache is never invalidated within a session. Under the
//! single-threaded model two lookups for the same id cannot race
//! destructively; the worst case is a duplicate fetch whose result
//! overwrites idempotently.

use super::{CatalogEntry, CatalogSource};
use crate::store::SessionStore;
use crate::{QuizbeatError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

const CACHE_KEY_CATALOG: &str = "quizbeat_catalog";
const CACHE_KEY_NAMES: &str = "quizbeat_names";

/// Shared localized-name cache handle
pub type NameCache = Arc<Mutex<HashMap<u32, String>>>;

/// Caching layer over a [`CatalogSource`]
pub struct CachedCatalog<S: CatalogSource> {
    source: S,
    store: Arc<dyn SessionStore>,
    entries: Vec<CatalogEntry>,
    names: NameCache,
    preferred: String,
    fallback: String,
}

impl<S: CatalogSource> CachedCatalog<S> {
    /// Wrap `source`, persisting caches through `store`.
    ///
    /// `preferred` and `fallback` are the language codes used for every
    /// localized-name resolution in this session. Any name cache persisted
    /// by an earlier page of the same session is picked up immediately.
    pub fn new(
        source: S,
        store: Arc<dyn SessionStore>,
        preferred: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Self {
        let names: HashMap<u32, String> = store
            .get(CACHE_KEY_NAMES)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        CachedCatalog {
            source,
            store,
            entries: Vec::new(),
            names: Arc::new(Mutex::new(names)),
            preferred: preferred.into(),
            fallback: fallback.into(),
        }
    }

    /// Load the bulk entry list, from the session cache when possible.
    ///
    /// Must be called before [`entries`](Self::entries); the round engine
    /// needs the full list to pick distractors.
    pub fn load(&mut self, limit: usize) -> Result<&[CatalogEntry]> {
        if !self.entries.is_empty() {
            return Ok(&self.entries);
        }

        if let Some(raw) = self.store.get(CACHE_KEY_CATALOG) {
            self.entries = serde_json::from_str(&raw)
                .map_err(|e| QuizbeatError::Store(format!("corrupt catalog cache: {}", e)))?;
            return Ok(&self.entries);
        }

        self.entries = self.source.list(limit)?;
        let raw = serde_json::to_string(&self.entries)
            .map_err(|e| QuizbeatError::Store(e.to_string()))?;
        self.store.set(CACHE_KEY_CATALOG, &raw)?;
        Ok(&self.entries)
    }

    /// The loaded entry list (empty before [`load`](Self::load))
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Resolve the localized name for `id`, consulting the cache first.
    ///
    /// Misses hit the underlying source and persist the grown cache
    /// incrementally, so a later page of the same session starts warm.
    pub fn name_of(&mut self, id: u32) -> Result<String> {
        if let Some(name) = self.names.lock().get(&id) {
            return Ok(name.clone());
        }

        let name = self
            .source
            .localized_name(id, &self.preferred, &self.fallback)?;

        let mut cache = self.names.lock();
        cache.insert(id, name.clone());
        let raw = serde_json::to_string(&*cache)
            .map_err(|e| QuizbeatError::Store(e.to_string()))?;
        drop(cache);
        self.store.set(CACHE_KEY_NAMES, &raw)?;
        Ok(name)
    }

    /// Handle on the shared name cache
    pub fn name_cache(&self) -> NameCache {
        Arc::clone(&self.names)
    }
}
