//! Catalog Data Access & Caching
//!
//! The quiz is played over an external creature catalog: a bulk list of
//! entries (id, canonical name, image reference) plus per-id localized
//! names resolved lazily. The remote API itself is an external
//! collaborator; this module only owns the access contract
//! ([`CatalogSource`]), an offline CSV-backed source for terminal play, and
//! the session-persisted caching layer ([`CachedCatalog`]).

mod cache;
mod csv_source;

pub use cache::CachedCatalog;
pub use csv_source::CsvCatalog;

use serde::{Deserialize, Serialize};

/// One catalog entry, treated as read-only by the game core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable catalog identifier
    pub id: u32,
    /// Canonical (API) name
    pub name: String,
    /// Image reference for the question card
    #[serde(rename = "img")]
    pub image_url: String,
}

impl CatalogEntry {
    /// Create an entry
    pub fn new(id: u32, name: impl Into<String>, image_url: impl Into<String>) -> Self {
        CatalogEntry {
            id,
            name: name.into(),
            image_url: image_url.into(),
        }
    }
}

/// Access contract for a creature catalog.
///
/// Failures propagate as [`crate::QuizbeatError::Catalog`] and are not
/// retried; the caller surfaces them at its UI boundary.
pub trait CatalogSource {
    /// List up to `limit` catalog entries in catalog order
    fn list(&mut self, limit: usize) -> crate::Result<Vec<CatalogEntry>>;

    /// Resolve the localized name for `id`.
    ///
    /// Falls back from `preferred` to `fallback` language; sources may fall
    /// back further to the canonical name.
    fn localized_name(&mut self, id: u32, preferred: &str, fallback: &str)
        -> crate::Result<String>;
}
