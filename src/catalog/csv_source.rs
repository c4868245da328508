//! CSV-backed catalog source
//!
//! Offline stand-in for the remote catalog API, used by the terminal front
//! end. The file carries the bulk list and all localized names in one
//! place:
//!
//! ```csv
//! id,name,image_url,fr,en
//! 1,bulbasaur,https://example/1.png,Bulbizarre,Bulbasaur
//! ```
//!
//! Every column after `image_url` is treated as a language code.

use super::{CatalogEntry, CatalogSource};
use crate::{QuizbeatError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Catalog source reading a CSV file once at open time
#[derive(Debug, Clone)]
pub struct CsvCatalog {
    entries: Vec<CatalogEntry>,
    /// Localized names keyed by language code, then by entry id
    names: HashMap<String, HashMap<u32, String>>,
}

impl CsvCatalog {
    /// Load a catalog file from disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            QuizbeatError::Catalog(format!("failed to open '{}': {}", path.display(), e))
        })?;
        Self::from_reader(file)
    }

    /// Parse a catalog from any CSV reader
    pub fn from_reader(reader: impl std::io::Read) -> Result<Self> {
        let mut csv = csv::Reader::from_reader(reader);
        let headers = csv.headers()?.clone();
        if headers.len() < 3 {
            return Err(QuizbeatError::Catalog(
                "catalog header must be id,name,image_url[,lang...]".to_string(),
            ));
        }

        let langs: Vec<String> = headers.iter().skip(3).map(str::to_string).collect();
        let mut entries = Vec::new();
        let mut names: HashMap<String, HashMap<u32, String>> =
            langs.iter().map(|l| (l.clone(), HashMap::new())).collect();

        for record in csv.records() {
            let record = record?;
            let id: u32 = record
                .get(0)
                .unwrap_or_default()
                .parse()
                .map_err(|_| QuizbeatError::Catalog(format!("bad id in record {:?}", record)))?;
            let name = record.get(1).unwrap_or_default().to_string();
            let image_url = record.get(2).unwrap_or_default().to_string();
            entries.push(CatalogEntry { id, name, image_url });

            for (i, lang) in langs.iter().enumerate() {
                if let Some(value) = record.get(3 + i) {
                    if !value.is_empty() {
                        names.get_mut(lang).map(|m| m.insert(id, value.to_string()));
                    }
                }
            }
        }

        Ok(CsvCatalog { entries, names })
    }

    /// Total number of entries in the file
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the file held no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lang_name(&self, lang: &str, id: u32) -> Option<String> {
        self.names.get(lang).and_then(|m| m.get(&id)).cloned()
    }
}

impl CatalogSource for CsvCatalog {
    fn list(&mut self, limit: usize) -> Result<Vec<CatalogEntry>> {
        Ok(self.entries.iter().take(limit).cloned().collect())
    }

    fn localized_name(
        &mut self,
        id: u32,
        preferred: &str,
        fallback: &str,
    ) -> Result<String> {
        if let Some(name) = self.lang_name(preferred, id) {
            return Ok(name);
        }
        if let Some(name) = self.lang_name(fallback, id) {
            return Ok(name);
        }
        // Last resort mirrors the API behavior: canonical name over nothing
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.name.clone())
            .ok_or_else(|| QuizbeatError::Catalog(format!("unknown catalog id {}", id)))
    }
}
