//! In-memory symbol index keyed by exported name

use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// One exported identifier bound to its defining file or package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    /// Exported identifier
    pub name: String,
    /// Absolute path of the defining file, or the package specifier when discovered
    pub origin_path: String,
    /// Bound through `export default`
    pub is_default: bool,
    /// Sourced from a third-party package rather than a workspace file
    pub is_discovered: bool,
    /// Full matched declaration text, kept as metadata only
    pub raw_declaration_text: String,
}

impl SymbolRecord {
    /// Record for a symbol declared in a workspace file
    pub fn local(name: &str, origin: &Path, is_default: bool) -> Self {
        Self {
            name: name.to_string(),
            origin_path: origin.to_string_lossy().into_owned(),
            is_default,
            is_discovered: false,
            raw_declaration_text: String::new(),
        }
    }

    /// Record for a symbol attributed to a package specifier
    pub fn discovered(name: &str, specifier: &str) -> Self {
        Self {
            name: name.to_string(),
            origin_path: specifier.to_string(),
            is_default: false,
            is_discovered: true,
            raw_declaration_text: name.to_string(),
        }
    }
}

/// Name -> records, in insertion order per name.
///
/// A second map from origin to the names it defines keeps `delete_by_origin`
/// proportional to the size of that origin instead of the whole index.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    by_name: HashMap<String, Vec<SymbolRecord>>,
    by_origin: HashMap<String, HashSet<String>>,
    symbol_count: usize,
}

impl SymbolIndex {
    /// Create a new empty symbol index
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert keyed by (`name`, `origin_path`).
    ///
    /// An existing record is replaced in place so the bucket order is kept;
    /// otherwise the record is appended. `raw_text` is stored as given.
    pub fn save_symbol(
        &mut self,
        name: &str,
        raw_text: &str,
        origin_path: &str,
        is_default: bool,
        is_discovered: bool,
    ) {
        self.upsert(SymbolRecord {
            name: name.to_string(),
            origin_path: origin_path.to_string(),
            is_default,
            is_discovered,
            raw_declaration_text: raw_text.to_string(),
        });
    }

    /// Upsert an already built record
    pub fn upsert(&mut self, record: SymbolRecord) {
        let bucket = self.by_name.entry(record.name.clone()).or_default();

        match bucket
            .iter_mut()
            .find(|existing| existing.origin_path == record.origin_path)
        {
            Some(existing) => *existing = record,
            None => {
                self.by_origin
                    .entry(record.origin_path.clone())
                    .or_default()
                    .insert(record.name.clone());
                bucket.push(record);
                self.symbol_count += 1;
            }
        }
    }

    /// Remove every record defined by `origin_path`, whatever its name.
    ///
    /// Returns how many records were removed; unknown origins remove nothing.
    pub fn delete_by_origin(&mut self, origin_path: &str) -> usize {
        let Some(names) = self.by_origin.remove(origin_path) else {
            return 0;
        };

        let mut removed = 0;
        for name in names {
            if let Some(bucket) = self.by_name.get_mut(&name) {
                let before = bucket.len();
                bucket.retain(|record| record.origin_path != origin_path);
                removed += before - bucket.len();

                if bucket.is_empty() {
                    self.by_name.remove(&name);
                }
            }
        }

        self.symbol_count -= removed;
        debug!("Purged {} symbols from {}", removed, origin_path);
        removed
    }

    /// Exact, case-sensitive lookup
    pub fn lookup(&self, name: &str) -> Vec<SymbolRecord> {
        self.by_name.get(name).cloned().unwrap_or_default()
    }

    /// Snapshot of every record
    pub fn all(&self) -> Vec<SymbolRecord> {
        self.by_name.values().flatten().cloned().collect()
    }

    /// Case-insensitive substring match over every name, for completion lists
    pub fn complete(&self, word: &str) -> Vec<SymbolRecord> {
        let word_lower = word.to_lowercase();

        self.by_name
            .iter()
            .filter(|(name, _)| name.to_lowercase().contains(&word_lower))
            .flat_map(|(_, records)| records.iter().cloned())
            .collect()
    }

    /// All origins currently contributing symbols
    pub fn origins(&self) -> Vec<String> {
        self.by_origin.keys().cloned().collect()
    }

    /// Total number of stored records
    pub fn count(&self) -> usize {
        self.symbol_count
    }

    pub fn is_empty(&self) -> bool {
        self.symbol_count == 0
    }

    /// Clear the index
    pub fn clear(&mut self) {
        self.by_name.clear();
        self.by_origin.clear();
        self.symbol_count = 0;
    }
}
