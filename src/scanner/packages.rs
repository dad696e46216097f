//! Third-party package scanner
//!
//! Package files are not parsed for their own exports. Instead every
//! non-relative `import ... from 'spec'` found in them is taken as evidence
//! that `spec` exports the bound names, which are then registered as
//! discovered symbols with the specifier as origin.

use futures::stream::{self, StreamExt};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::symbol::SymbolIndex;

use super::errors::{ScanError, ScanErrors, ScanStage};

lazy_static! {
    static ref IMPORT_STATEMENT: Regex =
        Regex::new(r#"\bimport\s+(?:(?P<clause>[^'";]+?)\s+from\s+)?['"](?P<spec>[^'"]+)['"]"#)
            .expect("import statement pattern is valid");
}

/// Specifier -> names imported from it, deduplicated in first-seen order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PackageMappings {
    mappings: BTreeMap<String, Vec<String>>,
}

impl PackageMappings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add names for `specifier`, skipping ones already present
    pub fn add(&mut self, specifier: &str, names: impl IntoIterator<Item = String>) {
        let entry = self.mappings.entry(specifier.to_string()).or_default();
        for name in names {
            if !entry.contains(&name) {
                entry.push(name);
            }
        }
    }

    pub fn names(&self, specifier: &str) -> &[String] {
        self.mappings
            .get(specifier)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.mappings.iter()
    }

    pub fn specifier_count(&self) -> usize {
        self.mappings.len()
    }

    pub fn name_count(&self) -> usize {
        self.mappings.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Result of a package scan; only built once every read has completed
#[derive(Debug, Default)]
pub struct PackageScanReport {
    pub files_scanned: usize,
    pub mappings: PackageMappings,
    pub errors: ScanErrors,
    pub duration: Duration,
}

/// Non-relative imports found in `source`, as (specifier, bound names) pairs
pub fn extract_package_imports(source: &str) -> Vec<(String, Vec<String>)> {
    IMPORT_STATEMENT
        .captures_iter(source)
        .filter_map(|caps| {
            let statement = caps.get(0)?.as_str();
            if statement.contains("./") || statement.contains('!') {
                return None;
            }

            let specifier = caps.name("spec")?.as_str().to_string();
            let names = caps
                .name("clause")
                .map(|clause| bound_names(clause.as_str()))
                .unwrap_or_default();

            Some((specifier, names))
        })
        .collect()
}

/// Local names bound by an import clause such as `React, { useState as us }`
fn bound_names(clause: &str) -> Vec<String> {
    let clause = clause.trim();
    let clause = clause.strip_prefix("type ").unwrap_or(clause);

    clause
        .replace(['{', '}'], ",")
        .split(',')
        .filter_map(|item| {
            let local = item.split_whitespace().last()?;
            (local != "*" && local != "type").then(|| local.to_string())
        })
        .collect()
}

/// Scans package files and registers discovered symbols
pub struct PackageScanner {
    max_concurrent_reads: usize,
}

impl PackageScanner {
    pub fn new(max_concurrent_reads: usize) -> Self {
        Self {
            max_concurrent_reads: max_concurrent_reads.max(1),
        }
    }

    /// Read every file, then fold their imports into one `PackageMappings`
    /// in file order, so names keep the order of the sorted file list.
    pub async fn scan(&self, files: Vec<PathBuf>) -> PackageScanReport {
        let start = Instant::now();
        let mut report = PackageScanReport::default();

        let contents: Vec<(PathBuf, std::io::Result<String>)> = stream::iter(files)
            .map(|path| async move {
                let content = tokio::fs::read_to_string(&path).await;
                (path, content)
            })
            .buffered(self.max_concurrent_reads)
            .collect()
            .await;

        for (path, content) in contents {
            match content {
                Ok(source) => {
                    for (specifier, names) in extract_package_imports(&source) {
                        report.mappings.add(&specifier, names);
                    }
                    report.files_scanned += 1;
                }
                Err(source) => {
                    let error = ScanError::Read {
                        path: path.clone(),
                        source,
                    };
                    warn!("{}", error);
                    report.errors.record(path, error, ScanStage::FileRead);
                }
            }
        }

        report.duration = start.elapsed();
        info!(
            "Package scan found {} names across {} modules in {} files ({}ms)",
            report.mappings.name_count(),
            report.mappings.specifier_count(),
            report.files_scanned,
            report.duration.as_millis()
        );
        report
    }

    /// Replace each specifier's discovered symbols with the new mapping.
    ///
    /// Returns the number of records saved.
    pub fn register(&self, index: &mut SymbolIndex, mappings: &PackageMappings) -> usize {
        let mut saved = 0;

        for (specifier, names) in mappings.iter() {
            let purged = index.delete_by_origin(specifier);
            if purged > 0 {
                debug!("Replaced {} discovered symbols for {}", purged, specifier);
            }

            for name in names {
                index.save_symbol(name, name, specifier, false, true);
                saved += 1;
            }
        }

        saved
    }
}
