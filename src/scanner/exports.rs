//! Project export scanner
//!
//! Reads workspace files, runs the declaration extractor over them and writes
//! the results into a `SymbolIndex`. Reads are concurrent; index writes all
//! happen after every read has finished, in file order.

use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::ScannerConfig;
use crate::symbol::SymbolIndex;

use super::errors::{ScanError, ScanErrors, ScanStage};
use super::extractor::{DeclarationExtractor, ExportPattern};

/// Outcome of a scan over one or more files
#[derive(Debug, Default)]
pub struct ScanReport {
    pub files_scanned: usize,
    pub symbols_saved: usize,
    pub symbols_purged: usize,
    pub errors: ScanErrors,
    pub duration: Duration,
}

impl ScanReport {
    pub fn merge(&mut self, other: ScanReport) {
        self.files_scanned += other.files_scanned;
        self.symbols_saved += other.symbols_saved;
        self.symbols_purged += other.symbols_purged;
        self.errors.extend(other.errors);
        self.duration += other.duration;
    }

    pub fn summary(&self) -> String {
        format!(
            "Scanned {} files, saved {} symbols in {}ms",
            self.files_scanned,
            self.symbols_saved,
            self.duration.as_millis()
        )
    }
}

/// Scans workspace files for exported declarations
pub struct ExportScanner {
    extractor: Arc<dyn DeclarationExtractor>,
    max_concurrent_reads: usize,
}

impl ExportScanner {
    /// Build a scanner using the regex extractor from configuration
    pub fn new(config: &ScannerConfig) -> Result<Self, ScanError> {
        let pattern = ExportPattern::new(&config.higher_order_components)?;
        Ok(Self::with_extractor(Arc::new(pattern), config.max_concurrent_reads))
    }

    pub fn with_extractor(
        extractor: Arc<dyn DeclarationExtractor>,
        max_concurrent_reads: usize,
    ) -> Self {
        Self {
            extractor,
            max_concurrent_reads: max_concurrent_reads.max(1),
        }
    }

    /// Additive bulk scan: nothing is purged before inserting.
    ///
    /// Unreadable files are recorded in the report and skipped.
    pub async fn scan_files(&self, index: &mut SymbolIndex, files: Vec<PathBuf>) -> ScanReport {
        let start = Instant::now();
        let mut report = ScanReport::default();

        debug!("Reading {} files", files.len());

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
                    report.symbols_saved +=
                        self.index_source(index, &source, &path, &mut report.errors);
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
            "{} ({} skipped, index holds {})",
            report.summary(),
            report.errors.len(),
            index.count()
        );
        report
    }

    /// Purge everything `path` contributed, then scan it again
    pub async fn rescan_file(&self, index: &mut SymbolIndex, path: &Path) -> ScanReport {
        let purged = self.remove_file(index, path);
        let mut report = self.scan_files(index, vec![path.to_path_buf()]).await;
        report.symbols_purged = purged;
        report
    }

    /// Purge a deleted file from the index
    pub fn remove_file(&self, index: &mut SymbolIndex, path: &Path) -> usize {
        index.delete_by_origin(&path.to_string_lossy())
    }

    /// Extract declarations from already loaded text and upsert them.
    ///
    /// Returns the number of declarations saved.
    pub fn index_source(
        &self,
        index: &mut SymbolIndex,
        source: &str,
        origin: &Path,
        errors: &mut ScanErrors,
    ) -> usize {
        let origin_path = origin.to_string_lossy();
        let mut saved = 0;

        for declaration in self.extractor.extract(source) {
            let Some(name) = declaration.name.as_deref() else {
                debug!(
                    "No identifier in declaration {:?} from {}",
                    declaration.text, origin_path
                );
                errors.record(
                    origin.to_path_buf(),
                    format!("no identifier in `{}`", declaration.text),
                    ScanStage::Extraction,
                );
                continue;
            };

            index.save_symbol(
                name,
                &declaration.text,
                &origin_path,
                declaration.is_default,
                false,
            );
            saved += 1;
        }

        saved
    }
}
