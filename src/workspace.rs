//! A workspace session: one symbol index plus everything that keeps it current

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Config;
use crate::rewriter::{ImportRewriter, TextEdit};
use crate::scanner::{
    package_files, ExportScanner, IgnoreRules, PackageScanReport, PackageScanner, ScanError,
    ScanReport, Walker,
};
use crate::symbol::{resolve_import_path, SymbolIndex, SymbolRecord};

/// Outcome of looking a name up before importing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Missing,
    Unique(SymbolRecord),
    /// Several origins export the name; the caller has to pick one
    Ambiguous(Vec<SymbolRecord>),
}

impl Resolution {
    pub fn candidates(&self) -> Vec<SymbolRecord> {
        match self {
            Resolution::Missing => Vec::new(),
            Resolution::Unique(record) => vec![record.clone()],
            Resolution::Ambiguous(records) => records.clone(),
        }
    }
}

/// Owns the symbol index for one root directory.
///
/// Scanners receive the index by `&mut`, so there is exactly one writer and
/// no locking.
pub struct Workspace {
    root: PathBuf,
    config: Config,
    index: SymbolIndex,
    exports: ExportScanner,
    packages: PackageScanner,
    walker: Walker,
    rules: IgnoreRules,
    rewriter: ImportRewriter,
}

impl Workspace {
    /// Fails when the wrapper alternation or one of the file globs is invalid
    pub fn new(root: PathBuf, config: Config) -> Result<Self, ScanError> {
        let exports = ExportScanner::new(&config.scanner)?;
        let packages = PackageScanner::new(config.scanner.max_concurrent_reads);
        let walker = Walker::new(root.clone(), &config.scanner)?;
        let rules = IgnoreRules::load(&root);
        let rewriter = ImportRewriter::new(&config.imports);

        Ok(Self {
            root,
            config,
            index: SymbolIndex::new(),
            exports,
            packages,
            walker,
            rules,
            rewriter,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> &SymbolIndex {
        &self.index
    }

    pub fn walker(&self) -> &Walker {
        &self.walker
    }

    /// Full, additive scan of every selected project file
    pub async fn scan_project(&mut self) -> Result<ScanReport, ScanError> {
        let files = self.walker.collect_files();
        let report = self.exports.scan_files(&mut self.index, files).await;

        self.notify(&format!(
            "Scan finished in {}ms, {} symbols indexed",
            report.duration.as_millis(),
            self.index.count()
        ));
        Ok(report)
    }

    /// Scan the dependency tree and replace the discovered symbols of every
    /// specifier found. A missing dependency directory yields an empty report.
    pub async fn scan_packages(&mut self) -> Result<PackageScanReport, ScanError> {
        let packages_root = self.config.packages_path(&self.root);
        if !packages_root.is_dir() {
            debug!("No dependency tree at {:?}", packages_root);
            return Ok(PackageScanReport::default());
        }

        let files = package_files(&packages_root, &self.config.scanner.extensions)?;
        let report = self.packages.scan(files).await;
        let saved = self.packages.register(&mut self.index, &report.mappings);

        self.notify(&format!(
            "Package scan finished in {}ms, {} discovered symbols from {} modules",
            report.duration.as_millis(),
            saved,
            report.mappings.specifier_count()
        ));
        Ok(report)
    }

    /// Created or modified file: purge, then rescan. Returns `None` when the
    /// path is not a workspace source file.
    pub async fn file_changed(&mut self, path: &Path) -> Option<ScanReport> {
        if !self.walker.accepts(path, &self.rules) {
            debug!("Ignoring change to {:?}", path);
            return None;
        }

        let report = self.exports.rescan_file(&mut self.index, path).await;
        info!(
            "Rescanned {:?}: -{} +{} (index holds {})",
            path,
            report.symbols_purged,
            report.symbols_saved,
            self.index.count()
        );
        Some(report)
    }

    /// Directories to watch for a directory that just appeared, itself included
    pub fn directories_under(&self, dir: &Path) -> Vec<PathBuf> {
        if !self.walker.accepts_directory(dir, &self.rules) {
            return Vec::new();
        }
        self.walker.directories_in(dir)
    }

    /// Directory created or moved into the workspace: every selected file
    /// below it is purged, then rescanned. Returns `None` for ignored
    /// directories.
    pub async fn directory_added(&mut self, dir: &Path) -> Option<ScanReport> {
        if !self.walker.accepts_directory(dir, &self.rules) {
            debug!("Ignoring new directory {:?}", dir);
            return None;
        }

        let files = self.walker.collect_files_in(dir);
        let purged: usize = files
            .iter()
            .map(|file| self.exports.remove_file(&mut self.index, file))
            .sum();
        let mut report = self.exports.scan_files(&mut self.index, files).await;
        report.symbols_purged = purged;

        info!(
            "Scanned new directory {:?}: {} files, +{} (index holds {})",
            dir,
            report.files_scanned,
            report.symbols_saved,
            self.index.count()
        );
        Some(report)
    }

    /// Deleted file or directory: purge every origin at or below `path`
    pub fn file_deleted(&mut self, path: &Path) -> usize {
        let mut purged = self.exports.remove_file(&mut self.index, path);
        for origin in self.index.origins() {
            if Path::new(&origin).starts_with(path) {
                purged += self.index.delete_by_origin(&origin);
            }
        }

        if purged > 0 {
            info!("Removed {} symbols under deleted {:?}", purged, path);
        }
        purged
    }

    pub fn lookup(&self, name: &str) -> Vec<SymbolRecord> {
        self.index.lookup(name)
    }

    pub fn complete(&self, word: &str) -> Vec<SymbolRecord> {
        self.index.complete(word)
    }

    pub fn count(&self) -> usize {
        self.index.count()
    }

    pub fn resolve(&self, name: &str) -> Resolution {
        let mut records = self.index.lookup(name);

        match records.len() {
            0 => Resolution::Missing,
            1 => Resolution::Unique(records.remove(0)),
            _ => Resolution::Ambiguous(records),
        }
    }

    /// Module path `record` would be imported from in `document`
    pub fn import_path(&self, record: &SymbolRecord, document: &Path) -> String {
        resolve_import_path(record, document)
    }

    /// Edit importing `record` into `text`, the contents of `document`
    pub fn fix(&self, text: &str, document: &Path, record: &SymbolRecord) -> TextEdit {
        self.rewriter.edit(text, document, record)
    }

    fn notify(&self, message: &str) {
        if self.config.scanner.show_notifications {
            println!("{}", message);
        }
        info!("{}", message);
    }
}
