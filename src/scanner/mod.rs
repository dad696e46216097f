//! Populating the symbol index
//!
//! `ExportScanner` handles workspace files, `PackageScanner` handles the
//! dependency tree. Both read files concurrently and only touch the index
//! once all reads of a batch are done.

pub mod errors;
pub mod exports;
pub mod extractor;
pub mod packages;
pub mod walker;

pub use errors::{ErrorReport, FileError, ScanError, ScanErrors, ScanStage};
pub use exports::{ExportScanner, ScanReport};
pub use extractor::{Declaration, DeclarationExtractor, ExportPattern};
pub use packages::{extract_package_imports, PackageMappings, PackageScanReport, PackageScanner};
pub use walker::{package_files, IgnoreRules, Walker};
