//! Symbol records and the in-memory index
//!
//! The index maps exported names to the files or packages that define them.
//! It is filled by the scanners and queried by completion and quick-fix
//! front ends, which then hand a chosen record to the import rewriter.

pub mod index;
pub mod path;

pub use index::{SymbolIndex, SymbolRecord};
pub use path::resolve_import_path;
