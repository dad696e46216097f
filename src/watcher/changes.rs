//! File change events as seen by the index

use std::path::PathBuf;

/// Types of file system changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    Created,
    Modified,
    Deleted,
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeType::Created => write!(f, "created"),
            ChangeType::Modified => write!(f, "modified"),
            ChangeType::Deleted => write!(f, "deleted"),
        }
    }
}

/// A file change event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub change_type: ChangeType,
}

impl FileChange {
    pub fn new(path: PathBuf, change_type: ChangeType) -> Self {
        Self { path, change_type }
    }

    pub fn created(path: PathBuf) -> Self {
        Self::new(path, ChangeType::Created)
    }

    pub fn modified(path: PathBuf) -> Self {
        Self::new(path, ChangeType::Modified)
    }

    pub fn deleted(path: PathBuf) -> Self {
        Self::new(path, ChangeType::Deleted)
    }

    /// Whether handling this change means reading the file again
    pub fn needs_content(&self) -> bool {
        !matches!(self.change_type, ChangeType::Deleted)
    }
}
