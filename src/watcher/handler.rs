//! Applies batches of file changes to a workspace index

use tracing::{debug, info, warn};

use crate::workspace::Workspace;

use super::changes::{ChangeType, FileChange};

/// Statistics from processing file changes
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub files_added: usize,
    pub files_modified: usize,
    pub files_deleted: usize,
    pub symbols_saved: usize,
    pub symbols_purged: usize,
    /// Files that could not be read
    pub errors: usize,
}

impl ProcessingStats {
    /// Merge another stats instance into this one
    pub fn merge(&mut self, other: &ProcessingStats) {
        self.files_added += other.files_added;
        self.files_modified += other.files_modified;
        self.files_deleted += other.files_deleted;
        self.symbols_saved += other.symbols_saved;
        self.symbols_purged += other.symbols_purged;
        self.errors += other.errors;
    }

    pub fn has_changes(&self) -> bool {
        self.files_added > 0 || self.files_modified > 0 || self.files_deleted > 0
    }

    pub fn total_files(&self) -> usize {
        self.files_added + self.files_modified + self.files_deleted
    }
}

/// Keeps a workspace index current from file events.
///
/// Creates and modifications purge then rescan the file; deletions purge.
/// A created directory is scanned recursively and a deleted one purges
/// every file below it.
pub struct ChangeHandler {
    workspace: Workspace,
}

impl ChangeHandler {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn into_workspace(self) -> Workspace {
        self.workspace
    }

    /// Process a batch of changes in order
    pub async fn process_changes(&mut self, changes: Vec<FileChange>) -> ProcessingStats {
        let mut stats = ProcessingStats::default();

        for change in changes {
            stats.merge(&self.process_single(&change).await);
        }

        if stats.has_changes() {
            info!(
                "{} files updated, index holds {} symbols",
                stats.total_files(),
                self.workspace.count()
            );
        }
        stats
    }

    async fn process_single(&mut self, change: &FileChange) -> ProcessingStats {
        let mut stats = ProcessingStats::default();

        debug!(
            "Processing {} change for {:?}",
            change.change_type, change.path
        );

        if !change.needs_content() {
            stats.symbols_purged = self.workspace.file_deleted(&change.path);
            stats.files_deleted = 1;
            return stats;
        }

        let is_dir = change.path.is_dir();
        let report = if is_dir {
            self.workspace.directory_added(&change.path).await
        } else {
            self.workspace.file_changed(&change.path).await
        };
        let Some(report) = report else {
            return stats;
        };

        if !report.errors.is_empty() {
            warn!("Could not rescan {:?}", change.path);
            stats.errors = report.errors.len();
        }
        stats.symbols_saved = report.symbols_saved;
        stats.symbols_purged = report.symbols_purged;
        let files = if is_dir { report.files_scanned } else { 1 };
        match change.change_type {
            ChangeType::Created => stats.files_added = files,
            _ => stats.files_modified = files,
        }

        stats
    }
}
