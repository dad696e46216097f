//! File system watcher keeping the symbol index current
//!
//! Every non-ignored directory gets its own non-recursive watch, so ignored
//! trees such as the dependency directory never produce events. Directories
//! created or moved in while watching are watched, together with everything
//! below them, as they appear.

pub mod changes;
pub mod handler;

use anyhow::{Context, Result};
use notify::event::ModifyKind;
use notify::{EventKind, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebouncedEvent};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::workspace::Workspace;

pub use changes::{ChangeType, FileChange};
pub use handler::{ChangeHandler, ProcessingStats};

/// Configuration for the file watcher
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Debounce delay in milliseconds
    pub debounce_ms: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

/// File system watcher for incremental rescans
pub struct FileWatcher {
    config: WatcherConfig,
    handler: ChangeHandler,
}

impl FileWatcher {
    /// The workspace should already hold its initial scan
    pub fn new(workspace: Workspace, config: WatcherConfig) -> Self {
        Self {
            config,
            handler: ChangeHandler::new(workspace),
        }
    }

    /// Watch until the shutdown signal is received and return the total
    /// processing statistics
    pub async fn run(mut self, mut shutdown_rx: oneshot::Receiver<()>) -> Result<ProcessingStats> {
        let debounce_duration = Duration::from_millis(self.config.debounce_ms);

        let (tx, mut rx) = mpsc::channel::<Vec<DebouncedEvent>>(100);

        let mut debouncer = new_debouncer(
            debounce_duration,
            None,
            move |result: std::result::Result<Vec<DebouncedEvent>, Vec<notify::Error>>| {
                match result {
                    Ok(events) => {
                        if !events.is_empty() {
                            if let Err(e) = tx.blocking_send(events) {
                                error!("Failed to send debounced events: {}", e);
                            }
                        }
                    }
                    Err(errors) => {
                        for error in errors {
                            error!("Watch error: {}", error);
                        }
                    }
                }
            },
        )
        .with_context(|| "Failed to create file watcher debouncer")?;

        let directories = self.handler.workspace().walker().directories();
        for dir in &directories {
            debouncer
                .watch(dir, RecursiveMode::NonRecursive)
                .with_context(|| format!("Failed to watch directory: {:?}", dir))?;
        }

        info!(
            "Watching {} directories under {:?}",
            directories.len(),
            self.handler.workspace().root()
        );
        info!("Debounce delay: {}ms", self.config.debounce_ms);

        let mut total_stats = ProcessingStats::default();

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Shutdown signal received, stopping watcher");
                    break;
                }

                Some(events) = rx.recv() => {
                    for created in new_directories(&events) {
                        for dir in self.handler.workspace().directories_under(&created) {
                            match debouncer.watch(&dir, RecursiveMode::NonRecursive) {
                                Ok(()) => debug!("Watching new directory {:?}", dir),
                                Err(e) => warn!("Failed to watch {:?}: {}", dir, e),
                            }
                        }
                    }

                    let changes = convert_events(events);
                    if !changes.is_empty() {
                        debug!("Processing {} file changes", changes.len());

                        let stats = self.handler.process_changes(changes).await;
                        total_stats.merge(&stats);
                        Self::print_stats(&stats, self.handler.workspace().count());
                    }
                }
            }
        }

        Ok(total_stats)
    }

    fn print_stats(stats: &ProcessingStats, symbol_count: usize) {
        if !stats.has_changes() {
            return;
        }
        if stats.files_added > 0 {
            println!("  + {} files added", stats.files_added);
        }
        if stats.files_modified > 0 {
            println!("  ~ {} files modified", stats.files_modified);
        }
        if stats.files_deleted > 0 {
            println!("  - {} files deleted", stats.files_deleted);
        }
        if stats.errors > 0 {
            warn!("  {} errors occurred", stats.errors);
        }
        println!("  {} symbols indexed", symbol_count);
    }
}

fn appears(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(_)))
}

/// Directories created or renamed into place since the last batch
fn new_directories(events: &[DebouncedEvent]) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    for event in events.iter().filter(|event| appears(&event.kind)) {
        for path in event.paths.iter().filter(|path| path.is_dir()) {
            if !dirs.contains(path) {
                dirs.push(path.clone());
            }
        }
    }
    dirs
}

/// Flatten debounced events into one change per path, keeping the last one.
///
/// Renames arrive as modifications of both paths; whichever path no longer
/// exists is treated as deleted, which purges a whole directory when the
/// path was one. A directory that appears becomes a single `Created` change
/// for the handler to scan recursively. Filtering by extension and ignore
/// rules happens in the workspace.
fn convert_events(events: Vec<DebouncedEvent>) -> Vec<FileChange> {
    let mut seen: HashMap<PathBuf, FileChange> = HashMap::new();
    let mut order = Vec::new();

    for event in &events {
        for path in &event.paths {
            let change_type = match event.kind {
                EventKind::Remove(_) => ChangeType::Deleted,
                EventKind::Create(_) | EventKind::Modify(_) if !path.exists() => {
                    ChangeType::Deleted
                }
                _ if path.is_dir() => {
                    if !appears(&event.kind) {
                        continue;
                    }
                    ChangeType::Created
                }
                EventKind::Create(_) => ChangeType::Created,
                EventKind::Modify(_) => ChangeType::Modified,
                _ => continue,
            };

            debug!("File change detected: {:?} -> {:?}", change_type, path);
            if !seen.contains_key(path) {
                order.push(path.clone());
            }
            seen.insert(path.clone(), FileChange::new(path.clone(), change_type));
        }
    }

    order
        .into_iter()
        .filter_map(|path| seen.remove(&path))
        .collect()
}

/// Handle to control a running watcher
pub struct WatcherHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    result_rx: Option<oneshot::Receiver<ProcessingStats>>,
}

impl WatcherHandle {
    pub fn new(
        shutdown_tx: oneshot::Sender<()>,
        result_rx: oneshot::Receiver<ProcessingStats>,
    ) -> Self {
        Self {
            shutdown_tx: Some(shutdown_tx),
            result_rx: Some(result_rx),
        }
    }

    /// Request graceful shutdown
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Wait for the watcher to finish and get the final stats
    pub async fn wait(mut self) -> Result<ProcessingStats> {
        if let Some(rx) = self.result_rx.take() {
            rx.await.with_context(|| "Watcher task panicked")
        } else {
            Ok(ProcessingStats::default())
        }
    }
}

/// Spawn `watcher` on the runtime and return a handle to stop it
pub fn spawn(watcher: FileWatcher) -> WatcherHandle {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let (result_tx, result_rx) = oneshot::channel();

    tokio::spawn(async move {
        match watcher.run(shutdown_rx).await {
            Ok(stats) => {
                let _ = result_tx.send(stats);
            }
            Err(e) => error!("Watcher stopped: {:#}", e),
        }
    });

    WatcherHandle::new(shutdown_tx, result_rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, RemoveKind, RenameMode};
    use notify::Event;
    use std::fs;
    use std::time::Instant;
    use tempfile::tempdir;

    fn debounced(kind: EventKind, path: PathBuf) -> DebouncedEvent {
        DebouncedEvent::new(Event::new(kind).add_path(path), Instant::now())
    }

    #[test]
    fn test_watcher_config_default() {
        assert_eq!(WatcherConfig::default().debounce_ms, 500);
    }

    #[test]
    fn test_convert_events_keeps_last_change_per_file() {
        let dir = tempdir().unwrap();
        let kept = dir.path().join("kept.ts");
        let removed = dir.path().join("removed.ts");
        fs::write(&kept, "export const a = 1;").unwrap();

        let events = vec![
            debounced(EventKind::Create(CreateKind::File), kept.clone()),
            debounced(EventKind::Modify(ModifyKind::Any), kept.clone()),
            debounced(EventKind::Modify(ModifyKind::Any), removed.clone()),
            debounced(EventKind::Remove(RemoveKind::File), removed.clone()),
            debounced(EventKind::Modify(ModifyKind::Any), dir.path().to_path_buf()),
        ];

        let changes = convert_events(events);

        assert_eq!(
            changes,
            vec![FileChange::modified(kept), FileChange::deleted(removed)]
        );
    }

    #[test]
    fn test_convert_events_directory_rename() {
        let dir = tempdir().unwrap();
        let old = dir.path().join("components");
        let new = dir.path().join("widgets");
        fs::create_dir(&new).unwrap();

        let rename = DebouncedEvent::new(
            Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
                .add_path(old.clone())
                .add_path(new.clone()),
            Instant::now(),
        );

        assert_eq!(
            convert_events(vec![rename]),
            vec![FileChange::deleted(old), FileChange::created(new)]
        );
    }

    #[test]
    fn test_new_directories() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("components");
        let renamed = dir.path().join("moved");
        fs::create_dir(&sub).unwrap();
        fs::create_dir(&renamed).unwrap();

        let events = vec![
            debounced(EventKind::Create(CreateKind::Folder), sub.clone()),
            debounced(EventKind::Modify(ModifyKind::Any), dir.path().to_path_buf()),
            debounced(EventKind::Modify(ModifyKind::Name(RenameMode::To)), renamed.clone()),
            debounced(EventKind::Create(CreateKind::Folder), sub.clone()),
        ];

        assert_eq!(new_directories(&events), vec![sub, renamed]);
    }

    #[tokio::test]
    async fn test_handle_shutdown_returns_stats() {
        let dir = tempdir().unwrap();
        let workspace =
            Workspace::new(dir.path().to_path_buf(), crate::config::Config::default()).unwrap();
        let mut handle = spawn(FileWatcher::new(workspace, WatcherConfig::default()));

        handle.shutdown();
        let stats = handle.wait().await.unwrap();
        assert!(!stats.has_changes());
    }
}
