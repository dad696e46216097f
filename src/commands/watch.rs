//! Watch command implementation
//!
//! Scans once, then keeps the index current until Ctrl+C.

use anyhow::Result;
use tokio::signal;
use tracing::info;

use crate::watcher::{self, FileWatcher, WatcherConfig};

use super::open_workspace;

pub async fn run(debounce_ms: u64) -> Result<()> {
    let workspace = open_workspace(true).await?;

    println!("Starting watch mode...");
    println!("Watching directory: {:?}", workspace.root());
    println!("Debounce delay: {}ms", debounce_ms);
    println!("Extensions: {:?}", workspace.config().scanner.extensions);
    println!("{} symbols indexed", workspace.count());
    println!();
    println!("Press Ctrl+C to stop.");
    println!();

    let watcher = FileWatcher::new(workspace, WatcherConfig { debounce_ms });
    let mut handle = watcher::spawn(watcher);

    signal::ctrl_c().await?;

    println!();
    println!("Shutting down...");

    handle.shutdown();
    let stats = handle.wait().await?;

    println!();
    println!("Watch session complete!");
    println!("----------------------------------------");
    println!("  Files added:     {}", stats.files_added);
    println!("  Files modified:  {}", stats.files_modified);
    println!("  Files deleted:   {}", stats.files_deleted);
    println!("  Symbols saved:   {}", stats.symbols_saved);
    println!("  Symbols purged:  {}", stats.symbols_purged);
    if stats.errors > 0 {
        println!("  Errors:          {}", stats.errors);
    }
    println!("----------------------------------------");

    info!("Watch session ended");

    Ok(())
}
