use anyhow::Result;

use autoimport::watcher::{ChangeHandler, FileChange};

use crate::helpers::test_harness::TestHarness;

#[tokio::test]
async fn test_change_batches_keep_index_current() -> Result<()> {
    let harness = TestHarness::new()?;
    let kept = harness.create_test_file("src/kept.ts", "export const Kept = 1;\n")?;
    let workspace = harness.scanned_workspace().await?;
    let mut handler = ChangeHandler::new(workspace);

    let added = harness.create_test_file("src/new/Widget.tsx", "export default function Widget() {}\n")?;
    std::fs::write(&kept, "export const Renamed = 1;\n")?;
    let ignored = harness.create_test_file("node_modules/pkg/index.js", "export const Pkg = 1;\n")?;

    let stats = handler
        .process_changes(vec![
            FileChange::created(added.clone()),
            FileChange::modified(kept.clone()),
            FileChange::created(ignored),
        ])
        .await;

    assert_eq!(stats.files_added, 1);
    assert_eq!(stats.files_modified, 1);
    assert_eq!(stats.symbols_purged, 1);

    let workspace = handler.workspace();
    assert_eq!(workspace.lookup("Widget").len(), 1);
    assert_eq!(workspace.lookup("Renamed").len(), 1);
    assert!(workspace.lookup("Kept").is_empty());
    assert!(workspace.lookup("Pkg").is_empty());

    std::fs::remove_file(&added)?;
    let stats = handler.process_changes(vec![FileChange::deleted(added)]).await;
    assert_eq!(stats.files_deleted, 1);
    assert!(handler.workspace().lookup("Widget").is_empty());
    assert_eq!(handler.into_workspace().count(), 1);

    Ok(())
}

#[tokio::test]
async fn test_directory_moved_out_and_back_in() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("src/ui/Card.tsx", "export const Card = 1;\n")?;
    harness.create_test_file("src/ui/forms/Input.ts", "export const Input = 1;\n")?;
    let workspace = harness.scanned_workspace().await?;
    let mut handler = ChangeHandler::new(workspace);

    let inside = harness.path().join("src/ui");
    let outside = tempfile::tempdir()?;
    let parked = outside.path().join("ui");
    std::fs::rename(&inside, &parked)?;

    let stats = handler.process_changes(vec![FileChange::deleted(inside.clone())]).await;
    assert_eq!(stats.symbols_purged, 2);
    assert_eq!(handler.workspace().count(), 0);

    std::fs::rename(&parked, &inside)?;
    let stats = handler.process_changes(vec![FileChange::created(inside)]).await;
    assert_eq!(stats.files_added, 2);
    assert_eq!(handler.workspace().lookup("Card").len(), 1);
    assert_eq!(handler.workspace().lookup("Input").len(), 1);

    Ok(())
}
