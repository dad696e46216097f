use anyhow::{Context, Result};
use std::env;

use crate::workspace::Workspace;
use crate::Config;

pub async fn run() -> Result<()> {
    let root = env::current_dir()?;
    let config = Config::load(&root)?;
    let packages_root = config.packages_path(&root);
    let mut workspace = Workspace::new(root, config).context("Invalid scanner configuration")?;

    if !packages_root.is_dir() {
        println!("No dependency tree at {}", packages_root.display());
        return Ok(());
    }

    let report = workspace.scan_packages().await?;
    for (specifier, names) in report.mappings.iter() {
        println!("{}: {}", specifier, names.join(", "));
    }

    println!(
        "\n{} names across {} modules ({} files, {}ms)",
        report.mappings.name_count(),
        report.mappings.specifier_count(),
        report.files_scanned,
        report.duration.as_millis()
    );
    report.errors.report().print_summary();

    Ok(())
}
