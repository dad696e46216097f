//! Scan command: one full project scan, optionally with packages

use anyhow::{Context, Result};
use std::env;

use crate::workspace::Workspace;
use crate::Config;

pub async fn run(packages: bool) -> Result<()> {
    let root = env::current_dir()?;
    let config = Config::load(&root)?;
    let mut workspace = Workspace::new(root, config).context("Invalid scanner configuration")?;

    let report = workspace.scan_project().await?;
    println!("{}", report.summary());

    let mut errors = report.errors;
    if packages {
        let packages = workspace.scan_packages().await?;
        println!(
            "Found {} package names across {} modules in {} files ({}ms)",
            packages.mappings.name_count(),
            packages.mappings.specifier_count(),
            packages.files_scanned,
            packages.duration.as_millis()
        );
        errors.extend(packages.errors);
    }

    println!("Index holds {} symbols", workspace.count());
    errors.report().print_summary();

    Ok(())
}
