//! Command implementations for the `autoimport` binary

pub mod complete;
pub mod fix;
pub mod init;
pub mod lookup;
pub mod packages;
pub mod scan;
pub mod watch;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::time::Duration;

use crate::workspace::Workspace;
use crate::Config;

/// Build a workspace for the current directory and run the initial scan
pub(crate) async fn open_workspace(with_packages: bool) -> Result<Workspace> {
    let root = env::current_dir()?;
    let config = Config::load(&root)?;
    let mut workspace = Workspace::new(root, config).context("Invalid scanner configuration")?;

    let spinner = spinner("Scanning project");
    let report = workspace.scan_project().await?;
    let mut errors = report.errors;

    if with_packages {
        spinner.set_message("Scanning packages");
        let packages = workspace.scan_packages().await?;
        errors.extend(packages.errors);
    }
    spinner.finish_and_clear();

    let error_report = errors.report();
    if error_report.has_errors() {
        error_report.print_summary();
    }

    Ok(workspace)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
