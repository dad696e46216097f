use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use autoimport::cli::{Cli, Commands};
use autoimport::config::Config;
use autoimport::logging::{init_early_logging, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // A broken config file is reported by the command itself; log to stderr
    // until then
    let _logging_guard = match Config::load(&project_root) {
        Ok(config) => Some(init_logging(&config.logging, &project_root)?),
        Err(_) => {
            init_early_logging();
            None
        }
    };

    tracing::debug!("Workspace root: {}", project_root.display());

    match cli.command {
        Commands::Init { force } => {
            autoimport::commands::init::run(force).await?;
        }
        Commands::Scan { packages } => {
            autoimport::commands::scan::run(packages).await?;
        }
        Commands::Lookup {
            name,
            document,
            json,
        } => {
            autoimport::commands::lookup::run(&name, document, json).await?;
        }
        Commands::Complete { word, limit } => {
            autoimport::commands::complete::run(&word, limit).await?;
        }
        Commands::Fix {
            document,
            name,
            diagnostic,
            from,
            write,
        } => {
            autoimport::commands::fix::run(document, name, diagnostic, from, write).await?;
        }
        Commands::Packages => {
            autoimport::commands::packages::run().await?;
        }
        Commands::Watch { debounce_ms } => {
            autoimport::commands::watch::run(debounce_ms).await?;
        }
    }

    Ok(())
}
