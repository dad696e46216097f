use anyhow::{bail, Result};
use std::env;
use tracing::info;

use crate::Config;

pub async fn run(force: bool) -> Result<()> {
    let root = env::current_dir()?;

    if Config::is_initialized(&root) && !force {
        bail!(
            "autoimport is already initialized in {:?} (use --force to overwrite)",
            Config::config_dir(&root)
        );
    }

    let config = Config::default();
    config.save(&root)?;

    info!("Initialized autoimport in {:?}", Config::config_dir(&root));
    println!(
        "✓ Created {} with default configuration",
        Config::config_dir(&root).display()
    );
    println!("\nNext steps:");
    println!("  1. Edit .autoimport/config.toml to customize settings");
    println!("  2. Run 'autoimport scan --packages' to check what gets indexed");
    println!("  3. Run 'autoimport fix <file> <Name>' to add an import");

    Ok(())
}
