use anyhow::Result;
use serde::Serialize;
use std::env;
use std::path::PathBuf;

use super::open_workspace;

/// One row of lookup output
#[derive(Debug, Serialize)]
struct Candidate {
    name: String,
    origin: String,
    import_path: String,
    is_default: bool,
    is_discovered: bool,
}

pub async fn run(name: &str, document: Option<PathBuf>, json: bool) -> Result<()> {
    let workspace = open_workspace(true).await?;
    let cwd = env::current_dir()?;
    let document = match document {
        Some(path) if path.is_absolute() => path,
        Some(path) => cwd.join(path),
        None => cwd.join("index.js"),
    };

    let candidates: Vec<Candidate> = workspace
        .lookup(name)
        .into_iter()
        .map(|record| Candidate {
            import_path: workspace.import_path(&record, &document),
            name: record.name,
            origin: record.origin_path,
            is_default: record.is_default,
            is_discovered: record.is_discovered,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
        return Ok(());
    }

    if candidates.is_empty() {
        println!("No exports named '{}'", name);
        return Ok(());
    }

    println!("{} candidates for '{}':\n", candidates.len(), name);
    for (i, candidate) in candidates.iter().enumerate() {
        let kind = match (candidate.is_discovered, candidate.is_default) {
            (true, _) => "package",
            (false, true) => "default",
            (false, false) => "named",
        };
        println!("{}. {} [{}]", i + 1, candidate.import_path, kind);
        if !candidate.is_discovered {
            println!("   {}", candidate.origin);
        }
    }

    Ok(())
}
