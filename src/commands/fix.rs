//! Fix command: add the import for one symbol to a document

use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::diagnostic::undefined_symbol;
use crate::symbol::{resolve_import_path, SymbolRecord};
use crate::workspace::{Resolution, Workspace};

use super::open_workspace;

pub async fn run(
    document: PathBuf,
    name: Option<String>,
    diagnostic: Option<String>,
    from: Option<String>,
    write: bool,
) -> Result<()> {
    let name = match (name, diagnostic) {
        (Some(name), _) => name,
        (None, Some(message)) => undefined_symbol(&message)
            .ok_or_else(|| anyhow!("Not an undefined-symbol diagnostic: {}", message))?,
        (None, None) => bail!("Either a symbol name or --diagnostic is required"),
    };

    let document = if document.is_absolute() {
        document
    } else {
        env::current_dir()?.join(document)
    };
    let text = tokio::fs::read_to_string(&document)
        .await
        .with_context(|| format!("Failed to read {:?}", document))?;

    let workspace = open_workspace(true).await?;
    let record = choose(&workspace, &name, &document, from.as_deref())?;

    let edit = workspace.fix(&text, &document, &record);
    if edit.is_noop() {
        eprintln!(
            "'{}' is already imported from {}",
            name,
            workspace.import_path(&record, &document)
        );
        if !write {
            print!("{}", text);
        }
        return Ok(());
    }

    let result = edit.apply(&text);
    if write {
        tokio::fs::write(&document, &result)
            .await
            .with_context(|| format!("Failed to write {:?}", document))?;
        info!("Imported {} into {:?}", name, document);
        eprintln!(
            "✓ Imported '{}' from {}",
            name,
            workspace.import_path(&record, &document)
        );
    } else {
        print!("{}", result);
    }

    Ok(())
}

/// Pick the record to import. Ambiguous names need `from`, see `pick_origin`.
fn choose(
    workspace: &Workspace,
    name: &str,
    document: &Path,
    from: Option<&str>,
) -> Result<SymbolRecord> {
    let resolution = workspace.resolve(name);

    if let Some(from) = from {
        if resolution == Resolution::Missing {
            bail!("No export named '{}' in the index", name);
        }
        return pick_origin(name, resolution.candidates(), document, from);
    }

    match resolution {
        Resolution::Missing => bail!("No export named '{}' in the index", name),
        Resolution::Unique(record) => Ok(record),
        Resolution::Ambiguous(records) => bail!(
            "'{}' is exported by {} modules, pick one with --from:\n{}",
            name,
            records.len(),
            listing(&records, document)
        ),
    }
}

/// Candidate selected by `from`: an exact origin path or import path as
/// printed by `lookup` wins, otherwise `from` has to be a whole-component
/// suffix of exactly one origin, with or without its extension.
fn pick_origin(
    name: &str,
    candidates: Vec<SymbolRecord>,
    document: &Path,
    from: &str,
) -> Result<SymbolRecord> {
    let exact = candidates
        .iter()
        .position(|record| {
            record.origin_path == from || resolve_import_path(record, document) == from
        });
    if let Some(position) = exact {
        return Ok(candidates[position].clone());
    }

    let suffix = Path::new(from);
    let mut matches: Vec<SymbolRecord> = candidates
        .into_iter()
        .filter(|record| {
            let origin = Path::new(&record.origin_path);
            !record.is_discovered
                && (origin.ends_with(suffix) || origin.with_extension("").ends_with(suffix))
        })
        .collect();

    match matches.len() {
        0 => bail!("No export named '{}' comes from {}", name, from),
        1 => Ok(matches.remove(0)),
        n => bail!(
            "{} origins of '{}' match {}, give a longer path:\n{}",
            n,
            name,
            from,
            listing(&matches, document)
        ),
    }
}

fn listing(records: &[SymbolRecord], document: &Path) -> String {
    records
        .iter()
        .map(|record| format!("  {}", resolve_import_path(record, document)))
        .collect::<Vec<_>>()
        .join("\n")
}
