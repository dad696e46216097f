//! Module specifiers for import statements

use std::path::{Component, Path, PathBuf};

use super::index::SymbolRecord;

/// Module specifier used when `record` is imported into `document`.
///
/// Discovered records keep their package specifier. Workspace records become
/// a `./` or `../` path relative to the document's directory, with forward
/// slashes and no file extension.
pub fn resolve_import_path(record: &SymbolRecord, document: &Path) -> String {
    if record.is_discovered {
        return record.origin_path.clone();
    }

    let from_dir = document.parent().unwrap_or_else(|| Path::new(""));
    let relative = relative_path(from_dir, Path::new(&record.origin_path));
    let mut specifier = relative.to_string_lossy().replace('\\', "/");

    if !specifier.starts_with("./") && !specifier.starts_with("../") {
        specifier = format!("./{}", specifier);
    }

    strip_extension(&specifier).to_string()
}

/// Path of `target` as seen from the directory `from_dir`.
fn relative_path(from_dir: &Path, target: &Path) -> PathBuf {
    let from: Vec<Component> = from_dir
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let to: Vec<Component> = target
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let shared = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in shared..from.len() {
        relative.push("..");
    }
    for component in &to[shared..] {
        relative.push(component.as_os_str());
    }
    relative
}

/// Drop the extension of the last path segment, if it has one
fn strip_extension(specifier: &str) -> &str {
    let name_start = specifier.rfind('/').map(|i| i + 1).unwrap_or(0);

    match specifier[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &specifier[..name_start + dot],
        _ => specifier,
    }
}
