use glob::{MatchOptions, Pattern};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::overrides::{Override, OverrideBuilder};
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use crate::config::ScannerConfig;

use super::errors::ScanError;

/// Accept/reject predicate built from the workspace's top-level `.gitignore`.
///
/// A missing or unreadable `.gitignore` accepts everything.
#[derive(Clone)]
pub struct IgnoreRules {
    root: PathBuf,
    gitignore: Gitignore,
}

impl IgnoreRules {
    pub fn load(root: &Path) -> Self {
        let path = root.join(".gitignore");

        let gitignore = if path.is_file() {
            let mut builder = GitignoreBuilder::new(root);
            if let Some(err) = builder.add(&path) {
                warn!("Partially loaded {}: {}", path.display(), err);
            }
            builder.build().unwrap_or_else(|err| {
                warn!("Ignoring unreadable {}: {}", path.display(), err);
                Gitignore::empty()
            })
        } else {
            Gitignore::empty()
        };

        Self {
            root: root.to_path_buf(),
            gitignore,
        }
    }

    /// Whether `path` survives the ignore rules. Paths outside the root pass.
    pub fn accepts(&self, path: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return true;
        };
        if relative.as_os_str().is_empty() {
            return true;
        }

        !self
            .gitignore
            .matched_path_or_any_parents(relative, path.is_dir())
            .is_ignore()
    }
}

/// Enumerates workspace files respecting .gitignore, the include glob and
/// the configured ignore patterns
pub struct Walker {
    root: PathBuf,
    extensions: HashSet<String>,
    ignore_patterns: Vec<Pattern>,
    overrides: Override,
}

impl Walker {
    /// Compile the include glob and ignore patterns for `root`
    pub fn new(root: PathBuf, config: &ScannerConfig) -> Result<Self, ScanError> {
        let mut builder = OverrideBuilder::new(&root);
        builder
            .add(&config.files_to_scan)
            .map_err(|e| invalid_glob(&config.files_to_scan, e))?;
        for pattern in &config.ignore_patterns {
            for glob in [format!("!{}", pattern), format!("!{}/**", pattern)] {
                builder.add(&glob).map_err(|e| invalid_glob(&glob, e))?;
            }
        }
        let overrides = builder.build().map_err(|e| invalid_glob("overrides", e))?;

        let ignore_patterns = config
            .ignore_patterns
            .iter()
            .map(|pattern| Pattern::new(pattern).map_err(|e| invalid_glob(pattern, e)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            root,
            extensions: config.extensions.iter().cloned().collect(),
            ignore_patterns,
            overrides,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn builder(&self, start: &Path) -> WalkBuilder {
        let mut builder = WalkBuilder::new(start);

        builder.git_ignore(true);
        builder.git_global(true);
        builder.git_exclude(true);
        builder.require_git(false);
        builder.hidden(true);
        builder.sort_by_file_name(|a, b| a.cmp(b));
        builder.overrides(self.overrides.clone());

        builder
    }

    /// Source files to scan, in path order
    pub fn collect_files(&self) -> Vec<PathBuf> {
        self.collect_files_in(&self.root)
    }

    /// Source files below `dir`, which must lie inside the root
    pub fn collect_files_in(&self, dir: &Path) -> Vec<PathBuf> {
        let files = self
            .builder(dir)
            .build()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .filter(|entry| self.has_extension(entry.path()))
            .filter(|entry| !self.is_excluded(entry.path()))
            .map(|entry| entry.into_path())
            .collect::<Vec<_>>();

        debug!("Walker selected {} files under {:?}", files.len(), dir);
        files
    }

    /// Every non-ignored directory, root included
    pub fn directories(&self) -> Vec<PathBuf> {
        self.directories_in(&self.root)
    }

    /// Every non-ignored directory below `dir`, `dir` included
    pub fn directories_in(&self, dir: &Path) -> Vec<PathBuf> {
        self.builder(dir)
            .build()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false))
            .filter(|entry| !self.is_excluded(entry.path()))
            .map(|entry| entry.into_path())
            .collect()
    }

    /// Whether `collect_files` would select the file at `path`
    pub fn accepts(&self, path: &Path, rules: &IgnoreRules) -> bool {
        self.has_extension(path)
            && !self.is_excluded(path)
            && !self.overrides.matched(path, false).is_ignore()
            && rules.accepts(path)
            && !self.nested_gitignore_matches(path, false)
    }

    /// Whether `directories` would list the directory at `path`
    pub fn accepts_directory(&self, path: &Path, rules: &IgnoreRules) -> bool {
        !self.is_excluded(path)
            && rules.accepts(path)
            && !self.nested_gitignore_matches(path, true)
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .map(|ext| self.extensions.contains(ext))
            .unwrap_or(false)
    }

    /// Outside the root, hidden below it, or inside a directory named by an
    /// ignore pattern. Only components below the root are considered.
    fn is_excluded(&self, path: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return true;
        };

        relative.components().any(|component| match component {
            Component::Normal(name) => {
                let name = name.to_string_lossy();
                name.starts_with('.') || self.ignore_patterns.iter().any(|p| p.matches(&name))
            }
            _ => false,
        })
    }

    /// `.gitignore` files in directories between the root and `path`.
    /// The root one is handled by `IgnoreRules`.
    fn nested_gitignore_matches(&self, path: &Path, is_dir: bool) -> bool {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return false;
        };
        let mut dir = self.root.clone();
        let mut ancestors: Vec<&OsStr> = relative.iter().collect();
        ancestors.pop();

        for (depth, name) in ancestors.iter().enumerate() {
            dir.push(name);
            let gitignore_path = dir.join(".gitignore");
            if !gitignore_path.is_file() {
                continue;
            }

            let mut builder = GitignoreBuilder::new(&dir);
            if builder.add(&gitignore_path).is_some() {
                continue;
            }
            let Ok(gitignore) = builder.build() else {
                continue;
            };

            let below: PathBuf = relative.iter().skip(depth + 1).collect();
            if gitignore
                .matched_path_or_any_parents(&below, is_dir)
                .is_ignore()
            {
                return true;
            }
        }

        false
    }
}

/// Files one directory below `packages_root` with a matching extension,
/// i.e. `*/*.<ext>`. Ignore files are not consulted here since dependency
/// trees are usually gitignored.
pub fn package_files(packages_root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, ScanError> {
    let patterns = extensions
        .iter()
        .map(|ext| {
            let glob = format!("*/*.{}", ext);
            Pattern::new(&glob).map_err(|e| invalid_glob(&glob, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let options = MatchOptions {
        require_literal_separator: true,
        ..MatchOptions::new()
    };

    let mut builder = WalkBuilder::new(packages_root);
    builder.standard_filters(false).max_depth(Some(2));
    builder.sort_by_file_name(|a, b| a.cmp(b));

    Ok(builder
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter(|entry| {
            entry
                .path()
                .strip_prefix(packages_root)
                .map(|relative| {
                    patterns
                        .iter()
                        .any(|p| p.matches_path_with(relative, options))
                })
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect())
}

fn invalid_glob(pattern: &str, err: impl std::fmt::Display) -> ScanError {
    ScanError::InvalidGlob {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    }
}
