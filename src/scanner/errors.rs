//! Error types and per-file error collection for scans

use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop a scanner from being built or a path from being read.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The configured higher-order component alternation is not a valid regex.
    #[error("Invalid higher-order component pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A glob from the configuration could not be compiled.
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },

    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Stage where a per-file problem was detected
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum ScanStage {
    FileRead,
    Extraction,
}

impl std::fmt::Display for ScanStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanStage::FileRead => write!(f, "File Read"),
            ScanStage::Extraction => write!(f, "Extraction"),
        }
    }
}

/// Problem with a single file; never aborts the batch it belongs to
#[derive(Debug, Clone)]
pub struct FileError {
    pub path: PathBuf,
    pub error: String,
    pub stage: ScanStage,
}

/// Collects per-file problems while a batch is reduced into the index
#[derive(Debug, Default, Clone)]
pub struct ScanErrors {
    errors: Vec<FileError>,
}

impl ScanErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem for `path`
    pub fn record(&mut self, path: PathBuf, error: impl std::fmt::Display, stage: ScanStage) {
        self.errors.push(FileError {
            path,
            error: error.to_string(),
            stage,
        });
    }

    pub fn extend(&mut self, other: ScanErrors) {
        self.errors.extend(other.errors);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of problems recorded at `stage`
    pub fn count_at(&self, stage: ScanStage) -> usize {
        self.errors.iter().filter(|e| e.stage == stage).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileError> {
        self.errors.iter()
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::from_errors(&self.errors)
    }
}

/// Errors grouped by stage, with a printable summary
pub struct ErrorReport {
    pub total_errors: usize,
    pub by_stage: HashMap<ScanStage, Vec<FileError>>,
    pub summary: String,
}

impl ErrorReport {
    pub fn from_errors(errors: &[FileError]) -> Self {
        let mut by_stage: HashMap<ScanStage, Vec<FileError>> = HashMap::new();

        for error in errors {
            by_stage.entry(error.stage).or_default().push(error.clone());
        }

        let summary = if errors.is_empty() {
            "No files were skipped".to_string()
        } else {
            format!("Skipped {} problems while scanning", errors.len())
        };

        Self {
            total_errors: errors.len(),
            by_stage,
            summary,
        }
    }

    /// Print the summary to stderr with up to five examples per stage
    pub fn print_summary(&self) {
        if self.total_errors == 0 {
            return;
        }

        eprintln!("{}", self.summary);

        for (stage, errors) in &self.by_stage {
            eprintln!("  {}: {}", stage, errors.len());

            for error in errors.iter().take(5) {
                eprintln!("    - {}: {}", error.path.display(), error.error);
            }

            if errors.len() > 5 {
                eprintln!("    ... and {} more", errors.len() - 5);
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }
}
