use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "autoimport")]
#[command(author, version, about = "Index exported JS/TS symbols and add missing imports")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default .autoimport/config.toml in the current directory
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Scan the project and report how many symbols were indexed
    Scan {
        /// Also scan the dependency tree for package imports
        #[arg(short, long)]
        packages: bool,
    },

    /// Show every file or package exporting a name
    Lookup {
        /// Exact, case-sensitive symbol name
        name: String,

        /// Document the import paths are computed for
        #[arg(short, long)]
        document: Option<PathBuf>,

        /// Print candidates as JSON
        #[arg(long)]
        json: bool,
    },

    /// List symbols whose name contains a word
    Complete {
        word: String,

        /// Maximum number of candidates to print
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Add the import for a symbol to a document
    Fix {
        /// File to edit
        document: PathBuf,

        /// Symbol to import (or use --diagnostic)
        #[arg(required_unless_present = "diagnostic")]
        name: Option<String>,

        /// Undefined-symbol diagnostic message to take the name from
        #[arg(long, conflicts_with = "name")]
        diagnostic: Option<String>,

        /// Origin to import from when several files export the name
        #[arg(long)]
        from: Option<String>,

        /// Write the result back instead of printing it
        #[arg(short, long)]
        write: bool,
    },

    /// Scan the dependency tree and print module -> names
    Packages,

    /// Keep the index current while files change
    Watch {
        /// Debounce delay in milliseconds
        #[arg(short, long, default_value = "500")]
        debounce_ms: u64,
    },
}
