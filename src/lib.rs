pub mod cli;
pub mod commands;
pub mod config;
pub mod diagnostic;
pub mod logging;
pub mod rewriter;
pub mod scanner;
pub mod symbol;
pub mod watcher;
pub mod workspace;

pub use config::Config;
pub use rewriter::{ImportRewriter, TextEdit};
pub use symbol::{SymbolIndex, SymbolRecord};
pub use workspace::{Resolution, Workspace};
