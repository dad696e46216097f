use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".autoimport";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scanner: ScannerConfig,

    #[serde(default)]
    pub imports: ImportsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Glob selecting project files to scan, relative to the workspace root
    #[serde(default = "default_files_to_scan")]
    pub files_to_scan: String,

    /// File extensions considered source files
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Patterns to ignore (in addition to .gitignore)
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Regex alternation of wrapper calls skipped before an exported name
    #[serde(default = "default_higher_order_components")]
    pub higher_order_components: String,

    /// Print a completion message with the scan duration
    #[serde(default)]
    pub show_notifications: bool,

    /// Maximum number of file reads in flight during a bulk scan
    #[serde(default = "default_max_concurrent_reads")]
    pub max_concurrent_reads: usize,

    /// Third-party dependency tree, relative to the workspace root
    #[serde(default = "default_packages_dir")]
    pub packages_dir: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            files_to_scan: default_files_to_scan(),
            extensions: default_extensions(),
            ignore_patterns: default_ignore_patterns(),
            higher_order_components: default_higher_order_components(),
            show_notifications: false,
            max_concurrent_reads: default_max_concurrent_reads(),
            packages_dir: default_packages_dir(),
        }
    }
}

fn default_files_to_scan() -> String {
    "**/*.{ts,tsx,js,jsx}".to_string()
}

fn default_extensions() -> Vec<String> {
    vec![
        "ts".to_string(),
        "tsx".to_string(),
        "js".to_string(),
        "jsx".to_string(),
    ]
}

fn default_ignore_patterns() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        "typings".to_string(),
        ".history".to_string(),
        "jspm_packages".to_string(),
    ]
}

fn default_higher_order_components() -> String {
    "connect|withRouter|withStyles".to_string()
}

fn default_max_concurrent_reads() -> usize {
    64
}

fn default_packages_dir() -> String {
    "node_modules".to_string()
}

/// Formatting of generated import statements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportsConfig {
    /// `{ Foo }` instead of `{Foo}`
    #[serde(default = "default_true")]
    pub space_between_braces: bool,

    /// Quote module paths with `"` instead of `'`
    #[serde(default)]
    pub double_quotes: bool,

    /// Terminate statements with `;`
    #[serde(default = "default_true")]
    pub semicolon: bool,
}

impl Default for ImportsConfig {
    fn default() -> Self {
        Self {
            space_between_braces: true,
            double_quotes: false,
            semicolon: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to rolling files
    #[serde(default)]
    pub enabled: bool,

    /// Mirror logs to stderr
    #[serde(default = "default_true")]
    pub stderr: bool,

    /// File log level: trace, debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory, relative paths resolve against the workspace root
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// hourly, daily, minutely or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stderr: true,
            level: default_log_level(),
            directory: default_log_directory(),
            file_prefix: default_file_prefix(),
            rotation: default_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from(".autoimport/logs")
}

fn default_file_prefix() -> String {
    "autoimport.log".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Config {
    /// Load configuration from the .autoimport directory
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;

            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", config_path))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to the .autoimport directory
    pub fn save(&self, root: &Path) -> Result<()> {
        let config_dir = root.join(CONFIG_DIR);
        let config_path = config_dir.join(CONFIG_FILE);

        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory {:?}", config_dir))?;

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Get the path to the .autoimport directory
    pub fn config_dir(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR)
    }

    /// Absolute path of the third-party dependency tree
    pub fn packages_path(&self, root: &Path) -> PathBuf {
        root.join(&self.scanner.packages_dir)
    }

    /// Check if autoimport is initialized in the given directory
    pub fn is_initialized(root: &Path) -> bool {
        Self::config_dir(root).exists()
    }
}
