//! Configuration
//!
//! Layered configuration: built-in defaults, the global file
//! (`$XDG_CONFIG_HOME/cotree/config.toml`), the workspace file
//! (`<workspace>/cotree.toml`), then `COTREE__*` environment variables.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod workspace;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use workspace::storage_paths::StorageConfig;

use crate::logging::LoggingConfig;
use crate::scan::{ScanOptions, DEFAULT_MAX_FILE_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CotreeConfig {
    pub logging: LoggingConfig,
    pub scan: ScanConfig,
    pub storage: StorageConfig,
    pub templates: TemplatesConfig,
}

/// Scanner configuration; lists extend the built-in ignore rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub ignore_files: Vec<String>,
    pub ignore_folders: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub max_file_size: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore_files: Vec::new(),
            ignore_folders: Vec::new(),
            ignore_patterns: Vec::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl ScanConfig {
    /// Scanner options: built-in rules plus the configured extras.
    pub fn to_options(&self) -> ScanOptions {
        let mut options = ScanOptions::default().with_max_file_size(self.max_file_size);
        options.ignore_files.extend(self.ignore_files.iter().cloned());
        options.ignore_folders.extend(self.ignore_folders.iter().cloned());
        options
            .ignore_patterns
            .extend(self.ignore_patterns.iter().cloned());
        options
    }
}

fn default_starters_dir() -> PathBuf {
    PathBuf::from("starters")
}

fn default_template() -> String {
    "nextjs".to_string()
}

/// Template catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Directory holding one folder per starter template (relative to workspace root)
    #[serde(default = "default_starters_dir")]
    pub starters_dir: PathBuf,

    /// Extra or overriding template-name aliases: alias -> starter folder
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,

    /// Starter folder used for unknown template names
    #[serde(default = "default_template")]
    pub default_template: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            starters_dir: default_starters_dir(),
            aliases: BTreeMap::new(),
            default_template: default_template(),
        }
    }
}
