//! CLI Tooling
//!
//! Command-line interface over scanning, tree conversion, templates and the
//! project store. Every command returns the text to print, so the whole
//! surface is testable without spawning a process.

use crate::config::{ConfigLoader, CotreeConfig};
use crate::error::{ApiError, StorageError};
use crate::sandbox::{MountTree, Sandbox};
use crate::scan::Scanner;
use crate::session::ProjectSession;
use crate::store::{ProjectRecord, ProjectStore, SledProjectStore};
use crate::template::{read_tree_json, save_tree_json, TemplateCatalog};
use crate::tooling::format::{
    format_files_table, format_projects_table, format_scan_summary, format_tree_text,
};
use crate::tree::{build, flatten, Tree};
use crate::types::FlatFiles;
use clap::{Parser, Subcommand};
use parking_lot::Mutex;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Empty file placed in folders made by `project add-folder`; flat storage
/// has no way to keep an empty folder.
pub const FOLDER_KEEP_FILE: &str = ".gitkeep";

/// cotree CLI - project file trees, templates and stored projects
#[derive(Parser)]
#[command(name = "cotree")]
#[command(about = "Build, edit and persist project file trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a directory into a project tree
    Scan {
        /// Directory to scan
        dir: PathBuf,
        /// Byte threshold for file contents (0 disables the limit)
        #[arg(long)]
        max_file_size: Option<u64>,
        /// Additional file name to ignore (repeatable)
        #[arg(long = "ignore-file")]
        ignore_file: Vec<String>,
        /// Additional folder name to ignore (repeatable)
        #[arg(long = "ignore-folder")]
        ignore_folder: Vec<String>,
        /// Additional file name regex to ignore (repeatable)
        #[arg(long = "ignore-pattern")]
        ignore_pattern: Vec<String>,
        /// Output format: tree, json or flat
        #[arg(long, default_value = "tree")]
        format: String,
        /// Write the tree JSON to this file instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Build tree JSON from a flat `path -> content` JSON object
    Build {
        input: PathBuf,
        /// Root folder name
        #[arg(long, default_value = "Project")]
        name: String,
    },
    /// Flatten tree JSON into a `path -> content` JSON object
    Flatten { input: PathBuf },
    /// Show the files a template resolves to
    Template {
        name: String,
        /// Output format: flat or tree
        #[arg(long, default_value = "flat")]
        format: String,
    },
    /// Stored project commands
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a project and seed it from a template
    Init {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "nextjs")]
        template: String,
    },
    /// Show a project's files
    Show {
        id: String,
        /// Output format: tree, flat or table
        #[arg(long, default_value = "tree")]
        format: String,
    },
    /// List stored projects
    List,
    /// Delete a project
    Delete { id: String },
    /// Create a file, creating missing parent folders
    AddFile {
        id: String,
        path: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Create a folder (and missing parents) holding an empty keep file
    AddFolder { id: String, path: String },
    /// Remove a file or folder
    Rm { id: String, path: String },
    /// Move a file or folder into another folder, creating it when missing
    Mv { id: String, from: String, to: String },
    /// Rename a file or folder
    Rename {
        id: String,
        path: String,
        new_name: String,
    },
    /// Mount a project into a sandbox and print the mounted file tree
    Mount {
        id: String,
        /// Overlay the project on the starter Node.js files
        #[arg(long)]
        with_defaults: bool,
    },
}

/// CLI context for managing workspace state
pub struct CliContext {
    workspace_root: PathBuf,
    config: CotreeConfig,
    catalog: TemplateCatalog,
    store: Mutex<Option<Arc<dyn ProjectStore>>>,
}

impl CliContext {
    /// Create a new CLI context. The project store is opened on first use.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Ok(Self::with_config(workspace_root, config))
    }

    pub fn with_config(workspace_root: PathBuf, config: CotreeConfig) -> Self {
        let catalog = TemplateCatalog::from_config(&config.templates, &config.scan, &workspace_root);
        Self {
            workspace_root,
            config,
            catalog,
            store: Mutex::new(None),
        }
    }

    /// Context over an already-open store.
    pub fn with_store(
        workspace_root: PathBuf,
        config: CotreeConfig,
        store: Arc<dyn ProjectStore>,
    ) -> Self {
        let context = Self::with_config(workspace_root, config);
        *context.store.lock() = Some(store);
        context
    }

    pub fn config(&self) -> &CotreeConfig {
        &self.config
    }

    pub fn workspace_root(&self) -> &std::path::Path {
        &self.workspace_root
    }

    fn store(&self) -> Result<Arc<dyn ProjectStore>, ApiError> {
        let mut guard = self.store.lock();
        if let Some(store) = guard.as_ref() {
            return Ok(Arc::clone(store));
        }
        let path = self
            .config
            .storage
            .resolve_store_path(&self.workspace_root)?;
        let store: Arc<dyn ProjectStore> = Arc::new(SledProjectStore::open(&path)?);
        info!(path = %path.display(), "Opened project store");
        *guard = Some(Arc::clone(&store));
        Ok(store)
    }

    fn resolve(&self, path: &std::path::Path) -> PathBuf {
        self.workspace_root.join(path)
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Scan {
                dir,
                max_file_size,
                ignore_file,
                ignore_folder,
                ignore_pattern,
                format,
                output,
            } => {
                let mut options = self.config.scan.to_options();
                if let Some(max) = max_file_size {
                    options.max_file_size = *max;
                }
                options.ignore_files.extend(ignore_file.iter().cloned());
                options.ignore_folders.extend(ignore_folder.iter().cloned());
                options.ignore_patterns.extend(ignore_pattern.iter().cloned());

                let (tree, stats) = Scanner::new(&options)?.scan_with_stats(&self.resolve(dir))?;

                if let Some(output) = output {
                    let output = self.resolve(output);
                    save_tree_json(&tree, &output)?;
                    return Ok(format!(
                        "Wrote {} ({} files)\n{}",
                        output.display(),
                        stats.files,
                        format_scan_summary(&stats)
                    ));
                }

                match format.as_str() {
                    "tree" => Ok(format!(
                        "{}\n{}",
                        format_tree_text(&tree),
                        format_scan_summary(&stats)
                    )),
                    "json" => Ok(serde_json::to_string_pretty(&tree)?),
                    "flat" => Ok(serde_json::to_string_pretty(&flatten(&tree))?),
                    other => Err(invalid_format(other, &["tree", "json", "flat"])),
                }
            }
            Commands::Build { input, name } => {
                let json = std::fs::read_to_string(self.resolve(input))?;
                let files: FlatFiles = serde_json::from_str(&json)?;
                let tree = build(files.iter().map(|(k, v)| (k.as_str(), v.as_str())), name);
                Ok(serde_json::to_string_pretty(&tree)?)
            }
            Commands::Flatten { input } => {
                let tree = read_tree_json(&self.resolve(input))?;
                Ok(serde_json::to_string_pretty(&flatten(&tree))?)
            }
            Commands::Template { name, format } => {
                let load = self.catalog.load_files(name)?;
                match format.as_str() {
                    "flat" => Ok(serde_json::to_string_pretty(&json!({
                        "template": name,
                        "folder": load.folder,
                        "source": load.source,
                        "fileCount": load.files.len(),
                        "files": load.files,
                    }))?),
                    "tree" => Ok(serde_json::to_string_pretty(&Tree::from_flat(
                        &load.files,
                        &load.folder,
                    ))?),
                    other => Err(invalid_format(other, &["flat", "tree"])),
                }
            }
            Commands::Project { command } => self.execute_project(command),
        }
    }

    fn execute_project(&self, command: &ProjectCommands) -> Result<String, ApiError> {
        let store = self.store()?;
        match command {
            ProjectCommands::Init { id, name, template } => {
                if store.get(id)?.is_some() {
                    return Err(StorageError::ProjectExists(id.clone()).into());
                }
                let name = name.clone().unwrap_or_else(|| id.clone());
                store.put(&ProjectRecord::new(id.as_str(), name, template.as_str()))?;
                let session = ProjectSession::open(store, &self.catalog, id)?;
                Ok(format!(
                    "Created project '{}' from template '{}' ({} files)\n",
                    id,
                    template,
                    session.record().files.len()
                ))
            }
            ProjectCommands::Show { id, format } => {
                let session = ProjectSession::open(store, &self.catalog, id)?;
                match format.as_str() {
                    "tree" => Ok(format_tree_text(session.tree())),
                    "flat" => Ok(serde_json::to_string_pretty(&session.tree().to_flat())?),
                    "table" => Ok(format_files_table(session.tree())),
                    other => Err(invalid_format(other, &["tree", "flat", "table"])),
                }
            }
            ProjectCommands::List => Ok(format_projects_table(&store.list()?)),
            ProjectCommands::Delete { id } => {
                if !store.delete(id)? {
                    return Err(StorageError::ProjectNotFound(id.clone()).into());
                }
                Ok(format!("Deleted project '{}'\n", id))
            }
            ProjectCommands::AddFile { id, path, content } => {
                self.edit(store, id, |tree| {
                    tree.create_file_with_parents(path, content.as_str())
                })?;
                Ok(format!("Created file '{}'\n", path))
            }
            ProjectCommands::AddFolder { id, path } => {
                let keep = format!("{}/{}", path.trim_matches('/'), FOLDER_KEEP_FILE);
                self.edit(store, id, |tree| {
                    tree.create_folder_with_parents(path)?
                        .create_file_at(&keep, "")
                })?;
                Ok(format!("Created folder '{}'\n", path))
            }
            ProjectCommands::Rm { id, path } => {
                self.edit(store, id, |tree| tree.delete_at(path))?;
                Ok(format!("Removed '{}'\n", path))
            }
            ProjectCommands::Mv { id, from, to } => {
                self.edit(store, id, |tree| tree.move_node_with_parents(from, to))?;
                Ok(format!("Moved '{}' into '{}'\n", from, to))
            }
            ProjectCommands::Rename { id, path, new_name } => {
                self.edit(store, id, |tree| tree.rename_at(path, new_name))?;
                Ok(format!("Renamed '{}' to '{}'\n", path, new_name.trim()))
            }
            ProjectCommands::Mount { id, with_defaults } => {
                let session = ProjectSession::open(store, &self.catalog, id)?;
                let mount = if *with_defaults {
                    MountTree::project_with_defaults(&session.tree().to_flat())
                } else {
                    MountTree::from_tree(session.tree())
                };
                let sandbox = Sandbox::create();
                sandbox.boot()?;
                sandbox.mount(&mount)?;
                let snapshot = sandbox.snapshot()?;
                sandbox.dispose();
                Ok(serde_json::to_string_pretty(&snapshot)?)
            }
        }
    }

    fn edit<F>(&self, store: Arc<dyn ProjectStore>, id: &str, edit: F) -> Result<(), ApiError>
    where
        F: FnOnce(&Tree) -> Result<Tree, crate::error::TreeError>,
    {
        let mut session = ProjectSession::open(store, &self.catalog, id)?;
        session.apply(edit)?;
        if session.is_dirty() {
            session.save()?;
        }
        Ok(())
    }
}

fn invalid_format(format: &str, allowed: &[&str]) -> ApiError {
    ApiError::ConfigError(format!(
        "Invalid format '{}' (must be one of: {})",
        format,
        allowed.join(", ")
    ))
}
