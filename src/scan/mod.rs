//! Template Scanner
//!
//! Builds a [`Tree`] from a directory on disk, used to seed new projects from
//! starter templates. Ignored folders are never descended into. Files over
//! the size limit, non-UTF-8 files and files that fail to read are kept with
//! placeholder content, so one bad file never fails the whole scan.

pub mod ignore;

use crate::error::ScanError;
use crate::tree::{FileNode, FolderNode, Tree, TreeNode};
use self::ignore::{
    IgnoreRules, SkipReason, DEFAULT_IGNORE_FILES, DEFAULT_IGNORE_FOLDERS, DEFAULT_IGNORE_PATTERNS,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use walkdir::WalkDir;

/// Default size limit for file contents: 1 MiB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Content substituted for non-UTF-8 files
pub const BINARY_PLACEHOLDER: &str = "[File content not included: binary file]";

/// Content substituted for files over the size limit
pub fn oversize_placeholder(size: u64, max_file_size: u64) -> String {
    format!(
        "[File content not included: size ({} bytes) exceeds maximum allowed size ({} bytes)]",
        size, max_file_size
    )
}

/// Content substituted for files that could not be read
pub fn read_error_placeholder(err: &std::io::Error) -> String {
    format!("Error reading file: {}", err)
}

/// Scanner options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Exact file names to skip
    pub ignore_files: Vec<String>,
    /// Exact folder names to skip
    pub ignore_folders: Vec<String>,
    /// Regular expressions matched against file names
    pub ignore_patterns: Vec<String>,
    /// Byte threshold for including content; 0 disables the limit
    pub max_file_size: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            ignore_files: DEFAULT_IGNORE_FILES.iter().map(|s| s.to_string()).collect(),
            ignore_folders: DEFAULT_IGNORE_FOLDERS.iter().map(|s| s.to_string()).collect(),
            ignore_patterns: DEFAULT_IGNORE_PATTERNS.iter().map(|s| s.to_string()).collect(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl ScanOptions {
    /// Options with no ignore rules and no size limit.
    pub fn none() -> Self {
        Self {
            ignore_files: Vec::new(),
            ignore_folders: Vec::new(),
            ignore_patterns: Vec::new(),
            max_file_size: 0,
        }
    }

    pub fn with_ignore_file(mut self, name: impl Into<String>) -> Self {
        self.ignore_files.push(name.into());
        self
    }

    pub fn with_ignore_folder(mut self, name: impl Into<String>) -> Self {
        self.ignore_folders.push(name.into());
        self
    }

    pub fn with_ignore_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.ignore_patterns.push(pattern.into());
        self
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    fn rules(&self) -> Result<IgnoreRules, ScanError> {
        IgnoreRules::new(
            self.ignore_files.iter().cloned(),
            self.ignore_folders.iter().cloned(),
            self.ignore_patterns.iter(),
        )
    }
}

/// Counters collected during a scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub files: usize,
    pub folders: usize,
    pub skipped: usize,
    pub oversized: usize,
    pub binary: usize,
    pub unreadable: usize,
}

/// Directory scanner with compiled ignore rules
#[derive(Debug, Clone)]
pub struct Scanner {
    rules: IgnoreRules,
    max_file_size: u64,
}

impl Scanner {
    pub fn new(options: &ScanOptions) -> Result<Self, ScanError> {
        Ok(Self {
            rules: options.rules()?,
            max_file_size: options.max_file_size,
        })
    }

    /// Scan `dir` into a tree named after its base name.
    pub fn scan(&self, dir: &Path) -> Result<Tree, ScanError> {
        self.scan_with_stats(dir).map(|(tree, _)| tree)
    }

    pub fn scan_with_stats(&self, dir: &Path) -> Result<(Tree, ScanStats), ScanError> {
        let root = resolve_root(dir)?;
        let root_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.to_string_lossy().into_owned());

        let mut folder = FolderNode::new(root_name);
        let mut stats = ScanStats::default();

        let walker = WalkDir::new(&root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                if self.rules.skip_folder(&name) {
                    debug!(path = %entry.path().display(), "Skipping ignored folder");
                    return false;
                }
                true
            });

        for entry in walker {
            let entry = entry.map_err(|err| {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                ScanError::Io {
                    path,
                    source: err.into(),
                }
            })?;

            let relative = match entry.path().strip_prefix(&root) {
                Ok(rel) => rel,
                Err(_) => continue,
            };
            let mut parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            let name = match parts.pop() {
                Some(name) => name,
                None => continue,
            };
            let parent = match folder_for(&mut folder, &parts) {
                Some(parent) => parent,
                None => continue,
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                parent.children.push(TreeNode::Folder(FolderNode::new(name)));
                stats.folders += 1;
            } else if file_type.is_file() {
                if let Some(reason) = self.rules.skip_file(&name) {
                    match reason {
                        SkipReason::IgnoredName => {
                            debug!(path = %entry.path().display(), "Skipping ignored file")
                        }
                        SkipReason::Pattern(pattern) => debug!(
                            path = %entry.path().display(),
                            pattern = %pattern,
                            "Skipping file matching ignore pattern"
                        ),
                    }
                    stats.skipped += 1;
                    continue;
                }
                let content = self.read_content(&entry, &mut stats);
                parent
                    .children
                    .push(TreeNode::File(FileNode::from_file_name(&name, content)));
                stats.files += 1;
            } else {
                debug!(path = %entry.path().display(), "Skipping non-regular entry");
                stats.skipped += 1;
            }
        }

        info!(
            root = %root.display(),
            files = stats.files,
            folders = stats.folders,
            skipped = stats.skipped,
            "Scanned template directory"
        );
        Ok((Tree::from_root(folder), stats))
    }

    fn read_content(&self, entry: &walkdir::DirEntry, stats: &mut ScanStats) -> String {
        let path = entry.path();
        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(err) => {
                let err: std::io::Error = err.into();
                error!(path = %path.display(), error = %err, "Error reading file");
                stats.unreadable += 1;
                return read_error_placeholder(&err);
            }
        };

        if self.max_file_size > 0 && size > self.max_file_size {
            debug!(path = %path.display(), size, "File exceeds size limit");
            stats.oversized += 1;
            return oversize_placeholder(size, self.max_file_size);
        }

        match std::fs::read(path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => {
                    debug!(path = %path.display(), "File is not valid UTF-8");
                    stats.binary += 1;
                    BINARY_PLACEHOLDER.to_string()
                }
            },
            Err(err) => {
                error!(path = %path.display(), error = %err, "Error reading file");
                stats.unreadable += 1;
                read_error_placeholder(&err)
            }
        }
    }
}

fn resolve_root(dir: &Path) -> Result<PathBuf, ScanError> {
    let meta = std::fs::metadata(dir).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            ScanError::NotFound(dir.to_path_buf())
        } else {
            ScanError::Io {
                path: dir.to_path_buf(),
                source: err,
            }
        }
    })?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }
    dunce::canonicalize(dir).map_err(|source| ScanError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn folder_for<'a>(root: &'a mut FolderNode, parts: &[String]) -> Option<&'a mut FolderNode> {
    let mut folder = root;
    for part in parts {
        folder = folder.folder_mut(part)?;
    }
    Some(folder)
}

/// Scan `dir` with `options`.
pub fn scan(dir: &Path, options: &ScanOptions) -> Result<Tree, ScanError> {
    Scanner::new(options)?.scan(dir)
}
