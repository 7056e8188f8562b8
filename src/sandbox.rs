//! Sandbox handle
//!
//! An explicit, owned handle over an in-memory runtime filesystem: boot it,
//! mount a project, read and write files, reset, dispose. Mount trees use the
//! nested `{ name: { "file": { "contents" } } | { "directory": { ... } } }`
//! shape in-browser runtimes consume.

use crate::error::ApiError;
use crate::tree::{path, Tree, TreeNode};
use crate::types::FlatFiles;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// One entry of a mount tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountEntry {
    File { contents: String },
    Directory(MountTree),
}

/// Nested directory listing keyed by entry name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MountTree(IndexMap<String, MountEntry>);

impl MountTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount tree of a project's children; the root folder itself is not an entry.
    pub fn from_tree(tree: &Tree) -> Self {
        Self::from_children(tree.children())
    }

    /// A file and a folder may share a display name in a tree but not in a
    /// mount tree; the folder is kept and the file is skipped.
    fn from_children(children: &[TreeNode]) -> Self {
        let mut entries: IndexMap<String, MountEntry> = IndexMap::new();
        for child in children {
            let name = child.display_name();
            match entries.get(&name) {
                Some(MountEntry::File { .. }) if child.is_folder() => {
                    warn!(entry = %name, "Folder replaces a file of the same name in mount tree");
                }
                Some(_) => {
                    warn!(entry = %name, "Skipped duplicate mount entry");
                    continue;
                }
                None => {}
            }
            let entry = match child {
                TreeNode::File(file) => MountEntry::File {
                    contents: file.content.clone(),
                },
                TreeNode::Folder(folder) => {
                    MountEntry::Directory(Self::from_children(&folder.children))
                }
            };
            entries.insert(name, entry);
        }
        Self(entries)
    }

    /// Starter Node.js project (`package.json`, `index.js`, `README.md`)
    /// overlaid with `files`.
    pub fn project_with_defaults(files: &FlatFiles) -> Self {
        let mut tree = Self::new();
        for (name, contents) in default_project_files() {
            tree.insert_file(name, contents);
        }
        for (path, contents) in files {
            tree.insert_file(path, contents.clone());
        }
        tree
    }

    /// Insert a file at a `/`-separated path, creating directories and
    /// replacing whatever entry was there.
    pub fn insert_file(&mut self, path: &str, contents: impl Into<String>) {
        let segments = path::segments(path);
        let (leaf, dirs) = match segments.split_last() {
            Some(split) => split,
            None => return,
        };
        let mut current = self;
        for dir in dirs {
            current = current.directory_or_create(dir);
        }
        current.0.insert(
            leaf.to_string(),
            MountEntry::File {
                contents: contents.into(),
            },
        );
    }

    fn directory_or_create(&mut self, name: &str) -> &mut MountTree {
        let entry = self
            .0
            .entry(name.to_string())
            .or_insert_with(|| MountEntry::Directory(MountTree::new()));
        if let MountEntry::File { .. } = entry {
            *entry = MountEntry::Directory(MountTree::new());
        }
        match entry {
            MountEntry::Directory(dir) => dir,
            MountEntry::File { .. } => unreachable!("entry was replaced by a directory"),
        }
    }

    pub fn get(&self, name: &str) -> Option<&MountEntry> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn directory(&self, path: &str) -> Option<&MountTree> {
        let mut current = self;
        for segment in path::segments(path).into_iter().filter(|s| *s != ".") {
            match current.0.get(segment) {
                Some(MountEntry::Directory(dir)) => current = dir,
                _ => return None,
            }
        }
        Some(current)
    }

    fn directory_mut(&mut self, path: &str) -> Option<&mut MountTree> {
        let mut current = self;
        for segment in path::segments(path).into_iter().filter(|s| *s != ".") {
            match current.0.get_mut(segment) {
                Some(MountEntry::Directory(dir)) => current = dir,
                _ => return None,
            }
        }
        Some(current)
    }
}

fn default_project_files() -> [(&'static str, String); 3] {
    [
        (
            "package.json",
            r#"{
  "name": "collaborative-project",
  "version": "1.0.0",
  "description": "A collaborative coding project",
  "main": "index.js",
  "scripts": {
    "start": "node index.js",
    "dev": "node --watch index.js"
  },
  "dependencies": {}
}"#
            .to_string(),
        ),
        (
            "index.js",
            "console.log('Hello from the sandbox!');\nconsole.log('You can run Node.js code here!');\n"
                .to_string(),
        ),
        (
            "README.md",
            "# Collaborative Project\n\nThis project is running in a sandbox.\n\n## Available Commands\n- `npm start` - Run the main script\n- `node <file>` - Run any JavaScript file\n"
                .to_string(),
        ),
    ]
}

/// Directory listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    pub name: String,
    pub is_directory: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandboxState {
    Created,
    Booted,
    Disposed,
}

#[derive(Debug)]
struct Inner {
    state: SandboxState,
    fs: MountTree,
}

/// Sandbox lifecycle handle
#[derive(Debug)]
pub struct Sandbox {
    inner: RwLock<Inner>,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::create()
    }
}

impl Sandbox {
    pub fn create() -> Self {
        Self {
            inner: RwLock::new(Inner {
                state: SandboxState::Created,
                fs: MountTree::new(),
            }),
        }
    }

    pub fn state(&self) -> SandboxState {
        self.inner.read().state
    }

    /// Boot the sandbox. Booting a booted sandbox is a no-op.
    pub fn boot(&self) -> Result<(), ApiError> {
        let mut inner = self.inner.write();
        match inner.state {
            SandboxState::Created => {
                inner.state = SandboxState::Booted;
                info!("Sandbox booted");
                Ok(())
            }
            SandboxState::Booted => Ok(()),
            SandboxState::Disposed => Err(disposed()),
        }
    }

    /// Replace the filesystem with `tree`.
    pub fn mount(&self, tree: &MountTree) -> Result<(), ApiError> {
        let mut inner = self.inner.write();
        ensure_booted(inner.state)?;
        inner.fs = tree.clone();
        info!(entries = tree.len(), "Mounted file tree");
        Ok(())
    }

    /// Clear the filesystem; the sandbox stays booted.
    pub fn reset(&self) -> Result<(), ApiError> {
        self.mount(&MountTree::new())
    }

    /// Write a file. The parent directory must exist.
    pub fn write_file(&self, path: &str, contents: impl Into<String>) -> Result<(), ApiError> {
        let mut inner = self.inner.write();
        ensure_booted(inner.state)?;
        let (parent, leaf) = path::split_parent(path);
        if leaf.is_empty() {
            return Err(ApiError::Sandbox(format!("Invalid file path '{}'", path)));
        }
        let dir = inner
            .fs
            .directory_mut(&parent)
            .ok_or_else(|| ApiError::Sandbox(format!("No such directory '{}'", parent)))?;
        if let Some(MountEntry::Directory(_)) = dir.get(leaf) {
            return Err(ApiError::Sandbox(format!("'{}' is a directory", path)));
        }
        dir.0.insert(
            leaf.to_string(),
            MountEntry::File {
                contents: contents.into(),
            },
        );
        debug!(path, "File written");
        Ok(())
    }

    /// Read a file; `None` when it does not exist or is a directory.
    pub fn read_file(&self, path: &str) -> Result<Option<String>, ApiError> {
        let inner = self.inner.read();
        ensure_booted(inner.state)?;
        let (parent, leaf) = path::split_parent(path);
        let contents = match inner.fs.directory(&parent).and_then(|dir| dir.get(leaf)) {
            Some(MountEntry::File { contents }) => Some(contents.clone()),
            _ => {
                error!(path, "Error reading file");
                None
            }
        };
        Ok(contents)
    }

    /// List a directory; empty when it does not exist.
    pub fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, ApiError> {
        let inner = self.inner.read();
        ensure_booted(inner.state)?;
        let entries = match inner.fs.directory(path) {
            Some(dir) => dir
                .0
                .iter()
                .map(|(name, entry)| DirEntry {
                    name: name.clone(),
                    is_directory: matches!(entry, MountEntry::Directory(_)),
                })
                .collect(),
            None => {
                error!(path, "Error listing files");
                Vec::new()
            }
        };
        Ok(entries)
    }

    /// Snapshot of the current filesystem.
    pub fn snapshot(&self) -> Result<MountTree, ApiError> {
        let inner = self.inner.read();
        ensure_booted(inner.state)?;
        Ok(inner.fs.clone())
    }

    /// Release the sandbox. Every later call fails.
    pub fn dispose(&self) {
        let mut inner = self.inner.write();
        inner.state = SandboxState::Disposed;
        inner.fs = MountTree::new();
        info!("Sandbox disposed");
    }
}

fn ensure_booted(state: SandboxState) -> Result<(), ApiError> {
    match state {
        SandboxState::Booted => Ok(()),
        SandboxState::Created => Err(ApiError::Sandbox("Sandbox is not booted".to_string())),
        SandboxState::Disposed => Err(disposed()),
    }
}

fn disposed() -> ApiError {
    ApiError::Sandbox("Sandbox has been disposed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_keeps_folder_over_file_with_same_name() {
        let mut files = FlatFiles::new();
        files.insert("a".into(), "plain file".into());
        files.insert("b.txt".into(), "b".into());
        let tree = Tree::from_flat(&files, "p")
            .create_file_with_parents("a/x.txt", "x")
            .unwrap();
        assert_eq!(tree.file_count(), 3);

        let mount = MountTree::from_tree(&tree);
        assert_eq!(mount.len(), 2);
        assert_eq!(mount.names().collect::<Vec<_>>(), vec!["a", "b.txt"]);
        match mount.get("a") {
            Some(MountEntry::Directory(dir)) => assert_eq!(
                dir.get("x.txt"),
                Some(&MountEntry::File {
                    contents: "x".to_string()
                })
            ),
            other => panic!("expected directory, got {:?}", other),
        }
    }

    fn demo_tree() -> Tree {
        let mut files = FlatFiles::new();
        files.insert("index.html".into(), "<h1>hi</h1>".into());
        files.insert("js/main.js".into(), "console.log(1)".into());
        Tree::from_flat(&files, "demo")
    }

    #[test]
    fn test_mount_tree_shape() {
        let mount = MountTree::from_tree(&demo_tree());
        let json = serde_json::to_value(&mount).unwrap();
        assert_eq!(json["index.html"]["file"]["contents"], "<h1>hi</h1>");
        assert_eq!(
            json["js"]["directory"]["main.js"]["file"]["contents"],
            "console.log(1)"
        );
        let back: MountTree = serde_json::from_value(json).unwrap();
        assert_eq!(back, mount);
    }

    #[test]
    fn test_project_with_defaults_overrides() {
        let mut files = FlatFiles::new();
        files.insert("index.js".into(), "custom".into());
        files.insert("src/app.js".into(), "app".into());
        let mount = MountTree::project_with_defaults(&files);

        assert_eq!(
            mount.names().collect::<Vec<_>>(),
            vec!["package.json", "index.js", "README.md", "src"]
        );
        assert_eq!(
            mount.get("index.js"),
            Some(&MountEntry::File {
                contents: "custom".into()
            })
        );
    }

    #[test]
    fn test_lifecycle() {
        let sandbox = Sandbox::create();
        assert!(matches!(sandbox.read_file("a"), Err(ApiError::Sandbox(_))));

        sandbox.boot().unwrap();
        sandbox.boot().unwrap();
        assert_eq!(sandbox.state(), SandboxState::Booted);

        sandbox.mount(&MountTree::from_tree(&demo_tree())).unwrap();
        assert_eq!(
            sandbox.read_file("js/main.js").unwrap().as_deref(),
            Some("console.log(1)")
        );

        sandbox.write_file("js/util.js", "u").unwrap();
        let listing = sandbox.list_dir("js").unwrap();
        assert_eq!(listing.len(), 2);
        assert!(sandbox.write_file("missing/x.js", "").is_err());
        assert!(sandbox.write_file("js", "").is_err());

        let root = sandbox.list_dir(".").unwrap();
        assert_eq!(
            root,
            vec![
                DirEntry {
                    name: "index.html".into(),
                    is_directory: false
                },
                DirEntry {
                    name: "js".into(),
                    is_directory: true
                },
            ]
        );

        sandbox.reset().unwrap();
        assert!(sandbox.list_dir(".").unwrap().is_empty());
        assert_eq!(sandbox.read_file("index.html").unwrap(), None);

        sandbox.dispose();
        assert!(sandbox.boot().is_err());
        assert!(sandbox.list_dir(".").is_err());
    }
}
