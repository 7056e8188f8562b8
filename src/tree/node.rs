//! Project tree node types
//!
//! A tree is a root folder owning its children by value: no sharing, no parent
//! pointers, no cycles. The serialized shape is the one template files and
//! editors exchange (`filename`/`fileExtension`/`content`, `folderName`/`items`).

use super::path::{join_file_name, split_file_name};
use serde::{Deserialize, Serialize};

/// File node representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    /// Name without the extension
    #[serde(rename = "filename")]
    pub name: String,
    #[serde(rename = "fileExtension", default)]
    pub extension: String,
    #[serde(default)]
    pub content: String,
}

impl FileNode {
    pub fn new(
        name: impl Into<String>,
        extension: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            content: content.into(),
        }
    }

    /// Build a file node from a leaf name such as `main.js`.
    pub fn from_file_name(leaf: &str, content: impl Into<String>) -> Self {
        let (name, extension) = split_file_name(leaf);
        Self {
            name,
            extension,
            content: content.into(),
        }
    }

    pub fn display_name(&self) -> String {
        join_file_name(&self.name, &self.extension)
    }

    pub fn key(&self) -> FileKey {
        FileKey {
            name: self.name.clone(),
            extension: self.extension.clone(),
        }
    }
}

/// Folder node representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    #[serde(rename = "folderName")]
    pub name: String,
    /// Insertion order; meaningful for display only
    #[serde(rename = "items", default)]
    pub children: Vec<TreeNode>,
}

impl FolderNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    pub fn key(&self) -> FolderKey {
        FolderKey {
            name: self.name.clone(),
        }
    }

    pub fn folder(&self, name: &str) -> Option<&FolderNode> {
        self.children.iter().find_map(|child| match child {
            TreeNode::Folder(folder) if folder.name == name => Some(folder),
            _ => None,
        })
    }

    pub fn folder_mut(&mut self, name: &str) -> Option<&mut FolderNode> {
        self.children.iter_mut().find_map(|child| match child {
            TreeNode::Folder(folder) if folder.name == name => Some(folder),
            _ => None,
        })
    }

    pub fn file_mut(&mut self, name: &str, extension: &str) -> Option<&mut FileNode> {
        self.children.iter_mut().find_map(|child| match child {
            TreeNode::File(file) if file.name == name && file.extension == extension => {
                Some(file)
            }
            _ => None,
        })
    }

    /// Index of the direct child matching `target`, if any.
    pub fn position(&self, target: &Target) -> Option<usize> {
        self.children.iter().position(|child| child.matches(target))
    }

    /// Index of a direct child of the same kind as `is_file` whose display
    /// name is `display`, skipping the child at `skip`.
    ///
    /// Files compare by their joined `name.extension`, so `("a.b", "")` and
    /// `("a", "b")` are the same entry.
    pub fn display_clash(&self, is_file: bool, display: &str, skip: Option<usize>) -> Option<usize> {
        self.children.iter().enumerate().position(|(i, child)| {
            Some(i) != skip && child.is_file() == is_file && child.display_name() == display
        })
    }

    /// Child lookup by display name. Folders win over files of the same name.
    pub fn child_by_display_name(&self, leaf: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|c| matches!(c, TreeNode::Folder(f) if f.name == leaf))
            .or_else(|| {
                self.children
                    .iter()
                    .position(|c| matches!(c, TreeNode::File(f) if f.display_name() == leaf))
            })
    }
}

/// Project tree node: exactly a file or a folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    File(FileNode),
    Folder(FolderNode),
}

impl TreeNode {
    pub fn display_name(&self) -> String {
        match self {
            TreeNode::File(file) => file.display_name(),
            TreeNode::Folder(folder) => folder.name.clone(),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, TreeNode::File(_))
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, TreeNode::Folder(_))
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            TreeNode::File(file) => Some(file),
            TreeNode::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&FolderNode> {
        match self {
            TreeNode::Folder(folder) => Some(folder),
            TreeNode::File(_) => None,
        }
    }

    pub fn as_folder_mut(&mut self) -> Option<&mut FolderNode> {
        match self {
            TreeNode::Folder(folder) => Some(folder),
            TreeNode::File(_) => None,
        }
    }

    /// Key comparison; the variant is part of the key.
    pub fn matches(&self, target: &Target) -> bool {
        match (self, target) {
            (TreeNode::File(file), Target::File(key)) => {
                file.name == key.name && file.extension == key.extension
            }
            (TreeNode::Folder(folder), Target::Folder(key)) => folder.name == key.name,
            _ => false,
        }
    }

    pub fn target(&self) -> Target {
        match self {
            TreeNode::File(file) => Target::File(file.key()),
            TreeNode::Folder(folder) => Target::Folder(folder.key()),
        }
    }
}

impl From<FileNode> for TreeNode {
    fn from(file: FileNode) -> Self {
        TreeNode::File(file)
    }
}

impl From<FolderNode> for TreeNode {
    fn from(folder: FolderNode) -> Self {
        TreeNode::Folder(folder)
    }
}

/// Identity of a file among its siblings
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileKey {
    pub name: String,
    pub extension: String,
}

impl FileKey {
    pub fn new(name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
        }
    }
}

/// Identity of a folder among its siblings
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderKey {
    pub name: String,
}

impl FolderKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Lookup target for key-based operations
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    File(FileKey),
    Folder(FolderKey),
}

impl Target {
    pub fn display_name(&self) -> String {
        match self {
            Target::File(key) => join_file_name(&key.name, &key.extension),
            Target::Folder(key) => key.name.clone(),
        }
    }
}

impl From<FileKey> for Target {
    fn from(key: FileKey) -> Self {
        Target::File(key)
    }
}

impl From<FolderKey> for Target {
    fn from(key: FolderKey) -> Self {
        Target::Folder(key)
    }
}

/// A project tree: the root folder, named after the project or template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    root: FolderNode,
}

impl Tree {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            root: FolderNode::new(name),
        }
    }

    pub fn from_root(root: FolderNode) -> Self {
        Self { root }
    }

    pub fn name(&self) -> &str {
        &self.root.name
    }

    pub fn root(&self) -> &FolderNode {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut FolderNode {
        &mut self.root
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.root.children
    }

    pub fn into_root(self) -> FolderNode {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }
}
