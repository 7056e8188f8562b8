//! Tree Mutator
//!
//! Lookups and edits on a [`Tree`]. Every edit comes in two forms: an
//! `*_in_place` method on `&mut Tree`, and a copying method on `&Tree` that
//! clones, edits the clone and returns it, leaving the receiver valid for
//! comparison or undo. An edit that returns an error has not touched the tree.
//!
//! Key-based lookups (`locate`, `delete_file`, `rename_folder`, ...) take the
//! first pre-order match anywhere in the tree. Path-based lookups
//! (`locate_path`, `delete_at`, `rename_file_at`, ...) address exactly one node.

use super::node::{FileKey, FileNode, FolderKey, FolderNode, Target, Tree, TreeNode};
use super::path::{join, segments, split_file_name, split_parent};
use crate::error::TreeError;
use tracing::{debug, warn};

/// Result of a lookup: the node, the sibling list holding it, its index in
/// that list, and the `/`-joined path of the containing folder.
#[derive(Debug, Clone)]
pub struct Location<'a> {
    pub node: &'a TreeNode,
    pub siblings: &'a [TreeNode],
    pub index: usize,
    pub parent_path: String,
}

impl Location<'_> {
    /// Full path of the located node.
    pub fn path(&self) -> String {
        join(&self.parent_path, &self.node.display_name())
    }
}

/// Child indices from the root down to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Address {
    parents: Vec<usize>,
    index: usize,
    parent_path: String,
}

fn find_address(
    children: &[TreeNode],
    target: &Target,
    base: &str,
    parents: &mut Vec<usize>,
) -> Option<(usize, String)> {
    for (i, child) in children.iter().enumerate() {
        if child.matches(target) {
            return Some((i, base.to_string()));
        }
        if let TreeNode::Folder(folder) = child {
            parents.push(i);
            let found = find_address(&folder.children, target, &join(base, &folder.name), parents);
            if found.is_some() {
                return found;
            }
            parents.pop();
        }
    }
    None
}

fn validate_name(kind: &str, name: &str) -> Result<(), TreeError> {
    if name.trim().is_empty() {
        return Err(TreeError::InvalidInput(format!(
            "{} name cannot be empty",
            kind
        )));
    }
    if name.contains('/') {
        return Err(TreeError::InvalidInput(format!(
            "{} name '{}' cannot contain '/'",
            kind, name
        )));
    }
    Ok(())
}

impl Tree {
    fn with_copy<F>(&self, edit: F) -> Result<Tree, TreeError>
    where
        F: FnOnce(&mut Tree) -> Result<(), TreeError>,
    {
        let mut next = self.clone();
        edit(&mut next)?;
        Ok(next)
    }

    fn address_of(&self, target: &Target) -> Option<Address> {
        let mut parents = Vec::new();
        find_address(self.children(), target, "", &mut parents).map(|(index, parent_path)| {
            Address {
                parents,
                index,
                parent_path,
            }
        })
    }

    fn address_of_path(&self, path: &str) -> Result<Address, TreeError> {
        let parts = segments(path);
        let (leaf, folders) = parts
            .split_last()
            .ok_or_else(|| TreeError::InvalidInput("path cannot be empty".to_string()))?;

        let mut parents = Vec::with_capacity(folders.len());
        let mut folder = self.root();
        for name in folders {
            let idx = folder
                .position(&Target::Folder(FolderKey::new(*name)))
                .ok_or_else(|| TreeError::not_found(path))?;
            parents.push(idx);
            folder = match &folder.children[idx] {
                TreeNode::Folder(next) => next,
                TreeNode::File(_) => return Err(TreeError::not_found(path)),
            };
        }
        let index = folder
            .child_by_display_name(leaf)
            .ok_or_else(|| TreeError::not_found(path))?;

        Ok(Address {
            parents,
            index,
            parent_path: folders.join("/"),
        })
    }

    fn location(&self, address: Address) -> Option<Location<'_>> {
        let mut siblings = self.children();
        for &idx in &address.parents {
            siblings = &siblings.get(idx)?.as_folder()?.children;
        }
        Some(Location {
            node: siblings.get(address.index)?,
            siblings,
            index: address.index,
            parent_path: address.parent_path,
        })
    }

    fn folder_by_indices_mut(&mut self, indices: &[usize]) -> Option<&mut FolderNode> {
        let mut folder = self.root_mut();
        for &idx in indices {
            folder = match folder.children.get_mut(idx)? {
                TreeNode::Folder(next) => next,
                TreeNode::File(_) => return None,
            };
        }
        Some(folder)
    }

    fn folder_at(&self, folder_path: &str) -> Result<&FolderNode, TreeError> {
        let mut folder = self.root();
        for name in segments(folder_path) {
            folder = folder
                .folder(name)
                .ok_or_else(|| TreeError::not_found(folder_path))?;
        }
        Ok(folder)
    }

    fn folder_at_mut(&mut self, folder_path: &str) -> Result<&mut FolderNode, TreeError> {
        let mut folder = self.root_mut();
        for name in segments(folder_path) {
            folder = folder
                .folder_mut(name)
                .ok_or_else(|| TreeError::not_found(folder_path))?;
        }
        Ok(folder)
    }

    fn parent_mut(&mut self, address: &Address) -> Result<&mut FolderNode, TreeError> {
        self.folder_by_indices_mut(&address.parents)
            .ok_or_else(|| TreeError::not_found(address.parent_path.clone()))
    }

    // ---------------------------------------------------------------------
    // Lookups
    // ---------------------------------------------------------------------

    /// Find the first node matching `target` in pre-order over the whole tree.
    pub fn locate(&self, target: &Target) -> Option<Location<'_>> {
        let address = self.address_of(target)?;
        self.location(address)
    }

    /// Resolve a full `/`-joined display path to exactly one node.
    ///
    /// When a file without extension and a folder share a name, the folder wins.
    pub fn locate_path(&self, path: &str) -> Option<Location<'_>> {
        let address = self.address_of_path(path).ok()?;
        self.location(address)
    }

    pub fn contains(&self, target: &Target) -> bool {
        self.address_of(target).is_some()
    }

    /// The file at `path`.
    pub fn read_file(&self, path: &str) -> Result<&FileNode, TreeError> {
        let location = self
            .locate_path(path)
            .ok_or_else(|| TreeError::not_found(path))?;
        location
            .node
            .as_file()
            .ok_or_else(|| TreeError::InvalidInput(format!("'{}' is a folder", path)))
    }

    // ---------------------------------------------------------------------
    // Insert
    // ---------------------------------------------------------------------

    /// Append `node` to the folder at `parent_path` (empty for the root).
    ///
    /// The folder must already exist; no intermediate folders are created.
    pub fn insert_in_place(&mut self, parent_path: &str, node: TreeNode) -> Result<(), TreeError> {
        let checked = match &node {
            TreeNode::File(file) => validate_name("File", &file.name),
            TreeNode::Folder(folder) => validate_name("Folder", &folder.name),
        };
        if let Err(err) = checked {
            warn!(parent = parent_path, "Rejected insert with invalid name");
            return Err(err);
        }

        let node_display = node.display_name();
        let folder = match self.folder_at_mut(parent_path) {
            Ok(folder) => folder,
            Err(err) => {
                warn!(parent = parent_path, node = %node_display, "Insert target folder not found");
                return Err(err);
            }
        };
        if folder.display_clash(node.is_file(), &node_display, None).is_some() {
            warn!(parent = parent_path, node = %node_display, "Insert collides with a sibling");
            return Err(TreeError::AlreadyExists {
                path: join(parent_path.trim_matches('/'), &node_display),
            });
        }
        folder.children.push(node);
        debug!(parent = parent_path, node = %node_display, "Inserted node");
        Ok(())
    }

    pub fn insert_file_in_place(&mut self, parent_path: &str, file: FileNode) -> Result<(), TreeError> {
        self.insert_in_place(parent_path, TreeNode::File(file))
    }

    pub fn insert_folder_in_place(
        &mut self,
        parent_path: &str,
        folder: FolderNode,
    ) -> Result<(), TreeError> {
        self.insert_in_place(parent_path, TreeNode::Folder(folder))
    }

    pub fn insert_file(&self, parent_path: &str, file: FileNode) -> Result<Tree, TreeError> {
        self.with_copy(|tree| tree.insert_file_in_place(parent_path, file))
    }

    pub fn insert_folder(&self, parent_path: &str, folder: FolderNode) -> Result<Tree, TreeError> {
        self.with_copy(|tree| tree.insert_folder_in_place(parent_path, folder))
    }

    /// Create a file from its full path, e.g. `js/util.js`.
    pub fn create_file_at(&self, path: &str, content: impl Into<String>) -> Result<Tree, TreeError> {
        let (parent, leaf) = split_parent(path);
        self.insert_file(&parent, FileNode::from_file_name(leaf, content))
    }

    /// Create an empty folder from its full path, e.g. `src/components`.
    pub fn create_folder_at(&self, path: &str) -> Result<Tree, TreeError> {
        let (parent, leaf) = split_parent(path);
        self.insert_folder(&parent, FolderNode::new(leaf))
    }

    /// Walk `folder_path` from the root, creating each missing folder.
    pub fn ensure_folder_in_place(&mut self, folder_path: &str) -> Result<(), TreeError> {
        let mut walked = String::new();
        let mut folder = self.root_mut();
        for name in segments(folder_path) {
            if let Err(err) = validate_name("Folder", name) {
                warn!(path = folder_path, "Rejected folder path");
                return Err(err);
            }
            walked = join(&walked, name);
            if folder.folder(name).is_none() {
                folder.children.push(TreeNode::Folder(FolderNode::new(name)));
                debug!(folder = %walked, "Created missing folder");
            }
            folder = folder
                .folder_mut(name)
                .ok_or_else(|| TreeError::not_found(walked.clone()))?;
        }
        Ok(())
    }

    /// Like [`Tree::create_file_at`], creating missing parent folders first.
    pub fn create_file_with_parents(
        &self,
        path: &str,
        content: impl Into<String>,
    ) -> Result<Tree, TreeError> {
        let (parent, leaf) = split_parent(path);
        let file = FileNode::from_file_name(leaf, content);
        self.with_copy(|tree| {
            tree.ensure_folder_in_place(&parent)?;
            tree.insert_file_in_place(&parent, file)
        })
    }

    /// Like [`Tree::create_folder_at`], creating missing parent folders first.
    pub fn create_folder_with_parents(&self, path: &str) -> Result<Tree, TreeError> {
        let (parent, leaf) = split_parent(path);
        self.with_copy(|tree| {
            tree.ensure_folder_in_place(&parent)?;
            tree.insert_folder_in_place(&parent, FolderNode::new(leaf))
        })
    }

    // ---------------------------------------------------------------------
    // Delete
    // ---------------------------------------------------------------------

    fn remove_at_address(&mut self, address: &Address) -> Result<TreeNode, TreeError> {
        let index = address.index;
        let parent = self.parent_mut(address)?;
        if index >= parent.children.len() {
            return Err(TreeError::not_found(address.parent_path.clone()));
        }
        Ok(parent.children.remove(index))
    }

    /// Remove the first pre-order match of `target`, with its whole subtree.
    pub fn delete_in_place(&mut self, target: &Target) -> Result<TreeNode, TreeError> {
        if target.display_name().trim().is_empty() {
            return Err(TreeError::InvalidInput("delete target has no name".to_string()));
        }
        let address = match self.address_of(target) {
            Some(address) => address,
            None => {
                warn!(target = %target.display_name(), "Delete target not found");
                return Err(TreeError::not_found(target.display_name()));
            }
        };
        let removed = self.remove_at_address(&address)?;
        debug!(
            node = %removed.display_name(),
            parent = %address.parent_path,
            index = address.index,
            "Deleted node"
        );
        Ok(removed)
    }

    pub fn delete_file(&self, file: &FileKey) -> Result<Tree, TreeError> {
        self.with_copy(|tree| tree.delete_in_place(&Target::File(file.clone())).map(|_| ()))
    }

    pub fn delete_folder(&self, folder: &FolderKey) -> Result<Tree, TreeError> {
        self.with_copy(|tree| {
            tree.delete_in_place(&Target::Folder(folder.clone()))
                .map(|_| ())
        })
    }

    /// Remove exactly the node at `path`.
    pub fn delete_at_in_place(&mut self, path: &str) -> Result<TreeNode, TreeError> {
        let address = self.address_of_path(path).map_err(|err| {
            warn!(path, "Delete target not found");
            err
        })?;
        let removed = self.remove_at_address(&address)?;
        debug!(path, "Deleted node");
        Ok(removed)
    }

    pub fn delete_at(&self, path: &str) -> Result<Tree, TreeError> {
        self.with_copy(|tree| tree.delete_at_in_place(path).map(|_| ()))
    }

    // ---------------------------------------------------------------------
    // Rename
    // ---------------------------------------------------------------------

    fn rename_at_address(&mut self, address: &Address, new_target: Target) -> Result<(), TreeError> {
        let index = address.index;
        let parent_path = address.parent_path.clone();
        let parent = self.parent_mut(address)?;

        if parent.position(&new_target) == Some(index) {
            debug!(node = %new_target.display_name(), "Rename to current name, nothing to do");
            return Ok(());
        }
        let is_file = matches!(new_target, Target::File(_));
        let new_display = new_target.display_name();
        if parent.display_clash(is_file, &new_display, Some(index)).is_some() {
            warn!(parent = %parent_path, to = %new_display, "Rename collides with a sibling");
            return Err(TreeError::AlreadyExists {
                path: join(&parent_path, &new_display),
            });
        }

        let node = parent
            .children
            .get_mut(index)
            .ok_or_else(|| TreeError::not_found(parent_path.clone()))?;
        let old = node.display_name();
        match (node, &new_target) {
            (TreeNode::File(file), Target::File(key)) => {
                file.name = key.name.clone();
                file.extension = key.extension.clone();
            }
            (TreeNode::Folder(folder), Target::Folder(key)) => {
                folder.name = key.name.clone();
            }
            _ => {
                return Err(TreeError::InvalidInput(
                    "cannot rename a file to a folder or a folder to a file".to_string(),
                ))
            }
        }
        debug!(
            from = %old,
            to = %new_target.display_name(),
            parent = %parent_path,
            "Renamed node"
        );
        Ok(())
    }

    fn file_rename_target(new_name: &str, new_extension: &str) -> Result<Target, TreeError> {
        let name = new_name.trim();
        let extension = new_extension.trim();
        if let Err(err) = validate_name("File", name) {
            warn!(name = new_name, "Rejected file rename");
            return Err(err);
        }
        if extension.contains('/') {
            return Err(TreeError::InvalidInput(format!(
                "extension '{}' cannot contain '/'",
                extension
            )));
        }
        Ok(Target::File(FileKey::new(name, extension)))
    }

    fn folder_rename_target(new_name: &str) -> Result<Target, TreeError> {
        let name = new_name.trim();
        if let Err(err) = validate_name("Folder", name) {
            warn!(name = new_name, "Rejected folder rename");
            return Err(err);
        }
        Ok(Target::Folder(FolderKey::new(name)))
    }

    pub fn rename_file_in_place(
        &mut self,
        file: &FileKey,
        new_name: &str,
        new_extension: &str,
    ) -> Result<(), TreeError> {
        let new_target = Self::file_rename_target(new_name, new_extension)?;
        let target = Target::File(file.clone());
        let address = self.address_of(&target).ok_or_else(|| {
            warn!(target = %target.display_name(), "Rename target not found");
            TreeError::not_found(target.display_name())
        })?;
        self.rename_at_address(&address, new_target)
    }

    pub fn rename_folder_in_place(&mut self, folder: &FolderKey, new_name: &str) -> Result<(), TreeError> {
        let new_target = Self::folder_rename_target(new_name)?;
        let target = Target::Folder(folder.clone());
        let address = self.address_of(&target).ok_or_else(|| {
            warn!(target = %target.display_name(), "Rename target not found");
            TreeError::not_found(target.display_name())
        })?;
        self.rename_at_address(&address, new_target)
    }

    pub fn rename_file(
        &self,
        file: &FileKey,
        new_name: &str,
        new_extension: &str,
    ) -> Result<Tree, TreeError> {
        self.with_copy(|tree| tree.rename_file_in_place(file, new_name, new_extension))
    }

    pub fn rename_folder(&self, folder: &FolderKey, new_name: &str) -> Result<Tree, TreeError> {
        self.with_copy(|tree| tree.rename_folder_in_place(folder, new_name))
    }

    pub fn rename_file_at(
        &self,
        path: &str,
        new_name: &str,
        new_extension: &str,
    ) -> Result<Tree, TreeError> {
        let new_target = Self::file_rename_target(new_name, new_extension)?;
        self.with_copy(|tree| {
            let address = tree.address_of_path(path)?;
            tree.rename_at_address(&address, new_target)
        })
    }

    pub fn rename_folder_at(&self, path: &str, new_name: &str) -> Result<Tree, TreeError> {
        let new_target = Self::folder_rename_target(new_name)?;
        self.with_copy(|tree| {
            let address = tree.address_of_path(path)?;
            tree.rename_at_address(&address, new_target)
        })
    }

    /// Rename the node at `path` to the display name `new_leaf`; files are
    /// split into name and extension on the last `.`.
    pub fn rename_at(&self, path: &str, new_leaf: &str) -> Result<Tree, TreeError> {
        let location = self
            .locate_path(path)
            .ok_or_else(|| TreeError::not_found(path))?;
        if location.node.is_file() {
            let (name, extension) = split_file_name(new_leaf.trim());
            self.rename_file_at(path, &name, &extension)
        } else {
            self.rename_folder_at(path, new_leaf)
        }
    }

    // ---------------------------------------------------------------------
    // Content and move
    // ---------------------------------------------------------------------

    pub fn write_file_in_place(&mut self, path: &str, content: impl Into<String>) -> Result<(), TreeError> {
        let address = self.address_of_path(path).map_err(|err| {
            warn!(path, "Write target not found");
            err
        })?;
        let index = address.index;
        let parent = self.parent_mut(&address)?;
        match parent.children.get_mut(index) {
            Some(TreeNode::File(file)) => {
                file.content = content.into();
                debug!(path, bytes = file.content.len(), "Updated file content");
                Ok(())
            }
            Some(TreeNode::Folder(_)) => {
                warn!(path, "Rejected write to a folder");
                Err(TreeError::InvalidInput(format!("'{}' is a folder", path)))
            }
            None => Err(TreeError::not_found(path)),
        }
    }

    pub fn write_file(&self, path: &str, content: impl Into<String>) -> Result<Tree, TreeError> {
        self.with_copy(|tree| tree.write_file_in_place(path, content))
    }

    /// Move the node at `from` into the folder at `to_parent`.
    pub fn move_in_place(&mut self, from: &str, to_parent: &str) -> Result<(), TreeError> {
        let address = self.address_of_path(from).map_err(|err| {
            warn!(from, "Move source not found");
            err
        })?;
        let dest_key = segments(to_parent).join("/");
        let source_path = segments(from).join("/");

        let node = self
            .location(address.clone())
            .map(|l| l.node)
            .ok_or_else(|| TreeError::not_found(from))?;
        let is_file = node.is_file();
        let node_display = node.display_name();

        if !is_file
            && (dest_key == source_path || dest_key.starts_with(&format!("{}/", source_path)))
        {
            warn!(from = %source_path, to = %dest_key, "Rejected move into itself");
            return Err(TreeError::InvalidMove {
                from: source_path,
                to: dest_key,
            });
        }
        if dest_key == address.parent_path {
            debug!(from, to = to_parent, "Move within the same folder, nothing to do");
            return Ok(());
        }

        let destination = self.folder_at(&dest_key).map_err(|err| {
            warn!(to = %dest_key, "Move destination not found");
            err
        })?;
        if destination.display_clash(is_file, &node_display, None).is_some() {
            warn!(to = %dest_key, node = %node_display, "Move collides with a sibling");
            return Err(TreeError::AlreadyExists {
                path: join(&dest_key, &node_display),
            });
        }

        let moved = self.remove_at_address(&address)?;
        self.folder_at_mut(&dest_key)?.children.push(moved);
        debug!(from, to = %dest_key, "Moved node");
        Ok(())
    }

    pub fn move_node(&self, from: &str, to_parent: &str) -> Result<Tree, TreeError> {
        self.with_copy(|tree| tree.move_in_place(from, to_parent))
    }

    /// Like [`Tree::move_node`], creating the destination folder path first.
    pub fn move_node_with_parents(&self, from: &str, to_parent: &str) -> Result<Tree, TreeError> {
        self.with_copy(|tree| {
            tree.ensure_folder_in_place(to_parent)?;
            tree.move_in_place(from, to_parent)
        })
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Pre-order walk yielding each node with its full path.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self
                .children()
                .iter()
                .rev()
                .map(|child| (child.display_name(), child))
                .collect(),
        }
    }

    pub fn file_count(&self) -> usize {
        self.walk().filter(|(_, node)| node.is_file()).count()
    }

    pub fn folder_count(&self) -> usize {
        self.walk().filter(|(_, node)| node.is_folder()).count()
    }

    /// Sum of file content lengths in bytes.
    pub fn total_bytes(&self) -> usize {
        self.walk()
            .filter_map(|(_, node)| node.as_file())
            .map(|file| file.content.len())
            .sum()
    }
}

/// Iterator returned by [`Tree::walk`].
pub struct Walk<'a> {
    stack: Vec<(String, &'a TreeNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (String, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        if let TreeNode::Folder(folder) = node {
            for child in folder.children.iter().rev() {
                self.stack.push((join(&path, &child.display_name()), child));
            }
        }
        Some((path, node))
    }
}
