//! Conversion between the flat persisted form and the nested tree.
//!
//! `flatten(&build(m, root)) == m` for every map whose keys are well-formed
//! relative paths. Folders without file descendants have no flat form and are
//! dropped by `flatten`.

use super::node::{FileNode, FolderNode, TreeNode, Tree};
use super::path::{join, split_file_name, split_raw};
use crate::types::FlatFiles;
use tracing::debug;

/// Build a tree from `(path, content)` entries, in iteration order.
///
/// Every segment but the last names a folder, reused when a sibling folder of
/// that name already exists. Segments are taken verbatim: no `.`/`..`
/// handling, and a leading `/` yields an empty-named folder.
pub fn build<I, K, V>(entries: I, root_name: &str) -> Tree
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut root = FolderNode::new(root_name);
    let mut count = 0usize;

    for (path, content) in entries {
        let segments = split_raw(path.as_ref());
        let (leaf, folders) = match segments.split_last() {
            Some(split) => split,
            None => continue,
        };

        let mut current = &mut root;
        for folder_name in folders {
            current = descend_or_create(current, folder_name);
        }

        let (name, extension) = split_file_name(leaf);
        let content = content.into();
        match current.file_mut(&name, &extension) {
            Some(existing) => existing.content = content,
            None => current
                .children
                .push(TreeNode::File(FileNode::new(name, extension, content))),
        }
        count += 1;
    }

    debug!(root = root_name, entries = count, "Built tree from flat files");
    Tree::from_root(root)
}

fn descend_or_create<'a>(folder: &'a mut FolderNode, name: &str) -> &'a mut FolderNode {
    let idx = match folder
        .children
        .iter()
        .position(|c| matches!(c, TreeNode::Folder(f) if f.name == name))
    {
        Some(idx) => idx,
        None => {
            folder.children.push(TreeNode::Folder(FolderNode::new(name)));
            folder.children.len() - 1
        }
    };
    match &mut folder.children[idx] {
        TreeNode::Folder(child) => child,
        TreeNode::File(_) => unreachable!("index points at a folder"),
    }
}

/// Flatten a tree into `path -> content`, pre-order.
pub fn flatten(tree: &Tree) -> FlatFiles {
    let mut files = FlatFiles::new();
    flatten_into(tree.children(), "", &mut files);
    files
}

fn flatten_into(children: &[TreeNode], base: &str, out: &mut FlatFiles) {
    for child in children {
        match child {
            TreeNode::File(file) => {
                out.insert(join(base, &file.display_name()), file.content.clone());
            }
            TreeNode::Folder(folder) => {
                flatten_into(&folder.children, &join(base, &folder.name), out);
            }
        }
    }
}

impl Tree {
    /// Convenience for [`build`] over a [`FlatFiles`] map.
    pub fn from_flat(files: &FlatFiles, root_name: &str) -> Tree {
        build(files.iter().map(|(k, v)| (k.as_str(), v.as_str())), root_name)
    }

    /// Convenience for [`flatten`].
    pub fn to_flat(&self) -> FlatFiles {
        flatten(self)
    }
}
