//! Structural digest of a project tree

use super::node::{Tree, TreeNode};
use crate::types::TreeDigest;

const FILE_TAG: u8 = b'f';
const FOLDER_TAG: u8 = b'd';
const END_TAG: u8 = b'e';

/// Compute the digest of a tree
///
/// Covers names, extensions, contents and sibling order of every node below
/// the root. The root name is excluded so a renamed project hashes the same.
/// Strings are length-prefixed, so no two distinct trees share an encoding.
pub fn digest(tree: &Tree) -> TreeDigest {
    let mut hasher = blake3::Hasher::new();
    hash_children(&mut hasher, tree.children());
    *hasher.finalize().as_bytes()
}

/// Hex form of [`digest`], used for display
pub fn digest_hex(tree: &Tree) -> String {
    hex::encode(digest(tree))
}

fn hash_children(hasher: &mut blake3::Hasher, children: &[TreeNode]) {
    for child in children {
        match child {
            TreeNode::File(file) => {
                hasher.update(&[FILE_TAG]);
                hash_str(hasher, &file.name);
                hash_str(hasher, &file.extension);
                hash_str(hasher, &file.content);
            }
            TreeNode::Folder(folder) => {
                hasher.update(&[FOLDER_TAG]);
                hash_str(hasher, &folder.name);
                hash_children(hasher, &folder.children);
                hasher.update(&[END_TAG]);
            }
        }
    }
}

fn hash_str(hasher: &mut blake3::Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}
