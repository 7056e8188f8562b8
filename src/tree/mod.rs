//! Project tree model
//!
//! The nested file/folder representation of a project, its conversion to and
//! from the flat persisted form, and the path-addressed edits applied to it.

pub mod convert;
pub mod hasher;
pub mod mutate;
pub mod node;
pub mod path;

pub use convert::{build, flatten};
pub use hasher::{digest, digest_hex};
pub use mutate::{Location, Walk};
pub use node::{FileKey, FileNode, FolderKey, FolderNode, Target, Tree, TreeNode};
