//! Core types shared across the crate.

use indexmap::IndexMap;

/// Flat persisted form of a project: `/`-joined relative path -> file content.
///
/// Insertion order is kept so that building a tree from it is deterministic.
pub type FlatFiles = IndexMap<String, String>;

/// TreeDigest: blake3 hash of a tree's structure and contents
pub type TreeDigest = [u8; 32];
