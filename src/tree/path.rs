//! Path grammar for project trees.
//!
//! A path is the `/`-joined sequence of folder names below the root followed by
//! the leaf's display name (`name.extension` for files, `name` for folders).

/// Split a leaf file name into `(name, extension)` on the last `.`.
///
/// The dot only separates when it is neither the first nor the last character,
/// so `.env` and `notes.` are names with an empty extension and
/// `join_file_name` restores them exactly.
pub fn split_file_name(leaf: &str) -> (String, String) {
    match leaf.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < leaf.len() => {
            (leaf[..idx].to_string(), leaf[idx + 1..].to_string())
        }
        _ => (leaf.to_string(), String::new()),
    }
}

/// Inverse of [`split_file_name`].
pub fn join_file_name(name: &str, extension: &str) -> String {
    if extension.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", name, extension)
    }
}

/// Append a child segment to a parent path; the root is the empty path.
pub fn join(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{}/{}", parent, child)
    }
}

/// Raw `/` split used by the flat-map converter. Empty segments are kept.
pub fn split_raw(path: &str) -> Vec<&str> {
    path.split('/').collect()
}

/// Segments of a caller-supplied folder path, with empty segments dropped so
/// that `""`, `"js/"` and `"/js"` address the root and `js` respectively.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Split a full path into `(parent_path, leaf)`.
pub fn split_parent(path: &str) -> (String, &str) {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => (segments(&trimmed[..idx]).join("/"), &trimmed[idx + 1..]),
        None => (String::new(), trimmed),
    }
}
