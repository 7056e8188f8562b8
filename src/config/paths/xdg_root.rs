//! XDG Base Directory utilities for per-workspace project data.

use crate::error::ApiError;
use std::path::{Path, PathBuf};

/// Get XDG data home directory
///
/// Returns `$XDG_DATA_HOME` if set, otherwise defaults to `$HOME/.local/share`
pub fn data_home() -> Option<PathBuf> {
    if let Ok(xdg_data_home) = std::env::var("XDG_DATA_HOME") {
        return Some(PathBuf::from(xdg_data_home));
    }

    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".local").join("share"))
}

/// Get the data directory for a specific workspace
///
/// Returns `$XDG_DATA_HOME/cotree/<workspace_path>/`, where the canonical
/// workspace path is mirrored as a directory structure.
pub fn workspace_data_dir(workspace_root: &Path) -> Result<PathBuf, ApiError> {
    let data_home = data_home().ok_or_else(|| {
        ApiError::ConfigError(
            "Could not determine XDG data home directory (HOME not set)".to_string(),
        )
    })?;

    let canonical = dunce::canonicalize(workspace_root).map_err(|e| {
        ApiError::ConfigError(format!("Failed to canonicalize workspace path: {}", e))
    })?;

    let mut data_dir = data_home.join("cotree");
    for component in canonical.components() {
        if let std::path::Component::Normal(name) = component {
            data_dir = data_dir.join(name);
        }
    }

    Ok(data_dir)
}

/// Get XDG config home directory
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise defaults to `$HOME/.config`
pub fn config_home() -> Result<PathBuf, ApiError> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config_home));
    }

    let home = std::env::var("HOME").map_err(|_| {
        ApiError::ConfigError(
            "Could not determine XDG config home directory (HOME not set)".to_string(),
        )
    })?;

    Ok(PathBuf::from(home).join(".config"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_workspace_data_dir_mirrors_path() {
        let temp = TempDir::new().unwrap();
        if let Ok(dir) = workspace_data_dir(temp.path()) {
            let canonical = dunce::canonicalize(temp.path()).unwrap();
            let leaf = canonical.file_name().unwrap();
            assert!(dir.ends_with(leaf));
            assert!(dir.components().any(|c| c.as_os_str() == "cotree"));
        }
    }

    #[test]
    fn test_workspace_data_dir_missing_workspace() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("does-not-exist");
        if data_home().is_some() {
            assert!(matches!(
                workspace_data_dir(&missing),
                Err(ApiError::ConfigError(_))
            ));
        }
    }
}
