//! StorageConfig and resolve_store_path for the project store.

use crate::config::xdg;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Project store location (relative to workspace root). Unset means the
    /// per-workspace XDG data directory.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the project store to an actual filesystem location.
    pub fn resolve_store_path(&self, workspace_root: &Path) -> Result<PathBuf, ApiError> {
        match &self.store_path {
            Some(path) => Ok(workspace_root.join(path)),
            None => Ok(xdg::workspace_data_dir(workspace_root)?.join("projects")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_store_path_is_workspace_relative() {
        let temp = TempDir::new().unwrap();
        let config = StorageConfig {
            store_path: Some(PathBuf::from(".cotree/store")),
        };
        assert_eq!(
            config.resolve_store_path(temp.path()).unwrap(),
            temp.path().join(".cotree/store")
        );
    }

    #[test]
    fn test_default_store_path_under_data_dir() {
        let temp = TempDir::new().unwrap();
        if let Ok(path) = StorageConfig::default().resolve_store_path(temp.path()) {
            assert!(path.ends_with("projects"));
        }
    }
}
