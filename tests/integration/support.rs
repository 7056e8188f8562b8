use cotree::config::{CotreeConfig, StorageConfig};
use cotree::store::MemoryProjectStore;
use cotree::tooling::cli::CliContext;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Write `files` (path -> content) under `root`, creating folders.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }
}

/// Context whose sled store lives inside the workspace.
pub fn sled_context(workspace: &Path) -> CliContext {
    let config = CotreeConfig {
        storage: StorageConfig {
            store_path: Some(".cotree/store".into()),
        },
        ..CotreeConfig::default()
    };
    CliContext::with_config(workspace.to_path_buf(), config)
}

pub fn memory_context(workspace: &Path) -> CliContext {
    CliContext::with_store(
        workspace.to_path_buf(),
        CotreeConfig::default(),
        Arc::new(MemoryProjectStore::new()),
    )
}
