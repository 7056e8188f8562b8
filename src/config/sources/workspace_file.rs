//! Workspace config file source: `<workspace>/cotree.toml`

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::Path;

/// Workspace config file name
pub const WORKSPACE_CONFIG_FILE: &str = "cotree.toml";

/// Add the workspace config file, if one exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        File::from(workspace_root.join(WORKSPACE_CONFIG_FILE))
            .format(FileFormat::Toml)
            .required(false),
    ))
}
