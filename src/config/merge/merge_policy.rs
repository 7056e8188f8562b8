//! Defaults applied beneath every source.

use crate::scan::DEFAULT_MAX_FILE_SIZE;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with the scalar defaults. Section structs fill in the rest
/// through their serde defaults.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("scan.max_file_size", DEFAULT_MAX_FILE_SIZE)?
        .set_default("templates.default_template", "nextjs")?
        .set_default("logging.level", "info")
}
