//! Environment variable source: COTREE__* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Keys whose environment value is a comma-separated list.
const LIST_KEYS: [&str; 3] = [
    "scan.ignore_files",
    "scan.ignore_folders",
    "scan.ignore_patterns",
];

fn environment() -> Environment {
    LIST_KEYS.iter().fold(
        Environment::with_prefix("COTREE")
            .separator("__")
            .list_separator(",")
            .try_parsing(true),
        |env, key| env.with_list_parse_key(key),
    )
}

/// Add environment variable overlay to builder.
/// Uses COTREE prefix and __ as separator for nested keys, e.g.
/// `COTREE__SCAN__MAX_FILE_SIZE=2048`.
///
/// The scan ignore lists split on `,`, e.g.
/// `COTREE__SCAN__IGNORE_FOLDERS=docs,coverage`. An ignore pattern that
/// itself contains a comma has to be set in a config file.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(environment()))
}
