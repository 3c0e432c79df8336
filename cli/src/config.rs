use std::path::{Path, PathBuf};

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Configuration for the CLI.
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Configuration for the `compile` command.
    pub codegen: CodeGenConfig,
}

/// Configuration for the `compile` command.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CodeGenConfig {
    /// Prepended to the prefix declared in the rule file for naming the
    /// generated files.
    pub file_prefix: String,
    /// Use `state++` for transitions to the next state.
    pub increments: bool,
    /// Directory where the generated files are written. If not set, they
    /// are written in the directory of the rule file.
    pub output_dir: Option<PathBuf>,
}

impl Default for CodeGenConfig {
    fn default() -> CodeGenConfig {
        CodeGenConfig {
            file_prefix: "lex_".to_string(),
            increments: true,
            output_dir: None,
        }
    }
}

/// Load a config file from a given path. Path must contain a valid TOML file
/// or this function will propagate the error.
pub fn load_config_from_file(
    config_file: &Path,
) -> Result<Config, Box<figment::Error>> {
    let config: Config =
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file_exact(config_file))
            .extract()?;
    Ok(config)
}
