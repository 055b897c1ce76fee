use crate::generator_messages::generator_errors::GeneratorError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const SCHEMA_FILE_NAME: &str = "extension_api.json";
pub const SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/godotengine/godot-headers/master/extension_api.json";
pub const CONFIG_FILE_NAME: &str = "bindgen.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "classdb";
pub const DEFAULT_BUILD_CONFIGURATION: &str = "float_64";
pub const DEFAULT_RUNTIME_PATH: &str = "crate::gd";

// Output file names inside the output directory
pub const CLASS_FILE_NAME: &str = "class.rs";
pub const INDEX_FILE_NAME: &str = "mod.rs";
pub const GLOBAL_ENUMS_FILE_NAME: &str = "enums.rs";
pub const UTILITY_FILE_NAME: &str = "utility.rs";

// Pseudo-class that owns utility functions in the ownership table
pub const GLOBAL_SCOPE_CLASS: &str = "@GlobalScope";

// Root class of every reference-counted engine class
pub const REF_COUNTED_ROOT: &str = "RefCounted";

// Most emitted class files land between 4 and 40 KiB
pub const CLASS_FILE_CAPACITY: usize = 16 * 1024;

/// Generator settings. Defaults match a run with no `bindgen.toml` present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub schema_path: PathBuf,
    pub schema_url: String,
    pub output_dir: PathBuf,
    pub build_configuration: String,

    // Module path the emitted code uses to reach the runtime support crate
    pub runtime_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            schema_path: PathBuf::from(SCHEMA_FILE_NAME),
            schema_url: String::from(SCHEMA_URL),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            build_configuration: String::from(DEFAULT_BUILD_CONFIGURATION),
            runtime_path: String::from(DEFAULT_RUNTIME_PATH),
        }
    }
}

// Shape of bindgen.toml. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    schema_path: Option<PathBuf>,
    schema_url: Option<String>,
    output_dir: Option<PathBuf>,
    build_configuration: Option<String>,
    runtime_path: Option<String>,
}

impl Config {
    /// Loads `bindgen.toml` from the given directory, falling back to defaults when it is absent.
    /// Relative paths in the file are resolved against that directory.
    pub fn load(dir: &Path) -> Result<Config, GeneratorError> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        let mut config = Config::default();
        config.schema_path = dir.join(SCHEMA_FILE_NAME);
        config.output_dir = dir.join(DEFAULT_OUTPUT_DIR);

        if !config_path.exists() {
            return Ok(config);
        }

        let source = match fs::read_to_string(&config_path) {
            Ok(source) => source,
            Err(e) => {
                return Err(GeneratorError::file_error(
                    &config_path,
                    format!("Could not read config file: {e}"),
                ));
            }
        };

        config.apply_toml(&source, dir, &config_path)?;
        Ok(config)
    }

    fn apply_toml(
        &mut self,
        source: &str,
        dir: &Path,
        config_path: &Path,
    ) -> Result<(), GeneratorError> {
        let file: ConfigFile = match toml::from_str(source) {
            Ok(file) => file,
            Err(e) => {
                return Err(GeneratorError::config_error(
                    format!("Invalid {CONFIG_FILE_NAME}: {e}"),
                    config_path,
                ));
            }
        };

        if let Some(path) = file.schema_path {
            self.schema_path = dir.join(path);
        }
        if let Some(url) = file.schema_url {
            self.schema_url = url;
        }
        if let Some(path) = file.output_dir {
            self.output_dir = dir.join(path);
        }
        if let Some(build_configuration) = file.build_configuration {
            self.build_configuration = build_configuration;
        }
        if let Some(runtime_path) = file.runtime_path {
            if runtime_path.trim().is_empty() {
                return Err(GeneratorError::config_error(
                    "runtime_path must name a module path such as 'crate::gd'",
                    config_path,
                ));
            }
            self.runtime_path = runtime_path;
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
