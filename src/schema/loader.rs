//! Reads `extension_api.json`, downloading and caching it first when no local copy exists.

use crate::generator_messages::generator_errors::{ErrorType, GeneratorError, SchemaLocation};
use crate::schema::api_json::ApiDocument;
use crate::schema::model::Schema;
use crate::settings::Config;
use crate::{return_file_error, return_rule_error, return_schema_error, schema_log};
use std::fs;
use std::path::Path;

// Sections the generator cannot work without
pub const REQUIRED_SECTIONS: [&str; 4] = [
    "classes",
    "builtin_classes",
    "global_enums",
    "utility_functions",
];

/// Loads the schema named by the config, fetching it once from `config.schema_url` if needed.
pub fn load_schema(config: &Config) -> Result<Schema, GeneratorError> {
    ensure_local_copy(&config.schema_path, &config.schema_url)?;

    let source = match fs::read_to_string(&config.schema_path) {
        Ok(source) => source,
        Err(e) => {
            return_file_error!(
                &config.schema_path,
                format!("Could not read the API schema: {e}"),
                { PrimarySuggestion => "Delete the file to download a fresh copy" }
            )
        }
    };

    parse_schema(&source, &config.schema_path, &config.build_configuration)
}

/// Parses the schema text. `path` is only used to label errors.
pub fn parse_schema(
    source: &str,
    path: &Path,
    build_configuration: &str,
) -> Result<Schema, GeneratorError> {
    let document: serde_json::Value = match serde_json::from_str(source) {
        Ok(value) => value,
        Err(e) => {
            return_schema_error!(
                format!("Schema is not valid JSON: {e}"),
                SchemaLocation::file(path),
                { GenerationStage => "Schema Loading" }
            )
        }
    };

    let Some(object) = document.as_object() else {
        return_schema_error!(
            "Schema root must be a JSON object",
            SchemaLocation::file(path),
            { GenerationStage => "Schema Loading" }
        )
    };

    for section in REQUIRED_SECTIONS {
        if !object.contains_key(section) {
            return_schema_error!(
                format!("Schema is missing the required '{section}' section"),
                SchemaLocation::file(path),
                {
                    GenerationStage => "Schema Loading",
                    PrimarySuggestion => "Regenerate the file with `godot --dump-extension-api`",
                }
            )
        }
    }

    let document: ApiDocument = match serde_json::from_value(document) {
        Ok(document) => document,
        Err(e) => {
            return_schema_error!(
                format!("Schema does not match the expected layout: {e}"),
                SchemaLocation::file(path),
                { GenerationStage => "Schema Loading" }
            )
        }
    };

    let builtin_sizes = select_builtin_sizes(&document, build_configuration, path)?;

    schema_log!(
        "Loaded schema ", Blue document.header.version_full_name.to_owned(), " with ",
        Green document.classes.len(), " classes"
    );

    Ok(Schema::from_document(document, builtin_sizes))
}

fn select_builtin_sizes(
    document: &ApiDocument,
    build_configuration: &str,
    path: &Path,
) -> Result<Vec<(String, u32)>, GeneratorError> {
    if document.builtin_class_sizes.is_empty() {
        return Ok(Vec::new());
    }

    match document
        .builtin_class_sizes
        .iter()
        .find(|sizes| sizes.build_configuration == build_configuration)
    {
        Some(sizes) => Ok(sizes
            .sizes
            .iter()
            .map(|size| (size.name.to_owned(), size.size))
            .collect()),
        None => {
            let known = document
                .builtin_class_sizes
                .iter()
                .map(|sizes| sizes.build_configuration.as_str())
                .collect::<Vec<_>>()
                .join(", ");

            return_schema_error!(
                format!("Schema has no builtin sizes for build configuration '{build_configuration}'"),
                SchemaLocation::file(path),
                {
                    GenerationStage => "Schema Loading",
                    PrimarySuggestion => format!("Set build_configuration to one of: {known}"),
                }
            )
        }
    }
}

/// Downloads the schema to `path` unless a copy is already there.
/// Returns true when a download happened.
pub fn ensure_local_copy(path: &Path, url: &str) -> Result<bool, GeneratorError> {
    if path.exists() {
        return Ok(false);
    }

    let bytes = fetch_schema(url)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = fs::create_dir_all(parent) {
                return_file_error!(parent, format!("Could not create schema directory: {e}"))
            }
        }
    }

    // Write beside the target, then rename, so a failed download never leaves a partial schema
    let partial_path = path.with_extension("json.partial");
    if let Err(e) = fs::write(&partial_path, &bytes) {
        return_file_error!(&partial_path, format!("Could not cache the API schema: {e}"))
    }

    if let Err(e) = fs::rename(&partial_path, path) {
        let _ = fs::remove_file(&partial_path);
        return_file_error!(path, format!("Could not cache the API schema: {e}"))
    }

    Ok(true)
}

fn fetch_schema(url: &str) -> Result<Vec<u8>, GeneratorError> {
    let response = match reqwest::blocking::get(url) {
        Ok(response) => response,
        Err(e) => {
            return_rule_error!(Fetch, format!("{url}: {e}"), SchemaLocation::default(), {
                PrimarySuggestion => "Place extension_api.json in the working directory to skip the download",
            })
        }
    };

    let response = match response.error_for_status() {
        Ok(response) => response,
        Err(e) => {
            return Err(GeneratorError::new(
                format!("{url}: {e}"),
                SchemaLocation::default(),
                ErrorType::Fetch,
            ));
        }
    };

    match response.bytes() {
        Ok(bytes) => Ok(bytes.to_vec()),
        Err(e) => Err(GeneratorError::new(
            format!("{url}: {e}"),
            SchemaLocation::default(),
            ErrorType::Fetch,
        )),
    }
}

#[cfg(test)]
#[path = "tests/loader_tests.rs"]
mod tests;
