//! Writes emitted files under the output directory.

use crate::codegen::EmittedFile;
use crate::generator_messages::generator_errors::GeneratorError;
use crate::return_file_error;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub struct WriteOptions {
    pub output_root: PathBuf,
}

/// Writes every file, creating the class directories as needed.
/// Stops at the first failure. Returns the number of files written.
pub fn write_generated_files(
    files: &[EmittedFile],
    options: &WriteOptions,
) -> Result<usize, GeneratorError> {
    // Validate everything first so a bad path never leaves a half-written tree
    for file in files {
        check_relative_path(&file.path)?;
    }

    if let Err(e) = fs::create_dir_all(&options.output_root) {
        return_file_error!(
            &options.output_root,
            format!("Could not create the output directory: {e}")
        )
    }

    for file in files {
        let full_path = options.output_root.join(&file.path);

        if let Some(parent) = full_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                return_file_error!(parent, format!("Could not create class directory: {e}"))
            }
        }

        if let Err(e) = fs::write(&full_path, &file.source) {
            return_file_error!(&full_path, format!("Error writing file: {e}"), {
                PrimarySuggestion => "Check that the output directory is writable",
            })
        }
    }

    Ok(files.len())
}

// Output paths must stay inside the output root
fn check_relative_path(path: &Path) -> Result<(), GeneratorError> {
    if path.as_os_str().is_empty() {
        return_file_error!(path, "Generated file did not have a path set")
    }

    for component in path.components() {
        match component {
            Component::Normal(_) => {}
            _ => {
                return_file_error!(
                    path,
                    format!("Generated file path '{}' leaves the output directory", path.display())
                )
            }
        }
    }

    Ok(())
}
