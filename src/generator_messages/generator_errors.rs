use crate::generator_messages::generator_warnings::GeneratorWarning;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

// The final set of errors and warnings emitted from one generator run
#[derive(Debug, Default)]
pub struct GeneratorMessages {
    pub errors: Vec<GeneratorError>,
    pub warnings: Vec<GeneratorWarning>,
}

impl GeneratorMessages {
    pub fn new() -> Self {
        GeneratorMessages {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn from_error(error: GeneratorError) -> Self {
        GeneratorMessages {
            errors: vec![error],
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn extend(&mut self, other: GeneratorMessages) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// The place in the schema an error refers to.
///
/// Every field is optional so that whole-document errors (unreadable JSON, missing sections)
/// can share the type with errors pinned to a single method parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaLocation {
    pub file: Option<PathBuf>,
    pub class: Option<String>,
    pub member: Option<String>,
    pub parameter: Option<String>,
}

impl SchemaLocation {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        SchemaLocation {
            file: Some(path.into()),
            ..SchemaLocation::default()
        }
    }

    pub fn class(name: &str) -> Self {
        SchemaLocation {
            class: Some(name.to_owned()),
            ..SchemaLocation::default()
        }
    }

    pub fn member(class: &str, member: &str) -> Self {
        SchemaLocation {
            class: Some(class.to_owned()),
            member: Some(member.to_owned()),
            ..SchemaLocation::default()
        }
    }

    pub fn parameter(class: &str, member: &str, parameter: &str) -> Self {
        SchemaLocation {
            class: Some(class.to_owned()),
            member: Some(member.to_owned()),
            parameter: Some(parameter.to_owned()),
            file: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.class.is_none()
    }
}

impl fmt::Display for SchemaLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}", file.display())?;
            if self.class.is_some() {
                write!(f, ": ")?;
            }
        }

        if let Some(class) = &self.class {
            write!(f, "{class}")?;
        }

        if let Some(member) = &self.member {
            write!(f, "::{member}")?;
        }

        if let Some(parameter) = &self.parameter {
            write!(f, "({parameter})")?;
        }

        Ok(())
    }
}

#[derive(Debug, Eq, Hash, PartialEq, Clone, Copy)]
pub enum ErrorMetaDataKey {
    GenerationStage,

    // Optional suggestions
    PrimarySuggestion,
    AlternativeSuggestion,

    // Naming information
    ConflictingName,
    TargetIdentifier,

    // Type information
    ExpectedType,
    FoundType,
}

#[derive(Debug, Clone)]
pub struct GeneratorError {
    pub msg: String,
    pub location: SchemaLocation,
    pub error_type: ErrorType,

    // Structured details shown under the message
    pub metadata: HashMap<ErrorMetaDataKey, String>,
}

impl GeneratorError {
    pub fn new(msg: impl Into<String>, location: SchemaLocation, error_type: ErrorType) -> Self {
        GeneratorError {
            msg: msg.into(),
            location,
            error_type,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: ErrorMetaDataKey, value: impl Into<String>) -> Self {
        self.metadata.insert(key, value.into());
        self
    }

    pub fn schema_error(msg: impl Into<String>, location: SchemaLocation) -> Self {
        GeneratorError::new(msg, location, ErrorType::Schema)
    }

    pub fn file_error(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        GeneratorError::new(msg, SchemaLocation::file(path), ErrorType::File)
    }

    pub fn config_error(msg: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        GeneratorError::new(msg, SchemaLocation::file(path), ErrorType::Config)
    }

    /// Internal bug in the generator. Never caused by the schema alone.
    pub fn generator_error(msg: impl Into<String>) -> Self {
        GeneratorError::new(msg, SchemaLocation::default(), ErrorType::Generator)
    }
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", error_type_to_str(&self.error_type), self.msg)?;
        if !self.location.is_empty() {
            write!(f, " [{}]", self.location)?;
        }
        Ok(())
    }
}

impl std::error::Error for GeneratorError {}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ErrorType {
    Schema,
    UnresolvedOwnership,
    IdentifierCollision,
    Cycle,
    UnusedOwnershipEntry,
    Relocation,
    File,
    Config,
    Fetch,
    Generator,
}

pub fn error_type_to_str(e_type: &ErrorType) -> &'static str {
    match e_type {
        ErrorType::Schema => "Schema",
        ErrorType::UnresolvedOwnership => "Unresolved Ownership",
        ErrorType::IdentifierCollision => "Identifier Collision",
        ErrorType::Cycle => "Inheritance Cycle",
        ErrorType::UnusedOwnershipEntry => "Unused Ownership Entry",
        ErrorType::Relocation => "Relocation",
        ErrorType::File => "File",
        ErrorType::Config => "Config",
        ErrorType::Fetch => "Schema Download",
        ErrorType::Generator => "Generator Bug",
    }
}

/// Returns a new GeneratorError for malformed or incomplete schema input.
///
/// Usage:
/// `return_schema_error!("Missing 'classes' section", location, { PrimarySuggestion => "Regenerate extension_api.json" })`;
#[macro_export]
macro_rules! return_schema_error {
    ($msg:expr, $location:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::generator_messages::generator_errors::GeneratorError {
            msg: $msg.into(),
            location: $location,
            error_type: $crate::generator_messages::generator_errors::ErrorType::Schema,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $( map.insert($crate::generator_messages::generator_errors::ErrorMetaDataKey::$key, String::from($value)); )*
                map
            },
        })
    };
    ($msg:expr, $location:expr) => {
        return Err($crate::generator_messages::generator_errors::GeneratorError {
            msg: $msg.into(),
            location: $location,
            error_type: $crate::generator_messages::generator_errors::ErrorType::Schema,
            metadata: std::collections::HashMap::new(),
        })
    };
}

/// Returns a new GeneratorError of the given ErrorType variant.
///
/// Usage:
/// `return_rule_error!(Cycle, "Inheritance cycle through Foo", location, { PrimarySuggestion => "..." })`;
#[macro_export]
macro_rules! return_rule_error {
    ($kind:ident, $msg:expr, $location:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::generator_messages::generator_errors::GeneratorError {
            msg: $msg.into(),
            location: $location,
            error_type: $crate::generator_messages::generator_errors::ErrorType::$kind,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $( map.insert($crate::generator_messages::generator_errors::ErrorMetaDataKey::$key, String::from($value)); )*
                map
            },
        })
    };
    ($kind:ident, $msg:expr, $location:expr) => {
        return Err($crate::generator_messages::generator_errors::GeneratorError {
            msg: $msg.into(),
            location: $location,
            error_type: $crate::generator_messages::generator_errors::ErrorType::$kind,
            metadata: std::collections::HashMap::new(),
        })
    };
}

/// Returns a new GeneratorError for file system failures.
///
/// Usage:
/// `return_file_error!(path, "Could not write class file", { PrimarySuggestion => "Check permissions" })`;
#[macro_export]
macro_rules! return_file_error {
    ($path:expr, $msg:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::generator_messages::generator_errors::GeneratorError {
            msg: $msg.into(),
            location: $crate::generator_messages::generator_errors::SchemaLocation::file($path),
            error_type: $crate::generator_messages::generator_errors::ErrorType::File,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $( map.insert($crate::generator_messages::generator_errors::ErrorMetaDataKey::$key, String::from($value)); )*
                map
            },
        })
    };
    ($path:expr, $msg:expr) => {
        return Err($crate::generator_messages::generator_errors::GeneratorError {
            msg: $msg.into(),
            location: $crate::generator_messages::generator_errors::SchemaLocation::file($path),
            error_type: $crate::generator_messages::generator_errors::ErrorType::File,
            metadata: std::collections::HashMap::new(),
        })
    };
}

/// Returns a new GeneratorError for internal generator bugs.
#[macro_export]
macro_rules! return_generator_error {
    ($msg:expr) => {
        return Err($crate::generator_messages::generator_errors::GeneratorError::generator_error($msg))
    };
}
