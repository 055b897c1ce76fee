use crate::generator_messages::generator_errors::SchemaLocation;
use saying::say;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorWarning {
    pub msg: String,
    pub location: SchemaLocation,
    pub warning_kind: WarningKind,
}

impl GeneratorWarning {
    pub fn new(msg: impl Into<String>, location: SchemaLocation, warning_kind: WarningKind) -> Self {
        GeneratorWarning {
            msg: msg.into(),
            location,
            warning_kind,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarningKind {
    // Ownership table entry with no matching class, method or parameter in the schema
    UnusedOwnershipEntry,

    // Ownership table entry that only restates the ref-counted default
    RedundantOwnershipEntry,

    // Relocation whose source method is gone from the schema
    StaleRelocation,

    // Constant redirect whose class or prefix matches nothing
    StaleConstantRedirect,

    // Default value literal the instance layer could not express
    UnparsedDefaultValue,
}

pub fn print_formatted_warning(w: GeneratorWarning) {
    say!(Yellow Bold "WARNING: ");
    if !w.location.is_empty() {
        say!(Dark Magenta w.location.to_string());
    }

    match w.warning_kind {
        WarningKind::UnusedOwnershipEntry => {
            say!("Unused ownership entry '", w.msg, "'");
        }
        WarningKind::RedundantOwnershipEntry => {
            say!("Redundant ownership entry '", w.msg, "'");
        }
        WarningKind::StaleRelocation => {
            say!("Stale relocation '", w.msg, "'");
        }
        WarningKind::StaleConstantRedirect => {
            say!("Stale constant redirect '", w.msg, "'");
        }
        WarningKind::UnparsedDefaultValue => {
            say!("Default value kept as a parameter '", w.msg, "'");
        }
    }
}
