//! Static side tables driving generation, bundled into one immutable `Rules` value.
//!
//! `Rules::builtin()` carries the compiled-in tables. Tests build synthetic rule sets from
//! `Rules::empty()` and the `with_*` builders.

pub mod ownership;
pub(crate) mod ownership_table;
pub(crate) mod reserved_words;
pub mod rewrites;

use crate::generator_messages::generator_errors::GeneratorError;
use crate::rules::ownership::{Ownership, OwnershipKey, OwnershipTable, RETURN_VALUE};
use crate::rules::rewrites::{
    CONSTANT_REDIRECTS, ConstantRedirect, ConstantTarget, ENUM_RENAMES, EnumRename,
    METHOD_RELOCATIONS, MethodRelocation,
};
use crate::settings::REF_COUNTED_ROOT;
use rustc_hash::FxHashMap;

/// Replaces a generic dictionary at one method position with a named record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructableOverride {
    pub class: String,
    pub method: String,
    pub position: String,
    pub record: String,
}

const STRUCTABLES: &[(&str, &str, &str, &str)] = &[
    ("Time", "get_datetime_dict_from_system", RETURN_VALUE, "DatetimeDict"),
    ("Time", "get_datetime_dict_from_unix_time", RETURN_VALUE, "DatetimeDict"),
    ("Time", "get_date_dict_from_system", RETURN_VALUE, "DateDict"),
    ("Time", "get_date_dict_from_unix_time", RETURN_VALUE, "DateDict"),
    ("Time", "get_time_dict_from_system", RETURN_VALUE, "TimeDict"),
    ("Time", "get_time_dict_from_unix_time", RETURN_VALUE, "TimeDict"),
    ("Time", "get_time_zone_from_system", RETURN_VALUE, "TimeZone"),
    ("Time", "get_unix_time_from_datetime_dict", "datetime", "DatetimeDict"),
    ("Time", "get_datetime_string_from_datetime_dict", "datetime", "DatetimeDict"),
    ("Engine", "get_version_info", RETURN_VALUE, "VersionInfo"),
    ("Engine", "get_author_info", RETURN_VALUE, "AuthorInfo"),
    ("OS", "get_memory_info", RETURN_VALUE, "MemoryInfo"),
];

#[derive(Debug, Clone)]
pub struct Rules {
    pub ownership: OwnershipTable,
    pub relocations: Vec<MethodRelocation>,
    pub enum_renames: Vec<EnumRename>,
    pub constant_redirects: Vec<ConstantRedirect>,
    pub structables: Vec<StructableOverride>,
    pub reserved_parameters: FxHashMap<String, String>,
    pub method_renames: FxHashMap<String, String>,
    pub keywords: Vec<String>,
    pub ref_counted_root: String,
}

impl Rules {
    /// The compiled-in tables.
    pub fn builtin() -> Result<Rules, GeneratorError> {
        let ownership = OwnershipTable::from_entries(
            ownership_table::OWNERSHIP_TABLE
                .iter()
                .map(|(class, method, position, ownership)| {
                    (OwnershipKey::new(class, method, position), *ownership)
                }),
        )?;

        let mut rules = Rules::empty();
        rules.ownership = ownership;

        rules.relocations = METHOD_RELOCATIONS
            .iter()
            .map(|(from_class, method, to_class)| MethodRelocation {
                from_class: from_class.to_string(),
                method: method.to_string(),
                to_class: to_class.to_string(),
            })
            .collect();

        rules.enum_renames = ENUM_RENAMES
            .iter()
            .map(|(from, to)| EnumRename {
                from: from.to_string(),
                to: to.to_string(),
            })
            .collect();

        rules.constant_redirects = CONSTANT_REDIRECTS
            .iter()
            .map(|(class, prefix, target)| ConstantRedirect {
                class: class.to_string(),
                prefix: prefix.to_string(),
                target: match target {
                    Some(module) => ConstantTarget::Scope(module.to_string()),
                    None => ConstantTarget::Drop,
                },
            })
            .collect();

        rules.structables = STRUCTABLES
            .iter()
            .map(|(class, method, position, record)| StructableOverride {
                class: class.to_string(),
                method: method.to_string(),
                position: position.to_string(),
                record: record.to_string(),
            })
            .collect();

        Ok(rules)
    }

    /// Naming tables only. No ownership entries, rewrites, redirects or structables.
    pub fn empty() -> Rules {
        Rules {
            ownership: OwnershipTable::default(),
            relocations: Vec::new(),
            enum_renames: Vec::new(),
            constant_redirects: Vec::new(),
            structables: Vec::new(),
            reserved_parameters: reserved_words::RESERVED_PARAMETERS
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            method_renames: reserved_words::METHOD_RENAMES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            keywords: reserved_words::RUST_KEYWORDS
                .iter()
                .map(|keyword| keyword.to_string())
                .collect(),
            ref_counted_root: String::from(REF_COUNTED_ROOT),
        }
    }

    pub fn with_ownership(
        mut self,
        class: &str,
        method: &str,
        position: &str,
        ownership: Ownership,
    ) -> Result<Rules, GeneratorError> {
        self.ownership
            .insert(OwnershipKey::new(class, method, position), ownership)?;
        Ok(self)
    }

    pub fn with_relocation(mut self, from_class: &str, method: &str, to_class: &str) -> Rules {
        self.relocations.push(MethodRelocation {
            from_class: from_class.to_owned(),
            method: method.to_owned(),
            to_class: to_class.to_owned(),
        });
        self
    }

    pub fn with_enum_rename(mut self, from: &str, to: &str) -> Rules {
        self.enum_renames.push(EnumRename {
            from: from.to_owned(),
            to: to.to_owned(),
        });
        self
    }

    pub fn with_constant_redirect(mut self, class: &str, prefix: &str, target: ConstantTarget) -> Rules {
        self.constant_redirects.push(ConstantRedirect {
            class: class.to_owned(),
            prefix: prefix.to_owned(),
            target,
        });
        self
    }

    pub fn with_structable(mut self, class: &str, method: &str, position: &str, record: &str) -> Rules {
        self.structables.push(StructableOverride {
            class: class.to_owned(),
            method: method.to_owned(),
            position: position.to_owned(),
            record: record.to_owned(),
        });
        self
    }

    pub fn structable(&self, class: &str, method: &str, position: &str) -> Option<&str> {
        self.structables
            .iter()
            .find(|structable| {
                structable.class == class
                    && structable.method == method
                    && structable.position == position
            })
            .map(|structable| structable.record.as_str())
    }

    pub fn is_keyword(&self, identifier: &str) -> bool {
        self.keywords.iter().any(|keyword| keyword == identifier)
    }
}

#[cfg(test)]
#[path = "tests/rules_tests.rs"]
mod tests;
