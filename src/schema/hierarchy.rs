//! Inheritance graph checks and walks.

use crate::generator_messages::generator_errors::{GeneratorError, SchemaLocation};
use crate::schema::model::Schema;
use crate::{return_rule_error, return_schema_error};
use rustc_hash::FxHashSet;

/// Tracks which classes are on the current DFS path
/// and which have been proven to reach a root.
struct InheritanceTracker<'a> {
    temp_mark: FxHashSet<&'a str>,
    visited: FxHashSet<&'a str>,
}

/// Refuses schemas whose class-to-parent edges contain a cycle or point at unknown classes.
/// Must run before anything walks `inherits`.
pub fn check_acyclic(schema: &Schema) -> Result<(), GeneratorError> {
    let mut tracker = InheritanceTracker {
        temp_mark: FxHashSet::default(),
        visited: FxHashSet::default(),
    };

    for class in &schema.classes {
        visit_class(schema, &class.name, &mut tracker)?;
    }

    Ok(())
}

fn visit_class<'a>(
    schema: &'a Schema,
    name: &'a str,
    tracker: &mut InheritanceTracker<'a>,
) -> Result<(), GeneratorError> {
    let mut path: Vec<&'a str> = Vec::new();
    let mut current = name;

    // Iterative walk; each class has at most one parent
    loop {
        if tracker.visited.contains(current) {
            break;
        }

        if tracker.temp_mark.contains(current) {
            let start = path.iter().position(|step| *step == current).unwrap_or(0);
            let mut cycle = path[start..].to_vec();
            cycle.push(current);

            return_rule_error!(
                Cycle,
                format!("Inheritance cycle detected: {}", cycle.join(" -> ")),
                SchemaLocation::class(current),
                {
                    GenerationStage => "Inheritance Check",
                    PrimarySuggestion => "A class may not inherit from itself, directly or through its ancestors",
                }
            )
        }

        let Some(class) = schema.class(current) else {
            let child = path.last().copied().unwrap_or(name);
            return_schema_error!(
                format!("'{child}' inherits from unknown class '{current}'"),
                SchemaLocation::class(child),
                { GenerationStage => "Inheritance Check" }
            )
        };

        tracker.temp_mark.insert(current);
        path.push(current);

        if class.is_root() {
            break;
        }

        current = class.inherits.as_str();
    }

    for step in path {
        tracker.temp_mark.remove(step);
        tracker.visited.insert(step);
    }

    Ok(())
}

/// Ancestors of `name`, nearest first, ending at the root. Empty for roots and unknown classes.
/// Bounded by the class count so it terminates even on unchecked input.
pub fn ancestors<'a>(schema: &'a Schema, name: &str) -> Vec<&'a str> {
    let mut chain = Vec::new();
    let Some(mut class) = schema.class(name) else {
        return chain;
    };

    while !class.is_root() && chain.len() < schema.classes.len() {
        match schema.class(&class.inherits) {
            Some(parent) => {
                chain.push(parent.name.as_str());
                class = parent;
            }
            None => break,
        }
    }

    chain
}

/// True when the class is reference-counted: flagged so in the schema,
/// or inheriting (transitively) from `ref_counted_root`.
pub fn is_ref_counted(schema: &Schema, name: &str, ref_counted_root: &str) -> bool {
    let Some(class) = schema.class(name) else {
        return false;
    };

    class.is_ref_counted
        || name == ref_counted_root
        || ancestors(schema, name).contains(&ref_counted_root)
}

#[cfg(test)]
#[path = "tests/hierarchy_tests.rs"]
mod tests;
