//! The generator pipeline: load, rewrite, check, emit, write.

use crate::build_system::Flag;
use crate::build_system::file_output::{WriteOptions, write_generated_files};
use crate::codegen::class_emitter::emit_class;
use crate::codegen::index_emitter::{emit_global_enums, emit_index, emit_utilities};
use crate::codegen::{EmitContext, EmittedFile};
use crate::generator_messages::generator_errors::{
    ErrorMetaDataKey, ErrorType, GeneratorError, GeneratorMessages,
};
use crate::generator_messages::generator_warnings::{GeneratorWarning, WarningKind};
use crate::rules::Rules;
use crate::rules::ownership::{audit_ownership_table, check_ownership_totality};
use crate::rules::rewrites::{apply_rewrites, audit_constant_redirects};
use crate::schema::hierarchy::check_acyclic;
use crate::schema::loader::load_schema;
use crate::schema::model::Schema;
use crate::settings::Config;
use crate::{ownership_log, schema_log, timer_log};
use rayon::prelude::*;
use saying::say;
use std::time::Instant;

/// Every file of one run, in write order: class files in schema order, then the index,
/// global enums and utilities.
pub struct GeneratedTree {
    pub files: Vec<EmittedFile>,
    pub warnings: Vec<GeneratorWarning>,
}

/// Loads the schema, rejects inheritance cycles and applies the rewrite tables.
/// Returns the rewritten schema and the warnings for rewrite entries that matched nothing.
pub fn prepare_schema(
    config: &Config,
    rules: &Rules,
) -> Result<(Schema, Vec<GeneratorWarning>), GeneratorError> {
    let time = Instant::now();
    let mut schema = load_schema(config)?;
    timer_log!(time, "Schema loaded in: ");
    schema_log!(
        "Loaded ",
        Blue schema.classes.len(),
        Reset " classes from ",
        config.schema_path.display().to_string()
    );

    check_acyclic(&schema)?;
    let warnings = apply_rewrites(&mut schema, rules)?;

    Ok((schema, warnings))
}

/// Emits the whole output tree in memory.
///
/// Ownership totality is checked first and every unresolved value is reported at once.
/// Class files are emitted in parallel; the collected order is the schema order, so the
/// result is identical to a sequential run.
pub fn emit_tree(
    schema: &Schema,
    rules: &Rules,
    config: &Config,
) -> Result<GeneratedTree, GeneratorMessages> {
    let mut messages = GeneratorMessages::new();

    let time = Instant::now();
    messages.errors = check_ownership_totality(schema, rules);
    timer_log!(time, "Ownership resolved in: ");
    if messages.has_errors() {
        ownership_log!(Red messages.errors.len(), Reset " unresolved ownership values");
        return Err(messages);
    }

    let context = EmitContext::new(schema, rules, &config.runtime_path);

    let time = Instant::now();
    let class_results = schema
        .classes
        .par_iter()
        .map(|class| emit_class(&context, class))
        .collect::<Vec<_>>();
    timer_log!(time, "Class files emitted in: ");

    let classes = schema.classes.iter().collect::<Vec<_>>();
    let shared_results = [
        emit_index(&context, &classes, &config.build_configuration),
        emit_global_enums(&context),
        emit_utilities(&context),
    ];

    let mut files = Vec::with_capacity(class_results.len() + shared_results.len());
    for result in class_results.into_iter().chain(shared_results) {
        match result {
            Ok(mut file) => {
                messages.warnings.append(&mut file.warnings);
                files.push(file);
            }
            Err(e) => messages.errors.push(e),
        }
    }

    if messages.has_errors() {
        return Err(messages);
    }

    Ok(GeneratedTree {
        files,
        warnings: messages.warnings,
    })
}

/// Ownership table entries and constant redirects that no longer match the schema.
pub fn staleness_findings(schema: &Schema, rules: &Rules) -> Vec<GeneratorWarning> {
    let mut findings = audit_ownership_table(schema, rules);
    findings.extend(audit_constant_redirects(schema, rules));
    findings
}

/// Runs the full generator and writes the output tree.
/// Nothing is written unless every check and every file succeeded.
pub fn generate(config: &Config, rules: &Rules, flags: &[Flag]) -> GeneratorMessages {
    let start = Instant::now();
    let mut messages = GeneratorMessages::new();

    say!("\nGenerating bindings");

    let (schema, rewrite_warnings) = match prepare_schema(config, rules) {
        Ok(prepared) => prepared,
        Err(e) => return GeneratorMessages::from_error(e),
    };
    messages.warnings.extend(rewrite_warnings);
    messages.warnings.extend(staleness_findings(&schema, rules));

    let tree = match emit_tree(&schema, rules, config) {
        Ok(tree) => tree,
        Err(emit_messages) => {
            messages.extend(emit_messages);
            return messages;
        }
    };
    messages.warnings.extend(tree.warnings);

    if flags.contains(&Flag::NoOutputFiles) {
        return messages;
    }

    let options = WriteOptions {
        output_root: config.output_dir.clone(),
    };

    match write_generated_files(&tree.files, &options) {
        Ok(count) => {
            let duration = start.elapsed();
            if flags.contains(&Flag::DisableTimers) {
                say!("\nGenerated ", Blue count, Reset " files successfully");
            } else {
                say!(
                    "\nGenerated ",
                    Blue count,
                    Reset " files successfully in: ",
                    Green Bold #duration
                );
            }
        }
        Err(e) => messages.errors.push(e),
    }

    messages
}

/// Checks the side tables against the schema without emitting anything.
/// Every finding is an error so the run fails in CI.
pub fn audit(config: &Config, rules: &Rules) -> GeneratorMessages {
    let mut messages = GeneratorMessages::new();

    say!("\nAuditing ownership table");

    let (schema, rewrite_warnings) = match prepare_schema(config, rules) {
        Ok(prepared) => prepared,
        Err(e) => return GeneratorMessages::from_error(e),
    };

    messages.errors = check_ownership_totality(&schema, rules);
    messages.errors.extend(
        rewrite_warnings
            .into_iter()
            .chain(staleness_findings(&schema, rules))
            .map(finding_to_error),
    );

    if messages.has_errors() {
        say!(
            "\nAudit found ",
            Red messages.errors.len(),
            Reset " problems in ",
            Blue rules.ownership.len(),
            Reset " ownership entries"
        );
    } else {
        say!(Green "\nAudit clean: ", Blue rules.ownership.len(), Reset " ownership entries");
    }

    messages
}

fn finding_to_error(finding: GeneratorWarning) -> GeneratorError {
    let error_type = match finding.warning_kind {
        WarningKind::UnusedOwnershipEntry | WarningKind::RedundantOwnershipEntry => {
            ErrorType::UnusedOwnershipEntry
        }
        WarningKind::StaleRelocation | WarningKind::StaleConstantRedirect => ErrorType::Relocation,
        WarningKind::UnparsedDefaultValue => ErrorType::Schema,
    };

    GeneratorError::new(finding.msg, finding.location, error_type)
        .with_metadata(ErrorMetaDataKey::GenerationStage, "Audit")
}

#[cfg(test)]
#[path = "tests/build_tests.rs"]
mod tests;
