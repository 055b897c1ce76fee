//! Tests for the generate and audit pipelines and the output writer.

use super::*;
use crate::build_system::file_output::{WriteOptions, write_generated_files};
use crate::rules::ownership::Ownership;
use crate::schema::test_support::{MINI_API, mini_schema};
use crate::settings::SCHEMA_FILE_NAME;
use std::fs;
use std::path::{Path, PathBuf};

const FOO_BAR_API: &str = r#"{
    "classes": [{
        "name": "Foo",
        "methods": [{
            "name": "bar",
            "hash": 1,
            "return_value": { "type": "Foo" },
            "arguments": [{ "name": "x", "type": "Foo" }]
        }]
    }],
    "builtin_classes": [],
    "global_enums": [],
    "utility_functions": []
}"#;

fn project_with(schema_source: &str) -> (tempfile::TempDir, Config) {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    fs::write(dir.path().join(SCHEMA_FILE_NAME), schema_source).expect("schema should be written");
    let config = Config::load(dir.path()).expect("config should load");
    (dir, config)
}

fn builtin_rules() -> Rules {
    Rules::builtin().expect("builtin rules should build")
}

fn file(path: &str, source: &str) -> EmittedFile {
    EmittedFile {
        path: PathBuf::from(path),
        source: source.to_owned(),
        warnings: Vec::new(),
    }
}

#[test]
fn generate_writes_one_directory_per_class() {
    let (_dir, config) = project_with(MINI_API);

    let messages = generate(&config, &builtin_rules(), &[Flag::DisableTimers]);
    assert!(!messages.has_errors(), "{:?}", messages.errors);

    let out = &config.output_dir;
    for shared in ["mod.rs", "enums.rs", "utility.rs"] {
        assert!(out.join(shared).is_file(), "{shared}");
    }

    let schema = mini_schema();
    for class in &schema.classes {
        assert!(out.join(&class.name).join("class.rs").is_file(), "{}", class.name);
    }

    let class_dirs = fs::read_dir(out)
        .expect("output dir should be readable")
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .count();
    assert_eq!(class_dirs, schema.classes.len());
}

#[test]
fn emitted_tree_keeps_schema_order() {
    let (_dir, config) = project_with(MINI_API);
    let rules = builtin_rules();
    let (schema, _) = prepare_schema(&config, &rules).expect("schema should prepare");

    let tree = emit_tree(&schema, &rules, &config).expect("tree should emit");
    let paths = tree
        .files
        .iter()
        .map(|file| file.path.to_string_lossy().into_owned())
        .collect::<Vec<_>>();

    let mut expected = schema
        .classes
        .iter()
        .map(|class| format!("{}/class.rs", class.name))
        .collect::<Vec<_>>();
    expected.extend(["mod.rs", "enums.rs", "utility.rs"].map(String::from));
    assert_eq!(paths, expected);
}

#[test]
fn parallel_emission_is_deterministic() {
    let (_dir, config) = project_with(MINI_API);
    let rules = builtin_rules();
    let (schema, _) = prepare_schema(&config, &rules).expect("schema should prepare");

    let first = emit_tree(&schema, &rules, &config).expect("first run should emit");
    let second = emit_tree(&schema, &rules, &config).expect("second run should emit");

    assert_eq!(first.files.len(), second.files.len());
    for (a, b) in first.files.iter().zip(&second.files) {
        assert_eq!(a.path, b.path);
        assert_eq!(a.source, b.source, "{}", a.path.display());
    }
}

#[test]
fn unresolved_ownership_writes_nothing() {
    let (_dir, config) = project_with(FOO_BAR_API);

    let messages = generate(&config, &Rules::empty(), &[Flag::DisableTimers]);

    assert_eq!(messages.errors.len(), 1);
    let error = &messages.errors[0];
    assert_eq!(error.error_type, ErrorType::UnresolvedOwnership);
    assert!(error.msg.contains("Foo.bar"));
    assert!(error.msg.contains("Foo::bar(x?)Foo?"));
    assert_eq!(error.location.class.as_deref(), Some("Foo"));
    assert_eq!(error.location.member.as_deref(), Some("bar"));
    assert!(!config.output_dir.exists());
}

#[test]
fn every_unresolved_method_is_reported() {
    let (_dir, config) = project_with(MINI_API);

    let messages = generate(&config, &Rules::empty(), &[Flag::DisableTimers]);

    assert!(messages.errors.len() > 1);
    assert!(
        messages
            .errors
            .iter()
            .all(|error| error.error_type == ErrorType::UnresolvedOwnership)
    );
    assert!(messages.errors.iter().any(|error| error.msg.contains("Node.add_child")));
    assert!(!config.output_dir.exists());
}

#[test]
fn no_output_files_flag_checks_without_writing() {
    let (_dir, config) = project_with(MINI_API);

    let messages = generate(&config, &builtin_rules(), &[Flag::NoOutputFiles, Flag::DisableTimers]);

    assert!(!messages.has_errors(), "{:?}", messages.errors);
    assert!(!config.output_dir.exists());
}

#[test]
fn cyclic_schemas_are_rejected_before_emission() {
    let (_dir, config) = project_with(
        r#"{
            "classes": [
                { "name": "A", "inherits": "B" },
                { "name": "B", "inherits": "A" }
            ],
            "builtin_classes": [],
            "global_enums": [],
            "utility_functions": []
        }"#,
    );

    let messages = generate(&config, &Rules::empty(), &[Flag::DisableTimers]);

    assert_eq!(messages.errors.len(), 1);
    assert_eq!(messages.errors[0].error_type, ErrorType::Cycle);
    assert!(!config.output_dir.exists());
}

#[test]
fn stale_table_entries_warn_during_generate() {
    let (_dir, config) = project_with(MINI_API);
    let rules = builtin_rules()
        .with_ownership("Node", "vanished", "node", Ownership::OwnershipTransferred)
        .expect("entry should insert");

    let messages = generate(&config, &rules, &[Flag::NoOutputFiles, Flag::DisableTimers]);

    assert!(!messages.has_errors(), "{:?}", messages.errors);
    assert!(messages.warnings.iter().any(|warning| {
        warning.warning_kind == WarningKind::UnusedOwnershipEntry && warning.msg.contains("vanished")
    }));
}

#[test]
fn audit_turns_stale_entries_into_errors() {
    let (_dir, config) = project_with(FOO_BAR_API);
    let rules = Rules::empty()
        .with_ownership("Foo", "bar", "x", Ownership::IsTemporaryReference)
        .expect("entry should insert")
        .with_ownership("Foo", "bar", "return value", Ownership::OwnershipTransferred)
        .expect("entry should insert")
        .with_ownership("Foo", "baz", "return value", Ownership::OwnershipTransferred)
        .expect("entry should insert");

    let messages = audit(&config, &rules);

    assert_eq!(messages.errors.len(), 1);
    let error = &messages.errors[0];
    assert_eq!(error.error_type, ErrorType::UnusedOwnershipEntry);
    assert!(error.msg.contains("baz"));
    assert_eq!(
        error.metadata.get(&ErrorMetaDataKey::GenerationStage).map(String::as_str),
        Some("Audit")
    );
}

#[test]
fn audit_is_clean_when_the_table_matches() {
    let (_dir, config) = project_with(FOO_BAR_API);
    let rules = Rules::empty()
        .with_ownership("Foo", "bar", "x", Ownership::IsTemporaryReference)
        .expect("entry should insert")
        .with_ownership("Foo", "bar", "return value", Ownership::OwnershipTransferred)
        .expect("entry should insert");

    let messages = audit(&config, &rules);
    assert!(messages.errors.is_empty(), "{:?}", messages.errors);
}

#[test]
fn audit_reports_stale_relocations() {
    let (_dir, config) = project_with(MINI_API);
    let rules = Rules::empty().with_relocation("OS", "no_such_method", "Input");

    let messages = audit(&config, &rules);

    assert!(
        messages
            .errors
            .iter()
            .any(|error| error.error_type == ErrorType::Relocation && error.msg.contains("no_such_method"))
    );
}

#[test]
fn writer_creates_class_directories() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let root = dir.path().join("classdb");
    let files = [file("Node/class.rs", "// node\n"), file("mod.rs", "// index\n")];

    let written = write_generated_files(&files, &WriteOptions { output_root: root.clone() })
        .expect("writer should succeed");

    assert_eq!(written, 2);
    assert_eq!(
        fs::read_to_string(root.join("Node/class.rs")).expect("class file should be readable"),
        "// node\n"
    );
    assert!(root.join("mod.rs").is_file());
}

#[test]
fn writer_rejects_paths_outside_the_output_root() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let root = dir.path().join("classdb");

    for bad in ["/tmp/absolute.rs", "../escape.rs", "Node/../../escape.rs", ""] {
        let files = [file("Node/class.rs", "// node\n"), file(bad, "x")];
        let error = write_generated_files(&files, &WriteOptions { output_root: root.clone() })
            .expect_err("invalid output path should be rejected");
        assert_eq!(error.error_type, ErrorType::File, "{bad}");
    }

    // Nothing was written before the bad path was found
    assert!(!Path::new(&root).join("Node/class.rs").exists());
}
