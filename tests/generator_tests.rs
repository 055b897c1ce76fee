//! End-to-end runs of the generator on synthetic schemas written to a temp project directory.

use extension_bindgen::build_system::Flag;
use extension_bindgen::build_system::build::{audit, generate};
use extension_bindgen::generator_messages::generator_errors::ErrorType;
use extension_bindgen::rules::Rules;
use extension_bindgen::rules::ownership::{Ownership, RETURN_VALUE};
use extension_bindgen::settings::{CONFIG_FILE_NAME, Config, SCHEMA_FILE_NAME};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const MINI_API: &str = include_str!("fixtures/mini_extension_api.json");

const FOO_BAR_API: &str = r#"{
    "header": { "version_full_name": "Test Engine v1.0" },
    "classes": [{
        "name": "Foo",
        "methods": [{
            "name": "bar",
            "hash": 42,
            "return_value": { "type": "Foo" },
            "arguments": [{ "name": "x", "type": "Foo" }]
        }]
    }],
    "builtin_classes": [],
    "global_enums": [{
        "name": "Animal",
        "values": [{ "name": "Cat", "value": 0 }, { "name": "Dog", "value": 1 }]
    }],
    "utility_functions": []
}"#;

const QUIET: &[Flag] = &[Flag::DisableTimers, Flag::DisableWarnings];

fn project(schema_source: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    fs::write(dir.path().join(SCHEMA_FILE_NAME), schema_source).expect("schema should be written");
    dir
}

fn foo_bar_rules() -> Rules {
    Rules::empty()
        .with_ownership("Foo", "bar", "x", Ownership::IsTemporaryReference)
        .and_then(|rules| rules.with_ownership("Foo", "bar", RETURN_VALUE, Ownership::OwnershipTransferred))
        .expect("entries should insert")
}

// Every file under `root`, keyed by its relative path
fn read_tree(root: &Path) -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).expect("directory should be readable") {
            let path = entry.expect("entry should be readable").path();
            if path.is_dir() {
                pending.push(path);
            } else {
                let relative = path
                    .strip_prefix(root)
                    .expect("path should be under the root")
                    .to_string_lossy()
                    .into_owned();
                files.insert(relative, fs::read_to_string(&path).expect("file should be readable"));
            }
        }
    }

    files
}

#[test]
fn generates_the_fixture_tree() {
    let dir = project(MINI_API);
    let config = Config::load(dir.path()).expect("config should load");
    let rules = Rules::builtin().expect("builtin rules should build");

    let messages = generate(&config, &rules, QUIET);
    assert!(!messages.has_errors(), "{:?}", messages.errors);

    let tree = read_tree(&config.output_dir);
    assert!(tree.contains_key("mod.rs"));
    assert!(tree.contains_key("enums.rs"));
    assert!(tree.contains_key("utility.rs"));
    assert!(tree.contains_key("Node/class.rs"));
    assert!(tree.contains_key("AudioStreamPlayer3D/class.rs"));

    let index = &tree["mod.rs"];
    for class_file in tree.keys().filter(|path| path.ends_with("/class.rs")) {
        assert!(index.contains(&format!("#[path = \"{class_file}\"]")), "{class_file}");
    }
}

#[test]
fn two_runs_write_identical_trees() {
    let rules = Rules::builtin().expect("builtin rules should build");

    let first = project(MINI_API);
    let first_config = Config::load(first.path()).expect("config should load");
    assert!(!generate(&first_config, &rules, QUIET).has_errors());

    let second = project(MINI_API);
    let second_config = Config::load(second.path()).expect("config should load");
    assert!(!generate(&second_config, &rules, QUIET).has_errors());

    assert_eq!(read_tree(&first_config.output_dir), read_tree(&second_config.output_dir));
}

#[test]
fn foo_bar_without_entries_fails_and_writes_nothing() {
    let dir = project(FOO_BAR_API);
    let config = Config::load(dir.path()).expect("config should load");

    let messages = generate(&config, &Rules::empty(), QUIET);

    assert_eq!(messages.errors.len(), 1);
    let error = &messages.errors[0];
    assert_eq!(error.error_type, ErrorType::UnresolvedOwnership);
    assert!(error.msg.contains("Foo.bar"));
    assert_eq!(error.location.parameter.as_deref(), Some("x, return value"));
    assert!(!config.output_dir.exists());
}

#[test]
fn foo_bar_borrows_x_and_transfers_the_return() {
    let dir = project(FOO_BAR_API);
    let config = Config::load(dir.path()).expect("config should load");

    let messages = generate(&config, &foo_bar_rules(), QUIET);
    assert!(!messages.has_errors(), "{:?}", messages.errors);

    let tree = read_tree(&config.output_dir);
    let foo = &tree["Foo/class.rs"];
    assert!(foo.starts_with("// Generated by gdbindgen from Test Engine v1.0. Do not edit.\n"));
    assert!(foo.contains("(\"Foo\", \"bar\", 42),"));
    assert!(foo.contains("pub fn bar(&self, x: &Foo) -> Foo {"));
    assert!(foo.contains("frame.arg(gd::pointers::get(x.object()));"));
    assert!(foo.contains("Foo::from_object(gd::Object::owned(r_ret))"));
    assert!(!foo.contains("x.into_object()"));

    let enums = &tree["enums.rs"];
    assert!(enums.contains("pub const Cat: Animal = Animal(0);"));
    assert!(enums.contains("pub const Dog: Animal = Animal(1);"));
}

#[test]
fn cyclic_inheritance_is_rejected() {
    let dir = project(
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
    let config = Config::load(dir.path()).expect("config should load");

    let messages = generate(&config, &Rules::empty(), QUIET);

    assert_eq!(messages.errors.len(), 1);
    assert_eq!(messages.errors[0].error_type, ErrorType::Cycle);
}

#[test]
fn missing_sections_are_schema_errors() {
    let dir = project(r#"{ "classes": [], "builtin_classes": [], "global_enums": [] }"#);
    let config = Config::load(dir.path()).expect("config should load");

    let messages = generate(&config, &Rules::empty(), QUIET);

    assert_eq!(messages.errors.len(), 1);
    assert_eq!(messages.errors[0].error_type, ErrorType::Schema);
    assert!(messages.errors[0].msg.contains("utility_functions"));
}

#[test]
fn config_file_redirects_output_and_runtime() {
    let dir = project(FOO_BAR_API);
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "output_dir = \"src/generated\"\nruntime_path = \"godot_runtime\"\n",
    )
    .expect("config should be written");
    let config = Config::load(dir.path()).expect("config should load");

    let messages = generate(&config, &foo_bar_rules(), QUIET);
    assert!(!messages.has_errors(), "{:?}", messages.errors);

    let class_file = dir.path().join("src/generated/Foo/class.rs");
    let source = fs::read_to_string(class_file).expect("class file should be written");
    assert!(source.contains("use godot_runtime as gd;"));
}

#[test]
fn unknown_build_configuration_is_a_schema_error() {
    let dir = project(MINI_API);
    fs::write(dir.path().join(CONFIG_FILE_NAME), "build_configuration = \"float_128\"\n")
        .expect("config should be written");
    let config = Config::load(dir.path()).expect("config should load");

    let messages = generate(&config, &Rules::builtin().expect("builtin rules should build"), QUIET);

    assert_eq!(messages.errors.len(), 1);
    assert_eq!(messages.errors[0].error_type, ErrorType::Schema);
    assert!(messages.errors[0].msg.contains("float_128"));
}

#[test]
fn audit_flags_entries_for_methods_that_are_gone() {
    let dir = project(FOO_BAR_API);
    let config = Config::load(dir.path()).expect("config should load");
    let rules = foo_bar_rules()
        .with_ownership("Foo", "removed", "arg", Ownership::IsTemporaryReference)
        .expect("entry should insert");

    let messages = audit(&config, &rules);

    assert_eq!(messages.errors.len(), 1);
    assert_eq!(messages.errors[0].error_type, ErrorType::UnusedOwnershipEntry);
    assert!(!config.output_dir.exists());
}
