//! Tests for whole class files.

use super::*;
use crate::generator_messages::generator_errors::ErrorType;
use crate::rules::Rules;
use crate::rules::rewrites::apply_rewrites;
use crate::schema::model::{EnumDescriptor, EnumValue, Schema};
use crate::schema::test_support::{class, method, mini_schema};
use std::path::Path;

fn builtin_schema() -> (Schema, Rules) {
    let mut schema = mini_schema();
    let rules = Rules::builtin().expect("builtin rules should build");
    apply_rewrites(&mut schema, &rules).expect("rewrites should apply");
    (schema, rules)
}

fn emitted(schema: &Schema, rules: &Rules, class_name: &str) -> Result<EmittedFile, GeneratorError> {
    let context = EmitContext::new(schema, rules, "crate::gd");
    let class = schema.class(class_name).expect("class should exist");
    emit_class(&context, class)
}

#[test]
fn node_file_has_every_section() {
    let (schema, rules) = builtin_schema();
    let file = emitted(&schema, &rules, "Node").expect("Node should emit");
    let source = &file.source;

    assert_eq!(file.path, Path::new("Node/class.rs"));
    assert!(file.warnings.is_empty());
    assert!(source.starts_with("// Generated by gdbindgen from Godot Engine v4.2.1.stable.official. Do not edit.\n"));
    assert!(source.contains("use crate::gd as gd;"));

    assert!(source.contains("static BINDS: gd::MethodTable<13> = gd::MethodTable::new(&["));
    assert!(source.contains("(\"Node\", \"add_child\", 3863233950),"));

    assert!(source.contains("/// Handle to an engine `Node`. Inherits `Object`."));
    assert!(source.contains("pub struct Node(gd::Object);"));
    assert!(source.contains("pub const CLASS: &'static str = \"Node\";"));
    assert!(source.contains("pub fn as_object(&self) -> &super::Object {"));
    assert!(source.contains("unsafe { &*(self as *const Self).cast::<super::Object>() }"));
    assert!(source.contains("pub fn as_object(&self) -> &super::object::Instance {"));

    assert!(source.contains("pub struct Instance(pub Node);"));
    assert!(source.contains("pub fn name(&self) -> gd::Name {"));
    assert!(source.contains("pub fn on_child_entered_tree(&self, callable: gd::Callable, flags: i64) {"));
    assert!(source.contains("pub fn get_tree(&self) -> super::scene_tree::Instance {"));

    // Property accessors replace their backing methods on the instance layer
    assert!(source.contains("pub fn get_name(&self) -> gd::StringName {"));
    assert!(!source.contains("pub fn get_name(&self) -> gd::Name"));

    assert!(source.contains("pub struct Virtuals;"));
    assert!(source.contains(
        "pub fn input<T>(implementation: fn(&mut T, super::InputEvent)) -> gd::sys::VirtualThunk<T> {"
    ));
    assert!(source.contains("p_ret.set(ret.into_raw());"));

    assert!(source.contains(
        "registry.register::<Instance>(\"Node\", \"Object\", |object| Instance(Node::from_object(object)));"
    ));
    assert!(source.contains("pub struct ProcessMode(pub i64);"));
    assert!(source.contains("pub mod notification {"));
    assert!(!source.contains("singleton_object"));
}

#[test]
fn sections_come_in_a_fixed_order() {
    let (schema, rules) = builtin_schema();
    let file = emitted(&schema, &rules, "Node").expect("Node should emit");
    let source = &file.source;

    let markers = [
        "static BINDS",
        "pub struct Node(",
        "pub struct Instance(",
        "pub struct Virtuals;",
        "pub fn register(",
        "pub struct ProcessMode(",
        "pub mod notification",
    ];
    let positions = markers
        .iter()
        .map(|marker| source.find(marker).expect("marker should be present"))
        .collect::<Vec<_>>();

    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn root_classes_register_without_a_parent() {
    let (schema, rules) = builtin_schema();
    let file = emitted(&schema, &rules, "Object").expect("Object should emit");

    assert!(file.source.contains("/// Handle to an engine `Object`.\n"));
    assert!(file.source.contains("registry.register::<Instance>(\"Object\", \"\", |object|"));
    assert!(!file.source.contains("pub fn as_"));
    assert!(file.source.contains("pub const POSTINITIALIZE: i64 = 0;"));
    assert!(!file.source.contains("PREDELETE"));
}

#[test]
fn singletons_expose_their_object() {
    let (schema, rules) = builtin_schema();
    let file = emitted(&schema, &rules, "OS").expect("OS should emit");
    let source = &file.source;

    assert!(source.contains("pub fn singleton() -> Self {\n        Instance(OS::from_object(singleton_object().clone()))"));
    assert!(source.contains("pub(crate) fn singleton_object() -> &'static gd::Object {"));
    assert!(source.contains("SINGLETON.get_or_init(|| gd::sys::global_get_singleton(\"OS\"))"));

    // get_keycode_string moved to Input
    assert!(source.contains("static BINDS: gd::MethodTable<1>"));
    assert!(!source.contains("get_keycode_string"));
}

#[test]
fn relocated_methods_keep_their_original_binding() {
    let (schema, rules) = builtin_schema();
    let file = emitted(&schema, &rules, "Input").expect("Input should emit");
    let source = &file.source;

    assert!(source.contains("static BINDS: gd::MethodTable<2>"));
    assert!(source.contains("(\"OS\", \"get_keycode_string\", 2261993717),"));
    assert!(source.contains("gd::sys::method_bind_ptrcall(BINDS.get(1), super::os::singleton_object(), &mut frame);"));
    assert!(source.contains("pub fn get_keycode_string(code: i64) -> String {\n        Input::get_keycode_string(code).to_string()"));
}

#[test]
fn deep_classes_upcast_to_every_ancestor() {
    let (schema, rules) = builtin_schema();
    let file = emitted(&schema, &rules, "AudioStreamPlayer3D").expect("AudioStreamPlayer3D should emit");
    let source = &file.source;

    assert_eq!(file.path, Path::new("AudioStreamPlayer3D/class.rs"));
    for upcast in ["as_node_3d", "as_node", "as_object"] {
        assert_eq!(source.matches(&format!("pub fn {upcast}(&self)")).count(), 2, "{upcast}");
    }
    assert!(source.contains("pub fn as_node_3d(&self) -> &super::node_3d::Instance {"));

    assert!(source.contains("pub fn seek_to(&self, to_position: f64) {"));
    assert!(source.contains("pub fn play(&self) {\n        self.0.play(0.0);"));
    assert!(source.contains("pub fn volume_db(&self) -> f64 {"));
    assert!(source.contains("pub const INVERSE_DISTANCE: AttenuationModel = AttenuationModel(0);"));
}

#[test]
fn static_methods_are_associated_functions_on_both_layers() {
    let (schema, rules) = builtin_schema();
    let file = emitted(&schema, &rules, "FileAccess").expect("FileAccess should emit");

    assert!(file.source.contains("pub fn open(path: gd::GString, flags: ModeFlags) -> FileAccess {"));
    assert!(file.source.contains("pub fn open(path: String, flags: ModeFlags) -> Instance {"));
    assert!(file.source.contains("pub fn get_buffer(&self, length: i64) -> Vec<u8> {"));
}

#[test]
fn every_fixture_class_emits() {
    let (schema, rules) = builtin_schema();
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    for class in &schema.classes {
        let file = emit_class(&context, class)
            .unwrap_or_else(|error| panic!("{} should emit: {}", class.name, error.msg));
        assert!(file.source.contains(&format!("pub const CLASS: &'static str = \"{}\";", class.name)));
    }
}

#[test]
fn emission_is_deterministic() {
    let (schema, rules) = builtin_schema();

    for name in ["Node", "Object", "Tween", "Time", "StreamPeerExtension"] {
        let first = emitted(&schema, &rules, name).expect("first run should emit");
        let second = emitted(&schema, &rules, name).expect("second run should emit");
        assert_eq!(first.source, second.source, "{name}");
    }
}

#[test]
fn methods_mapping_to_one_identifier_collide() {
    let mut foo = class("Foo", "");
    foo.methods.push(method("do_it", &[], ""));
    foo.methods.push(method("do-it", &[], ""));
    let schema = Schema::from_classes(vec![foo]);
    let rules = Rules::empty();

    let error = emitted(&schema, &rules, "Foo").expect_err("do_it and do-it collide");
    assert_eq!(error.error_type, ErrorType::IdentifierCollision);
    assert!(error.msg.contains("'do_it' and 'do-it' both map to 'do_it'"));
}

#[test]
fn enums_may_not_reuse_the_handle_name() {
    let mut foo = class("Foo", "");
    foo.enums.push(EnumDescriptor {
        name: String::from("Foo"),
        is_bitfield: false,
        values: vec![EnumValue {
            name: String::from("FOO_A"),
            value: 0,
        }],
    });
    let schema = Schema::from_classes(vec![foo]);
    let rules = Rules::empty();

    let error = emitted(&schema, &rules, "Foo").expect_err("enum Foo collides with handle Foo");
    assert_eq!(error.error_type, ErrorType::IdentifierCollision);
}

#[test]
fn methods_may_not_shadow_generated_handle_items() {
    let mut foo = class("Foo", "");
    foo.methods.push(method("into_object", &[], ""));
    let schema = Schema::from_classes(vec![foo]);
    let rules = Rules::empty();

    let error = emitted(&schema, &rules, "Foo").expect_err("into_object is generated");
    assert_eq!(error.error_type, ErrorType::IdentifierCollision);
}
