//! Tests for method plans and the emitted call wrappers, thunks and instance delegates.

use super::*;
use crate::generator_messages::generator_errors::ErrorType;
use crate::mapping::name_mapper::{method_ident, virtual_ident};
use crate::rules::Rules;
use crate::rules::rewrites::apply_rewrites;
use crate::schema::model::Schema;
use crate::schema::test_support::{class, foo_bar_schema, method, mini_schema, virtual_method};

fn builtin_schema() -> (Schema, Rules) {
    let mut schema = mini_schema();
    let rules = Rules::builtin().expect("builtin rules should build");
    apply_rewrites(&mut schema, &rules).expect("rewrites should apply");
    (schema, rules)
}

fn find<'s>(schema: &'s Schema, class_name: &str, method_name: &str) -> &'s MethodDescriptor {
    schema
        .class(class_name)
        .and_then(|class| class.method(method_name))
        .expect("method should exist")
}

fn plan<'a>(
    context: &EmitContext,
    owner: &str,
    method: &'a MethodDescriptor,
    receiver: Receiver,
    module: &str,
    warnings: &mut Vec<GeneratorWarning>,
) -> Result<MethodPlan<'a>, GeneratorError> {
    let ident = if method.is_virtual {
        virtual_ident(context.rules, &method.name)
    } else {
        method_ident(context.rules, &method.name)
    };
    let bind_index = (!method.is_virtual).then_some(0);
    plan_method(context, owner, method, ident, receiver, bind_index, TypeContext::module(module), warnings)
}

fn advanced(context: &EmitContext, plan: &MethodPlan, module: &str) -> Result<String, GeneratorError> {
    let mut emitter = RustEmitter::new(512);
    emit_advanced_method(&mut emitter, context, plan, TypeContext::module(module))?;
    Ok(emitter.finish())
}

fn instance(context: &EmitContext, plan: &MethodPlan, handle: &str, module: &str) -> String {
    let mut emitter = RustEmitter::new(512);
    emit_instance_method(&mut emitter, context, plan, handle, TypeContext::module(module))
        .expect("instance method should emit");
    emitter.finish()
}

fn thunk(context: &EmitContext, plan: &MethodPlan, module: &str) -> Result<String, GeneratorError> {
    let mut emitter = RustEmitter::new(512);
    emit_virtual(&mut emitter, context, plan, TypeContext::module(module))?;
    Ok(emitter.finish())
}

#[test]
fn foo_bar_borrows_the_argument_and_hands_the_return_to_the_caller() {
    let schema = foo_bar_schema();
    let rules = Rules::empty()
        .with_ownership("Foo", "bar", "x", Ownership::IsTemporaryReference)
        .and_then(|rules| rules.with_ownership("Foo", "bar", RETURN_VALUE, Ownership::OwnershipTransferred))
        .expect("entries should insert");
    let context = EmitContext::new(&schema, &rules, "crate::gd");
    let bar = find(&schema, "Foo", "bar");

    let mut warnings = Vec::new();
    let plan = plan(&context, "Foo", bar, Receiver::Instance, "foo", &mut warnings).expect("bar should plan");
    assert_eq!(plan.params[0].ownership, Some(Ownership::IsTemporaryReference));
    assert_eq!(plan.return_ownership, Some(Ownership::OwnershipTransferred));

    let source = advanced(&context, &plan, "foo").expect("bar should emit");
    assert_eq!(
        source,
        "pub fn bar(&self, x: &Foo) -> Foo {\n\
         \x20   let mut frame = gd::CallFrame::new();\n\
         \x20   frame.arg(gd::pointers::get(x.object()));\n\
         \x20   gd::sys::method_bind_ptrcall(BINDS.get(0), self.object(), &mut frame);\n\
         \x20   let r_ret = frame.ret::<gd::sys::ObjectPtr>();\n\
         \x20   frame.free();\n\
         \x20   Foo::from_object(gd::Object::owned(r_ret))\n\
         }\n"
    );

    // The handle is only borrowed: nothing consumes it or reclaims it afterwards
    assert!(!source.contains("into_object"));
    assert!(!source.contains("reclaim"));
    assert!(warnings.is_empty());
}

#[test]
fn foo_bar_without_entries_refuses_to_plan() {
    let schema = foo_bar_schema();
    let rules = Rules::empty();
    let context = EmitContext::new(&schema, &rules, "crate::gd");
    let bar = find(&schema, "Foo", "bar");

    let error = plan(&context, "Foo", bar, Receiver::Instance, "foo", &mut Vec::new())
        .expect_err("ownership is unresolved");
    assert_eq!(error.error_type, ErrorType::UnresolvedOwnership);
    assert!(error.msg.contains("Foo::bar(x?)Foo?"));
}

#[test]
fn transferred_arguments_are_consumed_and_reversed_ones_reclaimed() {
    let (schema, rules) = builtin_schema();
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let add_child = plan(&context, "Node", find(&schema, "Node", "add_child"), Receiver::Instance, "node", &mut Vec::new())
        .expect("add_child should plan");
    let source = advanced(&context, &add_child, "node").expect("add_child should emit");
    assert!(source.contains("pub fn add_child(&self, node: Node, force_readable_name: bool, internal: InternalMode)"));
    assert!(source.contains("frame.arg(gd::pointers::end(node.into_object()));"));
    assert!(source.contains("frame.arg(internal.0);"));

    let remove_child = plan(&context, "Node", find(&schema, "Node", "remove_child"), Receiver::Instance, "node", &mut Vec::new())
        .expect("remove_child should plan");
    let source = advanced(&context, &remove_child, "node").expect("remove_child should emit");
    let call = source.find("method_bind_ptrcall").expect("call should be emitted");
    let reclaim = source
        .find("gd::pointers::reclaim(node.object());")
        .expect("reversed ownership is reclaimed");
    assert!(call < reclaim);
}

#[test]
fn meta_narrows_frame_values_and_widens_returns() {
    let (schema, rules) = builtin_schema();
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let get_child = plan(&context, "Node", find(&schema, "Node", "get_child"), Receiver::Instance, "node", &mut Vec::new())
        .expect("get_child should plan");
    let source = advanced(&context, &get_child, "node").expect("get_child should emit");
    assert!(source.contains("frame.arg(idx as i32);"));
    assert!(source.contains("Node::from_object(gd::Object::must_assert_instance_id(r_ret))"));

    let volume = plan(
        &context,
        "AudioStreamPlayer3D",
        find(&schema, "AudioStreamPlayer3D", "get_volume_db"),
        Receiver::Instance,
        "audio_stream_player_3d",
        &mut Vec::new(),
    )
    .expect("get_volume_db should plan");
    let source = advanced(&context, &volume, "audio_stream_player_3d").expect("get_volume_db should emit");
    assert!(source.contains("pub fn get_volume_db(&self) -> f64"));
    assert!(source.contains("let r_ret = frame.ret::<f32>();"));
    assert!(source.contains("f64::from(r_ret)"));
}

#[test]
fn void_methods_free_the_frame_last() {
    let (schema, rules) = builtin_schema();
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let queue_free = plan(&context, "Node", find(&schema, "Node", "queue_free"), Receiver::Instance, "node", &mut Vec::new())
        .expect("queue_free should plan");
    let source = advanced(&context, &queue_free, "node").expect("queue_free should emit");
    assert!(source.contains("pub fn queue_free(&self) {"));
    assert!(source.trim_end().ends_with("frame.free();\n}"));
}

#[test]
fn lifetime_bound_returns_are_tied_to_the_receiver() {
    let (schema, rules) = builtin_schema();
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let get_root = plan(&context, "SceneTree", find(&schema, "SceneTree", "get_root"), Receiver::Instance, "scene_tree", &mut Vec::new())
        .expect("get_root should plan");
    let source = advanced(&context, &get_root, "scene_tree").expect("get_root should emit");
    assert!(source.contains("super::Node::from_object(gd::Object::lifetime_bound_to(self.object(), r_ret))"));
}

#[test]
fn lifetime_bound_returns_need_an_object_to_bind_to() {
    let mut foo = class("Foo", "");
    let mut make = method("make", &[], "Foo");
    make.is_static = true;
    foo.methods.push(make);
    let schema = Schema::from_classes(vec![foo]);
    let rules = Rules::empty()
        .with_ownership("Foo", "make", RETURN_VALUE, Ownership::LifetimeBoundToClass)
        .expect("entry should insert");
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let make = plan(&context, "Foo", find(&schema, "Foo", "make"), Receiver::Static, "foo", &mut Vec::new())
        .expect("make should plan");
    let error = advanced(&context, &make, "foo").expect_err("a static method has no receiver");
    assert_eq!(error.error_type, ErrorType::UnresolvedOwnership);
    assert_eq!(error.location.member.as_deref(), Some("make"));
}

#[test]
fn static_methods_call_through_a_null_object() {
    let (schema, rules) = builtin_schema();
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let open = plan(&context, "FileAccess", find(&schema, "FileAccess", "open"), Receiver::Static, "file_access", &mut Vec::new())
        .expect("open should plan");
    let source = advanced(&context, &open, "file_access").expect("open should emit");
    assert!(source.contains("pub fn open(path: gd::GString, flags: ModeFlags) -> FileAccess {"));
    assert!(source.contains("gd::sys::method_bind_ptrcall(BINDS.get(0), &gd::Object::null(), &mut frame);"));
    assert!(source.contains("FileAccess::from_object(gd::Object::ref_counted(r_ret))"));
}

#[test]
fn relocated_methods_call_through_their_source_singleton() {
    let (schema, rules) = builtin_schema();
    let context = EmitContext::new(&schema, &rules, "crate::gd");
    let moved = find(&schema, "Input", "get_keycode_string");
    assert_eq!(moved.relocated_from.as_deref(), Some("OS"));

    let relocated = plan(&context, "OS", moved, Receiver::Singleton(String::from("os")), "input", &mut Vec::new())
        .expect("relocated method should plan");
    let source = advanced(&context, &relocated, "input").expect("relocated method should emit");
    assert!(source.contains("pub fn get_keycode_string(code: i64) -> gd::GString {"));
    assert!(source.contains("super::os::singleton_object(), &mut frame);"));
}

#[test]
fn vararg_methods_pack_a_variant_vector() {
    let (schema, rules) = builtin_schema();
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let call = plan(&context, "Object", find(&schema, "Object", "call"), Receiver::Instance, "object", &mut Vec::new())
        .expect("call should plan");
    let source = advanced(&context, &call, "object").expect("call should emit");
    assert_eq!(
        source,
        "pub fn call(&self, method: gd::StringName, args: &[gd::Variant]) -> Result<gd::Variant, gd::CallError> {\n\
         \x20   let mut variants = Vec::with_capacity(1 + args.len());\n\
         \x20   variants.push(gd::Variant::from(method));\n\
         \x20   variants.extend_from_slice(args);\n\
         \x20   gd::sys::method_bind_call(BINDS.get(0), self.object(), &variants)\n\
         }\n"
    );
}

#[test]
fn virtual_thunks_unpack_arguments_and_write_the_return() {
    let (schema, rules) = builtin_schema();
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let process = plan(&context, "MainLoop", find(&schema, "MainLoop", "_process"), Receiver::Instance, "main_loop", &mut Vec::new())
        .expect("_process should plan");
    assert_eq!(process.ident, "process");
    assert_eq!(process.bind_index, None);

    let source = thunk(&context, &process, "main_loop").expect("_process should emit");
    assert!(source.contains("pub fn process<T>(implementation: fn(&mut T, f64) -> bool) -> gd::sys::VirtualThunk<T> {"));
    assert!(source.contains("gd::sys::VirtualThunk::new(\"_process\", move |this, p_self, p_args, p_ret| {"));
    assert!(source.contains("let delta = p_args.get::<f64>(0);"));
    assert!(source.contains("let ret = implementation(this, delta);"));
    assert!(source.contains("p_ret.set(ret);"));
}

#[test]
fn virtual_class_arguments_follow_their_ownership_rule() {
    let (schema, rules) = builtin_schema();
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let input = plan(&context, "Node", find(&schema, "Node", "_input"), Receiver::Instance, "node", &mut Vec::new())
        .expect("_input should plan");
    let source = thunk(&context, &input, "node").expect("_input should emit");
    assert!(source.contains("let raw_event = p_args.get::<gd::sys::ObjectPtr>(0);"));
    assert!(source.contains("let event = super::InputEvent::from_object(gd::Object::ref_counted(raw_event));"));
    assert!(source.contains("implementation(this, event);"));
    assert!(!source.contains("release"));
}

#[test]
fn temporary_virtual_arguments_are_released_after_the_call() {
    let mut foo = class("Foo", "");
    foo.methods.push(virtual_method("_visit", &[("other", "Foo")], ""));
    let schema = Schema::from_classes(vec![foo]);
    let rules = Rules::empty()
        .with_ownership("Foo", "_visit", "other", Ownership::IsTemporaryReference)
        .expect("entry should insert");
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let visit = plan(&context, "Foo", find(&schema, "Foo", "_visit"), Receiver::Instance, "foo", &mut Vec::new())
        .expect("_visit should plan");
    let source = thunk(&context, &visit, "foo").expect("_visit should emit");

    assert!(source.contains("pub fn visit<T>(implementation: fn(&mut T, &Foo)) -> gd::sys::VirtualThunk<T> {"));
    let call = source.find("implementation(this, &other);").expect("implementation is called");
    let release = source
        .find("gd::pointers::release(raw_other);")
        .expect("temporary argument is released");
    assert!(call < release);
    assert!(source.contains("Foo::from_object(gd::Object::temporary(raw_other))"));
}

#[test]
fn virtual_engine_value_returns_are_handed_to_the_engine() {
    let mut foo = class("Foo", "");
    foo.methods.push(virtual_method("_label", &[], "String"));
    foo.methods.push(virtual_method("_warnings", &[], "PackedStringArray"));
    let schema = Schema::from_classes(vec![foo]);
    let rules = Rules::empty();
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let label = plan(&context, "Foo", find(&schema, "Foo", "_label"), Receiver::Instance, "foo", &mut Vec::new())
        .expect("_label should plan");
    let source = thunk(&context, &label, "foo").expect("_label should emit");
    assert!(source.contains("fn(&mut T) -> gd::GString"));
    assert!(source.contains("p_ret.set(ret.into_raw());"));
    assert!(!source.contains("as_ptr"));

    let warnings = plan(&context, "Foo", find(&schema, "Foo", "_warnings"), Receiver::Instance, "foo", &mut Vec::new())
        .expect("_warnings should plan");
    let source = thunk(&context, &warnings, "foo").expect("_warnings should emit");
    assert!(source.contains("fn(&mut T) -> gd::PackedStringArray"));
    assert!(source.contains("p_ret.set(ret.into_raw());"));
}

#[test]
fn borrowed_arguments_are_taken_by_reference_on_every_layer() {
    let mut foo = class("Foo", "");
    foo.methods.push(method("watch", &[("target", "Foo"), ("owner", "Foo")], ""));
    let schema = Schema::from_classes(vec![foo]);
    let rules = Rules::empty()
        .with_ownership("Foo", "watch", "target", Ownership::MustAssertInstanceID)
        .and_then(|rules| rules.with_ownership("Foo", "watch", "owner", Ownership::OwnershipTransferred))
        .expect("entries should insert");
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let watch = plan(&context, "Foo", find(&schema, "Foo", "watch"), Receiver::Instance, "foo", &mut Vec::new())
        .expect("watch should plan");
    assert!(watch.params[0].by_reference);
    assert!(!watch.params[1].by_reference);

    let source = advanced(&context, &watch, "foo").expect("watch should emit");
    assert!(source.contains("pub fn watch(&self, target: &Foo, owner: Foo) {"));
    assert!(source.contains("frame.arg(gd::pointers::get_checked(target.object()));"));
    assert!(source.contains("frame.arg(gd::pointers::end(owner.into_object()));"));

    let source = instance(&context, &watch, "Foo", "foo");
    assert!(source.contains("pub fn watch(&self, target: &Instance, owner: Instance) {"));
    assert!(source.contains("self.0.watch(&target.0, owner.0);"));
}

#[test]
fn raw_locals_of_virtual_arguments_cannot_shadow_parameters() {
    let mut foo = class("Foo", "");
    foo.methods.push(virtual_method("_mix", &[("raw_x", "int"), ("x", "Foo")], ""));
    let schema = Schema::from_classes(vec![foo]);
    let rules = Rules::empty()
        .with_ownership("Foo", "_mix", "x", Ownership::RefCountedManagement)
        .expect("entry should insert");
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let error = plan(&context, "Foo", find(&schema, "Foo", "_mix"), Receiver::Instance, "foo", &mut Vec::new())
        .expect_err("raw_x is declared twice in the thunk");
    assert_eq!(error.error_type, ErrorType::IdentifierCollision);
    assert!(error.msg.contains("raw_x"));

    // Non-virtual methods declare no raw locals
    let mut foo = class("Foo", "");
    foo.methods.push(method("mix", &[("raw_x", "int"), ("x", "Foo")], ""));
    let schema = Schema::from_classes(vec![foo]);
    let rules = Rules::empty()
        .with_ownership("Foo", "mix", "x", Ownership::RefCountedManagement)
        .expect("entry should insert");
    let context = EmitContext::new(&schema, &rules, "crate::gd");
    assert!(plan(&context, "Foo", find(&schema, "Foo", "mix"), Receiver::Instance, "foo", &mut Vec::new()).is_ok());
}

#[test]
fn lifetime_bound_virtual_arguments_are_tied_to_the_engine_object() {
    let mut foo = class("Foo", "");
    foo.methods.push(virtual_method("_attach", &[("part", "Foo")], ""));
    let schema = Schema::from_classes(vec![foo]);
    let rules = Rules::empty()
        .with_ownership("Foo", "_attach", "part", Ownership::LifetimeBoundToClass)
        .expect("entry should insert");
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let attach = plan(&context, "Foo", find(&schema, "Foo", "_attach"), Receiver::Instance, "foo", &mut Vec::new())
        .expect("_attach should plan");
    let source = thunk(&context, &attach, "foo").expect("_attach should emit");
    assert!(source.contains("move |this, p_self, p_args, p_ret| {"));
    assert!(source.contains("let part = Foo::from_object(gd::Object::lifetime_bound_to(p_self, raw_part));"));
    assert!(source.contains("implementation(this, part);"));
}

#[test]
fn virtual_class_returns_are_unwrapped_for_the_engine() {
    let mut foo = class("Foo", "");
    foo.methods.push(virtual_method("_spawn", &[], "Foo"));
    let schema = Schema::from_classes(vec![foo]);
    let rules = Rules::empty()
        .with_ownership("Foo", "_spawn", RETURN_VALUE, Ownership::OwnershipTransferred)
        .expect("entry should insert");
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let spawn = plan(&context, "Foo", find(&schema, "Foo", "_spawn"), Receiver::Instance, "foo", &mut Vec::new())
        .expect("_spawn should plan");
    let source = thunk(&context, &spawn, "foo").expect("_spawn should emit");
    assert!(source.contains("fn(&mut T) -> Foo"));
    assert!(source.contains("p_ret.set(gd::pointers::end(ret.into_object()));"));
}

#[test]
fn instance_layer_drops_parsed_defaults() {
    let (schema, rules) = builtin_schema();
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let mut warnings = Vec::new();
    let add_child = plan(&context, "Node", find(&schema, "Node", "add_child"), Receiver::Instance, "node", &mut warnings)
        .expect("add_child should plan");
    assert!(warnings.is_empty());

    let source = instance(&context, &add_child, "Node", "node");
    assert_eq!(
        source,
        "pub fn add_child(&self, node: Instance) {\n    self.0.add_child(node.0, false, InternalMode(0));\n}\n"
    );
}

#[test]
fn instance_layer_converts_strings_and_arrays() {
    let (schema, rules) = builtin_schema();
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let get_children = plan(&context, "Node", find(&schema, "Node", "get_children"), Receiver::Instance, "node", &mut Vec::new())
        .expect("get_children should plan");
    let source = instance(&context, &get_children, "Node", "node");
    assert!(source.contains("pub fn get_children(&self) -> Vec<Instance>"));
    assert!(source.contains("self.0.get_children(false).to_vec().into_iter().map(|item| Instance(item)).collect::<Vec<_>>()"));

    let open = plan(&context, "FileAccess", find(&schema, "FileAccess", "open"), Receiver::Static, "file_access", &mut Vec::new())
        .expect("open should plan");
    let source = instance(&context, &open, "FileAccess", "file_access");
    assert!(source.contains("pub fn open(path: String, flags: ModeFlags) -> Instance {"));
    assert!(source.contains("Instance(FileAccess::open(gd::GString::from(path.as_str()), flags))"));
}

#[test]
fn structable_returns_become_records() {
    let (schema, rules) = builtin_schema();
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let datetime = plan(
        &context,
        "Time",
        find(&schema, "Time", "get_datetime_dict_from_system"),
        Receiver::Instance,
        "time",
        &mut Vec::new(),
    )
    .expect("get_datetime_dict_from_system should plan");
    assert_eq!(datetime.return_structable.as_deref(), Some("DatetimeDict"));

    let source = instance(&context, &datetime, "Time", "time");
    assert!(source.contains("pub fn get_datetime_dict_from_system(&self) -> gd::structs::DatetimeDict {"));
    assert!(source.contains("gd::structs::DatetimeDict::from_dictionary(&self.0.get_datetime_dict_from_system(false))"));
}

#[test]
fn defaults_out_of_range_keep_the_parameter_and_warn() {
    let mut foo = class("Foo", "");
    let mut resize = method("resize", &[("size", "int")], "");
    resize.arguments[0].meta = String::from("int32");
    resize.arguments[0].default_value = Some(String::from("4294967296"));
    foo.methods.push(resize);
    let schema = Schema::from_classes(vec![foo]);
    let rules = Rules::empty();
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let mut warnings = Vec::new();
    let resize = plan(&context, "Foo", find(&schema, "Foo", "resize"), Receiver::Instance, "foo", &mut warnings)
        .expect("resize should plan");

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].warning_kind, WarningKind::UnparsedDefaultValue);
    assert_eq!(warnings[0].location.parameter.as_deref(), Some("size"));

    let source = instance(&context, &resize, "Foo", "foo");
    assert!(source.contains("pub fn resize(&self, size: i64) {"));
    assert!(source.contains("self.0.resize(size);"));
}

#[test]
fn methods_without_a_hash_cannot_be_bound() {
    let mut foo = class("Foo", "");
    let mut orphan = method("orphan", &[], "");
    orphan.hash = None;
    foo.methods.push(orphan);
    let schema = Schema::from_classes(vec![foo]);
    let rules = Rules::empty();
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let error = plan(&context, "Foo", find(&schema, "Foo", "orphan"), Receiver::Instance, "foo", &mut Vec::new())
        .expect_err("no hash, no binding");
    assert_eq!(error.error_type, ErrorType::Schema);
}

#[test]
fn keyword_parameters_are_renamed() {
    let (schema, rules) = builtin_schema();
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let set_offset = plan(&context, "Control", find(&schema, "Control", "set_offset"), Receiver::Instance, "control", &mut Vec::new())
        .expect("set_offset should plan");
    assert_eq!(set_offset.params[0].ident, "side");
    assert_eq!(set_offset.params[1].ident, "offset");

    let mut foo = class("Foo", "");
    foo.methods.push(method("cast", &[("type", "int"), ("in", "int")], ""));
    let schema = Schema::from_classes(vec![foo]);
    let rules = Rules::empty();
    let context = EmitContext::new(&schema, &rules, "crate::gd");

    let cast = plan(&context, "Foo", find(&schema, "Foo", "cast"), Receiver::Instance, "foo", &mut Vec::new())
        .expect("cast should plan");
    let idents = cast.params.iter().map(|param| param.ident.as_str()).collect::<Vec<_>>();
    assert_eq!(idents, ["type_", "input"]);
}
