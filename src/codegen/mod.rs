//! Rust source emission for the generated bindings.
//!
//! One `RustEmitter` buffer per output file. Emitters walk the schema in document order and never
//! iterate hash maps, so the same schema always produces byte-identical files.

pub mod class_emitter;
pub mod enum_emitter;
pub mod index_emitter;
pub mod method_emitter;
pub mod property_emitter;

use crate::generator_messages::generator_errors::GeneratorError;
use crate::generator_messages::generator_warnings::GeneratorWarning;
use crate::mapping::type_mapper::TypeMapper;
use crate::mapping::values::NativeLayout;
use crate::rules::Rules;
use crate::schema::model::Schema;
use std::path::PathBuf;

/// Everything the emitters read. Shared immutably between worker threads.
pub struct EmitContext<'a> {
    pub schema: &'a Schema,
    pub rules: &'a Rules,
    pub mapper: TypeMapper<'a>,
    pub layout: NativeLayout,

    // Module path of the runtime the generated code calls into
    pub runtime_path: String,
}

impl<'a> EmitContext<'a> {
    pub fn new(schema: &'a Schema, rules: &'a Rules, runtime_path: &str) -> Self {
        EmitContext {
            schema,
            rules,
            mapper: TypeMapper::new(schema, rules),
            layout: NativeLayout::from_schema(schema),
            runtime_path: runtime_path.to_owned(),
        }
    }
}

/// One generated file, relative to the output directory.
#[derive(Debug, Clone)]
pub struct EmittedFile {
    pub path: PathBuf,
    pub source: String,
    pub warnings: Vec<GeneratorWarning>,
}

pub struct RustEmitter {
    pub(crate) out: String,
    pub(crate) indent: usize,
}

impl RustEmitter {
    pub fn new(capacity: usize) -> Self {
        RustEmitter {
            out: String::with_capacity(capacity),
            indent: 0,
        }
    }

    pub(crate) fn emit_line(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.indent {
                self.out.push_str("    ");
            }
            self.out.push_str(line);
        }
        self.out.push('\n');
    }

    pub(crate) fn emit_blank(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with("\n\n") && !self.out.ends_with("{\n") {
            self.out.push('\n');
        }
    }

    pub(crate) fn with_indent<F>(&mut self, mut callback: F)
    where
        F: FnMut(&mut Self),
    {
        self.indent += 1;
        callback(self);
        self.indent -= 1;
    }

    /// Emits `header {`, the body one level deeper, then the closing brace.
    pub(crate) fn block<F>(&mut self, header: &str, callback: F)
    where
        F: FnMut(&mut Self),
    {
        self.emit_line(&format!("{header} {{"));
        self.with_indent(callback);
        self.emit_line("}");
    }

    /// Same as `block`, for bodies that can fail.
    pub(crate) fn try_block<F>(&mut self, header: &str, mut callback: F) -> Result<(), GeneratorError>
    where
        F: FnMut(&mut Self) -> Result<(), GeneratorError>,
    {
        self.emit_line(&format!("{header} {{"));
        self.indent += 1;
        let result = callback(self);
        self.indent -= 1;
        self.emit_line("}");
        result
    }

    pub(crate) fn emit_doc(&mut self, doc: &str) {
        for line in doc.lines() {
            if line.is_empty() {
                self.emit_line("///");
            } else {
                self.emit_line(&format!("/// {line}"));
            }
        }
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// First lines of every generated file.
pub(crate) fn emit_file_header(emitter: &mut RustEmitter, context: &EmitContext) {
    let version = &context.schema.version.full_name;
    if version.is_empty() {
        emitter.emit_line("// Generated by gdbindgen. Do not edit.");
    } else {
        emitter.emit_line(&format!("// Generated by gdbindgen from {version}. Do not edit."));
    }
    emitter.emit_line(
        "#![allow(clippy::all, dead_code, non_upper_case_globals, unused_imports, unused_variables)]",
    );
    emitter.emit_blank();
    emitter.emit_line(&format!("use {} as gd;", context.runtime_path));
}

/// Escapes a schema string for a Rust string literal.
pub(crate) fn string_literal(text: &str) -> String {
    format!("{text:?}")
}
