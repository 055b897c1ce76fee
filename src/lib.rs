//! Generates Rust bindings for Godot engine classes from `extension_api.json`.

#[macro_use]
pub mod generator_messages;

pub mod build_system;
pub mod cli;
pub mod codegen;
pub mod mapping;
pub mod rules;
pub mod schema;
pub mod settings;
