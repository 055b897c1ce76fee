//! Pure mappings from schema names, types and literals to Rust source fragments.

pub mod name_mapper;
pub mod type_mapper;
pub mod values;
