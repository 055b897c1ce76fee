#[macro_use]
pub mod dev_logging;
pub mod display_messages;
pub mod generator_errors;
pub mod generator_warnings;
