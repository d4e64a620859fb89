//! CLI command implementations

pub mod data_file;
pub mod import;
pub mod template;
