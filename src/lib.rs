//! imam-cli - automation layer for metadata imports
//!
//! Provides:
//! - DDL-to-schema translation (header rows and OSH schema sidecars)
//! - Data file workflows built on that translation
//! - The bridge catalog and per-bridge parameter templates
//! - Import area management through the external `imam.sh` tool
//! - Environment configuration for the tool installation

pub mod bridge;
pub mod config;
pub mod import;
pub mod schema;
pub mod template;
pub mod workflow;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use bridge::{AssetType, BridgeCatalog, BridgeError, BridgeSpec, ParamSpec};
pub use config::{ConfigError, EnvironmentContext};
pub use import::{
    CommandOutput, CommandRunner, ImamClient, ImportError, ImportParam, ImportParameters,
    ImportRequest, RefreshPolicy, ShellCommandRunner,
};
pub use schema::{
    SchemaDialect, SchemaError, SchemaMapping, SqlType, StructuredSchemaOptions, TypedField,
    render_header_line, render_structured_schema,
};
pub use template::{TemplateError, Workbook, Worksheet, build_template, parse_requests};
pub use workflow::{WorkflowError, create_sidecar, inject_header};
