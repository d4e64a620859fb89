//! DDL-to-schema translation
//!
//! Turns `CREATE TABLE` DDL into the two schema texts the import tool reads:
//! - a header row prepended to a delimited data file (plain-header dialect)
//! - an OSH schema sidecar file describing the data file (structured-schema dialect)
//!
//! DDL text flows through [`extract_statements`], [`extract_columns`] and
//! [`TypedField::parse`] into a [`SchemaMapping`], which the renderers read.

pub mod ddl;
pub mod error;
pub mod field;
pub mod mapping;
pub mod render;
pub mod types;

pub use ddl::{ColumnFragment, RawStatement, TableDefinition, extract_columns, extract_statements};
pub use error::SchemaError;
pub use field::{TypedField, translate};
pub use mapping::{SchemaMapping, TableSchema};
pub use render::{
    DEFAULT_DELIMITER, StructuredSchemaOptions, fallback_header_line, fallback_structured_schema,
    render_header_line, render_structured_schema, sample_column_count,
};
pub use types::{SchemaDialect, SqlType, TypeParams, map_type};
