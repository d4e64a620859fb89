//! Error types for DDL translation

use thiserror::Error;

/// Errors raised while translating DDL into schema text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Base SQL type outside the recognised vocabulary
    #[error("Unsupported SQL data type: {0}")]
    UnsupportedType(String),

    /// Requested table not present in the schema mapping
    #[error("Unable to find table name: {0}")]
    UnknownTable(String),

    /// CREATE TABLE statement without a usable definition body
    #[error("Malformed CREATE TABLE statement ({reason}): {statement}")]
    MalformedStatement { statement: String, reason: String },

    /// Column fragment without a type token
    #[error("Malformed column definition: {0}")]
    MalformedColumn(String),

    /// Delimiter that collides with the header field syntax
    #[error("Cannot use '{0}' as a delimiter: it is a reserved character for the schema definition")]
    ReservedDelimiter(String),
}
