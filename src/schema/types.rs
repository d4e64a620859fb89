//! SQL type mapping for the two schema dialects
//!
//! Both dialects resolve the base type through the same [`SqlType`] table, so an
//! unsupported name fails identically whichever output is being produced.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::SchemaError;

/// Output schema text format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaDialect {
    /// `NAME:VarChar(50) not nullable` tokens for data-file header rows
    PlainHeader,
    /// `NAME: not nullable string[max=50];` lines for OSH sidecar files
    StructuredSchema,
}

/// SQL column types understood by the translator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SqlType {
    Char,
    Date,
    Decimal,
    Integer,
    Time,
    Timestamp,
    Varchar,
}

impl SqlType {
    /// Every recognised type, in alphabetical order of the SQL name
    pub const ALL: [SqlType; 7] = [
        SqlType::Char,
        SqlType::Date,
        SqlType::Decimal,
        SqlType::Integer,
        SqlType::Time,
        SqlType::Timestamp,
        SqlType::Varchar,
    ];

    /// Canonical upper-case SQL name
    pub fn sql_name(&self) -> &'static str {
        match self {
            SqlType::Char => "CHAR",
            SqlType::Date => "DATE",
            SqlType::Decimal => "DECIMAL",
            SqlType::Integer => "INTEGER",
            SqlType::Time => "TIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Varchar => "VARCHAR",
        }
    }

    /// Base output token for a dialect, without any length suffix
    pub fn token(&self, dialect: SchemaDialect) -> &'static str {
        match dialect {
            SchemaDialect::PlainHeader => match self {
                SqlType::Char => "Char",
                SqlType::Date => "Date",
                SqlType::Decimal => "Numeric",
                SqlType::Integer => "Integer",
                SqlType::Time => "Time",
                SqlType::Timestamp => "Timestamp",
                SqlType::Varchar => "VarChar",
            },
            SchemaDialect::StructuredSchema => match self {
                SqlType::Char | SqlType::Varchar => "string",
                SqlType::Date => "date",
                SqlType::Decimal => "decimal",
                SqlType::Integer => "int64",
                SqlType::Time => "time",
                SqlType::Timestamp => "timestamp",
            },
        }
    }
}

impl FromStr for SqlType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        SqlType::ALL
            .into_iter()
            .find(|t| t.sql_name() == upper)
            .ok_or(SchemaError::UnsupportedType(upper))
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

/// Parenthesised parameters of a SQL type, kept verbatim (`255`, `5,2`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeParams(String);

impl TypeParams {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Raw text between the parentheses
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Split a type token such as `DECIMAL(5,2)` into its base name and parameters.
///
/// A token without `(`, or one whose `(` is the first character, has no
/// parameters. An unclosed parameter list runs to the end of the token.
pub fn split_type_token(token: &str) -> (&str, Option<TypeParams>) {
    match token.find('(') {
        Some(open) if open > 0 => {
            let rest = &token[open + 1..];
            let inner = rest.find(')').map_or(rest, |close| &rest[..close]);
            (&token[..open], Some(TypeParams::new(inner)))
        }
        _ => (token, None),
    }
}

/// Map a SQL type token (with optional parameter suffix) to a dialect token.
///
/// # Example
///
/// ```rust
/// use imam_cli::schema::{map_type, SchemaDialect};
///
/// assert_eq!(map_type("varchar(255)", SchemaDialect::PlainHeader).unwrap(), "VarChar(255)");
/// assert_eq!(map_type("VARCHAR(255)", SchemaDialect::StructuredSchema).unwrap(), "string[max=255]");
/// assert_eq!(map_type("DECIMAL(5,2)", SchemaDialect::StructuredSchema).unwrap(), "decimal[5,2]");
/// ```
pub fn map_type(sql_type: &str, dialect: SchemaDialect) -> Result<String, SchemaError> {
    let (base, params) = split_type_token(sql_type);
    let sql_type: SqlType = base.parse()?;
    Ok(render_type(sql_type, params.as_ref(), dialect))
}

/// Render an already-resolved type with its parameters in a dialect
pub fn render_type(sql_type: SqlType, params: Option<&TypeParams>, dialect: SchemaDialect) -> String {
    let token = sql_type.token(dialect);
    match (params, dialect) {
        (None, _) => token.to_string(),
        (Some(p), SchemaDialect::PlainHeader) => format!("{}({})", token, p.as_str()),
        (Some(p), SchemaDialect::StructuredSchema) if token == "string" => {
            format!("{}[max={}]", token, p.as_str())
        }
        (Some(p), SchemaDialect::StructuredSchema) => format!("{}[{}]", token, p.as_str()),
    }
}
