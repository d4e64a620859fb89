//! Column definition translation

use serde::{Deserialize, Serialize};

use super::ddl::ColumnFragment;
use super::error::SchemaError;
use super::types::{SchemaDialect, SqlType, TypeParams, render_type, split_type_token};

const NOT_NULL: &str = "NOT NULL";

/// A column as declared: name, SQL type name, parameters and nullability.
///
/// The type name is kept as written and only resolved against [`SqlType`]
/// when the field is rendered, so an unsupported column fails the table that
/// declares it and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedField {
    pub name: String,
    pub sql_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_params: Option<TypeParams>,
    pub nullable: bool,
}

impl TypedField {
    /// Parse `NAME TYPE[(params)] [NOT NULL]`.
    ///
    /// Only the exact trailing marker `NOT NULL` makes a column non-nullable;
    /// any other trailing text (`DEFAULT 0`, `WITH DEFAULT`, ...) is discarded and
    /// the column is treated as nullable.
    pub fn parse(fragment: &ColumnFragment) -> Result<Self, SchemaError> {
        let text = fragment.as_str().trim();
        let (name, remainder) = text
            .split_once(' ')
            .ok_or_else(|| SchemaError::MalformedColumn(text.to_string()))?;
        let remainder = remainder.trim();

        let (type_token, marker) = split_type_and_marker(remainder);
        if type_token.is_empty() {
            return Err(SchemaError::MalformedColumn(text.to_string()));
        }

        let (base, type_params) = split_type_token(type_token);
        Ok(Self {
            name: name.to_string(),
            sql_type: base.to_string(),
            type_params,
            nullable: marker != NOT_NULL,
        })
    }

    /// Look the declared type name up in the supported vocabulary
    pub fn resolved_type(&self) -> Result<SqlType, SchemaError> {
        self.sql_type.parse()
    }

    /// Render this field as a single dialect line (without framing).
    ///
    /// # Example
    ///
    /// ```rust
    /// use imam_cli::schema::{ColumnFragment, SchemaDialect, TypedField};
    ///
    /// let field = TypedField::parse(&ColumnFragment::new("NAME VARCHAR(50) NOT NULL")).unwrap();
    /// assert_eq!(field.render(SchemaDialect::PlainHeader).unwrap(), "NAME:VarChar(50) not nullable");
    /// assert_eq!(field.render(SchemaDialect::StructuredSchema).unwrap(), "NAME: not nullable string[max=50];");
    /// ```
    pub fn render(&self, dialect: SchemaDialect) -> Result<String, SchemaError> {
        let mapped = render_type(self.resolved_type()?, self.type_params.as_ref(), dialect);
        let nullability = if self.nullable {
            "nullable"
        } else {
            "not nullable"
        };
        Ok(match dialect {
            SchemaDialect::PlainHeader => format!("{}:{} {}", self.name, mapped, nullability),
            SchemaDialect::StructuredSchema => {
                format!("{}: {} {};", self.name, nullability, mapped)
            }
        })
    }
}

/// Split the type token from the trailing marker at the first space outside a
/// parameter list, so `DECIMAL(5, 2) NOT NULL` keeps its parameters intact.
fn split_type_and_marker(remainder: &str) -> (&str, &str) {
    let mut depth = 0usize;
    for (idx, ch) in remainder.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ' ' if depth == 0 => return (&remainder[..idx], remainder[idx..].trim()),
            _ => {}
        }
    }
    (remainder, "")
}

/// Translate one column fragment directly into its dialect rendering
pub fn translate(fragment: &ColumnFragment, dialect: SchemaDialect) -> Result<String, SchemaError> {
    TypedField::parse(fragment)?.render(dialect)
}
