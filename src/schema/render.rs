//! Header line and OSH schema rendering

use super::error::SchemaError;
use super::mapping::SchemaMapping;
use super::types::SchemaDialect;

/// Default field delimiter for data files
pub const DEFAULT_DELIMITER: &str = "|";

const DATE_FORMAT: &str = "%yyyy-%mm-%dd";
const TIME_FORMAT: &str = "%hh:%nn:%ss";

/// Framing options for a structured schema block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredSchemaOptions {
    /// Field delimiter (default `|`)
    pub delimiter: String,
    /// Whether the data file carries a header row
    pub has_header: bool,
    /// Escape sequence for the delimiter, if any
    pub escape: Option<String>,
}

impl Default for StructuredSchemaOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            has_header: false,
            escape: None,
        }
    }
}

impl StructuredSchemaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter, emitted exactly as given
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_escape(mut self, escape: impl Into<String>) -> Self {
        self.escape = Some(escape.into());
        self
    }
}

/// Render the header row for a table: plain-header fields joined by `delimiter`.
///
/// Fails with `UnsupportedType` when one of the table's columns has a type
/// outside the supported vocabulary.
///
/// # Example
///
/// ```rust
/// use imam_cli::schema::{SchemaMapping, render_header_line};
///
/// let mapping = SchemaMapping::from_ddl("CREATE TABLE T (A INTEGER NOT NULL, B CHAR(2))").unwrap();
/// assert_eq!(
///     render_header_line(&mapping, "t", ",").unwrap(),
///     "A:Integer not nullable,B:Char(2) nullable"
/// );
/// ```
pub fn render_header_line(
    mapping: &SchemaMapping,
    table_name: &str,
    delimiter: &str,
) -> Result<String, SchemaError> {
    let table = mapping.require(table_name)?;
    let fields = table
        .fields
        .iter()
        .map(|f| f.render(SchemaDialect::PlainHeader))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(fields.join(delimiter))
}

fn file_structure_line(has_header: bool, escape: Option<&str>) -> String {
    let mut line = format!(
        "// FileStructure: file_format='delimited', header='{}'",
        has_header
    );
    if let Some(escape) = escape {
        if escape.chars().count() > 1 {
            line.push_str(&format!(", escape=\"{}\"", escape));
        } else {
            line.push_str(&format!(", escape='{}'", escape));
        }
    }
    line
}

fn record_line(delimiter: &str, with_formats: bool) -> String {
    let mut line = format!(
        "record {{ record_delim='\\n', delim='{}', final_delim=end, null_field=''",
        delimiter
    );
    if with_formats {
        line.push_str(&format!(
            ", date_format='{}', time_format='{}', timestamp_format='{} {}'",
            DATE_FORMAT, TIME_FORMAT, DATE_FORMAT, TIME_FORMAT
        ));
    }
    line.push_str(" } (");
    line
}

/// Render the OSH schema block describing a table's data file.
///
/// The block is a `FileStructure` comment, the `record { ... } (` framing, one
/// indented structured-schema line per field and a closing `)`. No trailing
/// newline is emitted.
pub fn render_structured_schema(
    mapping: &SchemaMapping,
    table_name: &str,
    options: &StructuredSchemaOptions,
) -> Result<String, SchemaError> {
    let table = mapping.require(table_name)?;

    let mut schema = file_structure_line(options.has_header, options.escape.as_deref());
    schema.push('\n');
    schema.push_str(&record_line(&options.delimiter, true));
    for field in &table.fields {
        schema.push_str("\n    ");
        schema.push_str(&field.render(SchemaDialect::StructuredSchema)?);
    }
    schema.push_str("\n)");
    Ok(schema)
}

/// Number of columns in a sample data line; an empty delimiter never splits
pub fn sample_column_count(line: &str, delimiter: &str) -> usize {
    if delimiter.is_empty() {
        return 1;
    }
    line.trim_end_matches(['\r', '\n']).split(delimiter).count()
}

/// Header row used when no DDL is available: every column is `C{n}:NVarChar`
pub fn fallback_header_line(column_count: usize, delimiter: &str) -> String {
    (1..=column_count)
        .map(|i| format!("C{}:NVarChar", i))
        .collect::<Vec<_>>()
        .join(delimiter)
}

/// OSH schema used when no DDL is available: every column is a bounded string
pub fn fallback_structured_schema(column_count: usize, delimiter: &str) -> String {
    let mut schema = file_structure_line(false, None);
    schema.push('\n');
    schema.push_str(&record_line(delimiter, false));
    for i in 1..=column_count {
        schema.push_str(&format!("\n    C{}: string[max=255];", i));
    }
    schema.push_str("\n)");
    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> SchemaMapping {
        SchemaMapping::from_ddl(
            "CREATE TABLE EMP (\nID INTEGER NOT NULL,\nNAME VARCHAR(50) NOT NULL,\nHIRED DATE\n);",
        )
        .unwrap()
    }

    #[test]
    fn test_header_line_default_delimiter() {
        let header = render_header_line(&mapping(), "emp", DEFAULT_DELIMITER).unwrap();
        assert_eq!(
            header,
            "ID:Integer not nullable|NAME:VarChar(50) not nullable|HIRED:Date nullable"
        );
    }

    #[test]
    fn test_empty_delimiter_is_kept() {
        let header = render_header_line(&mapping(), "EMP", "").unwrap();
        assert_eq!(
            header,
            "ID:Integer not nullableNAME:VarChar(50) not nullableHIRED:Date nullable"
        );

        let options = StructuredSchemaOptions::new().with_delimiter("");
        let schema = render_structured_schema(&mapping(), "EMP", &options).unwrap();
        assert!(schema.contains("record { record_delim='\\n', delim='', final_delim=end"));
        assert!(!schema.contains("delim='|'"));

        assert!(fallback_structured_schema(1, "").contains("delim='', final_delim=end"));
        assert_eq!(sample_column_count("a|b|c\n", ""), 1);
    }

    #[test]
    fn test_header_line_multi_char_delimiter() {
        let header = render_header_line(&mapping(), "EMP", "~~").unwrap();
        assert!(header.starts_with("ID:Integer not nullable~~NAME"));
        assert!(header.ends_with("HIRED:Date nullable"));
    }

    #[test]
    fn test_structured_schema_block() {
        let schema =
            render_structured_schema(&mapping(), "Emp", &StructuredSchemaOptions::default())
                .unwrap();
        let expected = "// FileStructure: file_format='delimited', header='false'\n\
record { record_delim='\\n', delim='|', final_delim=end, null_field='', date_format='%yyyy-%mm-%dd', time_format='%hh:%nn:%ss', timestamp_format='%yyyy-%mm-%dd %hh:%nn:%ss' } (\n    \
ID: not nullable int64;\n    \
NAME: not nullable string[max=50];\n    \
HIRED: nullable date;\n)";
        assert_eq!(schema, expected);
    }

    #[test]
    fn test_structured_schema_header_and_escape() {
        let options = StructuredSchemaOptions::new()
            .with_delimiter(",")
            .with_header(true)
            .with_escape("\"");
        let schema = render_structured_schema(&mapping(), "EMP", &options).unwrap();
        assert!(schema.starts_with(
            "// FileStructure: file_format='delimited', header='true', escape='\"'\n"
        ));
        assert!(schema.contains("delim=','"));

        let options = StructuredSchemaOptions::new().with_escape("\\\\");
        let schema = render_structured_schema(&mapping(), "EMP", &options).unwrap();
        assert!(schema.starts_with(
            "// FileStructure: file_format='delimited', header='false', escape=\"\\\\\"\n"
        ));
    }

    #[test]
    fn test_unknown_table_in_both_renderers() {
        let mapping = mapping();
        assert_eq!(
            render_header_line(&mapping, "dept", "|").unwrap_err(),
            SchemaError::UnknownTable("DEPT".to_string())
        );
        assert_eq!(
            render_structured_schema(&mapping, "Dept", &StructuredSchemaOptions::default())
                .unwrap_err(),
            SchemaError::UnknownTable("DEPT".to_string())
        );
    }

    #[test]
    fn test_unsupported_column_fails_only_its_table() {
        let mapping =
            SchemaMapping::from_ddl("CREATE TABLE EMP (ID INTEGER)\nCREATE TABLE DOCS (BODY CLOB)")
                .unwrap();
        assert_eq!(render_header_line(&mapping, "emp", "|").unwrap(), "ID:Integer nullable");
        assert_eq!(
            render_header_line(&mapping, "docs", "|").unwrap_err(),
            SchemaError::UnsupportedType("CLOB".to_string())
        );
        assert_eq!(
            render_structured_schema(&mapping, "DOCS", &StructuredSchemaOptions::default())
                .unwrap_err(),
            SchemaError::UnsupportedType("CLOB".to_string())
        );
    }

    #[test]
    fn test_fallback_rendering() {
        assert_eq!(sample_column_count("a|b|c\n", "|"), 3);
        assert_eq!(fallback_header_line(3, ","), "C1:NVarChar,C2:NVarChar,C3:NVarChar");
        assert_eq!(
            fallback_structured_schema(2, "|"),
            "// FileStructure: file_format='delimited', header='false'\n\
record { record_delim='\\n', delim='|', final_delim=end, null_field='' } (\n    \
C1: string[max=255];\n    \
C2: string[max=255];\n)"
        );
    }
}
