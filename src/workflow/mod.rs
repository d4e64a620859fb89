//! Data file workflows
//!
//! Prepare delimited data files for import: either prepend a header row that
//! describes each column, or write an OSH schema sidecar next to the file.
//! The table is named after the data file stem (`EMP.dat` describes `EMP`).
//! Without DDL every column is described as an unbounded string, with the
//! column count sampled from the first line of the file.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::schema::{
    SchemaError, SchemaMapping, StructuredSchemaOptions, fallback_header_line,
    fallback_structured_schema, render_header_line, render_structured_schema,
    sample_column_count,
};

/// Extension appended to a data file name to name its sidecar
pub const SIDECAR_EXTENSION: &str = "osh";

/// Separates field names from types in a header row
const RESERVED_DELIMITER: &str = ":";

/// Error while preparing a data file
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for WorkflowError {
    fn from(e: std::io::Error) -> Self {
        WorkflowError::Io(e.to_string())
    }
}

/// A written schema sidecar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidecar {
    pub table_name: String,
    pub path: PathBuf,
}

/// Table described by a data file: its file name without extension
pub fn table_name_for(data_file: &Path) -> String {
    data_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `<data file>.osh`
pub fn sidecar_path_for(data_file: &Path) -> PathBuf {
    let mut name = data_file.as_os_str().to_owned();
    name.push(".");
    name.push(SIDECAR_EXTENSION);
    PathBuf::from(name)
}

fn load_mapping(ddl_file: &Path) -> Result<SchemaMapping, WorkflowError> {
    let ddl = std::fs::read_to_string(ddl_file)?;
    let mapping = SchemaMapping::from_ddl(&ddl)?;
    debug!(ddl = %ddl_file.display(), tables = mapping.len(), "Loaded table definitions");
    Ok(mapping)
}

fn first_line(data_file: &Path) -> Result<String, WorkflowError> {
    let file = std::fs::File::open(data_file)?;
    let mut line = String::new();
    std::io::BufReader::new(file).read_line(&mut line)?;
    Ok(line)
}

/// Prepend a header row to `data_file` and return the table name it describes.
///
/// The header comes from the table's definition in `ddl_file` when one is
/// given. `:` cannot be used as the delimiter since it separates each field
/// name from its type.
pub fn inject_header(
    data_file: &Path,
    ddl_file: Option<&Path>,
    delimiter: &str,
) -> Result<String, WorkflowError> {
    if delimiter == RESERVED_DELIMITER {
        return Err(SchemaError::ReservedDelimiter(delimiter.to_string()).into());
    }

    let table_name = table_name_for(data_file);
    let header = match ddl_file {
        Some(ddl_file) => render_header_line(&load_mapping(ddl_file)?, &table_name, delimiter)?,
        None => {
            let columns = sample_column_count(&first_line(data_file)?, delimiter);
            fallback_header_line(columns, delimiter)
        }
    };

    let content = std::fs::read(data_file)?;
    let mut updated = Vec::with_capacity(header.len() + 1 + content.len());
    updated.extend_from_slice(header.as_bytes());
    updated.push(b'\n');
    updated.extend_from_slice(&content);
    std::fs::write(data_file, updated)?;

    info!(table = %table_name, file = %data_file.display(), "Injected header");
    Ok(table_name)
}

/// Write the OSH schema sidecar for `data_file`.
///
/// The data file is described as headerless with no escape sequence.
pub fn create_sidecar(
    data_file: &Path,
    ddl_file: Option<&Path>,
    delimiter: &str,
) -> Result<Sidecar, WorkflowError> {
    let table_name = table_name_for(data_file);
    let schema = match ddl_file {
        Some(ddl_file) => {
            let options = StructuredSchemaOptions::new().with_delimiter(delimiter);
            render_structured_schema(&load_mapping(ddl_file)?, &table_name, &options)?
        }
        None => {
            let columns = sample_column_count(&first_line(data_file)?, delimiter);
            fallback_structured_schema(columns, delimiter)
        }
    };

    let path = sidecar_path_for(data_file);
    std::fs::write(&path, schema)?;
    info!(table = %table_name, sidecar = %path.display(), "Created sidecar");
    Ok(Sidecar { table_name, path })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_and_sidecar_path() {
        let path = Path::new("/data/in/EMP.dat");
        assert_eq!(table_name_for(path), "EMP");
        assert_eq!(sidecar_path_for(path), PathBuf::from("/data/in/EMP.dat.osh"));
        assert_eq!(table_name_for(Path::new("archive.tar.gz")), "archive.tar");
    }

    #[test]
    fn test_reserved_delimiter() {
        let err = inject_header(Path::new("/nonexistent/EMP.dat"), None, ":").unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Schema(SchemaError::ReservedDelimiter(_))
        ));
    }

    #[test]
    fn test_missing_data_file() {
        let err = create_sidecar(Path::new("/nonexistent/EMP.dat"), None, "|").unwrap_err();
        assert!(matches!(err, WorkflowError::Io(_)));
    }
}
