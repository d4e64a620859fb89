//! Header and sidecar commands for delimited data files

use std::path::PathBuf;

use crate::cli::error::CliError;
use crate::workflow::{create_sidecar, inject_header};

/// Arguments shared by the `header` and `sidecar` commands
pub struct DataFileArgs {
    /// Data file to describe; its stem names the table
    pub file: PathBuf,
    /// DDL file holding the table definition
    pub sql: Option<PathBuf>,
    /// Column delimiter
    pub delimiter: String,
}

fn check_inputs(args: &DataFileArgs) -> Result<(), CliError> {
    if !args.file.is_file() {
        return Err(CliError::FileReadError(
            args.file.clone(),
            "no such data file".to_string(),
        ));
    }
    if let Some(sql) = &args.sql
        && !sql.is_file()
    {
        return Err(CliError::FileReadError(
            sql.clone(),
            "no such DDL file".to_string(),
        ));
    }
    Ok(())
}

/// Handle the `header` command
pub fn handle_header(args: &DataFileArgs) -> Result<(), CliError> {
    check_inputs(args)?;
    let table_name = inject_header(&args.file, args.sql.as_deref(), &args.delimiter)?;
    println!(
        "Successfully injected heading for table {} into {}",
        table_name,
        args.file.display()
    );
    Ok(())
}

/// Handle the `sidecar` command
pub fn handle_sidecar(args: &DataFileArgs) -> Result<(), CliError> {
    check_inputs(args)?;
    let sidecar = create_sidecar(&args.file, args.sql.as_deref(), &args.delimiter)?;
    println!(
        "Successfully created side-car for table {} into {}",
        sidecar.table_name,
        sidecar.path.display()
    );
    Ok(())
}
