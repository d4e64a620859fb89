//! Template command implementation

use std::path::PathBuf;

use crate::bridge::BridgeCatalog;
use crate::cli::error::CliError;
use crate::template::build_workbook;

/// Arguments for the `template` command
pub struct TemplateArgs {
    /// Workbook file to write
    pub output: PathBuf,
    /// Bridges to include; all implemented bridges when empty
    pub bridges: Vec<String>,
}

/// Handle the `template` command
pub fn handle_template(args: &TemplateArgs) -> Result<(), CliError> {
    let bridges: Vec<String> = if args.bridges.is_empty() {
        BridgeCatalog::implemented()
            .into_iter()
            .map(String::from)
            .collect()
    } else {
        args.bridges.clone()
    };

    let workbook = build_workbook(&bridges)?;
    workbook.save(&args.output)?;

    println!("Wrote template to: {}", args.output.display());
    for sheet in workbook.sheets() {
        println!("  - {} ({} columns)", sheet.name, sheet.column_count());
    }
    Ok(())
}

/// Handle `template --list`: print every recognised bridge
pub fn handle_list_bridges() -> Result<(), CliError> {
    let implemented = BridgeCatalog::implemented();
    for name in BridgeCatalog::known() {
        let marker = if implemented.contains(&name) { "*" } else { " " };
        println!("{} {}", marker, name);
    }
    println!();
    println!("* template available");
    Ok(())
}
