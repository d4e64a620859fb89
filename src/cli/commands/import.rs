//! Commands that drive the import tool

use std::path::PathBuf;

use chrono::Local;

use crate::cli::error::CliError;
use crate::cli::output::{format_area_list, format_ingest_outcomes, format_refresh_reports};
use crate::config::EnvironmentContext;
use crate::import::{ImamClient, RefreshOutcome, RefreshPolicy, ShellCommandRunner};
use crate::template::Workbook;

/// Arguments for the `ingest` command
pub struct IngestArgs {
    /// Filled-in template workbook
    pub workbook: PathBuf,
}

/// Arguments for the `refresh` command
pub struct RefreshArgs {
    /// Single import area to refresh; all areas when absent
    pub area: Option<String>,
    /// Skip areas shared within this many hours
    pub hours: Option<i64>,
    /// Stop at the first failed refresh
    pub stop_on_error: bool,
}

fn client(context: EnvironmentContext) -> ImamClient<ShellCommandRunner> {
    ImamClient::new(context, ShellCommandRunner::default())
}

/// Handle the `ingest` command
pub fn handle_ingest(args: &IngestArgs, context: EnvironmentContext) -> Result<(), CliError> {
    let workbook = Workbook::load(&args.workbook)
        .map_err(|e| CliError::FileReadError(args.workbook.clone(), e.to_string()))?;

    let outcomes = client(context).load_metadata(&workbook);
    print!("{}", format_ingest_outcomes(&outcomes));

    let failed = outcomes
        .iter()
        .filter(|o| !matches!(&o.result, Ok(output) if output.success()))
        .count();
    if failed > 0 {
        return Err(CliError::RequestsFailed(failed, outcomes.len()));
    }
    Ok(())
}

/// Handle the `refresh` command
pub fn handle_refresh(args: &RefreshArgs, context: EnvironmentContext) -> Result<(), CliError> {
    if let Some(hours) = args.hours
        && hours < 0
    {
        return Err(CliError::InvalidArgument(format!(
            "hours must not be negative: {}",
            hours
        )));
    }

    let policy = RefreshPolicy {
        stale_hours: args.hours,
        continue_on_error: !args.stop_on_error,
    };
    let reports =
        client(context).refresh_import_areas(args.area.as_deref(), &policy, Local::now().naive_local())?;
    print!("{}", format_refresh_reports(&reports));

    let failed = reports
        .iter()
        .filter(|r| matches!(r.outcome, RefreshOutcome::Failed(_)))
        .count();
    if failed > 0 {
        return Err(CliError::RequestsFailed(failed, reports.len()));
    }
    Ok(())
}

/// Handle the `areas` command
pub fn handle_areas(context: EnvironmentContext) -> Result<(), CliError> {
    let areas = client(context).list_import_areas()?;
    print!("{}", format_area_list(&areas));
    Ok(())
}
