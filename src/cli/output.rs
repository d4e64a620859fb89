//! Output formatting for CLI

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::import::{ImportAreaTimestamps, IngestOutcome, RefreshOutcome, RefreshReport};

fn format_time(time: Option<NaiveDateTime>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// One line per workbook row: sheet, row number and how the request went
pub fn format_ingest_outcomes(outcomes: &[IngestOutcome]) -> String {
    let mut output = String::new();
    for outcome in outcomes {
        let status = match &outcome.result {
            Ok(result) if result.success() => "ok".to_string(),
            Ok(result) => format!("failed (exit {}): {}", result.code, result.stdout.trim()),
            Err(e) => format!("failed: {}", e),
        };
        output.push_str(&format!(
            "[{}] row {}: {}\n",
            outcome.sheet, outcome.row, status
        ));
    }
    output.push_str(&format!("\nProcessed {} request(s)\n", outcomes.len()));
    output
}

pub fn format_refresh_reports(reports: &[RefreshReport]) -> String {
    let mut output = String::new();
    for report in reports {
        let status = match &report.outcome {
            RefreshOutcome::Refreshed(_) => "refreshed".to_string(),
            RefreshOutcome::Failed(result) => {
                format!("failed (exit {}): {}", result.code, result.stdout.trim())
            }
            RefreshOutcome::Skipped(shared) => {
                format!("skipped, shared at {}", format_time(Some(*shared)))
            }
        };
        output.push_str(&format!("{}: {}\n", report.area, status));
    }
    output
}

/// Table of import areas and their last activity times
pub fn format_area_list(areas: &BTreeMap<String, ImportAreaTimestamps>) -> String {
    let width = areas
        .keys()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Import area".len());

    let mut output = format!(
        "{:<width$}  {:<19}  {:<19}  {:<19}  {:<19}\n",
        "Import area", "Imported", "Analyzed", "Previewed", "Shared"
    );
    for (name, times) in areas {
        output.push_str(&format!(
            "{:<width$}  {:<19}  {:<19}  {:<19}  {:<19}\n",
            name,
            format_time(times.import),
            format_time(times.analysis),
            format_time(times.preview),
            format_time(times.share),
        ));
    }
    output
}
