//! Import area operations against the external tool

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::runner::{CommandOutput, CommandRunner, shell_quote};
use super::xml::ImportParameters;
use super::{ImportError, ImportParam, ImportRequest};
use crate::config::EnvironmentContext;
use crate::template::{Workbook, parse_requests};

/// Formats the tool uses for timestamps in `-a list -t area` output
const TIMESTAMP_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%b %d, %Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%y %I:%M %p",
];

/// Last activity times of one import area
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportAreaTimestamps {
    pub import: Option<NaiveDateTime>,
    pub analysis: Option<NaiveDateTime>,
    pub preview: Option<NaiveDateTime>,
    pub share: Option<NaiveDateTime>,
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&collapsed, fmt).ok())
}

/// Cells of one area record; a record may wrap over several table lines
#[derive(Default)]
struct PendingArea {
    name: String,
    import: String,
    analysis: String,
    preview: String,
    share: String,
}

impl PendingArea {
    fn append(&mut self, cells: &[&str]) {
        self.name.push_str(cells[0].trim());
        for (buf, cell) in [
            (&mut self.import, cells[1]),
            (&mut self.analysis, cells[2]),
            (&mut self.preview, cells[3]),
            (&mut self.share, cells[4]),
        ] {
            buf.push(' ');
            buf.push_str(cell.trim());
        }
    }

    fn finish(self) -> Option<(String, ImportAreaTimestamps)> {
        if self.name.is_empty() {
            return None;
        }
        let timestamps = ImportAreaTimestamps {
            import: parse_timestamp(&self.import),
            analysis: parse_timestamp(&self.analysis),
            preview: parse_timestamp(&self.preview),
            share: parse_timestamp(&self.share),
        };
        Some((self.name, timestamps))
    }
}

/// Parse the table printed by `imam.sh -a list -t area`.
///
/// Rows start after a line of `=`; each row has at least five `|`-separated
/// cells (name, import, analysis, preview, share). Cells that wrap continue on
/// following lines and a line of underscores closes the record.
pub fn parse_area_list(stdout: &str) -> BTreeMap<String, ImportAreaTimestamps> {
    let mut areas = BTreeMap::new();
    let mut in_table = false;
    let mut pending = PendingArea::default();

    for line in stdout.lines() {
        if line.starts_with('=') {
            in_table = true;
            continue;
        }
        if line.starts_with("_______") {
            if let Some((name, timestamps)) = std::mem::take(&mut pending).finish() {
                areas.insert(name, timestamps);
            }
            in_table = true;
            continue;
        }
        if in_table {
            let cells: Vec<&str> = line.split('|').collect();
            if cells.len() > 4 {
                pending.append(&cells);
            }
        }
    }

    areas
}

/// How stale an area must be before a refresh re-imports it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Refresh areas last shared more than this many hours ago; `None` refreshes all
    pub stale_hours: Option<i64>,
    /// Keep going after a failed re-import
    pub continue_on_error: bool,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            stale_hours: None,
            continue_on_error: true,
        }
    }
}

impl RefreshPolicy {
    /// Areas shared at or after the returned time are fresh
    pub fn cutoff(&self, now: NaiveDateTime) -> Result<NaiveDateTime, ImportError> {
        let hours = self.stale_hours.unwrap_or(0);
        if hours < 0 {
            return Err(ImportError::InvalidStalePeriod(hours));
        }
        TimeDelta::try_hours(hours)
            .and_then(|period| now.checked_sub_signed(period))
            .ok_or(ImportError::InvalidStalePeriod(hours))
    }
}

/// What happened to one area during a refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed(CommandOutput),
    Failed(CommandOutput),
    /// Shared recently enough; carries the last share time
    Skipped(NaiveDateTime),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub area: String,
    pub outcome: RefreshOutcome,
}

/// Result of processing one workbook row
#[derive(Debug)]
pub struct IngestOutcome {
    pub sheet: String,
    pub row: usize,
    pub result: Result<CommandOutput, ImportError>,
}

/// Client for the `imam.sh` command-line tool
pub struct ImamClient<R: CommandRunner> {
    context: EnvironmentContext,
    runner: R,
}

impl<R: CommandRunner> ImamClient<R> {
    pub fn new(context: EnvironmentContext, runner: R) -> Self {
        Self { context, runner }
    }

    pub fn context(&self) -> &EnvironmentContext {
        &self.context
    }

    /// Run one `imam.sh` action; imports additionally name the engine tier
    pub fn call_cli(&self, command: &str) -> Result<CommandOutput, ImportError> {
        let mut cmd = format!(
            "{} -af {}",
            shell_quote(&self.context.imam_script().display().to_string()),
            shell_quote(&self.context.require_auth_file()?.display().to_string())
        );
        if command.contains("-a import") {
            cmd.push_str(" -mn ");
            cmd.push_str(&self.context.require_engine()?.to_lowercase());
        }
        cmd.push(' ');
        cmd.push_str(command);

        debug!(command = %cmd, "Calling import tool");
        self.runner.run(&cmd)
    }

    /// Existing import areas with their last activity times
    pub fn list_import_areas(&self) -> Result<BTreeMap<String, ImportAreaTimestamps>, ImportError> {
        let output = self.call_cli("-a list -t area")?.into_result()?;
        let areas = parse_area_list(&output.stdout);
        debug!(count = areas.len(), "Listed import areas");
        Ok(areas)
    }

    /// Re-run the import of an existing area
    pub fn reimport(&self, area_name: &str) -> Result<CommandOutput, ImportError> {
        info!(area = area_name, "Re-importing existing area");
        self.call_cli(&format!("-a reimport -i {}", shell_quote(area_name)))
    }

    /// Create the area when it does not exist yet, otherwise re-import it.
    ///
    /// A non-zero exit from the tool is returned as output, not as an error.
    pub fn create_or_update_import_area(
        &self,
        request: &ImportRequest,
    ) -> Result<CommandOutput, ImportError> {
        let areas = self.list_import_areas()?;
        if areas.contains_key(&request.area_name) {
            return self.reimport(&request.area_name);
        }

        let mut doc = ImportParameters::new(&request.bridge_name)?;
        doc.add_data_connection(self.encrypt_passwords(&request.connection)?);
        for param in self.encrypt_passwords(&request.parameters)? {
            doc.add_parameter(param);
        }

        let param_file = param_file_path(&request.area_name);
        write_private(&param_file, &doc.to_xml()?)?;
        info!(
            area = %request.area_name,
            param_file = %param_file.display(),
            "Creating new import area"
        );

        let initial = format!(
            "Initial import on {}",
            Local::now().format("%a %b %d %Y %H:%M:%S")
        );
        let output = self.call_cli(&format!(
            "-a import -i {} -ad {} -id {} -pf {}",
            shell_quote(&request.area_name),
            shell_quote(&request.description),
            shell_quote(&initial),
            shell_quote(&param_file.display().to_string())
        ))?;

        // Kept on failure so the parameters can be inspected
        if output.success()
            && let Err(e) = std::fs::remove_file(&param_file)
        {
            warn!(param_file = %param_file.display(), error = %e, "Could not remove parameter file");
        }
        Ok(output)
    }

    /// Re-import one named area, or every area, when it is stale under `policy`
    pub fn refresh_import_areas(
        &self,
        area_name: Option<&str>,
        policy: &RefreshPolicy,
        now: NaiveDateTime,
    ) -> Result<Vec<RefreshReport>, ImportError> {
        let cutoff = policy.cutoff(now)?;
        let areas = self.list_import_areas()?;

        let selected: Vec<(&String, &ImportAreaTimestamps)> = match area_name {
            Some(name) => {
                let entry = areas
                    .get_key_value(name)
                    .ok_or_else(|| ImportError::UnknownImportArea(name.to_string()))?;
                vec![entry]
            }
            None => areas.iter().collect(),
        };

        let mut reports = Vec::with_capacity(selected.len());
        for (name, timestamps) in selected {
            let outcome = match timestamps.share {
                Some(shared) if shared >= cutoff => {
                    info!(area = %name, "Import area already refreshed within the timescale specified");
                    RefreshOutcome::Skipped(shared)
                }
                _ => {
                    let output = self.reimport(name)?;
                    if output.success() {
                        RefreshOutcome::Refreshed(output)
                    } else if policy.continue_on_error {
                        warn!(area = %name, code = output.code, "Refresh failed, continuing");
                        RefreshOutcome::Failed(output)
                    } else {
                        return Err(ImportError::CommandFailed {
                            code: output.code,
                            stdout: output.stdout,
                        });
                    }
                }
            };
            reports.push(RefreshReport {
                area: name.clone(),
                outcome,
            });
        }
        Ok(reports)
    }

    /// Create or update an import area for every filled-in row of a workbook
    pub fn load_metadata(&self, workbook: &Workbook) -> Vec<IngestOutcome> {
        let mut outcomes = Vec::new();
        for sheet in workbook.sheets() {
            for (row, request) in parse_requests(sheet) {
                let result = request
                    .map_err(ImportError::from)
                    .and_then(|request| self.create_or_update_import_area(&request));
                outcomes.push(IngestOutcome {
                    sheet: sheet.name.clone(),
                    row,
                    result,
                });
            }
        }
        outcomes
    }

    fn encrypt_passwords(&self, params: &[ImportParam]) -> Result<Vec<ImportParam>, ImportError> {
        params
            .iter()
            .map(|param| {
                if !param.is_password() {
                    return Ok(param.clone());
                }
                let output = self
                    .runner
                    .run(&format!(
                        "{} {}",
                        shell_quote(&self.context.encrypt_script().display().to_string()),
                        shell_quote(&param.value)
                    ))?
                    .into_result()?;
                Ok(ImportParam {
                    value: output.stdout.trim_end_matches(['\r', '\n']).to_string(),
                    ..param.clone()
                })
            })
            .collect()
    }
}

fn param_file_path(area_name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}.xml", area_name.replace(' ', "_")))
}

/// Parameter files may hold encrypted credentials: owner read/write only
fn write_private(path: &Path, content: &str) -> Result<(), ImportError> {
    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
