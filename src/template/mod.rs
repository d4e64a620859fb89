//! Bridge parameter templates
//!
//! A template is a worksheet per bridge that a user fills in, one import area
//! per row:
//!
//! | row | content                                                      |
//! |-----|--------------------------------------------------------------|
//! | 1   | hidden parameter ids (`IA_name`, `DCN_Database`, `P_S3Bucket`) |
//! | 2   | section headings, merged across each section                 |
//! | 3   | display names, styled by section and whether required        |
//! | 4+  | values; row 4 is pre-filled with defaults                    |
//!
//! Workbooks are persisted as JSON so any tabular front end can produce them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bridge::{ASSET_DESCRIPTION_CHOICES, ASSET_DESCRIPTION_PARAM, BridgeCatalog, BridgeError, ParamSpec};
use crate::import::{ImportParam, ImportRequest, prepare_value};

const ID_ROW: usize = 1;
const HEADING_ROW: usize = 2;
const NAME_ROW: usize = 3;
const FIRST_VALUE_ROW: usize = 4;
const MIN_COLUMN_WIDTH: usize = 16;

const AREA_NAME_ID: &str = "IA_name";
const AREA_DESC_ID: &str = "IA_desc";
const CONNECTION_PREFIX: &str = "DCN_";
const BRIDGE_PREFIX: &str = "P_";

/// Errors raised while building, reading or interpreting templates
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Invalid workbook: {0}")]
    Json(String),

    #[error("Missing import area name (required) in sheet '{sheet}', row {row}")]
    MissingAreaName { sheet: String, row: usize },
}

impl From<std::io::Error> for TemplateError {
    fn from(e: std::io::Error) -> Self {
        TemplateError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for TemplateError {
    fn from(e: serde_json::Error) -> Self {
        TemplateError::Json(e.to_string())
    }
}

/// Template section a column belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    ImportArea,
    DataConnection,
    Bridge,
}

impl Section {
    pub fn heading(&self) -> &'static str {
        match self {
            Section::ImportArea => "Import Area",
            Section::DataConnection => "Data Connection",
            Section::Bridge => "Bridge-specific parameters",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "section")]
pub enum CellStyle {
    Hidden,
    Heading(Section),
    Required(Section),
    Optional(Section),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
    /// Allowed values offered as a drop-down list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn styled(value: impl Into<String>, style: CellStyle) -> Self {
        Self {
            value: Some(value.into()),
            style: Some(style),
            choices: Vec::new(),
        }
    }
}

/// Cells on one row merged into a single cell (1-based, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedRange {
    pub row: usize,
    pub first_column: usize,
    pub last_column: usize,
}

/// A grid of optional cells addressed with 1-based row and column numbers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worksheet {
    pub name: String,
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
    #[serde(default)]
    pub column_widths: Vec<usize>,
    #[serde(default)]
    pub merged: Vec<MergedRange>,
    #[serde(default)]
    pub hidden_rows: Vec<usize>,
    /// Rows kept visible while scrolling
    #[serde(default)]
    pub frozen_rows: usize,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows
            .get(row.checked_sub(1)?)?
            .get(column.checked_sub(1)?)
    }

    /// Non-empty text of a cell
    pub fn value(&self, row: usize, column: usize) -> Option<&str> {
        self.cell(row, column)
            .and_then(|c| c.value.as_deref())
            .filter(|v| !v.is_empty())
    }

    /// Set a cell, growing the grid as needed.
    ///
    /// # Panics
    ///
    /// Panics when `row` or `column` is zero.
    pub fn set(&mut self, row: usize, column: usize, cell: Cell) {
        assert!(row > 0 && column > 0, "worksheet coordinates are 1-based");
        if self.rows.len() < row {
            self.rows.resize_with(row, Vec::new);
        }
        let cells = &mut self.rows[row - 1];
        if cells.len() < column {
            cells.resize_with(column, Cell::default);
        }
        cells[column - 1] = cell;
    }

    pub fn set_column_width(&mut self, column: usize, width: usize) {
        if self.column_widths.len() < column {
            self.column_widths.resize(column, 0);
        }
        self.column_widths[column - 1] = width;
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn is_row_empty(&self, row: usize) -> bool {
        (1..=self.column_count()).all(|column| self.value(row, column).is_none())
    }
}

/// An ordered set of worksheets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    sheets: Vec<Worksheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, sheet: Worksheet) {
        self.sheets.push(sheet);
    }

    pub fn sheets(&self) -> &[Worksheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), TemplateError> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Column cursor used while laying out one template
struct Layout {
    sheet: Worksheet,
    column: usize,
}

impl Layout {
    fn section(&mut self, section: Section, columns: Vec<(String, &str, bool, Cell)>) {
        let first = self.column;
        for (id, display_name, required, example) in columns {
            let column = self.column;
            if column == first {
                self.sheet.set(
                    HEADING_ROW,
                    column,
                    Cell::styled(section.heading(), CellStyle::Heading(section)),
                );
            }
            self.sheet.set(ID_ROW, column, Cell::styled(id, CellStyle::Hidden));
            let style = if required {
                CellStyle::Required(section)
            } else {
                CellStyle::Optional(section)
            };
            self.sheet.set(NAME_ROW, column, Cell::styled(display_name, style));
            if example != Cell::default() {
                self.sheet.set(FIRST_VALUE_ROW, column, example);
            }
            self.sheet
                .set_column_width(column, MIN_COLUMN_WIDTH.max(display_name.chars().count()));
            self.column += 1;
        }
        if self.column > first {
            self.sheet.merged.push(MergedRange {
                row: HEADING_ROW,
                first_column: first,
                last_column: self.column - 1,
            });
        }
    }
}

fn param_columns(prefix: &str, params: &[ParamSpec]) -> Vec<(String, &'static str, bool, Cell)> {
    params
        .iter()
        .map(|p| {
            let example = if p.id == ASSET_DESCRIPTION_PARAM {
                Cell {
                    value: Some(ASSET_DESCRIPTION_CHOICES[0].to_string()),
                    style: None,
                    choices: ASSET_DESCRIPTION_CHOICES.iter().map(|c| c.to_string()).collect(),
                }
            } else {
                p.default.map(Cell::text).unwrap_or_default()
            };
            (format!("{}{}", prefix, p.id), p.display_name, p.required, example)
        })
        .collect()
}

/// Lay out the template worksheet for one implemented bridge
pub fn build_template(bridge_name: &str) -> Result<Worksheet, TemplateError> {
    let bridge = BridgeCatalog::get_implemented(bridge_name)?;
    let mut layout = Layout {
        sheet: Worksheet::new(bridge.name),
        column: 1,
    };

    layout.section(
        Section::ImportArea,
        vec![
            (AREA_NAME_ID.to_string(), "Name", true, Cell::default()),
            (AREA_DESC_ID.to_string(), "Description", true, Cell::default()),
        ],
    );
    layout.section(
        Section::DataConnection,
        param_columns(CONNECTION_PREFIX, bridge.connector_params),
    );
    layout.section(
        Section::Bridge,
        param_columns(BRIDGE_PREFIX, bridge.bridge_params),
    );

    let mut sheet = layout.sheet;
    sheet.hidden_rows.push(ID_ROW);
    sheet.frozen_rows = NAME_ROW;
    Ok(sheet)
}

/// One template sheet per bridge, in the order given
pub fn build_workbook<S: AsRef<str>>(bridges: &[S]) -> Result<Workbook, TemplateError> {
    let mut workbook = Workbook::new();
    for bridge in bridges {
        workbook.add_sheet(build_template(bridge.as_ref())?);
    }
    Ok(workbook)
}

/// Read the filled-in rows of a template sheet as import requests.
///
/// The sheet name is the bridge name. Rows with no values at all are skipped;
/// a row without an import area name yields [`TemplateError::MissingAreaName`].
/// Each entry carries its 1-based row number.
pub fn parse_requests(sheet: &Worksheet) -> Vec<(usize, Result<ImportRequest, TemplateError>)> {
    let mut requests = Vec::new();
    for row in FIRST_VALUE_ROW..=sheet.row_count() {
        if sheet.is_row_empty(row) {
            continue;
        }
        requests.push((row, parse_row(sheet, row)));
    }
    tracing::debug!(sheet = %sheet.name, rows = requests.len(), "Read template rows");
    requests
}

fn parse_row(sheet: &Worksheet, row: usize) -> Result<ImportRequest, TemplateError> {
    let mut request = ImportRequest {
        bridge_name: sheet.name.clone(),
        area_name: String::new(),
        description: String::new(),
        connection: Vec::new(),
        parameters: Vec::new(),
    };

    for column in 1..=sheet.column_count() {
        let Some(id) = sheet.value(ID_ROW, column) else {
            continue;
        };
        let display_name = sheet.value(NAME_ROW, column).unwrap_or_default();
        let value = sheet.value(row, column).unwrap_or_default();

        if id == AREA_NAME_ID {
            request.area_name = value.to_string();
        } else if id == AREA_DESC_ID {
            request.description = value.to_string();
        } else if let Some(id) = id.strip_prefix(CONNECTION_PREFIX) {
            request
                .connection
                .push(ImportParam::new(id, display_name, prepare_value(id, value)));
        } else if let Some(id) = id.strip_prefix(BRIDGE_PREFIX) {
            request
                .parameters
                .push(ImportParam::new(id, display_name, prepare_value(id, value)));
        } else {
            tracing::debug!(sheet = %sheet.name, id, "Ignoring column with unknown prefix");
        }
    }

    if request.area_name.is_empty() {
        return Err(TemplateError::MissingAreaName {
            sheet: sheet.name.clone(),
            row,
        });
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_layout() {
        let sheet = build_template("File Connector - Engine Tier").unwrap();

        assert_eq!(sheet.value(1, 1), Some("IA_name"));
        assert_eq!(sheet.value(1, 3), Some("DCN_dcName_"));
        assert_eq!(sheet.value(1, 5), Some("P_DirectoryContents"));
        assert_eq!(sheet.value(2, 1), Some("Import Area"));
        assert_eq!(sheet.value(2, 3), Some("Data Connection"));
        assert_eq!(sheet.value(2, 5), Some("Bridge-specific parameters"));
        assert_eq!(sheet.value(3, 9), Some("Host system name"));
        assert_eq!(
            sheet.cell(3, 9).unwrap().style,
            Some(CellStyle::Required(Section::Bridge))
        );
        assert_eq!(
            sheet.cell(3, 4).unwrap().style,
            Some(CellStyle::Optional(Section::DataConnection))
        );

        assert_eq!(
            sheet.merged,
            vec![
                MergedRange { row: 2, first_column: 1, last_column: 2 },
                MergedRange { row: 2, first_column: 3, last_column: 4 },
                MergedRange { row: 2, first_column: 5, last_column: 9 },
            ]
        );
        assert_eq!(sheet.hidden_rows, vec![1]);
        assert_eq!(sheet.frozen_rows, 3);
    }

    #[test]
    fn test_template_examples_and_widths() {
        let sheet = build_template("Amazon S3").unwrap();
        let desc_col = (1..=sheet.column_count())
            .find(|c| sheet.value(1, *c) == Some("P_Asset_description_already_exists"))
            .unwrap();
        let example = sheet.cell(4, desc_col).unwrap();
        assert_eq!(example.value.as_deref(), Some("Replace_existing_description"));
        assert_eq!(example.choices.len(), 2);

        let name_width = sheet.column_widths[desc_col - 1];
        assert_eq!(name_width, "If an asset description already exists".len());
        assert_eq!(sheet.column_widths[0], 16);
    }

    #[test]
    fn test_template_unimplemented_bridge() {
        assert!(matches!(
            build_template("XSD"),
            Err(TemplateError::Bridge(BridgeError::NotImplemented(_)))
        ));
    }

    #[test]
    fn test_parse_requests() {
        let mut sheet = build_template("File Connector - Engine Tier").unwrap();
        sheet.set(4, 1, Cell::text("LANDING"));
        sheet.set(4, 2, Cell::text("Landing zone files"));
        sheet.set(4, 3, Cell::text("landing_conn"));
        sheet.set(4, 5, Cell::text("/data/landing/"));
        sheet.set(4, 9, Cell::text("etlhost"));
        // row 5 only partly filled, no area name
        sheet.set(5, 9, Cell::text("otherhost"));

        let requests = parse_requests(&sheet);
        assert_eq!(requests.len(), 2);

        let (row, first) = &requests[0];
        assert_eq!(*row, 4);
        let first = first.as_ref().unwrap();
        assert_eq!(first.bridge_name, "File Connector - Engine Tier");
        assert_eq!(first.area_name, "LANDING");
        assert_eq!(first.description, "Landing zone files");
        assert_eq!(first.connection[0], ImportParam::new("dcName_", "Name", "landing_conn"));
        assert_eq!(first.parameters[0].value, "folder[/data/landing/]");
        assert_eq!(first.parameters[1].value, "True");

        assert!(matches!(
            requests[1],
            (5, Err(TemplateError::MissingAreaName { row: 5, .. }))
        ));
    }

    #[test]
    fn test_workbook_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");
        let workbook = build_workbook(&BridgeCatalog::implemented()).unwrap();
        workbook.save(&path).unwrap();

        let loaded = Workbook::load(&path).unwrap();
        assert_eq!(loaded.sheets().len(), 4);
        assert_eq!(loaded, workbook);
    }
}
