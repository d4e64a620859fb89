//! Parameter value preparation

use serde::{Deserialize, Serialize};

use super::ImportParam;
use crate::bridge::AssetType;

/// Rewrite a raw template value into the selector syntax the tool expects.
///
/// - `DirectoryContents` / `S3BucketContents`: each `;`-separated path becomes
///   `folder[path]` when it ends with `/`, otherwise `file[path]`
/// - `AssetsToImport`: each `;`-separated item becomes `database[..]`,
///   `schema[..]` or `table[..]` depending on how many `|` separators it has;
///   items with more than two are dropped
/// - anything else is returned unchanged
pub fn prepare_value(id: &str, value: &str) -> String {
    match id {
        "DirectoryContents" | "S3BucketContents" => split_items(value)
            .map(|item| {
                if item.ends_with('/') {
                    format!("folder[{}]", item)
                } else {
                    format!("file[{}]", item)
                }
            })
            .collect::<Vec<_>>()
            .join(";"),
        "AssetsToImport" => split_items(value)
            .filter_map(|item| match item.matches('|').count() {
                0 => Some(format!("database[{}]", item)),
                1 => Some(format!("schema[{}]", item)),
                2 => Some(format!("table[{}]", item)),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(";"),
        _ => value.to_string(),
    }
}

fn split_items(value: &str) -> impl Iterator<Item = &str> {
    value.split(';').filter(|item| !item.is_empty())
}

/// Scope of a database import, derived from its prepared parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectParams {
    pub hostname: String,
    pub db_names: Vec<String>,
    pub schema_names: Vec<String>,
    pub table_names: Vec<String>,
    pub db_filter: String,
    pub schema_filter: String,
    pub table_filter: String,
}

impl ProjectParams {
    /// Collect host, filters and selected assets for a database import.
    /// File imports carry no project scope and yield `None`.
    pub fn from_metadata(
        asset_type: AssetType,
        connection: &[ImportParam],
        parameters: &[ImportParam],
    ) -> Option<Self> {
        if asset_type != AssetType::Database {
            return None;
        }

        let mut project = ProjectParams::default();
        if let Some(db) = connection.iter().rev().find(|p| p.id == "Database") {
            project.db_filter = db.value.clone();
        }

        for param in parameters {
            match param.id.as_str() {
                "AP_Host system name" => project.hostname = param.value.clone(),
                "SchemaNameFilter" => project.schema_filter = param.value.clone(),
                "TableNameFilter" => project.table_filter = param.value.clone(),
                "AssetsToImport" => {
                    for selector in split_items(&param.value) {
                        if let Some(name) = unwrap_selector(selector, "database") {
                            project.db_names.push(name.to_string());
                        } else if let Some(name) = unwrap_selector(selector, "schema") {
                            project.schema_names.push(name.to_string());
                        } else if let Some(name) = unwrap_selector(selector, "table") {
                            project.table_names.push(name.to_string());
                        }
                    }
                }
                _ => {}
            }
        }

        Some(project)
    }
}

/// `schema[DB|S]` with kind `schema` -> `DB|S`
fn unwrap_selector<'a>(selector: &'a str, kind: &str) -> Option<&'a str> {
    selector
        .strip_prefix(kind)?
        .strip_prefix('[')?
        .strip_suffix(']')
}
