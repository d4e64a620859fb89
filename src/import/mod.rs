//! Import area management
//!
//! Drives the external `imam.sh` tool:
//! - [`params`] prepares parameter values and derives project parameters
//! - [`xml`] builds the parameter document handed to the tool with `-pf`
//! - [`runner`] abstracts the shell invocation
//! - [`area`] lists, creates, re-imports and refreshes import areas

pub mod area;
pub mod params;
pub mod runner;
pub mod xml;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bridge::BridgeError;
use crate::config::ConfigError;
use crate::template::TemplateError;

/// Error during an import area operation
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("IO error: {0}")]
    Io(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Command exited with code {code}: {stdout}")]
    CommandFailed { code: i32, stdout: String },

    #[error("No import area exists with the name '{0}'.")]
    UnknownImportArea(String),

    #[error("Stale period of {0} hours is out of range")]
    InvalidStalePeriod(i64),
}

impl From<std::io::Error> for ImportError {
    fn from(e: std::io::Error) -> Self {
        ImportError::Io(e.to_string())
    }
}

/// One parameter value destined for the parameter document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportParam {
    pub id: String,
    pub display_name: String,
    pub value: String,
}

impl ImportParam {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            value: value.into(),
        }
    }

    /// Password values are encrypted before they reach the parameter document
    pub fn is_password(&self) -> bool {
        self.id.to_uppercase().contains("PASSWORD")
    }
}

/// Everything needed to create an import area through one bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub bridge_name: String,
    pub area_name: String,
    pub description: String,
    /// Data connection parameters
    pub connection: Vec<ImportParam>,
    /// Bridge-specific parameters
    pub parameters: Vec<ImportParam>,
}

pub use area::{
    ImamClient, ImportAreaTimestamps, IngestOutcome, RefreshOutcome, RefreshPolicy, RefreshReport,
    parse_area_list,
};
pub use params::{ProjectParams, prepare_value};
pub use runner::{CommandOutput, CommandRunner, ShellCommandRunner};
pub use xml::ImportParameters;
