//! CLI error type

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::import::ImportError;
use crate::template::TemplateError;
use crate::workflow::WorkflowError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read file {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("{0} of {1} request(s) failed")]
    RequestsFailed(usize, usize),
}
