//! imam-cli: automation for metadata imports
//!
//! Prepares delimited data files (header rows, OSH schema sidecars), builds
//! bridge parameter templates and drives `imam.sh` to create, list and
//! refresh import areas.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use imam_cli::cli::commands::data_file::{DataFileArgs, handle_header, handle_sidecar};
use imam_cli::cli::commands::import::{
    IngestArgs, RefreshArgs, handle_areas, handle_ingest, handle_refresh,
};
use imam_cli::cli::commands::template::{TemplateArgs, handle_list_bridges, handle_template};
use imam_cli::config::EnvironmentContext;
use imam_cli::schema::DEFAULT_DELIMITER;

#[derive(Parser)]
#[command(name = "imam-cli")]
#[command(author, version, about = "Automation for metadata imports", long_about = None)]
struct Cli {
    /// TOML file describing the import tool installation
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Authorisation file for the import tool (overrides config)
    #[arg(long, global = true)]
    auth_file: Option<PathBuf>,

    /// Engine tier host (overrides config)
    #[arg(long, global = true)]
    engine: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepend a header row to a data file
    Header {
        /// Data file that should have a header injected
        #[arg(short, long)]
        file: PathBuf,

        /// SQL file containing the table's DDL
        #[arg(short, long)]
        sql: Option<PathBuf>,

        /// Delimiter between columns
        #[arg(short, long, default_value = DEFAULT_DELIMITER)]
        delimiter: String,
    },

    /// Create an OSH schema sidecar for a data file
    Sidecar {
        /// Data file for which the sidecar should be created
        #[arg(short, long)]
        file: PathBuf,

        /// SQL file containing the table's DDL
        #[arg(short, long)]
        sql: Option<PathBuf>,

        /// Delimiter between columns
        #[arg(short, long, default_value = DEFAULT_DELIMITER)]
        delimiter: String,
    },

    /// Write a parameter template workbook for one or more bridges
    Template {
        /// Workbook file to write
        #[arg(short, long, required_unless_present = "list")]
        output: Option<PathBuf>,

        /// Bridge to include (repeatable); all implemented bridges by default
        #[arg(short, long = "bridge")]
        bridges: Vec<String>,

        /// List recognised bridges instead
        #[arg(long)]
        list: bool,
    },

    /// Create or update the import areas described by a filled-in workbook
    Ingest {
        /// Workbook file
        #[arg(short, long)]
        workbook: PathBuf,
    },

    /// Re-import stale import areas
    Refresh {
        /// Only refresh this import area
        #[arg(short, long)]
        area: Option<String>,

        /// Skip areas shared within this many hours
        #[arg(short = 't', long, value_parser = clap::value_parser!(i64).range(0..))]
        hours: Option<i64>,

        /// Stop at the first failed refresh
        #[arg(long)]
        stop_on_error: bool,
    },

    /// List import areas
    Areas,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn load_context(cli: &Cli) -> Result<EnvironmentContext> {
    let mut context = EnvironmentContext::load(cli.config.as_deref())?;
    if let Some(auth_file) = &cli.auth_file {
        context = context.with_auth_file(auth_file);
    }
    if let Some(engine) = &cli.engine {
        context = context.with_engine(engine);
    }
    Ok(context)
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Header {
            file,
            sql,
            delimiter,
        } => handle_header(&DataFileArgs {
            file: file.clone(),
            sql: sql.clone(),
            delimiter: delimiter.clone(),
        })?,
        Commands::Sidecar {
            file,
            sql,
            delimiter,
        } => handle_sidecar(&DataFileArgs {
            file: file.clone(),
            sql: sql.clone(),
            delimiter: delimiter.clone(),
        })?,
        Commands::Template { list: true, .. } => handle_list_bridges()?,
        Commands::Template {
            output, bridges, ..
        } => {
            let output = output
                .clone()
                .ok_or_else(|| anyhow::anyhow!("--output is required"))?;
            handle_template(&TemplateArgs {
                output,
                bridges: bridges.clone(),
            })?
        }
        Commands::Ingest { workbook } => handle_ingest(
            &IngestArgs {
                workbook: workbook.clone(),
            },
            load_context(&cli)?,
        )?,
        Commands::Refresh {
            area,
            hours,
            stop_on_error,
        } => handle_refresh(
            &RefreshArgs {
                area: area.clone(),
                hours: *hours,
                stop_on_error: *stop_on_error,
            },
            load_context(&cli)?,
        )?,
        Commands::Areas => handle_areas(load_context(&cli)?)?,
    }
    Ok(())
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
