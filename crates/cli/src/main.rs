//! charsheet - fill a D&D 5e PDF character sheet from a text template
//!
//! Usage:
//!   charsheet fill [TEMPLATE] [--output PATH] [--form BLANK.pdf]
//!   charsheet validate TEMPLATE
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

mod cli;
mod fill;
mod report;
mod validate;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use sheet_template::FieldMapping;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "charsheet=info,sheet_template=info,pdf_core=warn";
const VERBOSE_LOG_FILTER: &str = "charsheet=debug,sheet_template=debug,pdf_core=debug";

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    // Mapping problems abort before any template is read
    let mapping = load_mapping(cli.mappings.as_deref())?;

    match cli.command {
        Command::Fill(args) => fill::run(&args, &mapping),
        Command::Validate(args) => validate::run(&args, &mapping),
    }
}

fn load_mapping(path: Option<&Path>) -> Result<FieldMapping> {
    match path {
        Some(path) => FieldMapping::from_file(path)
            .with_context(|| format!("Cannot load field mappings from {}", path.display())),
        None => FieldMapping::embedded().context("Built-in field mappings are invalid"),
    }
}
