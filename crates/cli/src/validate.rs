//! `charsheet validate`

use crate::cli::ValidateArgs;
use crate::report;
use anyhow::{Context, Result};
use sheet_template::{parse_template_file, FieldMapping, Validator};
use std::io;
use std::process::ExitCode;

pub fn run(args: &ValidateArgs, mapping: &FieldMapping) -> Result<ExitCode> {
    let path = &args.template;
    let fields = parse_template_file(path)
        .with_context(|| format!("Error reading template {}", path.display()))?;

    let report = Validator::new(mapping).validate(&fields);

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    report::write_validation_report(&mut io::stdout().lock(), &name, &report)?;

    Ok(if report.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
