//! `charsheet fill`

use crate::cli::FillArgs;
use crate::report;
use anyhow::{Context, Result};
use pdf_core::PdfDocument;
use sheet_template::{
    default_output_path, parse_template_file, FieldMapping, ParsedFields, SheetFiller,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

pub fn run(args: &FillArgs, mapping: &FieldMapping) -> Result<ExitCode> {
    let input = match &args.input {
        Some(path) => path.clone(),
        None => match prompt_for_template()? {
            Some(path) => path,
            None => {
                println!("Cancelled.");
                return Ok(ExitCode::SUCCESS);
            }
        },
    };
    info!(template = %input.display(), "selected template");

    let fields = parse_template_file(&input)
        .with_context(|| format!("Error parsing template {}", input.display()))?;

    let mut doc = PdfDocument::open(&args.form)
        .with_context(|| format!("Cannot open blank PDF {}", args.form.display()))?;

    let summary = SheetFiller::new(mapping)
        .with_strategy(args.detection())
        .fill(&fields, &mut doc)
        .context("Error filling PDF")?;

    let output = output_path(args.output.as_deref(), &input, &fields);
    info!(output = %output.display(), "writing filled sheet");
    doc.save(&output)
        .with_context(|| format!("Error writing {}", output.display()))?;

    report::write_fill_summary(&mut io::stdout().lock(), &summary, &output)?;
    Ok(ExitCode::SUCCESS)
}

/// Explicit file, file inside an explicit directory, or the default next to the input
fn output_path(requested: Option<&Path>, input: &Path, fields: &ParsedFields) -> PathBuf {
    let default = default_output_path(input, fields);
    match requested {
        Some(dir) if dir.is_dir() => match default.file_name() {
            Some(name) => dir.join(name),
            None => dir.join("character.pdf"),
        },
        Some(file) => file.to_path_buf(),
        None => default,
    }
}

/// Ask for a template path on stdin; `None` when the answer is empty
fn prompt_for_template() -> Result<Option<PathBuf>> {
    print!("Character template file: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    // Paths pasted from a file manager often arrive quoted
    let answer = line.trim().trim_matches(|c: char| c == '"' || c == '\'');
    if answer.is_empty() {
        return Ok(None);
    }
    Ok(Some(PathBuf::from(answer)))
}
