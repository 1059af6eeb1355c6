//! Human-readable reports printed on stdout

use sheet_template::{FillSummary, SkipReason, UnmatchedReason, ValidationReport};
use std::io::{self, Write};
use std::path::Path;

/// Items listed per section before collapsing into "... and N more"
const MAX_LISTED: usize = 10;

fn write_more<W: Write>(out: &mut W, total: usize) -> io::Result<()> {
    if total > MAX_LISTED {
        writeln!(out, "  ... and {} more", total - MAX_LISTED)?;
    }
    Ok(())
}

pub fn write_validation_report<W: Write>(
    out: &mut W,
    template_name: &str,
    report: &ValidationReport,
) -> io::Result<()> {
    writeln!(out, "Validating: {}\n", template_name)?;

    if report.is_valid() {
        writeln!(out, "✓ Template is VALID and uses standardized format")?;
        writeln!(out, "  Found {} standardized fields", report.found_fields)?;
    } else {
        writeln!(out, "✗ Template has VALIDATION ISSUES\n")?;
    }

    if !report.naming_violations.is_empty() {
        writeln!(
            out,
            "⚠ Found {} fields NOT using standardized format:",
            report.naming_violations.len()
        )?;
        for item in report.naming_violations.iter().take(MAX_LISTED) {
            writeln!(
                out,
                "  Line {}: '{}' - {}",
                item.line,
                item.field,
                item.reason()
            )?;
        }
        write_more(out, report.naming_violations.len())?;
        writeln!(out)?;
    }

    if !report.missing_critical.is_empty() {
        writeln!(
            out,
            "✗ Missing {} critical fields:",
            report.missing_critical.len()
        )?;
        for field in &report.missing_critical {
            writeln!(out, "  - {}", field)?;
        }
        writeln!(out)?;
    }

    if !report.unexpected.is_empty() {
        writeln!(
            out,
            "ℹ Found {} fields not in mappings:",
            report.unexpected.len()
        )?;
        for field in report.unexpected.iter().take(MAX_LISTED) {
            writeln!(out, "  - {}", field)?;
        }
        write_more(out, report.unexpected.len())?;
        writeln!(out)?;
    }

    if !report.uses_standardized_format() {
        writeln!(out, "⚠ THIS FILE DOES NOT USE THE STANDARDIZED TEMPLATE FORMAT")?;
        writeln!(
            out,
            "   Fill the standardized template by putting values after each field name"
        )?;
        writeln!(
            out,
            "   (Field_Name: value) WITHOUT changing the field names."
        )?;
    }

    Ok(())
}

pub fn write_fill_summary<W: Write>(
    out: &mut W,
    summary: &FillSummary,
    output: &Path,
) -> io::Result<()> {
    let translation = &summary.translation;
    let report = &summary.report;

    writeln!(out, "Parsed {} fields", summary.parsed)?;
    writeln!(out, "Naming: {:?}", translation.naming)?;

    let no_mapping: Vec<_> = translation
        .skipped
        .iter()
        .filter(|s| s.reason == SkipReason::NoMapping)
        .collect();
    let intentional = translation.skipped.len() - no_mapping.len();
    if intentional > 0 {
        writeln!(out, "Skipped {} fields with no PDF equivalent", intentional)?;
    }
    if !no_mapping.is_empty() {
        writeln!(out, "Warning: {} fields not in mapping:", no_mapping.len())?;
        for field in no_mapping.iter().take(MAX_LISTED) {
            writeln!(out, "  Line {}: {}", field.line, field.name)?;
        }
        write_more(out, no_mapping.len())?;
    }

    if !report.unmatched.is_empty() {
        writeln!(
            out,
            "Warning: {} fields not filled:",
            report.unmatched.len()
        )?;
        for field in report.unmatched.iter().take(MAX_LISTED) {
            match &field.reason {
                UnmatchedReason::NotInForm => writeln!(
                    out,
                    "  Line {}: {} (no PDF field {:?})",
                    field.line, field.source, field.pdf_name
                )?,
                UnmatchedReason::Rejected(why) => {
                    writeln!(out, "  Line {}: {} ({})", field.line, field.source, why)?
                }
            }
        }
        write_more(out, report.unmatched.len())?;
    }

    writeln!(out, "\nDone! Filled {} fields", report.filled.len())?;
    writeln!(out, "Saved: {}", output.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheet_template::NamingViolation;

    fn render(report: &ValidationReport) -> String {
        let mut out = Vec::new();
        write_validation_report(&mut out, "aerion.txt", report).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_valid_report() {
        let report = ValidationReport {
            found_fields: 42,
            expected_fields: 120,
            ..Default::default()
        };
        assert_eq!(
            render(&report),
            "Validating: aerion.txt\n\n\
             ✓ Template is VALID and uses standardized format\n  \
             Found 42 standardized fields\n"
        );
    }

    #[test]
    fn test_invalid_report_lists_items() {
        let report = ValidationReport {
            naming_violations: vec![NamingViolation {
                line: 1,
                field: "Name".to_string(),
            }],
            missing_critical: vec!["Character_Name".to_string()],
            ..Default::default()
        };
        let text = render(&report);

        assert!(text.contains("✗ Template has VALIDATION ISSUES"));
        assert!(text.contains(
            "  Line 1: 'Name' - Field name missing underscore (not standardized format)"
        ));
        assert!(text.contains("✗ Missing 1 critical fields:\n  - Character_Name"));
        assert!(text.contains("DOES NOT USE THE STANDARDIZED TEMPLATE FORMAT"));
    }

    #[test]
    fn test_long_lists_truncated() {
        let report = ValidationReport {
            unexpected: (0..13).map(|i| format!("Custom_Field{}", i)).collect(),
            ..Default::default()
        };
        let text = render(&report);

        assert!(text.contains("ℹ Found 13 fields not in mappings:"));
        assert!(text.contains("  ... and 3 more"));
        assert!(!text.contains("Custom_Field10\n"));
    }
}
