//! Writing translated values into the PDF form

use crate::naming::{DetectionStrategy, FieldNaming};
use crate::translate::{Translation, Translator};
use crate::{FieldMapping, ParsedFields, Result};
use pdf_core::{FieldKind, PdfDocument, PdfError};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// How a requested name was matched to a PDF field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Names are identical
    Exact,
    /// Names are equal once surrounding whitespace is stripped
    Trimmed,
}

/// A field that received a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilledField {
    /// Name used in the template
    pub source: String,
    /// Actual PDF field name
    pub pdf_field: String,
    pub match_kind: MatchKind,
    pub kind: FieldKind,
}

/// Why a translated field was not written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnmatchedReason {
    /// No PDF field matched, exactly or after trimming
    NotInForm,
    /// The PDF field exists but cannot take the value
    Rejected(String),
}

/// Non-fatal notice that a field could not be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmappedFieldWarning {
    /// Name used in the template
    pub source: String,
    /// PDF name that was looked for
    pub pdf_name: String,
    /// Template line of the field
    pub line: usize,
    pub reason: UnmatchedReason,
}

/// Outcome of writing a translation into a form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillReport {
    pub filled: Vec<FilledField>,
    pub unmatched: Vec<UnmappedFieldWarning>,
}

/// Resolves PDF field names and writes values into a form
pub struct FormFiller<'d> {
    doc: &'d mut PdfDocument,
    /// Whitespace-stripped name -> actual PDF name
    trimmed: HashMap<String, String>,
}

impl<'d> FormFiller<'d> {
    /// Prepare to fill a form
    ///
    /// Fails with [`PdfError::NoFormFields`] when the document has no form.
    pub fn new(doc: &'d mut PdfDocument) -> Result<Self> {
        if !doc.has_form_fields() {
            return Err(PdfError::NoFormFields.into());
        }

        let mut trimmed = HashMap::new();
        for name in doc.field_names() {
            trimmed
                .entry(name.trim().to_string())
                .or_insert_with(|| name.to_string());
        }

        Ok(Self { doc, trimmed })
    }

    /// Find the PDF field for a requested name
    ///
    /// Exact match first, then a match ignoring surrounding whitespace on
    /// both sides. No other normalization is attempted.
    pub fn resolve(&self, requested: &str) -> Option<(String, MatchKind)> {
        if self.doc.field(requested).is_some() {
            return Some((requested.to_string(), MatchKind::Exact));
        }
        self.trimmed
            .get(requested.trim())
            .map(|actual| (actual.clone(), MatchKind::Trimmed))
    }

    /// Write every translated field
    ///
    /// Fields that cannot be matched or are rejected by the PDF become
    /// warnings; only document-level failures abort.
    pub fn fill(&mut self, translation: &Translation) -> Result<FillReport> {
        let mut report = FillReport::default();

        for field in &translation.fields {
            let Some((pdf_field, match_kind)) = self.resolve(&field.pdf_name) else {
                warn!(field = %field.source, pdf_field = %field.pdf_name, "no matching PDF field");
                report.unmatched.push(UnmappedFieldWarning {
                    source: field.source.clone(),
                    pdf_name: field.pdf_name.clone(),
                    line: field.line,
                    reason: UnmatchedReason::NotInForm,
                });
                continue;
            };

            match self.doc.set_field_value(&pdf_field, &field.value) {
                Ok(kind) => {
                    debug!(field = %field.source, pdf_field = %pdf_field, ?match_kind, "filled");
                    report.filled.push(FilledField {
                        source: field.source.clone(),
                        pdf_field,
                        match_kind,
                        kind,
                    });
                }
                Err(e @ PdfError::FieldValueRejected { .. }) => {
                    warn!(field = %field.source, error = %e, "PDF field rejected value");
                    report.unmatched.push(UnmappedFieldWarning {
                        source: field.source.clone(),
                        pdf_name: pdf_field,
                        line: field.line,
                        reason: UnmatchedReason::Rejected(e.to_string()),
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(report)
    }
}

/// Everything that happened while filling one sheet
#[derive(Debug, Clone, PartialEq)]
pub struct FillSummary {
    /// Field occurrences in the template
    pub parsed: usize,
    pub translation: Translation,
    pub report: FillReport,
}

impl FillSummary {
    pub fn naming(&self) -> FieldNaming {
        self.translation.naming
    }
}

/// Translate-then-write pipeline for a parsed template
pub struct SheetFiller<'a> {
    translator: Translator<'a>,
}

impl<'a> SheetFiller<'a> {
    pub fn new(mapping: &'a FieldMapping) -> Self {
        Self {
            translator: Translator::new(mapping),
        }
    }

    /// Use a different naming detection strategy
    pub fn with_strategy(mut self, strategy: DetectionStrategy) -> Self {
        self.translator = self.translator.with_strategy(strategy);
        self
    }

    /// Translate `fields` and write them into `doc`
    ///
    /// The document is only modified in memory; saving is up to the caller.
    pub fn fill(&self, fields: &ParsedFields, doc: &mut PdfDocument) -> Result<FillSummary> {
        let mut filler = FormFiller::new(doc)?;
        let translation = self.translator.translate(fields);
        let report = filler.fill(&translation)?;

        info!(
            parsed = fields.len(),
            filled = report.filled.len(),
            skipped = translation.skipped.len(),
            unmatched = report.unmatched.len(),
            "filled character sheet"
        );

        Ok(FillSummary {
            parsed: fields.len(),
            translation,
            report,
        })
    }
}
