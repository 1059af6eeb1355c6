//! Sheet Template - character sheet text templates to PDF form values
//!
//! This crate provides:
//! - Parsing of `Field_Name: value` text templates (with multi-line values)
//! - The standardized-name to PDF-field-name mapping table
//! - Naming convention detection (standardized vs direct PDF names)
//! - Translation and filling of a PDF form through `pdf-core`
//! - Template validation (naming convention, critical fields, typos)
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::PdfDocument;
//! use sheet_template::{parse_template_file, FieldMapping, SheetFiller};
//!
//! let mapping = FieldMapping::from_file("field_mappings.json")?;
//! let fields = parse_template_file("Aerion_Ferris_PDF_Template.txt")?;
//! let mut doc = PdfDocument::open("dnd5e_blank_sheet.pdf")?;
//! let summary = SheetFiller::new(&mapping).fill(&fields, &mut doc)?;
//! doc.save("Aerion Ferris.pdf")?;
//! ```

pub mod filler;
pub mod mapping;
pub mod naming;
pub mod output;
pub mod parser;
pub mod translate;
pub mod validator;

pub use filler::{
    FillReport, FillSummary, FilledField, FormFiller, MatchKind, SheetFiller, UnmappedFieldWarning,
    UnmatchedReason,
};
pub use mapping::{FieldMapping, DEFAULT_UNMAPPED, EMBEDDED_MAPPINGS};
pub use naming::{is_standardized_name, DetectionStrategy, FieldNaming};
pub use output::{character_name, character_name_from_path, default_output_path};
pub use parser::{
    is_placeholder, parse_template, parse_template_bytes, parse_template_file, ParsedField,
    ParsedFields,
};
pub use translate::{SkipReason, SkippedField, TranslatedField, Translation, Translator};
pub use validator::{NamingViolation, ValidationReport, Validator, CRITICAL_FIELDS};

use thiserror::Error;

/// Errors that can occur during template processing
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to parse template: {0}")]
    ParseError(String),

    #[error("Failed to load field mappings: {0}")]
    MappingLoadError(String),

    #[error("PDF error: {0}")]
    PdfError(#[from] pdf_core::PdfError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
