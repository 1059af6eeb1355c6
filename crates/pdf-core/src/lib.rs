//! PDF Core - Low-level PDF form manipulation
//!
//! This crate provides functionality for:
//! - Opening and saving PDF documents
//! - Enumerating AcroForm fields (with fully qualified names)
//! - Setting text, choice, checkbox and radio field values
//! - Writing the result atomically
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::PdfDocument;
//!
//! let mut doc = PdfDocument::open("dnd5e_blank_sheet.pdf")?;
//! doc.set_field_value("CharacterName", "Aerion Ferris")?;
//! doc.save("Aerion Ferris.pdf")?;
//! ```

mod document;
mod form;
mod text;

pub use document::PdfDocument;
pub use form::{is_checked_value, FieldKind, FormField};
pub use text::{decode_text_string, encode_text_string};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    OpenError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("No form fields found in PDF")]
    NoFormFields,

    #[error("Form field not found: {0:?}")]
    FieldNotFound(String),

    #[error("Field {field:?} cannot take value {value:?}")]
    FieldValueRejected { field: String, value: String },

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;
