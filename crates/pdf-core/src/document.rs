//! PDF Document wrapper

use crate::form::{self, FieldKind, FormField};
use crate::{PdfError, Result};
use lopdf::Document;
use std::collections::HashMap;
use std::io::{BufWriter, Write};
use std::path::Path;

/// PDF form document providing field-level operations
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Terminal form fields in document order
    fields: Vec<FormField>,
    /// Field name -> index into `fields`
    field_index: HashMap<String, usize>,
    /// Set once any field value has been written
    modified: bool,
}

impl PdfDocument {
    /// Open a PDF document from a file path
    ///
    /// # Arguments
    /// * `path` - Path to the PDF file
    ///
    /// # Example
    /// ```ignore
    /// let doc = PdfDocument::open("dnd5e_blank_sheet.pdf")?;
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let inner = Document::load(path).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Self::from_document(inner)
    }

    /// Open a PDF document from bytes
    ///
    /// # Arguments
    /// * `data` - PDF file bytes
    pub fn open_from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Self::from_document(inner)
    }

    fn from_document(inner: Document) -> Result<Self> {
        let fields = form::collect_fields(&inner)?;

        // First occurrence wins if a malformed form repeats a name
        let mut field_index = HashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            field_index.entry(field.name.clone()).or_insert(i);
        }

        Ok(Self {
            inner,
            fields,
            field_index,
            modified: false,
        })
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// All terminal form fields, in document order
    pub fn form_fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Whether the document has an interactive form with at least one field
    pub fn has_form_fields(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Field names exactly as stored in the PDF (including stray whitespace)
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Look up a field by its exact fully qualified name
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.field_index.get(name).map(|&i| &self.fields[i])
    }

    /// Set the value of a field by exact name
    ///
    /// Text and choice fields receive `value` as a text string. Checkboxes are
    /// switched on for `yes`, `1`, `true`, `x` or `✓` and off otherwise. Radio
    /// groups select the widget whose export name equals `value`.
    ///
    /// # Example
    /// ```ignore
    /// doc.set_field_value("CharacterName", "Aerion Ferris")?;
    /// doc.set_field_value("Check Box 11", "Yes")?;
    /// ```
    pub fn set_field_value(&mut self, name: &str, value: &str) -> Result<FieldKind> {
        let field = self
            .field(name)
            .cloned()
            .ok_or_else(|| PdfError::FieldNotFound(name.to_string()))?;

        form::write_value(&mut self.inner, &field, value)?;
        self.modified = true;

        Ok(field.kind)
    }

    /// Read the current `/V` value of a field
    pub fn field_value(&self, name: &str) -> Option<String> {
        self.field(name)
            .and_then(|field| form::read_value(&self.inner, field))
    }

    /// Save the document to a file
    ///
    /// The document is written to a temporary file in the destination
    /// directory and renamed over `path` only once fully written, so a
    /// failed save never leaves a partial PDF behind.
    ///
    /// # Arguments
    /// * `path` - Output file path
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.finalize()?;

        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::Builder::new()
            .prefix(".charsheet-")
            .suffix(".pdf.part")
            .tempfile_in(dir)?;

        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            self.inner
                .save_to(&mut writer)
                .map_err(|e| PdfError::SaveError(e.to_string()))?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;

        tmp.persist(path)
            .map_err(|e| PdfError::SaveError(e.error.to_string()))?;
        Ok(())
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.finalize()?;

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    fn finalize(&mut self) -> Result<()> {
        if self.modified {
            form::set_need_appearances(&mut self.inner)?;
        }
        Ok(())
    }

    /// Get a reference to the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }
}
