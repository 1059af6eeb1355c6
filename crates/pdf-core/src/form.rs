//! AcroForm field discovery and value assignment

use crate::text::{decode_text_string, encode_text_string};
use crate::{PdfError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;

/// Field flag bit for radio button groups (PDF 32000-1, table 226)
const FF_RADIO: i64 = 1 << 15;

/// Field flag bit for push buttons
const FF_PUSHBUTTON: i64 = 1 << 16;

/// Maximum nesting depth of the field hierarchy
const MAX_FIELD_DEPTH: usize = 32;

/// Values that switch a checkbox on
const CHECKED_VALUES: [&str; 5] = ["yes", "1", "true", "x", "✓"];

/// Kind of an interactive form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `/FT /Tx`
    Text,
    /// `/FT /Btn` without radio or push button flags
    Checkbox,
    /// `/FT /Btn` with the radio flag
    Radio,
    /// `/FT /Btn` with the push button flag
    PushButton,
    /// `/FT /Ch` (list and combo boxes)
    Choice,
    /// `/FT /Sig`
    Signature,
    /// Missing or unrecognized field type
    Unknown,
}

impl FieldKind {
    fn from_type(ft: Option<&[u8]>, flags: i64) -> Self {
        match ft {
            Some(b"Tx") => FieldKind::Text,
            Some(b"Btn") if flags & FF_PUSHBUTTON != 0 => FieldKind::PushButton,
            Some(b"Btn") if flags & FF_RADIO != 0 => FieldKind::Radio,
            Some(b"Btn") => FieldKind::Checkbox,
            Some(b"Ch") => FieldKind::Choice,
            Some(b"Sig") => FieldKind::Signature,
            _ => FieldKind::Unknown,
        }
    }
}

/// A terminal field of the document's interactive form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Fully qualified name (`Parent.Child`), exactly as stored in the PDF
    pub name: String,
    /// Object holding the field dictionary
    pub id: ObjectId,
    /// Field type, inherited from ancestors when not set on the field itself
    pub kind: FieldKind,
    /// Widget annotations; the field object itself when field and widget are merged
    pub widgets: Vec<ObjectId>,
}

/// Inheritable attributes passed down the field tree
#[derive(Clone, Copy)]
struct Inherited<'a> {
    name: Option<&'a str>,
    ft: Option<&'a [u8]>,
    flags: i64,
}

/// Follow a reference, or return direct objects unchanged
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

/// Catalog object ID from the trailer
pub(crate) fn catalog_id(doc: &Document) -> Result<ObjectId> {
    let root = doc
        .trailer
        .get(b"Root")
        .map_err(|_| PdfError::ParseError("Document trailer missing Root entry".to_string()))?;
    root.as_reference()
        .map_err(|_| PdfError::ParseError("Root is not a reference".to_string()))
}

/// The document's AcroForm dictionary, if it has one
fn acroform(doc: &Document) -> Result<Option<&Dictionary>> {
    let catalog = doc
        .get_object(catalog_id(doc)?)?
        .as_dict()
        .map_err(|_| PdfError::ParseError("Catalog is not a dictionary".to_string()))?;

    let Ok(form) = catalog.get(b"AcroForm") else {
        return Ok(None);
    };
    let form = resolve(doc, form)?
        .as_dict()
        .map_err(|_| PdfError::ParseError("AcroForm is not a dictionary".to_string()))?;
    Ok(Some(form))
}

/// Collect every terminal field of the interactive form, in document order
pub(crate) fn collect_fields(doc: &Document) -> Result<Vec<FormField>> {
    let Some(form) = acroform(doc)? else {
        return Ok(Vec::new());
    };
    let Ok(fields) = form.get(b"Fields") else {
        return Ok(Vec::new());
    };
    let fields = resolve(doc, fields)?
        .as_array()
        .map_err(|_| PdfError::ParseError("AcroForm Fields is not an array".to_string()))?;

    let root = Inherited {
        name: None,
        ft: None,
        flags: 0,
    };
    let ids: Vec<ObjectId> = fields.iter().filter_map(|f| f.as_reference().ok()).collect();

    // Some producers also list child fields at the top level; walk real roots
    // first so those children keep their qualified names
    let (roots, nested): (Vec<ObjectId>, Vec<ObjectId>) = ids.into_iter().partition(|id| {
        doc.get_object(*id)
            .ok()
            .and_then(|o| o.as_dict().ok())
            .map_or(true, |d| !d.has(b"Parent"))
    });

    let mut out = Vec::new();
    let mut visited = HashSet::new();
    let mut ancestors = Vec::new();
    for id in roots.into_iter().chain(nested) {
        walk(doc, id, root, &mut ancestors, &mut visited, &mut out)?;
    }

    Ok(out)
}

fn walk(
    doc: &Document,
    id: ObjectId,
    parent: Inherited<'_>,
    ancestors: &mut Vec<ObjectId>,
    visited: &mut HashSet<ObjectId>,
    out: &mut Vec<FormField>,
) -> Result<()> {
    if ancestors.len() > MAX_FIELD_DEPTH || ancestors.contains(&id) {
        return Err(PdfError::ParseError(format!(
            "Field hierarchy is cyclic or too deep at object {} {}",
            id.0, id.1
        )));
    }
    // Reached again through another reference
    if !visited.insert(id) {
        return Ok(());
    }

    let dict = doc
        .get_object(id)?
        .as_dict()
        .map_err(|_| PdfError::ParseError("Form field is not a dictionary".to_string()))?;

    let partial = dict
        .get(b"T")
        .ok()
        .and_then(|t| t.as_str().ok())
        .map(decode_text_string);
    let full_name = match (parent.name, partial) {
        (Some(p), Some(t)) => Some(format!("{}.{}", p, t)),
        (None, Some(t)) => Some(t),
        (p, None) => p.map(str::to_string),
    };
    let ft = dict
        .get(b"FT")
        .ok()
        .and_then(|o| o.as_name().ok())
        .or(parent.ft);
    let flags = dict
        .get(b"Ff")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(parent.flags);

    let kids: Vec<ObjectId> = match dict.get(b"Kids") {
        Ok(kids) => resolve(doc, kids)?
            .as_array()
            .map_err(|_| PdfError::ParseError("Kids is not an array".to_string()))?
            .iter()
            .filter_map(|k| k.as_reference().ok())
            .collect(),
        Err(_) => Vec::new(),
    };

    // Kids carrying a /T are child fields; kids without one are widgets
    let (child_fields, widgets): (Vec<ObjectId>, Vec<ObjectId>) =
        kids.into_iter().partition(|kid| {
            doc.get_object(*kid)
                .ok()
                .and_then(|o| o.as_dict().ok())
                .is_some_and(|d| d.has(b"T"))
        });

    if !child_fields.is_empty() {
        let inherited = Inherited {
            name: full_name.as_deref(),
            ft,
            flags,
        };
        ancestors.push(id);
        for child in child_fields {
            walk(doc, child, inherited, ancestors, visited, out)?;
        }
        ancestors.pop();
        return Ok(());
    }

    let Some(name) = full_name else {
        return Ok(());
    };
    out.push(FormField {
        name,
        id,
        kind: FieldKind::from_type(ft, flags),
        widgets: if widgets.is_empty() { vec![id] } else { widgets },
    });

    Ok(())
}

/// Mark the AcroForm so viewers rebuild field appearances from `/V`
pub(crate) fn set_need_appearances(doc: &mut Document) -> Result<()> {
    let catalog_id = catalog_id(doc)?;
    let form_ref = doc
        .get_object(catalog_id)?
        .as_dict()
        .map_err(|_| PdfError::ParseError("Catalog is not a dictionary".to_string()))?
        .get(b"AcroForm")
        .ok()
        .map(|o| o.as_reference().ok());

    let form = match form_ref {
        None => return Err(PdfError::NoFormFields),
        Some(Some(form_id)) => doc.get_object_mut(form_id)?,
        Some(None) => doc
            .get_object_mut(catalog_id)?
            .as_dict_mut()
            .map_err(|_| PdfError::ParseError("Catalog is not a dictionary".to_string()))?
            .get_mut(b"AcroForm")?,
    };
    form.as_dict_mut()
        .map_err(|_| PdfError::ParseError("AcroForm is not a dictionary".to_string()))?
        .set("NeedAppearances", Object::Boolean(true));

    Ok(())
}

/// Write a value into a field according to its kind
pub(crate) fn write_value(doc: &mut Document, field: &FormField, value: &str) -> Result<()> {
    match field.kind {
        FieldKind::Text | FieldKind::Choice | FieldKind::Unknown => {
            field_dict_mut(doc, field.id)?.set("V", encode_text_string(value));
        }
        FieldKind::Checkbox => {
            let checked = is_checked_value(value);
            let mut state = b"Off".to_vec();
            for widget in &field.widgets {
                let on = on_state(doc, *widget)?;
                let widget_state = if checked { on } else { b"Off".to_vec() };
                field_dict_mut(doc, *widget)?.set("AS", Object::Name(widget_state.clone()));
                state = widget_state;
            }
            field_dict_mut(doc, field.id)?.set("V", Object::Name(state));
        }
        FieldKind::Radio => {
            let wanted = value.trim().as_bytes();
            let states = field
                .widgets
                .iter()
                .map(|widget| Ok((*widget, on_state(doc, *widget)?)))
                .collect::<Result<Vec<_>>>()?;

            // Nothing is written unless one of the options matches
            if !states.iter().any(|(_, on)| on.as_slice() == wanted) {
                return Err(PdfError::FieldValueRejected {
                    field: field.name.clone(),
                    value: value.to_string(),
                });
            }

            for (widget, on) in states {
                let widget_state = if on.as_slice() == wanted {
                    on
                } else {
                    b"Off".to_vec()
                };
                field_dict_mut(doc, widget)?.set("AS", Object::Name(widget_state));
            }
            field_dict_mut(doc, field.id)?.set("V", Object::Name(wanted.to_vec()));
        }
        FieldKind::PushButton | FieldKind::Signature => {
            return Err(PdfError::FieldValueRejected {
                field: field.name.clone(),
                value: value.to_string(),
            });
        }
    }

    Ok(())
}

/// Read back the `/V` entry of a field as a string
pub(crate) fn read_value(doc: &Document, field: &FormField) -> Option<String> {
    let dict = doc.get_object(field.id).ok()?.as_dict().ok()?;
    match resolve(doc, dict.get(b"V").ok()?).ok()? {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

/// Whether a template value means "checked"
pub fn is_checked_value(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    CHECKED_VALUES.contains(&value.as_str())
}

fn field_dict_mut(doc: &mut Document, id: ObjectId) -> Result<&mut Dictionary> {
    doc.get_object_mut(id)?
        .as_dict_mut()
        .map_err(|_| PdfError::ParseError("Form field is not a dictionary".to_string()))
}

/// Name of a widget's "on" appearance state, `Yes` when the widget has none
fn on_state(doc: &Document, widget: ObjectId) -> Result<Vec<u8>> {
    let dict = doc
        .get_object(widget)?
        .as_dict()
        .map_err(|_| PdfError::ParseError("Widget is not a dictionary".to_string()))?;

    let normal = dict
        .get(b"AP")
        .ok()
        .and_then(|ap| resolve(doc, ap).ok())
        .and_then(|ap| ap.as_dict().ok())
        .and_then(|ap| ap.get(b"N").ok())
        .and_then(|n| resolve(doc, n).ok())
        .and_then(|n| n.as_dict().ok());

    let state = normal.and_then(|n| {
        n.iter()
            .map(|(key, _)| key)
            .find(|key| key.as_slice() != b"Off")
            .cloned()
    });

    Ok(state.unwrap_or_else(|| b"Yes".to_vec()))
}
