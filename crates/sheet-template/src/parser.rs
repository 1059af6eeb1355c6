//! Character template text parsing
//!
//! A template is a sequence of fields:
//!
//! ```text
//! Character_Name: Aerion Ferris
//! Equipment_List: Longsword
//!   Shield
//!   Explorer's pack
//!
//! # comments and ===== rules end the current field
//! ```
//!
//! A field starts on an unindented line `Name: value`, where `Name` is the
//! text before the first colon and holds only ASCII letters, digits, `_` and
//! spaces. Following non-blank lines that do not start a field are appended
//! to the value, one per line. A blank line ends the field.

use crate::{Result, TemplateError};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

/// Value used by blank templates for an unfilled field
const EMPTY_PLACEHOLDER: &str = "[empty]";

/// Prefix used by blank templates for an unfilled multi-line field
const MULTILINE_PLACEHOLDER: &str = "[MULTI-LINE]";

/// Indentation used for continuation lines when serializing
const CONTINUATION_INDENT: &str = "  ";

/// One field read from a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedField {
    /// Field name as written, trimmed
    pub name: String,
    /// Value, lines joined with `\n`
    pub value: String,
    /// 1-based line number of the `Name:` line
    pub line: usize,
}

/// Fields of one template, in file order
///
/// Lookups by name return the last occurrence; iteration yields every
/// occurrence so diagnostics keep all line numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFields {
    fields: Vec<ParsedField>,
    index: HashMap<String, usize>,
}

impl ParsedFields {
    /// Create an empty field set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field
    pub fn push(&mut self, field: ParsedField) {
        self.index.insert(field.name.clone(), self.fields.len());
        self.fields.push(field);
    }

    /// Number of field occurrences
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value of the last field with this name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.field(name).map(|f| f.value.as_str())
    }

    /// Last field with this name
    pub fn field(&self, name: &str) -> Option<&ParsedField> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All field occurrences in file order
    pub fn iter(&self) -> std::slice::Iter<'_, ParsedField> {
        self.fields.iter()
    }

    /// Field names in file order (duplicates included)
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Fields carrying a real value (not empty, not a placeholder)
    pub fn fillable(&self) -> impl Iterator<Item = &ParsedField> {
        self.fields.iter().filter(|f| !is_placeholder(&f.value))
    }

    /// Serialize back to template text
    ///
    /// Continuation lines are indented so that values whose lines look like
    /// field starts or comments survive a reparse.
    pub fn to_template_string(&self) -> String {
        let mut out = String::new();
        for field in &self.fields {
            let mut lines = field.value.lines();
            out.push_str(&field.name);
            out.push(':');
            if let Some(first) = lines.next() {
                out.push(' ');
                out.push_str(first);
            }
            out.push('\n');
            for line in lines {
                out.push_str(CONTINUATION_INDENT);
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }
}

impl<'a> IntoIterator for &'a ParsedFields {
    type Item = &'a ParsedField;
    type IntoIter = std::slice::Iter<'a, ParsedField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl FromIterator<ParsedField> for ParsedFields {
    fn from_iter<I: IntoIterator<Item = ParsedField>>(iter: I) -> Self {
        let mut fields = Self::new();
        for field in iter {
            fields.push(field);
        }
        fields
    }
}

/// Whether a value is empty or a blank-template placeholder
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == EMPTY_PLACEHOLDER || value.starts_with(MULTILINE_PLACEHOLDER)
}

/// Parse template text into fields
pub fn parse_template(text: &str) -> ParsedFields {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut fields = ParsedFields::new();
    let mut current: Option<ParsedField> = None;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim_end();

        if line.is_empty() || is_comment(line) {
            if let Some(field) = current.take() {
                fields.push(field);
            }
            continue;
        }

        if let Some((name, rest)) = split_field_start(line) {
            if let Some(field) = current.take() {
                fields.push(field);
            }
            trace!(line = line_no, field = name, "field start");
            current = Some(ParsedField {
                name: name.to_string(),
                value: rest.trim().to_string(),
                line: line_no,
            });
            continue;
        }

        match current.as_mut() {
            Some(field) => {
                let continuation = line.trim();
                if !field.value.is_empty() {
                    field.value.push('\n');
                }
                field.value.push_str(continuation);
            }
            None => debug!(line = line_no, "ignoring text outside any field"),
        }
    }

    if let Some(field) = current.take() {
        fields.push(field);
    }

    debug!(fields = fields.len(), "parsed template");
    fields
}

/// Parse template bytes, rejecting input that is not UTF-8 text
pub fn parse_template_bytes(bytes: &[u8]) -> Result<ParsedFields> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| TemplateError::ParseError(format!("input is not UTF-8 text: {}", e)))?;

    if text.contains('\0') {
        return Err(TemplateError::ParseError(
            "input contains NUL bytes, not a text file".to_string(),
        ));
    }

    Ok(parse_template(text))
}

/// Read and parse a template file
pub fn parse_template_file<P: AsRef<Path>>(path: P) -> Result<ParsedFields> {
    let bytes = fs::read(path)?;
    parse_template_bytes(&bytes)
}

/// Comment (`#`) or section rule (`=`) line
fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with('=')
}

/// Split an unindented `Name: rest` line
///
/// Only the text before the first colon is considered, so a continuation
/// such as `Longsword (versatile): 1d10` is not mistaken for a field.
fn split_field_start(line: &str) -> Option<(&str, &str)> {
    if line.starts_with(char::is_whitespace) {
        return None;
    }

    let (name, rest) = line.split_once(':')?;
    let name = name.trim_end();
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' ');

    valid.then_some((name, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_fields() {
        let fields = parse_template("Character_Name: Aerion Ferris\nCharacter_Race: Half-Elf\n");

        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("Character_Name"), Some("Aerion Ferris"));
        assert_eq!(fields.get("Character_Race"), Some("Half-Elf"));
        assert_eq!(fields.field("Character_Race").unwrap().line, 2);
    }

    #[test]
    fn test_parse_multiline_value() {
        let text = "Equipment_List: Longsword\n  Shield\n  Explorer's pack\nHP_Maximum: 12\n";
        let fields = parse_template(text);

        assert_eq!(
            fields.get("Equipment_List"),
            Some("Longsword\nShield\nExplorer's pack")
        );
        assert_eq!(fields.get("HP_Maximum"), Some("12"));
    }

    #[test]
    fn test_value_on_following_lines() {
        let fields = parse_template("Backstory:\n  Raised by wolves.\n  Later, by monks.\n");
        assert_eq!(
            fields.get("Backstory"),
            Some("Raised by wolves.\nLater, by monks.")
        );
    }

    #[test]
    fn test_blank_line_ends_field() {
        let text = "Features_Traits: Darkvision\n\nFey Ancestry\nHP_Current: 9\n";
        let fields = parse_template(text);

        // The orphan line after the blank is not appended
        assert_eq!(fields.get("Features_Traits"), Some("Darkvision"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_colon_in_continuation() {
        let text = "Attacks_Spellcasting: Longsword\n  Note: versatile (1d10)\nLongsword (versatile): 1d10\n";
        let fields = parse_template(text);

        assert_eq!(fields.len(), 1);
        assert_eq!(
            fields.get("Attacks_Spellcasting"),
            Some("Longsword\nNote: versatile (1d10)\nLongsword (versatile): 1d10")
        );
    }

    #[test]
    fn test_value_keeps_later_colons() {
        let fields = parse_template("Spell_1: Shield: +5 AC until next turn\n");
        assert_eq!(fields.get("Spell_1"), Some("Shield: +5 AC until next turn"));
    }

    #[test]
    fn test_comments_and_rules_end_field() {
        let text = "=== CORE ===\nCharacter_Name: Aerion\n# abilities\nAbility_Strength: 10\n=====\n";
        let fields = parse_template(text);

        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("Character_Name"), Some("Aerion"));
        assert_eq!(fields.get("Ability_Strength"), Some("10"));
    }

    #[test]
    fn test_direct_names_with_spaces() {
        let fields = parse_template("Check Box 11: Yes\nRace : Half-Elf\n");
        assert_eq!(fields.get("Check Box 11"), Some("Yes"));
        assert_eq!(fields.get("Race"), Some("Half-Elf"));
    }

    #[test]
    fn test_duplicate_last_wins() {
        let fields = parse_template("HP_Current: 9\nHP_Current: 7\n");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("HP_Current"), Some("7"));
        assert_eq!(fields.field("HP_Current").unwrap().line, 2);
    }

    #[test]
    fn test_bom_and_crlf() {
        let fields = parse_template("\u{feff}Character_Name: Aerion\r\nHP_Maximum: 12\r\n");
        assert_eq!(fields.get("Character_Name"), Some("Aerion"));
        assert_eq!(fields.get("HP_Maximum"), Some("12"));
    }

    #[test]
    fn test_placeholders_not_fillable() {
        let fields = parse_template(
            "Character_Name: Aerion\nCharacter_Race: [empty]\nBackstory: [MULTI-LINE] write here\nHP_Temporary:\n",
        );

        assert_eq!(fields.len(), 4);
        let fillable: Vec<&str> = fields.fillable().map(|f| f.name.as_str()).collect();
        assert_eq!(fillable, vec!["Character_Name"]);
    }

    #[test]
    fn test_parse_bytes_rejects_binary() {
        assert!(matches!(
            parse_template_bytes(&[0xFF, 0xFE, 0x00, 0x41]),
            Err(TemplateError::ParseError(_))
        ));
        assert!(matches!(
            parse_template_bytes(b"%PDF-1.5\n\0\0"),
            Err(TemplateError::ParseError(_))
        ));
    }

    #[test]
    fn test_serialize_format() {
        let fields = parse_template("Equipment_List: Rope\n  Torch\nHP_Maximum: 12\n");
        assert_eq!(
            fields.to_template_string(),
            "Equipment_List: Rope\n  Torch\n\nHP_Maximum: 12\n\n"
        );
    }
}
