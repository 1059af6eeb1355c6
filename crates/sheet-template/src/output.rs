//! Output file naming

use crate::parser::is_placeholder;
use crate::ParsedFields;
use std::path::{Path, PathBuf};

/// Suffixes stripped from template file stems, first match wins
const TEMPLATE_SUFFIXES: [&str; 6] = [
    "_PDF_Template",
    "_PDF_template",
    "_Template",
    "_template",
    "Template",
    "template",
];

/// Fields holding the character's name, standardized first
const NAME_FIELDS: [&str; 2] = ["Character_Name", "CharacterName"];

/// Name used when nothing better is available
const FALLBACK_NAME: &str = "character";

/// Character name from the template's name field, first line only
pub fn character_name(fields: &ParsedFields) -> Option<&str> {
    NAME_FIELDS
        .iter()
        .filter_map(|name| fields.get(name))
        .find(|value| !is_placeholder(value))
        .and_then(|value| value.lines().next())
        .map(str::trim)
}

/// Character name derived from a template file name
///
/// `Aerion_Ferris_PDF_Template.txt` becomes `Aerion Ferris`.
pub fn character_name_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stem = TEMPLATE_SUFFIXES
        .iter()
        .find_map(|suffix| stem.strip_suffix(suffix))
        .unwrap_or(stem.as_str());

    stem.replace('_', " ").trim().to_string()
}

/// Replace characters that are unsafe in file names
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let cleaned = cleaned.trim().trim_matches('.').trim();
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Default destination: `<input dir>/<character name>.pdf`
pub fn default_output_path(input: &Path, fields: &ParsedFields) -> PathBuf {
    let name = character_name(fields)
        .map(str::to_string)
        .unwrap_or_else(|| character_name_from_path(input));

    let dir = match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    dir.join(format!("{}.pdf", sanitize_file_name(&name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_template;

    #[test]
    fn test_character_name_from_path() {
        assert_eq!(
            character_name_from_path(Path::new("Aerion_Ferris_PDF_Template.txt")),
            "Aerion Ferris"
        );
        assert_eq!(
            character_name_from_path(Path::new("sheets/Character_Sheet_PDF_Template.txt")),
            "Character Sheet"
        );
        assert_eq!(
            character_name_from_path(Path::new("My Character Name.txt")),
            "My Character Name"
        );
        assert_eq!(
            character_name_from_path(Path::new("Brannor_template.txt")),
            "Brannor"
        );
    }

    #[test]
    fn test_character_name_field() {
        let fields = parse_template("Character_Name: Aerion Ferris\n");
        assert_eq!(character_name(&fields), Some("Aerion Ferris"));

        let direct = parse_template("CharacterName: Brannor\n");
        assert_eq!(character_name(&direct), Some("Brannor"));

        let empty = parse_template("Character_Name: [empty]\n");
        assert_eq!(character_name(&empty), None);
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Aerion Ferris"), "Aerion Ferris");
        assert_eq!(sanitize_file_name("Kael/the:Bold?"), "Kael_the_Bold_");
        assert_eq!(sanitize_file_name("  .. "), "character");
    }

    #[test]
    fn test_default_output_path() {
        let fields = parse_template("Character_Name: Aerion Ferris\n");
        assert_eq!(
            default_output_path(Path::new("sheets/aerion.txt"), &fields),
            PathBuf::from("sheets/Aerion Ferris.pdf")
        );

        let unnamed = ParsedFields::new();
        assert_eq!(
            default_output_path(Path::new("Brannor_PDF_Template.txt"), &unnamed),
            PathBuf::from("./Brannor.pdf")
        );
    }
}
