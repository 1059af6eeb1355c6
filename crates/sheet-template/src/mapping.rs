//! Standardized field name to PDF field name mapping table

use crate::{Result, TemplateError};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Embedded mapping table for the D&D 5e fillable character sheet
pub const EMBEDDED_MAPPINGS: &str = include_str!("../data/field_mappings.json");

/// Standardized fields known to have no PDF counterpart
pub const DEFAULT_UNMAPPED: [&str; 9] = [
    "SpellSlots_Level1_Total",
    "SpellSlots_Level2_Total",
    "SpellSlots_Level3_Total",
    "SpellSlots_Level4_Total",
    "SpellSlots_Level5_Total",
    "SpellSlots_Level6_Total",
    "SpellSlots_Level7_Total",
    "SpellSlots_Level8_Total",
    "SpellSlots_Level9_Total",
];

/// Free-text comment key, ignored
const COMMENT_KEY: &str = "comment";

/// Key listing intentionally unmapped fields
const UNMAPPED_KEY: &str = "NOTE_Unmapped_Fields";

/// Immutable mapping from standardized names to PDF field names
///
/// Keys are unique. Values need not be: several standardized names may
/// target the same PDF field.
#[derive(Debug, Clone, Default)]
pub struct FieldMapping {
    entries: HashMap<String, String>,
    unmapped: HashSet<String>,
}

/// JSON object entries in document order, duplicates preserved
struct RawEntries(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for RawEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object of field name mappings")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<RawEntries, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, serde_json::Value>()? {
                    entries.push(entry);
                }
                Ok(RawEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl FieldMapping {
    /// Build a mapping from `(standardized, pdf)` pairs
    ///
    /// The built-in unmapped list is included.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            unmapped: DEFAULT_UNMAPPED.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Load the embedded D&D 5e mapping table
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_MAPPINGS)
    }

    /// Load a mapping table from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TemplateError::MappingLoadError(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Load a mapping table from JSON text
    ///
    /// The `comment` key is ignored. `NOTE_Unmapped_Fields` may hold an array
    /// of field names that intentionally have no PDF counterpart; any other
    /// value under it is a note and is ignored.
    pub fn from_json(json: &str) -> Result<Self> {
        let RawEntries(raw) = serde_json::from_str(json)
            .map_err(|e| TemplateError::MappingLoadError(e.to_string()))?;

        let mut mapping = Self::new(std::iter::empty::<(String, String)>());
        let mut seen = HashSet::new();

        for (key, value) in raw {
            if key == COMMENT_KEY {
                continue;
            }
            if key == UNMAPPED_KEY {
                if let serde_json::Value::Array(items) = value {
                    for item in items {
                        let serde_json::Value::String(name) = item else {
                            return Err(TemplateError::MappingLoadError(format!(
                                "{} must list field names as strings",
                                UNMAPPED_KEY
                            )));
                        };
                        mapping.unmapped.insert(name);
                    }
                }
                continue;
            }

            match value {
                serde_json::Value::String(pdf_name) => {
                    if !seen.insert(key.clone()) {
                        return Err(TemplateError::MappingLoadError(format!(
                            "duplicate mapping for {:?}",
                            key
                        )));
                    }
                    if pdf_name.is_empty() {
                        mapping.unmapped.insert(key);
                    } else {
                        mapping.entries.insert(key, pdf_name);
                    }
                }
                other => {
                    return Err(TemplateError::MappingLoadError(format!(
                        "mapping for {:?} must be a string, found {}",
                        key, other
                    )));
                }
            }
        }

        debug!(
            entries = mapping.entries.len(),
            unmapped = mapping.unmapped.len(),
            "loaded field mappings"
        );
        Ok(mapping)
    }

    /// Add names that intentionally have no PDF counterpart
    pub fn with_unmapped<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unmapped.extend(names.into_iter().map(Into::into));
        self
    }

    /// PDF field name for a standardized name
    pub fn pdf_name(&self, standardized: &str) -> Option<&str> {
        self.entries.get(standardized).map(String::as_str)
    }

    /// Whether the table has an entry for a standardized name
    pub fn contains(&self, standardized: &str) -> bool {
        self.entries.contains_key(standardized)
    }

    /// Whether a name is known to have no PDF counterpart
    pub fn is_intentionally_unmapped(&self, standardized: &str) -> bool {
        self.unmapped.contains(standardized)
    }

    /// Number of mapped names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mapped standardized names, unordered
    pub fn standard_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let mapping = FieldMapping::from_json(
            r#"{
                "comment": "Standardized names to PDF names",
                "Character_Name": "CharacterName",
                "Character_Race": "Race ",
                "Character_Name_Page2": "CharacterName"
            }"#,
        )
        .unwrap();

        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.pdf_name("Character_Name"), Some("CharacterName"));
        assert_eq!(mapping.pdf_name("Character_Race"), Some("Race "));
        assert_eq!(mapping.pdf_name("comment"), None);
    }

    #[test]
    fn test_unmapped_list() {
        let mapping = FieldMapping::from_json(
            r#"{
                "Character_Name": "CharacterName",
                "NOTE_Unmapped_Fields": ["Spell_Level9_Slot_Used"],
                "Cantrip_Notes": ""
            }"#,
        )
        .unwrap();

        assert_eq!(mapping.len(), 1);
        assert!(mapping.is_intentionally_unmapped("Spell_Level9_Slot_Used"));
        assert!(mapping.is_intentionally_unmapped("Cantrip_Notes"));
        assert!(mapping.is_intentionally_unmapped("SpellSlots_Level3_Total"));
        assert!(!mapping.is_intentionally_unmapped("Character_Name"));
    }

    #[test]
    fn test_unmapped_note_text_ignored() {
        let mapping = FieldMapping::from_json(
            r#"{ "NOTE_Unmapped_Fields": "spell slot totals have no PDF field" }"#,
        )
        .unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result =
            FieldMapping::from_json(r#"{ "Character_Name": "A", "Character_Name": "B" }"#);
        assert!(matches!(result, Err(TemplateError::MappingLoadError(_))));
    }

    #[test]
    fn test_malformed_rejected() {
        assert!(matches!(
            FieldMapping::from_json("not json"),
            Err(TemplateError::MappingLoadError(_))
        ));
        assert!(matches!(
            FieldMapping::from_json(r#"["Character_Name"]"#),
            Err(TemplateError::MappingLoadError(_))
        ));
        assert!(matches!(
            FieldMapping::from_json(r#"{ "HP_Maximum": 12 }"#),
            Err(TemplateError::MappingLoadError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = FieldMapping::from_file("/nonexistent/field_mappings.json");
        assert!(matches!(result, Err(TemplateError::MappingLoadError(_))));
    }

    #[test]
    fn test_embedded_table() {
        let mapping = FieldMapping::embedded().unwrap();
        for critical in crate::CRITICAL_FIELDS {
            assert!(mapping.contains(critical), "missing {}", critical);
        }
        assert_eq!(mapping.pdf_name("Character_Name"), Some("CharacterName"));
        assert!(mapping.is_intentionally_unmapped("SpellSlots_Level1_Total"));
    }
}
