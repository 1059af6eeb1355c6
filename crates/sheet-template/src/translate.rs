//! Translation of template field names into PDF field names

use crate::naming::{DetectionStrategy, FieldNaming};
use crate::{FieldMapping, ParsedFields};
use tracing::{debug, info};

/// A template value bound for a PDF field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedField {
    /// Name used in the template
    pub source: String,
    /// Target PDF field name (before whitespace-tolerant matching)
    pub pdf_name: String,
    pub value: String,
    /// Template line of the field
    pub line: usize,
}

/// Why a template field was not translated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The field is listed as having no PDF counterpart
    IntentionallyUnmapped,
    /// The mapping table has no entry (possible typo)
    NoMapping,
}

/// A template field left out of the fill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedField {
    pub name: String,
    pub line: usize,
    pub reason: SkipReason,
}

/// Result of translating a template
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    /// Detected naming convention
    pub naming: FieldNaming,
    /// Fields to write, in template order
    pub fields: Vec<TranslatedField>,
    /// Fields without a mapping entry
    pub skipped: Vec<SkippedField>,
    /// Fields left empty or holding a placeholder
    pub placeholders: usize,
}

/// Translates parsed templates using a mapping table
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    mapping: &'a FieldMapping,
    strategy: DetectionStrategy,
}

impl<'a> Translator<'a> {
    /// Create a translator with the default detection strategy
    pub fn new(mapping: &'a FieldMapping) -> Self {
        Self {
            mapping,
            strategy: DetectionStrategy::default(),
        }
    }

    /// Use a different naming detection strategy
    pub fn with_strategy(mut self, strategy: DetectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Translate every fillable field of a template
    ///
    /// In direct mode names pass through unchanged. In standardized mode each
    /// name is looked up in the mapping table; names without an entry are
    /// recorded in [`Translation::skipped`] rather than failing.
    pub fn translate(&self, fields: &ParsedFields) -> Translation {
        let naming = FieldNaming::detect(fields, self.strategy);
        let mut translated = Vec::new();
        let mut skipped = Vec::new();

        for field in fields.fillable() {
            let pdf_name = match naming {
                FieldNaming::Direct => field.name.as_str(),
                FieldNaming::Standardized => match self.mapping.pdf_name(&field.name) {
                    Some(pdf_name) => pdf_name,
                    None => {
                        let reason = if self.mapping.is_intentionally_unmapped(&field.name) {
                            SkipReason::IntentionallyUnmapped
                        } else {
                            SkipReason::NoMapping
                        };
                        debug!(field = %field.name, ?reason, "no PDF field for template field");
                        skipped.push(SkippedField {
                            name: field.name.clone(),
                            line: field.line,
                            reason,
                        });
                        continue;
                    }
                },
            };

            translated.push(TranslatedField {
                source: field.name.clone(),
                pdf_name: pdf_name.to_string(),
                value: field.value.clone(),
                line: field.line,
            });
        }

        let placeholders = fields.len() - fields.fillable().count();
        info!(
            ?naming,
            translated = translated.len(),
            skipped = skipped.len(),
            placeholders,
            "translated template fields"
        );

        Translation {
            naming,
            fields: translated,
            skipped,
            placeholders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_template;
    use pretty_assertions::assert_eq;

    fn mapping() -> FieldMapping {
        FieldMapping::new([
            ("Character_Name", "CharacterName"),
            ("Character_Race", "Race"),
            ("HP_Maximum", "HPMax"),
        ])
    }

    #[test]
    fn test_translate_standardized() {
        let mapping = mapping();
        let fields = parse_template("Character_Name: Aerion Ferris\nHP_Maximum: 12\n");
        let translation = Translator::new(&mapping).translate(&fields);

        assert_eq!(translation.naming, FieldNaming::Standardized);
        assert_eq!(
            translation.fields,
            vec![
                TranslatedField {
                    source: "Character_Name".to_string(),
                    pdf_name: "CharacterName".to_string(),
                    value: "Aerion Ferris".to_string(),
                    line: 1,
                },
                TranslatedField {
                    source: "HP_Maximum".to_string(),
                    pdf_name: "HPMax".to_string(),
                    value: "12".to_string(),
                    line: 2,
                },
            ]
        );
        assert!(translation.skipped.is_empty());
    }

    #[test]
    fn test_translate_skips_unmapped() {
        let mapping = mapping();
        let fields = parse_template(
            "Character_Name: Aerion\nSpellSlots_Level3_Total: 2\nCharacter_Rcae: Elf\n",
        );
        let translation = Translator::new(&mapping).translate(&fields);

        assert_eq!(translation.fields.len(), 1);
        assert_eq!(
            translation.skipped,
            vec![
                SkippedField {
                    name: "SpellSlots_Level3_Total".to_string(),
                    line: 2,
                    reason: SkipReason::IntentionallyUnmapped,
                },
                SkippedField {
                    name: "Character_Rcae".to_string(),
                    line: 3,
                    reason: SkipReason::NoMapping,
                },
            ]
        );
    }

    #[test]
    fn test_translate_direct_passthrough() {
        let mapping = mapping();
        let fields = parse_template("CharacterName: Aerion\nRace : Elf\nHPMax: 12\n");
        let translation = Translator::new(&mapping).translate(&fields);

        assert_eq!(translation.naming, FieldNaming::Direct);
        let names: Vec<&str> = translation
            .fields
            .iter()
            .map(|f| f.pdf_name.as_str())
            .collect();
        assert_eq!(names, vec!["CharacterName", "Race", "HPMax"]);
    }

    #[test]
    fn test_placeholders_counted() {
        let mapping = mapping();
        let fields = parse_template("Character_Name: Aerion\nCharacter_Race: [empty]\nHP_Maximum:\n");
        let translation = Translator::new(&mapping).translate(&fields);

        assert_eq!(translation.fields.len(), 1);
        assert_eq!(translation.placeholders, 2);
    }
}
