//! Template validation
//!
//! Checks that a filled template keeps the standardized field names and
//! contains the fields a usable character sheet needs. Names the mapping
//! table does not know are reported as warnings only.

use crate::naming::is_standardized_name;
use crate::{FieldMapping, ParsedFields};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Fields every character sheet must have
pub const CRITICAL_FIELDS: [&str; 11] = [
    "Character_Name",
    "Character_Class_Level",
    "Character_Race",
    "Ability_Strength",
    "Ability_Dexterity",
    "Ability_Constitution",
    "Ability_Intelligence",
    "Ability_Wisdom",
    "Ability_Charisma",
    "HP_Maximum",
    "Combat_ArmorClass",
];

/// A field name that does not follow the standardized convention
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingViolation {
    /// 1-based template line
    pub line: usize,
    pub field: String,
}

impl NamingViolation {
    pub fn reason(&self) -> &'static str {
        "Field name missing underscore (not standardized format)"
    }
}

/// Result of validating one template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Non-standardized names, in template order
    pub naming_violations: Vec<NamingViolation>,
    /// Critical fields absent from the template
    pub missing_critical: Vec<String>,
    /// Standardized names unknown to the mapping table, sorted (warnings)
    pub unexpected: Vec<String>,
    /// Distinct standardized names found
    pub found_fields: usize,
    /// Names in the mapping table
    pub expected_fields: usize,
}

impl ValidationReport {
    pub fn uses_standardized_format(&self) -> bool {
        self.naming_violations.is_empty()
    }

    pub fn has_critical_fields(&self) -> bool {
        self.missing_critical.is_empty()
    }

    /// Pass/fail; warnings never count
    pub fn is_valid(&self) -> bool {
        self.uses_standardized_format() && self.has_critical_fields()
    }
}

/// Validates parsed templates against a mapping table
#[derive(Debug, Clone)]
pub struct Validator<'a> {
    mapping: &'a FieldMapping,
    critical: Vec<String>,
}

impl<'a> Validator<'a> {
    /// Create a validator using [`CRITICAL_FIELDS`]
    pub fn new(mapping: &'a FieldMapping) -> Self {
        Self {
            mapping,
            critical: CRITICAL_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the critical field list
    pub fn with_critical_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.critical = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self, fields: &ParsedFields) -> ValidationReport {
        let mut report = ValidationReport {
            expected_fields: self.mapping.len(),
            ..Default::default()
        };
        let mut found: HashSet<&str> = HashSet::new();

        for field in fields {
            if is_standardized_name(&field.name) {
                found.insert(field.name.as_str());
            } else {
                report.naming_violations.push(NamingViolation {
                    line: field.line,
                    field: field.name.clone(),
                });
            }
        }

        report.missing_critical = self
            .critical
            .iter()
            .filter(|name| !found.contains(name.as_str()))
            .cloned()
            .collect();

        report.unexpected = found
            .iter()
            .filter(|name| {
                !self.mapping.contains(name) && !self.mapping.is_intentionally_unmapped(name)
            })
            .map(|name| name.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        report.found_fields = found.len();

        debug!(
            violations = report.naming_violations.len(),
            missing = report.missing_critical.len(),
            unexpected = report.unexpected.len(),
            "validated template"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_template;
    use pretty_assertions::assert_eq;

    fn complete_template() -> String {
        CRITICAL_FIELDS
            .iter()
            .map(|name| format!("{}: x\n", name))
            .collect()
    }

    #[test]
    fn test_complete_template_is_valid() {
        let mapping = FieldMapping::embedded().unwrap();
        let fields = parse_template(&complete_template());
        let report = Validator::new(&mapping).validate(&fields);

        assert!(report.is_valid());
        assert_eq!(report.found_fields, CRITICAL_FIELDS.len());
        assert!(report.unexpected.is_empty());
        assert_eq!(report.expected_fields, mapping.len());
    }

    #[test]
    fn test_renamed_field_reported() {
        let mapping = FieldMapping::embedded().unwrap();
        let text = complete_template().replace("Character_Name:", "Name:");
        let fields = parse_template(&text);
        let report = Validator::new(&mapping).validate(&fields);

        assert!(!report.is_valid());
        assert_eq!(
            report.naming_violations,
            vec![NamingViolation {
                line: 1,
                field: "Name".to_string(),
            }]
        );
        assert_eq!(report.missing_critical, vec!["Character_Name".to_string()]);
    }

    #[test]
    fn test_unknown_names_are_warnings() {
        let mapping = FieldMapping::embedded().unwrap();
        let text = format!(
            "{}Skill_Acrobatcs: +3\nSpellSlots_Level3_Total: 2\nAbility_Strenght: 9\n",
            complete_template()
        );
        let fields = parse_template(&text);
        let report = Validator::new(&mapping).validate(&fields);

        assert!(report.is_valid());
        assert_eq!(
            report.unexpected,
            vec!["Ability_Strenght".to_string(), "Skill_Acrobatcs".to_string()]
        );
    }

    #[test]
    fn test_custom_critical_fields() {
        let mapping = FieldMapping::new([("Character_Name", "CharacterName")]);
        let fields = parse_template("Character_Name: Aerion\n");
        let report = Validator::new(&mapping)
            .with_critical_fields(["Character_Name", "HP_Maximum"])
            .validate(&fields);

        assert_eq!(report.missing_critical, vec!["HP_Maximum".to_string()]);
    }

    #[test]
    fn test_empty_template() {
        let mapping = FieldMapping::embedded().unwrap();
        let report = Validator::new(&mapping).validate(&ParsedFields::new());

        assert!(report.uses_standardized_format());
        assert_eq!(report.missing_critical.len(), CRITICAL_FIELDS.len());
        assert!(!report.is_valid());
    }
}
