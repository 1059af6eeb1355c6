//! Naming convention detection
//!
//! Templates either use standardized names (`Character_Name`), which go
//! through the mapping table, or the PDF's own field names (`CharacterName`),
//! which are written as-is.

use crate::ParsedFields;
use tracing::debug;

/// Default share of underscored names for [`DetectionStrategy::Fraction`]
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Default number of names inspected by [`DetectionStrategy::Sample`]
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// Whether a field name follows the standardized `Underscore_Case` convention
pub fn is_standardized_name(name: &str) -> bool {
    name.contains('_')
}

/// How a template's naming convention is decided
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectionStrategy {
    /// Standardized when at least `threshold` of all field names contain an underscore
    Fraction { threshold: f64 },
    /// Standardized when any of the first `size` field names contains an underscore
    Sample { size: usize },
}

impl Default for DetectionStrategy {
    fn default() -> Self {
        DetectionStrategy::Fraction {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Naming convention of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldNaming {
    /// Names are translated through the mapping table
    Standardized,
    /// Names are literal PDF field names
    Direct,
}

impl FieldNaming {
    /// Detect the naming convention of a parsed template
    ///
    /// Only fields carrying a value are considered; placeholders are ignored.
    /// A template with no such field is [`FieldNaming::Direct`].
    pub fn detect(fields: &ParsedFields, strategy: DetectionStrategy) -> Self {
        let standardized = match strategy {
            DetectionStrategy::Fraction { threshold } => {
                let total = fields.fillable().count();
                let underscored = fields
                    .fillable()
                    .filter(|f| is_standardized_name(&f.name))
                    .count();
                debug!(total, underscored, threshold, "detecting field naming");
                total > 0 && underscored as f64 / total as f64 >= threshold
            }
            DetectionStrategy::Sample { size } => {
                fields
                    .fillable()
                    .take(size)
                    .any(|f| is_standardized_name(&f.name))
            }
        };

        if standardized {
            FieldNaming::Standardized
        } else {
            FieldNaming::Direct
        }
    }
}
