use crate::workflows::consultation::{BmiCategory, BodyFatCategory, Combination, ProgramCode};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::RulesImportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RuleAssignment {
    pub(crate) row: usize,
    pub(crate) combination: Combination,
    pub(crate) program_code: ProgramCode,
    pub(crate) active: bool,
}

pub(crate) fn parse_assignments<R: Read>(
    reader: R,
) -> Result<Vec<RuleAssignment>, RulesImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut assignments = Vec::new();

    for (index, record) in csv_reader.deserialize::<RuleRow>().enumerate() {
        // Header occupies line 1.
        let row = index + 2;
        let raw = record?;

        let bmi = BmiCategory::parse(&raw.bmi_category).ok_or_else(|| {
            RulesImportError::UnknownCategory {
                row,
                value: raw.bmi_category.clone(),
            }
        })?;
        let body_fat = BodyFatCategory::parse(&raw.body_fat_category).ok_or_else(|| {
            RulesImportError::UnknownCategory {
                row,
                value: raw.body_fat_category.clone(),
            }
        })?;

        assignments.push(RuleAssignment {
            row,
            combination: Combination::new(bmi, body_fat),
            program_code: ProgramCode::new(raw.program_code.to_ascii_uppercase()),
            active: raw.active.unwrap_or(true),
        });
    }

    Ok(assignments)
}

#[derive(Debug, Deserialize)]
struct RuleRow {
    bmi_category: String,
    body_fat_category: String,
    program_code: String,
    #[serde(default, deserialize_with = "flexible_bool")]
    active: Option<bool>,
}

fn flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(|value| value.trim().to_ascii_lowercase()) {
        None => Ok(None),
        Some(value) => match value.as_str() {
            "" => Ok(None),
            "true" | "yes" | "1" | "active" => Ok(Some(true)),
            "false" | "no" | "0" | "inactive" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean for active, found '{other}'"
            ))),
        },
    }
}
