use serde::{Deserialize, Serialize};

use super::super::domain::{BmiCategory, BodyFatCategory, Combination, Measurements, ProgramCode};
use super::classifier::{round_bmi, Classification};
use super::edge_case::{EdgeCaseResolution, REDIRECT_REASON};

/// Audit trail for a redirected impossible combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeCaseAudit {
    pub original_combination: Combination,
    pub redirected_combination: Combination,
    pub reason: String,
}

/// Program chosen for the final combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSelection {
    pub program_code: ProgramCode,
    pub is_default: bool,
}

/// Write-once outcome of a single resolution. Fields are only readable; a new record is the
/// only way to express a different decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRecord {
    inputs: Measurements,
    bmi: f64,
    bmi_category: BmiCategory,
    body_fat_category: BodyFatCategory,
    program_code: ProgramCode,
    is_default: bool,
    edge_case: Option<EdgeCaseAudit>,
}

impl DecisionRecord {
    pub fn inputs(&self) -> &Measurements {
        &self.inputs
    }

    /// BMI rounded to two decimals.
    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    pub fn bmi_category(&self) -> BmiCategory {
        self.bmi_category
    }

    pub fn body_fat_category(&self) -> BodyFatCategory {
        self.body_fat_category
    }

    pub fn combination(&self) -> Combination {
        Combination::new(self.bmi_category, self.body_fat_category)
    }

    pub fn program_code(&self) -> &ProgramCode {
        &self.program_code
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn edge_case(&self) -> Option<&EdgeCaseAudit> {
        self.edge_case.as_ref()
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "BMI {:.2} ({}), body fat {} -> program {}",
            self.bmi,
            self.bmi_category.label(),
            self.body_fat_category.label(),
            self.program_code
        );
        if self.is_default {
            summary.push_str(" (default program)");
        }
        if let Some(edge_case) = &self.edge_case {
            summary.push_str(&format!(
                "; {} redirected to {}",
                edge_case.original_combination, edge_case.redirected_combination
            ));
        }
        summary
    }
}

/// Assembles the record from the resolver's intermediate outputs. Pure; no lookups happen here.
pub fn build_decision_record(
    inputs: Measurements,
    classification: &Classification,
    edge_case: &EdgeCaseResolution,
    selection: ProgramSelection,
) -> DecisionRecord {
    let audit = match (edge_case.was_redirected, edge_case.original_combination) {
        (true, Some(original)) => Some(EdgeCaseAudit {
            original_combination: original,
            redirected_combination: edge_case.final_combination,
            reason: REDIRECT_REASON.to_string(),
        }),
        _ => None,
    };

    DecisionRecord {
        inputs,
        bmi: round_bmi(classification.bmi),
        bmi_category: edge_case.final_combination.bmi,
        body_fat_category: edge_case.final_combination.body_fat,
        program_code: selection.program_code,
        is_default: selection.is_default,
        edge_case: audit,
    }
}
