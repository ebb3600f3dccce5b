use serde::{Deserialize, Serialize};

use super::domain::{Combination, ProgramCode};
use super::engine::RuleTable;

/// Administratively managed association between a combination and a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub combination: Combination,
    pub program_code: ProgramCode,
    /// Lower values win when several active rules match the same combination.
    pub priority: u8,
    pub active: bool,
}

/// Content bundle reference. Only the code and active flag matter to resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub code: ProgramCode,
    pub name: String,
    pub active: bool,
}

impl Program {
    pub fn new(code: ProgramCode, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            active: true,
        }
    }
}

/// Read side of the rule/program persistence the resolver consumes.
pub trait RuleStore: Send + Sync {
    fn active_rule(&self, combination: Combination) -> Result<Option<Rule>, StoreError>;
    fn program(&self, code: &ProgramCode) -> Result<Option<Program>, StoreError>;

    /// The designated fallback program, only when it exists and is active.
    fn default_program(&self) -> Result<Option<Program>, StoreError> {
        let code = RuleTable::canonical().default_program_code();
        Ok(self.program(&code)?.filter(|program| program.active))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("rule store unavailable: {0}")]
    Unavailable(String),
}

/// Programs seeded alongside the canonical rules, one per realistic combination.
pub fn seed_programs() -> Vec<Program> {
    RuleTable::canonical()
        .list_realistic_combinations()
        .into_iter()
        .map(|entry| {
            let name = format!(
                "{} BMI / {} body fat",
                entry.combination.bmi.label(),
                entry.combination.body_fat.label()
            );
            Program::new(entry.program_code, name)
        })
        .collect()
}

/// Rules seeded from the canonical table: active, priority 1.
pub fn seed_rules() -> Vec<Rule> {
    RuleTable::canonical()
        .list_realistic_combinations()
        .into_iter()
        .map(|entry| Rule {
            combination: entry.combination,
            program_code: entry.program_code,
            priority: 1,
            active: true,
        })
        .collect()
}
