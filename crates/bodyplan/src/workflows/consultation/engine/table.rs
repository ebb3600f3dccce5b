use serde::{Deserialize, Serialize};

use super::super::domain::{
    BmiCategory::{Ideal, Obese, Overweight, Underweight},
    BodyFatCategory::{High, Low, Normal},
    Combination, ProgramCode,
};

/// Bumped whenever the realistic set or the seed programs change.
pub const RULE_TABLE_VERSION: u32 = 1;

/// Program used when no active rule matches a resolved combination.
pub const DEFAULT_PROGRAM_CODE: &str = "P2";

const REALISTIC: [(Combination, &str); 10] = [
    (Combination::new(Underweight, Low), "P1"),
    (Combination::new(Underweight, Normal), "P5"),
    (Combination::new(Underweight, High), "P9"),
    (Combination::new(Ideal, Low), "P6"),
    (Combination::new(Ideal, Normal), "P2"),
    (Combination::new(Ideal, High), "P7"),
    (Combination::new(Overweight, Low), "P10"),
    (Combination::new(Overweight, Normal), "P8"),
    (Combination::new(Overweight, High), "P3"),
    (Combination::new(Obese, High), "P4"),
];

const IMPOSSIBLE: [Combination; 2] = [
    Combination::new(Obese, Low),
    Combination::new(Obese, Normal),
];

static CANONICAL: RuleTable = RuleTable {
    version: RULE_TABLE_VERSION,
    realistic: &REALISTIC,
    impossible: &IMPOSSIBLE,
};

/// A realistic combination paired with its canonical program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealisticCombination {
    pub combination: Combination,
    pub program_code: ProgramCode,
}

/// Versioned source of truth for which combinations are realistic and which program each one
/// seeds. Administrative edits never reach this table.
#[derive(Debug)]
pub struct RuleTable {
    version: u32,
    realistic: &'static [(Combination, &'static str)],
    impossible: &'static [Combination],
}

impl RuleTable {
    pub fn canonical() -> &'static RuleTable {
        &CANONICAL
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn lookup(&self, combination: Combination) -> Option<ProgramCode> {
        self.realistic
            .iter()
            .find(|(candidate, _)| *candidate == combination)
            .map(|(_, code)| ProgramCode::new(*code))
    }

    pub fn is_realistic(&self, combination: Combination) -> bool {
        self.realistic
            .iter()
            .any(|(candidate, _)| *candidate == combination)
    }

    pub fn is_impossible(&self, combination: Combination) -> bool {
        self.impossible.contains(&combination)
    }

    pub fn impossible_combinations(&self) -> &'static [Combination] {
        self.impossible
    }

    /// Realistic combinations in BMI-then-body-fat order.
    pub fn list_realistic_combinations(&self) -> Vec<RealisticCombination> {
        self.realistic
            .iter()
            .map(|(combination, code)| RealisticCombination {
                combination: *combination,
                program_code: ProgramCode::new(*code),
            })
            .collect()
    }

    pub fn default_program_code(&self) -> ProgramCode {
        ProgramCode::new(DEFAULT_PROGRAM_CODE)
    }

    /// Realistic combination with the same BMI category whose body-fat band is closest to the
    /// given one, preferring the higher band on ties.
    pub fn nearest_realistic(&self, combination: Combination) -> Option<Combination> {
        self.realistic
            .iter()
            .map(|(candidate, _)| *candidate)
            .filter(|candidate| candidate.bmi == combination.bmi)
            .min_by_key(|candidate| {
                let distance = candidate.body_fat.rank().abs_diff(combination.body_fat.rank());
                (distance, std::cmp::Reverse(candidate.body_fat.rank()))
            })
    }
}
