use serde::Serialize;

use super::domain::Combination;
use super::engine::{RealisticCombination, RuleTable};
use super::store::{RuleStore, StoreError};

/// Diff of the store's active rules against the canonical realistic set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingCombinationsReport {
    pub table_version: u32,
    pub covered: usize,
    pub missing: Vec<RealisticCombination>,
    pub impossible: Vec<Combination>,
}

impl MissingCombinationsReport {
    pub fn build<S: RuleStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        let table = RuleTable::canonical();
        let mut covered = 0;
        let mut missing = Vec::new();

        for entry in table.list_realistic_combinations() {
            if store.active_rule(entry.combination)?.is_some() {
                covered += 1;
            } else {
                missing.push(entry);
            }
        }

        Ok(Self {
            table_version: table.version(),
            covered,
            missing,
            impossible: table.impossible_combinations().to_vec(),
        })
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::consultation::catalog::RuleCatalog;
    use crate::workflows::consultation::domain::{BmiCategory, BodyFatCategory, ProgramCode};

    #[test]
    fn seeded_catalog_has_no_missing_combinations() {
        let report = MissingCombinationsReport::build(&RuleCatalog::seeded()).expect("report");

        assert!(report.is_complete());
        assert_eq!(report.covered, 10);
        assert_eq!(report.impossible.len(), 2);
    }

    #[test]
    fn deactivated_rule_is_reported_with_canonical_program() {
        let catalog = RuleCatalog::seeded();
        let overweight_low = Combination::new(BmiCategory::Overweight, BodyFatCategory::Low);
        catalog
            .set_rule_active(overweight_low, false)
            .expect("toggle succeeds");

        let report = MissingCombinationsReport::build(&catalog).expect("report");

        assert_eq!(report.covered, 9);
        assert_eq!(
            report.missing,
            vec![RealisticCombination {
                combination: overweight_low,
                program_code: ProgramCode::new("P10"),
            }]
        );
    }

    #[test]
    fn empty_catalog_reports_every_realistic_combination() {
        let report = MissingCombinationsReport::build(&RuleCatalog::default()).expect("report");

        assert_eq!(report.covered, 0);
        assert_eq!(report.missing, RuleTable::canonical().list_realistic_combinations());
    }
}
