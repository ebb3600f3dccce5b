//! Administrative rule overrides loaded from CSV exports.
//!
//! Each row points a realistic combination at a program and optionally toggles the rule.
//! Rows naming impossible combinations are rejected; the realistic set is not editable.

mod parser;

use crate::workflows::consultation::{
    CatalogError, RuleCatalog, RuleStore, RuleTable, StoreError,
};
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum RulesImportError {
    #[error("failed to read rules export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rules CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("row {row}: unknown category '{value}'")]
    UnknownCategory { row: usize, value: String },
    #[error("row {row}: {source}")]
    Rejected {
        row: usize,
        #[source]
        source: CatalogError,
    },
}

/// Summary of an applied import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RulesImportSummary {
    pub applied: usize,
    pub deactivated: usize,
}

pub struct RulesImporter;

impl RulesImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        catalog: &RuleCatalog,
    ) -> Result<RulesImportSummary, RulesImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, catalog)
    }

    /// Validates every row before touching the catalog, so a bad file leaves it unchanged.
    pub fn from_reader<R: Read>(
        reader: R,
        catalog: &RuleCatalog,
    ) -> Result<RulesImportSummary, RulesImportError> {
        let assignments = parser::parse_assignments(reader)?;
        let table = RuleTable::canonical();

        for assignment in &assignments {
            let rejection = if !table.is_realistic(assignment.combination) {
                Some(CatalogError::ImpossibleCombination(assignment.combination))
            } else if catalog.program(&assignment.program_code)?.is_none() {
                Some(CatalogError::UnknownProgram(assignment.program_code.clone()))
            } else {
                None
            };

            if let Some(source) = rejection {
                return Err(RulesImportError::Rejected {
                    row: assignment.row,
                    source,
                });
            }
        }

        let mut summary = RulesImportSummary::default();
        for assignment in assignments {
            let row = assignment.row;
            catalog
                .assign_program(assignment.combination, assignment.program_code)
                .and_then(|_| catalog.set_rule_active(assignment.combination, assignment.active))
                .map_err(|source| RulesImportError::Rejected { row, source })?;

            summary.applied += 1;
            if !assignment.active {
                summary.deactivated += 1;
            }
        }

        info!(
            applied = summary.applied,
            deactivated = summary.deactivated,
            "rule overrides imported"
        );
        Ok(summary)
    }
}
