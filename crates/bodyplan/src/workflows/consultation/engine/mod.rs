pub mod classifier;
pub mod edge_case;
mod record;
mod table;

pub use classifier::{classify, classify_body_fat, classify_bmi, compute_bmi, Classification};
pub use edge_case::{resolve_edge_case, EdgeCaseResolution, REDIRECT_REASON};
pub use record::{build_decision_record, DecisionRecord, EdgeCaseAudit, ProgramSelection};
pub use table::{RealisticCombination, RuleTable, DEFAULT_PROGRAM_CODE, RULE_TABLE_VERSION};

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::domain::{Combination, Measurements, ProgramCode};
use super::store::{RuleStore, StoreError};

/// The one failure that prevents a decision record from being produced.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("default program {code} is missing or inactive; no program can be assigned")]
    DefaultProgramUnavailable { code: ProgramCode },
}

impl ResolutionError {
    /// Administrative misconfiguration that needs an operator, not a retry.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ResolutionError::DefaultProgramUnavailable { .. })
    }
}

enum SelectionError {
    Store(StoreError),
    Resolution(ResolutionError),
}

impl From<StoreError> for SelectionError {
    fn from(error: StoreError) -> Self {
        SelectionError::Store(error)
    }
}

/// Forward-chaining resolver: classify, redirect impossible combinations, look up the active
/// rule, fall back to the default program. Holds no mutable state of its own.
pub struct ProgramResolver<S> {
    store: Arc<S>,
    table: &'static RuleTable,
}

impl<S> ProgramResolver<S>
where
    S: RuleStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            table: RuleTable::canonical(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn resolve(&self, measurements: &Measurements) -> Result<DecisionRecord, ResolutionError> {
        let classification = classify(measurements);
        let edge_case = edge_case::resolve_edge_case_with(self.table, classification.combination);

        if edge_case.was_redirected {
            info!(
                original = %classification.combination,
                redirected = %edge_case.final_combination,
                "redirected impossible combination"
            );
        }

        let selection = self.select_program(edge_case.final_combination)?;
        let record =
            build_decision_record(*measurements, &classification, &edge_case, selection);

        debug!(
            bmi = record.bmi(),
            combination = %record.combination(),
            program = %record.program_code(),
            is_default = record.is_default(),
            "resolved program"
        );

        Ok(record)
    }

    fn select_program(&self, combination: Combination) -> Result<ProgramSelection, ResolutionError> {
        match self.select_from_store(combination) {
            Ok(selection) => Ok(selection),
            Err(SelectionError::Resolution(error)) => Err(error),
            Err(SelectionError::Store(error)) => {
                warn!(
                    %error,
                    %combination,
                    "rule store unavailable; resolving against the canonical table"
                );
                Ok(self.select_from_table(combination))
            }
        }
    }

    fn select_from_store(&self, combination: Combination) -> Result<ProgramSelection, SelectionError> {
        if let Some(rule) = self.store.active_rule(combination)? {
            match self.store.program(&rule.program_code)? {
                Some(program) if program.active => {
                    return Ok(ProgramSelection {
                        program_code: program.code,
                        is_default: false,
                    });
                }
                _ => warn!(
                    %combination,
                    program = %rule.program_code,
                    "active rule points at a missing or inactive program"
                ),
            }
        }

        let default_code = self.table.default_program_code();
        let program = match self.store.default_program()? {
            Some(program) => program,
            None => {
                error!(program = %default_code, %combination, "default program unavailable");
                return Err(SelectionError::Resolution(
                    ResolutionError::DefaultProgramUnavailable { code: default_code },
                ));
            }
        };

        warn!(%combination, program = %program.code, "no active rule; using default program");
        Ok(ProgramSelection {
            program_code: program.code,
            is_default: true,
        })
    }

    fn select_from_table(&self, combination: Combination) -> ProgramSelection {
        match self.table.lookup(combination) {
            Some(program_code) => ProgramSelection {
                program_code,
                is_default: false,
            },
            None => ProgramSelection {
                program_code: self.table.default_program_code(),
                is_default: true,
            },
        }
    }
}
