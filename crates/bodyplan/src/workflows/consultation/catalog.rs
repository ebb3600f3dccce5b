use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::domain::{Combination, ProgramCode};
use super::engine::RuleTable;
use super::store::{seed_programs, seed_rules, Program, Rule, RuleStore, StoreError};

/// Administrative edits rejected by the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("combination {0} is not realistic and cannot carry a rule")]
    ImpossibleCombination(Combination),
    #[error("program {0} does not exist")]
    UnknownProgram(ProgramCode),
    #[error("no rule exists for combination {0}")]
    UnknownRule(Combination),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// In-memory rule and program store. Only the program a combination points to and its active
/// flag are editable; the realistic set always comes from [`RuleTable`].
#[derive(Debug, Default)]
pub struct RuleCatalog {
    rules: RwLock<Vec<Rule>>,
    programs: RwLock<BTreeMap<ProgramCode, Program>>,
}

impl RuleCatalog {
    /// Catalog holding the canonical rules and programs.
    pub fn seeded() -> Self {
        let programs = seed_programs()
            .into_iter()
            .map(|program| (program.code.clone(), program))
            .collect();

        Self {
            rules: RwLock::new(seed_rules()),
            programs: RwLock::new(programs),
        }
    }

    pub fn rules(&self) -> Result<Vec<Rule>, StoreError> {
        Ok(self.read_rules()?.clone())
    }

    pub fn programs(&self) -> Result<Vec<Program>, StoreError> {
        Ok(self.read_programs()?.values().cloned().collect())
    }

    pub fn upsert_program(&self, program: Program) -> Result<(), StoreError> {
        self.write_programs()?.insert(program.code.clone(), program);
        Ok(())
    }

    pub fn remove_program(&self, code: &ProgramCode) -> Result<Option<Program>, StoreError> {
        Ok(self.write_programs()?.remove(code))
    }

    pub fn set_program_active(&self, code: &ProgramCode, active: bool) -> Result<(), CatalogError> {
        let mut programs = self.write_programs()?;
        let program = programs
            .get_mut(code)
            .ok_or_else(|| CatalogError::UnknownProgram(code.clone()))?;
        program.active = active;
        Ok(())
    }

    /// Adds a rule alongside any existing ones for the same combination.
    pub fn insert_rule(&self, rule: Rule) -> Result<(), CatalogError> {
        self.ensure_realistic(rule.combination)?;
        self.ensure_program(&rule.program_code)?;
        self.write_rules()?.push(rule);
        Ok(())
    }

    /// Points the primary rule of a combination at `code`, creating the rule when absent.
    pub fn assign_program(
        &self,
        combination: Combination,
        code: ProgramCode,
    ) -> Result<(), CatalogError> {
        self.ensure_realistic(combination)?;
        self.ensure_program(&code)?;

        let mut rules = self.write_rules()?;
        let primary = rules
            .iter_mut()
            .filter(|rule| rule.combination == combination)
            .min_by_key(|rule| rule.priority);

        match primary {
            Some(rule) => rule.program_code = code,
            None => rules.push(Rule {
                combination,
                program_code: code,
                priority: 1,
                active: true,
            }),
        }

        Ok(())
    }

    /// Toggles every rule of a combination.
    pub fn set_rule_active(&self, combination: Combination, active: bool) -> Result<(), CatalogError> {
        self.ensure_realistic(combination)?;

        let mut rules = self.write_rules()?;
        let mut touched = false;
        for rule in rules
            .iter_mut()
            .filter(|rule| rule.combination == combination)
        {
            rule.active = active;
            touched = true;
        }

        if touched {
            Ok(())
        } else {
            Err(CatalogError::UnknownRule(combination))
        }
    }

    fn ensure_realistic(&self, combination: Combination) -> Result<(), CatalogError> {
        if RuleTable::canonical().is_realistic(combination) {
            Ok(())
        } else {
            Err(CatalogError::ImpossibleCombination(combination))
        }
    }

    fn ensure_program(&self, code: &ProgramCode) -> Result<(), CatalogError> {
        if self.read_programs()?.contains_key(code) {
            Ok(())
        } else {
            Err(CatalogError::UnknownProgram(code.clone()))
        }
    }

    fn read_rules(&self) -> Result<RwLockReadGuard<'_, Vec<Rule>>, StoreError> {
        self.rules.read().map_err(|_| poisoned("rules"))
    }

    fn write_rules(&self) -> Result<RwLockWriteGuard<'_, Vec<Rule>>, StoreError> {
        self.rules.write().map_err(|_| poisoned("rules"))
    }

    fn read_programs(
        &self,
    ) -> Result<RwLockReadGuard<'_, BTreeMap<ProgramCode, Program>>, StoreError> {
        self.programs.read().map_err(|_| poisoned("programs"))
    }

    fn write_programs(
        &self,
    ) -> Result<RwLockWriteGuard<'_, BTreeMap<ProgramCode, Program>>, StoreError> {
        self.programs.write().map_err(|_| poisoned("programs"))
    }
}

fn poisoned(table: &str) -> StoreError {
    StoreError::Unavailable(format!("{table} lock poisoned"))
}

impl RuleStore for RuleCatalog {
    fn active_rule(&self, combination: Combination) -> Result<Option<Rule>, StoreError> {
        Ok(self
            .read_rules()?
            .iter()
            .filter(|rule| rule.active && rule.combination == combination)
            .min_by_key(|rule| rule.priority)
            .cloned())
    }

    fn program(&self, code: &ProgramCode) -> Result<Option<Program>, StoreError> {
        Ok(self.read_programs()?.get(code).cloned())
    }
}
