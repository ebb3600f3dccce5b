use super::super::domain::Combination;
use super::table::RuleTable;

pub const REDIRECT_REASON: &str = "redirected to nearest realistic combination — obesity with \
low/normal body fat is not physiologically typical";

/// Outcome of the impossible-combination check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeCaseResolution {
    pub final_combination: Combination,
    pub was_redirected: bool,
    pub original_combination: Option<Combination>,
}

impl EdgeCaseResolution {
    fn unchanged(combination: Combination) -> Self {
        Self {
            final_combination: combination,
            was_redirected: false,
            original_combination: None,
        }
    }
}

pub fn resolve_edge_case(combination: Combination) -> EdgeCaseResolution {
    resolve_edge_case_with(RuleTable::canonical(), combination)
}

pub(crate) fn resolve_edge_case_with(
    table: &RuleTable,
    combination: Combination,
) -> EdgeCaseResolution {
    if !table.is_impossible(combination) {
        return EdgeCaseResolution::unchanged(combination);
    }

    match table.nearest_realistic(combination) {
        Some(redirected) => EdgeCaseResolution {
            final_combination: redirected,
            was_redirected: true,
            original_combination: Some(combination),
        },
        None => EdgeCaseResolution::unchanged(combination),
    }
}
