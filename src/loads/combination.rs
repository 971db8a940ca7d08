//! Load combinations

use serde::{Deserialize, Serialize};

use crate::combination::{combine_single, ensure_minmax_level_exists_or_add, CombineAction};
use crate::error::{CaseError, CaseResult};
use crate::table::Table;

/// A load combination defines how load case results are combined
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadCombination {
    /// Name of the load combination
    pub name: String,
    /// Load cases and their factors, in order
    pub factors: Vec<(String, f64)>,
    /// How the factored results are combined
    pub action: CombineAction,
}

impl LoadCombination {
    /// Create a new, empty additive load combination
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            factors: Vec::new(),
            action: CombineAction::Add,
        }
    }

    /// Create an envelope of the given cases, each at factor 1.0
    pub fn envelope(name: &str, cases: &[&str]) -> Self {
        cases
            .iter()
            .fold(Self::new(name).with_action(CombineAction::Envelope), |combo, case| {
                combo.with_case(case, 1.0)
            })
    }

    /// Add a load case with a factor; an existing entry is replaced
    pub fn with_case(mut self, case: &str, factor: f64) -> Self {
        match self.factors.iter_mut().find(|(name, _)| name == case) {
            Some(entry) => entry.1 = factor,
            None => self.factors.push((case.to_string(), factor)),
        }
        self
    }

    pub fn with_action(mut self, action: CombineAction) -> Self {
        self.action = action;
        self
    }

    /// Names of the load cases, in order
    pub fn case_names(&self) -> impl Iterator<Item = &str> {
        self.factors.iter().map(|(name, _)| name.as_str())
    }

    /// Factor one table per load case (same order as the cases) and
    /// combine them with the combination's action
    pub fn apply(&self, tables: &[Table]) -> CaseResult<Table> {
        if tables.len() != self.factors.len() {
            return Err(CaseError::InvalidArgument(format!(
                "combination `{}` has {} cases but {} tables were given",
                self.name,
                self.factors.len(),
                tables.len()
            )));
        }
        let mut factored = tables
            .iter()
            .zip(&self.factors)
            .map(|(table, (_, factor))| table.scaled(*factor));
        let first = factored.next().ok_or(CaseError::NotEnoughTables(0))?;
        let first = match self.action {
            CombineAction::Add => first,
            CombineAction::Envelope => ensure_minmax_level_exists_or_add(&first),
        };
        factored.try_fold(first, |acc, table| combine_single(&acc, &table, self.action))
    }

    /// LRFD 1.2D + 1.6L
    pub fn lrfd_dead_live() -> Self {
        Self::new("1.2D + 1.6L")
            .with_case("dead", 1.2)
            .with_case("live", 1.6)
    }
}
