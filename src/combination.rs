//! Combination of tabular results across load cases
//!
//! Two actions are supported. `Add` sums aligned tables cell by cell.
//! `Envelope` keeps the largest of the maxima and the smallest of the minima,
//! adding a `min/max` column level on first use. Once a table carries that
//! level, only tables that also carry it can be added to it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CaseError, CaseResult};
use crate::table::{Label, Table, MINMAX_LEVEL};

/// How two result tables are merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineAction {
    /// Element-wise addition
    Add,
    /// Largest of the maxes and smallest of the mins
    Envelope,
}

impl fmt::Display for CombineAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Envelope => f.write_str("envelope"),
        }
    }
}

impl FromStr for CombineAction {
    type Err = CaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "envelope" => Ok(Self::Envelope),
            other => Err(CaseError::InvalidArgument(format!(
                "action must be one of `add` or `envelope`, got `{}`",
                other
            ))),
        }
    }
}

/// Add a `min/max` column level if it doesn't exist.
///
/// Every column is duplicated into a `max` and a `min` variant holding the
/// same values, and `min/max` is appended as the last level. Tables that
/// already carry the level are returned unchanged.
pub fn ensure_minmax_level_exists_or_add(table: &Table) -> Table {
    if table.has_level(MINMAX_LEVEL) {
        return table.clone();
    }
    table.split_under_level(MINMAX_LEVEL, Label::from("max"), Label::from("min"))
}

// NaN from either side wins, so a failed step stays visible in an envelope
fn nan_max(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() {
        f64::NAN
    } else {
        x.max(y)
    }
}

fn nan_min(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() {
        f64::NAN
    } else {
        x.min(y)
    }
}

/// Combine two tables according to `action`
pub fn combine_single(a: &Table, b: &Table, action: CombineAction) -> CaseResult<Table> {
    match action {
        CombineAction::Add => a.zip_with(b, |x, y| x + y),
        CombineAction::Envelope => {
            let a = ensure_minmax_level_exists_or_add(a);
            let b = ensure_minmax_level_exists_or_add(b);
            a.check_aligned(&b)?;

            let max_label = Label::from("max");
            let min_label = Label::from("min");
            let max = a
                .xs(&max_label, MINMAX_LEVEL)?
                .zip_with(&b.xs(&max_label, MINMAX_LEVEL)?, nan_max)?;
            let min = a
                .xs(&min_label, MINMAX_LEVEL)?
                .zip_with(&b.xs(&min_label, MINMAX_LEVEL)?, nan_min)?;

            Table::interleave(
                &max.with_last_level(MINMAX_LEVEL, max_label),
                &min.with_last_level(MINMAX_LEVEL, min_label),
            )
        }
    }
}

/// Combine a list of tables, folding from the left
pub fn combine(tables: &[Table], action: CombineAction) -> CaseResult<Table> {
    if tables.len() < 2 {
        return Err(CaseError::NotEnoughTables(tables.len()));
    }
    let mut combined = tables[0].clone();
    for table in &tables[1..] {
        combined = combine_single(&combined, table, action)?;
    }
    Ok(combined)
}
