//! Tabular results with hierarchical column keys
//!
//! A [`Table`] holds one row per analysis index (load step, time step or mode)
//! and one column per key. Column keys are tuples of [`Label`]s, one per named
//! level, e.g. `(element, station, dof)`. Level names, key values and key
//! order are part of the table's identity and are checked whenever two tables
//! are combined.

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{CaseError, CaseResult};

/// Name of the level holding the element id
pub const ELEMENT_LEVEL: &str = "element";
/// Name of the level holding the node id
pub const NODE_LEVEL: &str = "node";
/// Name of the level holding the normalized station along an element
pub const STATION_LEVEL: &str = "station";
/// Name of the level holding the degree of freedom
pub const DOF_LEVEL: &str = "dof";
/// Name of the level added by enveloping
pub const MINMAX_LEVEL: &str = "min/max";

/// A single value of a column level or of the row index.
///
/// Numeric labels compare by value, so `Int(1)` equals `Float(1.0)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Label {
    /// Integer value, including floats without a fractional part
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) if is_integral(*v) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            Self::Text(_) => None,
        }
    }

    /// Hashable representation, used for deduplication
    fn identity(&self) -> (u8, u64, &str) {
        match self {
            Self::Int(v) => (0, *v as u64, ""),
            Self::Float(v) if is_integral(*v) => (0, *v as i64 as u64, ""),
            Self::Float(v) => (1, v.to_bits(), ""),
            Self::Text(s) => (2, 0, s.as_str()),
        }
    }
}

fn is_integral(v: f64) -> bool {
    v.fract() == 0.0 && v.abs() < i64::MAX as f64
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Text(_), _) | (_, Self::Text(_)) => false,
            _ => self.as_float() == other.as_float(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{:.2}", v),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Label {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<usize> for Label {
    fn from(v: usize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for Label {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Label {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Label {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Column key: one label per level
pub type ColumnKey = Vec<Label>;

fn format_key(key: &[Label]) -> String {
    let parts: Vec<String> = key.iter().map(|l| l.to_string()).collect();
    format!("({})", parts.join(", "))
}

/// Numeric table with a row index and hierarchical columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    index: Vec<Label>,
    level_names: Vec<String>,
    columns: Vec<ColumnKey>,
    values: DMatrix<f64>,
}

impl Table {
    /// Create a table, checking that keys, index and values agree in shape
    pub fn new(
        index: Vec<Label>,
        level_names: Vec<String>,
        columns: Vec<ColumnKey>,
        values: DMatrix<f64>,
    ) -> CaseResult<Self> {
        let table = Self {
            index,
            level_names,
            columns,
            values,
        };
        table.validate()?;
        Ok(table)
    }

    /// Create a table with every cell set to `value`
    pub fn filled(
        index: Vec<Label>,
        level_names: Vec<String>,
        columns: Vec<ColumnKey>,
        value: f64,
    ) -> CaseResult<Self> {
        let values = DMatrix::from_element(index.len(), columns.len(), value);
        Self::new(index, level_names, columns, values)
    }

    /// Create a table from row-major data
    pub fn from_rows(
        index: Vec<Label>,
        level_names: Vec<&str>,
        columns: Vec<ColumnKey>,
        rows: &[Vec<f64>],
    ) -> CaseResult<Self> {
        let ncols = columns.len();
        if rows.len() != index.len() || rows.iter().any(|r| r.len() != ncols) {
            return Err(CaseError::ShapeMismatch(format!(
                "expected {} rows of {} values",
                index.len(),
                ncols
            )));
        }
        let values = DMatrix::from_fn(rows.len(), ncols, |i, j| rows[i][j]);
        Self::new(
            index,
            level_names.into_iter().map(String::from).collect(),
            columns,
            values,
        )
    }

    fn validate(&self) -> CaseResult<()> {
        if self.values.nrows() != self.index.len() {
            return Err(CaseError::ShapeMismatch(format!(
                "{} rows of values for an index of length {}",
                self.values.nrows(),
                self.index.len()
            )));
        }
        if self.values.ncols() != self.columns.len() {
            return Err(CaseError::ShapeMismatch(format!(
                "{} columns of values for {} column keys",
                self.values.ncols(),
                self.columns.len()
            )));
        }
        let depth = self.level_names.len();
        if let Some(key) = self.columns.iter().find(|k| k.len() != depth) {
            return Err(CaseError::ShapeMismatch(format!(
                "column key {} does not match levels {:?}",
                format_key(key),
                self.level_names
            )));
        }
        Ok(())
    }

    pub fn index(&self) -> &[Label] {
        &self.index
    }

    pub fn level_names(&self) -> &[String] {
        &self.level_names
    }

    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// Position of a named level, if present
    pub fn level_position(&self, level: &str) -> Option<usize> {
        self.level_names.iter().position(|n| n == level)
    }

    pub fn has_level(&self, level: &str) -> bool {
        self.level_position(level).is_some()
    }

    fn require_level(&self, level: &str) -> CaseResult<usize> {
        self.level_position(level)
            .ok_or_else(|| CaseError::MissingColumn(format!("level `{}`", level)))
    }

    /// Distinct values of a level in order of first appearance
    pub fn level_values(&self, level: &str) -> CaseResult<Vec<Label>> {
        let pos = self.require_level(level)?;
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for key in &self.columns {
            let label = &key[pos];
            let identity = label.identity();
            if seen.insert((identity.0, identity.1, identity.2.to_string())) {
                values.push(label.clone());
            }
        }
        Ok(values)
    }

    /// Position of a column key
    pub fn column_position(&self, key: &[Label]) -> Option<usize> {
        self.columns.iter().position(|k| k.as_slice() == key)
    }

    /// Value at a row and column key
    pub fn get(&self, row: usize, key: &[Label]) -> Option<f64> {
        if row >= self.nrows() {
            return None;
        }
        self.column_position(key).map(|col| self.values[(row, col)])
    }

    /// Column values for a key
    pub fn column(&self, key: &[Label]) -> CaseResult<Vec<f64>> {
        let col = self
            .column_position(key)
            .ok_or_else(|| CaseError::MissingColumn(format_key(key)))?;
        Ok(self.values.column(col).iter().copied().collect())
    }

    /// Cross-section: keep the columns whose `level` equals `value` and
    /// drop that level from the keys
    pub fn xs(&self, value: &Label, level: &str) -> CaseResult<Table> {
        let pos = self.require_level(level)?;
        let selected: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, k)| &k[pos] == value)
            .map(|(i, _)| i)
            .collect();
        if selected.is_empty() {
            return Err(CaseError::MissingColumn(format!(
                "`{}` = {}",
                level, value
            )));
        }
        let columns = selected
            .iter()
            .map(|&i| {
                let mut key = self.columns[i].clone();
                key.remove(pos);
                key
            })
            .collect();
        let mut level_names = self.level_names.clone();
        level_names.remove(pos);
        let values = self.values.select_columns(selected.iter());
        Table::new(self.index.clone(), level_names, columns, values)
    }

    /// Fail unless `other` can be combined cell by cell with `self`
    pub fn check_aligned(&self, other: &Table) -> CaseResult<()> {
        if self.level_names != other.level_names {
            return Err(CaseError::ColumnMismatch(format!(
                "levels {:?} and {:?}",
                self.level_names, other.level_names
            )));
        }
        if self.columns != other.columns {
            let first = self
                .columns
                .iter()
                .zip(&other.columns)
                .find(|(a, b)| a != b)
                .map(|(a, b)| format!("{} vs {}", format_key(a), format_key(b)))
                .unwrap_or_else(|| {
                    format!("{} vs {} columns", self.ncols(), other.ncols())
                });
            return Err(CaseError::ColumnMismatch(first));
        }
        if self.nrows() != other.nrows() {
            return Err(CaseError::ShapeMismatch(format!(
                "{} rows vs {} rows",
                self.nrows(),
                other.nrows()
            )));
        }
        if let Some((a, b)) = self.index.iter().zip(&other.index).find(|(a, b)| a != b) {
            return Err(CaseError::ShapeMismatch(format!(
                "row index {} vs {}",
                a, b
            )));
        }
        Ok(())
    }

    /// Combine two aligned tables cell by cell
    pub fn zip_with<F>(&self, other: &Table, f: F) -> CaseResult<Table>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.check_aligned(other)?;
        let values = self.values.zip_map(&other.values, f);
        Ok(Table {
            index: self.index.clone(),
            level_names: self.level_names.clone(),
            columns: self.columns.clone(),
            values,
        })
    }

    /// Multiply every cell by `factor`
    pub fn scaled(&self, factor: f64) -> Table {
        Table {
            values: &self.values * factor,
            ..self.clone()
        }
    }

    /// Append a level holding `value` for every column
    pub fn with_last_level(&self, name: &str, value: Label) -> Table {
        let mut level_names = self.level_names.clone();
        level_names.push(name.to_string());
        let columns = self
            .columns
            .iter()
            .map(|k| {
                let mut key = k.clone();
                key.push(value.clone());
                key
            })
            .collect();
        Table {
            index: self.index.clone(),
            level_names,
            columns,
            values: self.values.clone(),
        }
    }

    /// Duplicate every column under a new last level, the first copy
    /// labelled `first` and the second `second`
    pub fn split_under_level(&self, name: &str, first: Label, second: Label) -> Table {
        let mut level_names = self.level_names.clone();
        level_names.push(name.to_string());
        let mut columns = Vec::with_capacity(self.ncols() * 2);
        for key in &self.columns {
            for label in [&first, &second] {
                let mut key = key.clone();
                key.push(label.clone());
                columns.push(key);
            }
        }
        let values = DMatrix::from_fn(self.nrows(), self.ncols() * 2, |i, j| {
            self.values[(i, j / 2)]
        });
        Table {
            index: self.index.clone(),
            level_names,
            columns,
            values,
        }
    }

    /// Interleave the columns of two tables with identical levels and row
    /// counts: column `i` of `a` is followed by column `i` of `b`
    pub fn interleave(a: &Table, b: &Table) -> CaseResult<Table> {
        if a.level_names != b.level_names || a.ncols() != b.ncols() || a.nrows() != b.nrows() {
            return Err(CaseError::ShapeMismatch(
                "interleaved tables must share levels and shape".to_string(),
            ));
        }
        let ncols = a.ncols() * 2;
        let mut columns = Vec::with_capacity(ncols);
        for (ka, kb) in a.columns.iter().zip(&b.columns) {
            columns.push(ka.clone());
            columns.push(kb.clone());
        }
        let values = DMatrix::from_fn(a.nrows(), ncols, |i, j| {
            if j % 2 == 0 {
                a.values[(i, j / 2)]
            } else {
                b.values[(i, j / 2)]
            }
        });
        Table::new(a.index.clone(), a.level_names.clone(), columns, values)
    }

    /// Write the table as JSON
    pub fn to_json_file(&self, path: &Path) -> CaseResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Read a table previously written with [`Table::to_json_file`]
    pub fn from_json_file(path: &Path) -> CaseResult<Table> {
        let reader = BufReader::new(File::open(path)?);
        let table: Table = serde_json::from_reader(reader)?;
        table.validate()?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element_table() -> Table {
        let columns = vec![
            vec![Label::from(1usize), Label::from(0.0), Label::from(1usize)],
            vec![Label::from(1usize), Label::from(0.0), Label::from(2usize)],
            vec![Label::from(1usize), Label::from(1.0), Label::from(1usize)],
            vec![Label::from(1usize), Label::from(1.0), Label::from(2usize)],
        ];
        Table::from_rows(
            vec![Label::from(0usize), Label::from(1usize)],
            vec![ELEMENT_LEVEL, STATION_LEVEL, DOF_LEVEL],
            columns,
            &[vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_shape_validation() {
        let result = Table::from_rows(
            vec![Label::from(0usize)],
            vec![DOF_LEVEL],
            vec![vec![Label::from(1usize)]],
            &[vec![1.0, 2.0]],
        );
        assert!(matches!(result, Err(CaseError::ShapeMismatch(_))));
    }

    #[test]
    fn test_cross_section_drops_level() {
        let table = element_table();
        let i_end = table.xs(&Label::from(0.0), STATION_LEVEL).unwrap();
        assert_eq!(i_end.level_names(), &["element".to_string(), "dof".to_string()]);
        assert_eq!(i_end.ncols(), 2);
        assert_eq!(i_end.get(1, &[Label::from(1usize), Label::from(2usize)]), Some(6.0));
    }

    #[test]
    fn test_cross_section_unknown_value() {
        let table = element_table();
        assert!(table.xs(&Label::from(0.5), STATION_LEVEL).is_err());
        assert!(table.xs(&Label::from(0.0), "missing").is_err());
    }

    #[test]
    fn test_level_values_in_order() {
        let table = element_table();
        let dofs = table.level_values(DOF_LEVEL).unwrap();
        assert_eq!(dofs, vec![Label::from(1usize), Label::from(2usize)]);
    }

    #[test]
    fn test_numeric_labels_compare_by_value() {
        assert_eq!(Label::Int(1), Label::Float(1.0));
        assert_eq!(Label::Float(0.0), Label::Int(0));
        assert_ne!(Label::Int(1), Label::Float(1.5));
        assert_ne!(Label::Int(1), Label::from("1"));
        assert_eq!(Label::Float(3.0).as_int(), Some(3));
        assert_eq!(Label::Float(0.25).as_int(), None);
    }

    #[test]
    fn test_integer_station_matches_float_lookup() {
        let columns = vec![
            vec![Label::Int(1), Label::Int(0), Label::Float(1.0)],
            vec![Label::Int(1), Label::Int(1), Label::Float(1.0)],
        ];
        let table = Table::from_rows(
            vec![Label::from(0usize)],
            vec![ELEMENT_LEVEL, STATION_LEVEL, DOF_LEVEL],
            columns,
            &[vec![4.0, -4.0]],
        )
        .unwrap();
        let i_end = table.xs(&Label::Float(0.0), STATION_LEVEL).unwrap();
        assert_eq!(i_end.get(0, &[Label::from(1usize), Label::from(1usize)]), Some(4.0));
        assert_eq!(table.level_values(STATION_LEVEL).unwrap().len(), 2);
    }

    #[test]
    fn test_alignment_checks_row_index() {
        let a = element_table();
        let rows = [vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0]];
        let b = Table::from_rows(
            vec![Label::from(0usize), Label::from(2usize)],
            vec![ELEMENT_LEVEL, STATION_LEVEL, DOF_LEVEL],
            a.columns().to_vec(),
            &rows,
        )
        .unwrap();
        assert!(matches!(a.check_aligned(&b), Err(CaseError::ShapeMismatch(_))));
        assert!(a.check_aligned(&a.scaled(2.0)).is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        let table = element_table();
        table.to_json_file(&path).unwrap();
        let loaded = Table::from_json_file(&path).unwrap();
        assert_eq!(loaded, table);
    }
}
