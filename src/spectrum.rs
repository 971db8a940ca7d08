//! Design response spectra

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::interp_clamped;
use crate::error::{CaseError, CaseResult};

/// Name of the spectral acceleration column in spectrum files
pub const SA_COLUMN: &str = "Sa(g)";

/// Spectral acceleration (in g) as a function of period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSpectrum {
    periods: Vec<f64>,
    spectral_accelerations: Vec<f64>,
}

impl DesignSpectrum {
    /// Create a spectrum from matching period and Sa values.
    ///
    /// Points are sorted by period.
    pub fn new(periods: &[f64], spectral_accelerations: &[f64]) -> CaseResult<Self> {
        if periods.len() != spectral_accelerations.len() {
            return Err(CaseError::ShapeMismatch(format!(
                "{} periods for {} spectral accelerations",
                periods.len(),
                spectral_accelerations.len()
            )));
        }
        if periods.is_empty() {
            return Err(CaseError::InvalidArgument(
                "a design spectrum needs at least one point".to_string(),
            ));
        }
        if periods.iter().chain(spectral_accelerations).any(|v| !v.is_finite()) {
            return Err(CaseError::InvalidArgument(
                "design spectrum values must be finite".to_string(),
            ));
        }
        let mut points: Vec<(f64, f64)> = periods
            .iter()
            .copied()
            .zip(spectral_accelerations.iter().copied())
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (periods, spectral_accelerations) = points.into_iter().unzip();
        Ok(Self {
            periods,
            spectral_accelerations,
        })
    }

    /// Read a spectrum from a CSV file.
    ///
    /// The first column holds the period, and a column named `Sa(g)` holds
    /// the spectral acceleration.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> CaseResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path.as_ref())?;
        let sa_column = reader
            .headers()?
            .iter()
            .position(|h| h == SA_COLUMN)
            .ok_or_else(|| CaseError::MissingColumn(SA_COLUMN.to_string()))?;

        let mut periods = Vec::new();
        let mut spectral_accelerations = Vec::new();
        for record in reader.records() {
            let record = record?;
            periods.push(parse_field(&record, 0)?);
            spectral_accelerations.push(parse_field(&record, sa_column)?);
        }
        log::debug!(
            "Loaded design spectrum with {} points from {}",
            periods.len(),
            path.as_ref().display()
        );
        Self::new(&periods, &spectral_accelerations)
    }

    pub fn periods(&self) -> &[f64] {
        &self.periods
    }

    pub fn spectral_accelerations(&self) -> &[f64] {
        &self.spectral_accelerations
    }

    /// Spectral acceleration at `period` by linear interpolation.
    ///
    /// Periods outside the table take the value of the nearest end point.
    pub fn interpolate(&self, period: f64) -> f64 {
        interp_clamped(&self.periods, &self.spectral_accelerations, period)
    }
}

fn parse_field(record: &csv::StringRecord, column: usize) -> CaseResult<f64> {
    let field = record.get(column).ok_or_else(|| {
        CaseError::ShapeMismatch(format!("spectrum row has no column {}", column))
    })?;
    field.parse::<f64>().map_err(|_| {
        CaseError::InvalidArgument(format!("`{}` is not a number", field))
    })
}
