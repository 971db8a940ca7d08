//! Shared constants and model dimensionality

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tolerance used when comparing coordinates
pub const EPSILON: f64 = 1.0e-6;

/// Gravitational acceleration in in/s²
pub const G_CONST_IMPERIAL: f64 = 386.22;

/// Gravitational acceleration in m/s²
pub const G_CONST_SI: f64 = 9.81;

/// Number of spatial dimensions of a two-dimensional model
pub const TWO_DIMENSIONAL: usize = 2;

/// Number of spatial dimensions of a three-dimensional model
pub const THREE_DIMENSIONAL: usize = 3;

/// Kind of structural idealization a model uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimensionality {
    #[serde(rename = "2D Truss")]
    Truss2D,
    #[serde(rename = "2D Frame")]
    Frame2D,
    #[serde(rename = "3D Truss")]
    Truss3D,
    #[serde(rename = "3D Frame")]
    Frame3D,
}

impl Dimensionality {
    /// Number of spatial dimensions
    pub fn ndm(&self) -> usize {
        match self {
            Self::Truss2D | Self::Frame2D => TWO_DIMENSIONAL,
            Self::Truss3D | Self::Frame3D => THREE_DIMENSIONAL,
        }
    }

    /// Number of degrees of freedom per node
    pub fn ndf(&self) -> usize {
        match self {
            Self::Truss2D => 2,
            Self::Frame2D => 3,
            Self::Truss3D => 3,
            Self::Frame3D => 6,
        }
    }

    /// Label used in reports and serialized models
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Truss2D => "2D Truss",
            Self::Frame2D => "2D Frame",
            Self::Truss3D => "3D Truss",
            Self::Frame3D => "3D Frame",
        }
    }
}

impl fmt::Display for Dimensionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for Dimensionality {
    type Err = crate::error::CaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2D Truss" => Ok(Self::Truss2D),
            "2D Frame" => Ok(Self::Frame2D),
            "3D Truss" => Ok(Self::Truss3D),
            "3D Frame" => Ok(Self::Frame3D),
            other => Err(crate::error::CaseError::UnsupportedDimensionality(
                other.to_string(),
            )),
        }
    }
}

/// Linear interpolation over a table sorted by `xs`, extrapolating
/// linearly beyond either end.
pub(crate) fn interp_extrapolate(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    debug_assert!(xs.len() >= 2);
    let last = xs.len() - 1;
    let segment = if x <= xs[0] {
        0
    } else if x >= xs[last] {
        last - 1
    } else {
        xs.windows(2)
            .position(|w| x >= w[0] && x <= w[1])
            .unwrap_or(last - 1)
    };
    let (x0, x1) = (xs[segment], xs[segment + 1]);
    let (y0, y1) = (ys[segment], ys[segment + 1]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// Linear interpolation over a table sorted by `xs`, holding the end
/// values constant beyond either end.
pub(crate) fn interp_clamped(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    match xs.len() {
        0 => f64::NAN,
        1 => ys[0],
        _ => {
            let last = xs.len() - 1;
            if x <= xs[0] {
                ys[0]
            } else if x >= xs[last] {
                ys[last]
            } else {
                interp_extrapolate(xs, ys, x)
            }
        }
    }
}

/// `num` evenly spaced values from `start` to `stop`, both included
pub(crate) fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| if i == num - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dof_counts() {
        assert_eq!(Dimensionality::Frame3D.ndf(), 6);
        assert_eq!(Dimensionality::Frame2D.ndf(), 3);
        assert_eq!(Dimensionality::Truss2D.ndm(), 2);
    }

    #[test]
    fn test_unknown_dimensionality() {
        let parsed: Result<Dimensionality, _> = "4D Frame".parse();
        assert!(parsed.is_err());
    }

    #[test]
    fn test_extrapolation() {
        let xs = [0.5, 2.5];
        let ys = [1.0, 2.0];
        assert_relative_eq!(interp_extrapolate(&xs, &ys, 1.5), 1.5);
        assert_relative_eq!(interp_extrapolate(&xs, &ys, 3.5), 2.5);
        assert_relative_eq!(interp_extrapolate(&xs, &ys, 0.1), 0.8);
    }

    #[test]
    fn test_clamped() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [1.0, 3.0, 2.0];
        assert_relative_eq!(interp_clamped(&xs, &ys, -1.0), 1.0);
        assert_relative_eq!(interp_clamped(&xs, &ys, 0.5), 2.0);
        assert_relative_eq!(interp_clamped(&xs, &ys, 5.0), 2.0);
    }

    #[test]
    fn test_linspace_endpoints() {
        let values = linspace(0.0, 120.0, 3);
        assert_eq!(values, vec![0.0, 60.0, 120.0]);
    }
}
