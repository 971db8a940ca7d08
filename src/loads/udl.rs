//! Uniformly distributed loads on component assemblies

use serde::{Deserialize, Serialize};

/// Distributed load per unit length in global coordinates, (wx, wy) in 2D
/// or (wx, wy, wz) in 3D
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Udl(Vec<f64>);

impl Udl {
    pub fn new(components: &[f64]) -> Self {
        Self(components.to_vec())
    }

    /// Downward load of magnitude `w` along the vertical axis of an
    /// `ndm`-dimensional model
    pub fn gravity(w: f64, ndm: usize) -> Self {
        let mut components = vec![0.0; ndm];
        if let Some(vertical) = components.last_mut() {
            *vertical = -w;
        }
        Self(components)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Vertical (last) component
    pub fn vertical(&self) -> f64 {
        self.0.last().copied().unwrap_or(0.0)
    }
}
