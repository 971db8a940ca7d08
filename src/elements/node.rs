//! Node - a point in 2D or 3D space

use serde::{Deserialize, Serialize};

/// A node of the finite element model
///
/// The last coordinate is the elevation: `y` for 2D models, `z` for 3D.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub uid: usize,
    /// Coordinates, (x, y) or (x, y, z)
    pub coordinates: Vec<f64>,
}

impl Node {
    /// Create a new node at the given coordinates
    pub fn new(uid: usize, coordinates: &[f64]) -> Self {
        Self {
            uid,
            coordinates: coordinates.to_vec(),
        }
    }

    /// Elevation of the node (its last coordinate)
    pub fn elevation(&self) -> f64 {
        self.coordinates.last().copied().unwrap_or(0.0)
    }

    /// Coordinates padded to three components
    pub fn coords3(&self) -> [f64; 3] {
        let mut coords = [0.0; 3];
        for (c, v) in coords.iter_mut().zip(&self.coordinates) {
            *c = *v;
        }
        coords
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        self.coordinates
            .iter()
            .zip(&other.coordinates)
            .map(|(a, b)| (b - a).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}
