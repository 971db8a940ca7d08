//! Section properties for frame elements

use serde::{Deserialize, Serialize};

/// Cross-section properties used by the load case layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Section designation
    pub name: String,
    /// Cross-sectional area
    pub area: f64,
    /// Weight per unit length
    pub sec_w: f64,
}

impl Section {
    /// Create a new section with basic properties
    pub fn new(name: &str, area: f64, sec_w: f64) -> Self {
        Self {
            name: name.to_string(),
            area,
            sec_w,
        }
    }

    /// Create a rectangular section of a material with the given unit weight
    pub fn rectangular(name: &str, width: f64, depth: f64, unit_weight: f64) -> Self {
        let area = width * depth;
        Self::new(name, area, area * unit_weight)
    }

    /// Weight per unit length scaled by a factor
    pub fn weight_per_length(&self, factor: f64) -> f64 {
        self.sec_w * factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangular_section() {
        let section = Section::rectangular("R", 0.3, 0.5, 25.0);
        assert!((section.area - 0.15).abs() < 1e-10);
        assert!((section.sec_w - 3.75).abs() < 1e-10);
        assert!((section.weight_per_length(2.0) - 7.5).abs() < 1e-10);
    }
}
