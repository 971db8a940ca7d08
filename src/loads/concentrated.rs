//! Concentrated values - nodal loads and lumped masses in global coordinates

use std::ops::Add;

use serde::{Deserialize, Serialize};

macro_rules! concentrated_value {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name(Vec<f64>);

        impl $name {
            /// Create from components, one per degree of freedom
            pub fn new(components: &[f64]) -> Self {
                Self(components.to_vec())
            }

            pub fn values(&self) -> &[f64] {
                &self.0
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Component `i`, zero when out of range
            pub fn component(&self, i: usize) -> f64 {
                self.0.get(i).copied().unwrap_or(0.0)
            }
        }

        impl Add for &$name {
            type Output = $name;

            /// Component-wise sum; the shorter operand is padded with zeros
            fn add(self, other: &$name) -> $name {
                let len = self.len().max(other.len());
                $name((0..len).map(|i| self.component(i) + other.component(i)).collect())
            }
        }

        impl Add for $name {
            type Output = $name;

            fn add(self, other: $name) -> $name {
                &self + &other
            }
        }

        impl From<Vec<f64>> for $name {
            fn from(components: Vec<f64>) -> Self {
                Self(components)
            }
        }
    };
}

concentrated_value!(
    /// Nodal force and moment components
    PointLoad
);

concentrated_value!(
    /// Lumped nodal mass, translational then rotational components
    PointMass
);

impl PointMass {
    /// Equal translational mass `m` on the first `ndm` components and zero
    /// rotational mass
    pub fn translational(m: f64, ndm: usize, ndf: usize) -> Self {
        Self((0..ndf).map(|i| if i < ndm { m } else { 0.0 }).collect())
    }
}
