//! Support conditions

use serde::{Deserialize, Serialize};

/// Rigid restraints at a node, one flag per degree of freedom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedSupport(pub Vec<bool>);

impl FixedSupport {
    /// Create a support from a restraint pattern
    pub fn new(restraints: &[bool]) -> Self {
        Self(restraints.to_vec())
    }

    /// All `ndf` degrees of freedom restrained
    pub fn fixed(ndf: usize) -> Self {
        Self(vec![true; ndf])
    }

    /// Restraint flags, one per degree of freedom
    pub fn restraints(&self) -> &[bool] {
        &self.0
    }
}

/// Spring restraints at a node, one stiffness per degree of freedom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticSupport(pub Vec<f64>);

impl ElasticSupport {
    /// Create a support from spring stiffnesses
    pub fn new(stiffness: &[f64]) -> Self {
        Self(stiffness.to_vec())
    }
}

/// Boundary condition that can be assigned to a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Support {
    Fixed(FixedSupport),
    Elastic(ElasticSupport),
}

impl Support {
    /// Name of the concrete support type
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Fixed(_) => "FixedSupport",
            Self::Elastic(_) => "ElasticSupport",
        }
    }
}

impl From<FixedSupport> for Support {
    fn from(support: FixedSupport) -> Self {
        Self::Fixed(support)
    }
}

impl From<ElasticSupport> for Support {
    fn from(support: ElasticSupport) -> Self {
        Self::Elastic(support)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_support() {
        let support = FixedSupport::fixed(6);
        assert_eq!(support.restraints(), &[true; 6]);
    }

    #[test]
    fn test_support_conversion() {
        let support: Support = ElasticSupport::new(&[1.0e3, 1.0e3, 0.0]).into();
        assert_eq!(support.type_name(), "ElasticSupport");
    }
}
