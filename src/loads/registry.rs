//! Load and mass registries owned by a single load case

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{PointLoad, PointMass, Udl};

/// Nodal loads and component distributed loads of one load case
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadRegistry {
    /// node uid -> nodal load
    pub nodal_loads: BTreeMap<usize, PointLoad>,
    /// component uid -> distributed load
    pub component_udl: BTreeMap<usize, Udl>,
}

impl LoadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the load of a node, replacing any previous one
    pub fn add_nodal_load(&mut self, node: usize, load: PointLoad) {
        self.nodal_loads.insert(node, load);
    }

    /// Set the distributed load of a component, replacing any previous one
    pub fn add_component_udl(&mut self, component: usize, udl: Udl) {
        self.component_udl.insert(component, udl);
    }

    pub fn is_empty(&self) -> bool {
        self.nodal_loads.is_empty() && self.component_udl.is_empty()
    }
}

/// Lumped nodal masses of one load case
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MassRegistry(BTreeMap<usize, PointMass>);

impl MassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mass of a node, replacing any previous one
    pub fn insert(&mut self, node: usize, mass: PointMass) {
        self.0.insert(node, mass);
    }

    /// Add mass to a node, accumulating with what is already there
    pub fn accumulate(&mut self, node: usize, mass: PointMass) {
        let total = match self.0.get(&node) {
            Some(existing) => existing + &mass,
            None => mass,
        };
        self.0.insert(node, total);
    }

    pub fn get(&self, node: usize) -> Option<&PointMass> {
        self.0.get(&node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&usize, &PointMass)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of component `dof` over all nodes
    pub fn total(&self, dof: usize) -> f64 {
        self.0.values().map(|m| m.component(dof)).sum()
    }
}
