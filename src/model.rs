//! Model - geometry shared by every load case

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::Dimensionality;
use crate::elements::{ComponentAssembly, Node};
use crate::error::{CaseError, CaseResult};

/// A named elevation of the building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub tag: String,
    elevation: f64,
}

impl Level {
    pub fn new(tag: &str, elevation: f64) -> Self {
        Self {
            tag: tag.to_string(),
            elevation,
        }
    }

    pub fn elevation(&self) -> f64 {
        self.elevation
    }
}

/// Levels of the model, looked up by tag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridSystem {
    levels: BTreeMap<String, Level>,
}

impl GridSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a level
    pub fn add_level(&mut self, tag: &str, elevation: f64) {
        self.levels.insert(tag.to_string(), Level::new(tag, elevation));
    }

    /// Get a level by tag
    pub fn get_level(&self, tag: &str) -> CaseResult<&Level> {
        self.levels
            .get(tag)
            .ok_or_else(|| CaseError::LevelNotFound(tag.to_string()))
    }

    pub fn levels(&self) -> impl Iterator<Item = &Level> {
        self.levels.values()
    }
}

/// Structural model: primary nodes, component assemblies and levels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// Model name
    pub name: String,
    /// Dimensionality tag
    pub dimensionality: Dimensionality,
    /// Primary nodes
    pub nodes: BTreeMap<usize, Node>,
    /// Component assemblies
    pub components: BTreeMap<usize, ComponentAssembly>,
    /// Levels
    pub grid_system: GridSystem,
}

impl Model {
    /// Create an empty model
    pub fn new(name: &str, dimensionality: Dimensionality) -> Self {
        Self {
            name: name.to_string(),
            dimensionality,
            nodes: BTreeMap::new(),
            components: BTreeMap::new(),
            grid_system: GridSystem::new(),
        }
    }

    /// Number of spatial dimensions
    pub fn ndm(&self) -> usize {
        self.dimensionality.ndm()
    }

    /// Degrees of freedom per node
    pub fn ndf(&self) -> usize {
        self.dimensionality.ndf()
    }

    /// Add a primary node
    pub fn add_node(&mut self, node: Node) -> CaseResult<()> {
        if node.coordinates.len() != self.ndm() {
            return Err(CaseError::ShapeMismatch(format!(
                "node {} has {} coordinates in a {} model",
                node.uid,
                node.coordinates.len(),
                self.dimensionality
            )));
        }
        if self.nodes.contains_key(&node.uid) || self.is_internal_node(node.uid) {
            return Err(CaseError::DuplicateUid {
                kind: "node",
                uid: node.uid,
            });
        }
        self.nodes.insert(node.uid, node);
        Ok(())
    }

    /// Add a component assembly
    pub fn add_component(&mut self, component: ComponentAssembly) -> CaseResult<()> {
        if self.components.contains_key(&component.uid) {
            return Err(CaseError::DuplicateUid {
                kind: "component",
                uid: component.uid,
            });
        }
        // Validate external nodes exist
        if let Some(missing) = component
            .external_nodes
            .iter()
            .find(|uid| !self.nodes.contains_key(uid))
        {
            return Err(CaseError::NodeNotFound(*missing));
        }
        if let Some(clash) = component
            .internal_nodes
            .keys()
            .find(|uid| self.nodes.contains_key(uid) || self.is_internal_node(**uid))
        {
            return Err(CaseError::DuplicateUid {
                kind: "node",
                uid: *clash,
            });
        }
        self.components.insert(component.uid, component);
        Ok(())
    }

    fn is_internal_node(&self, uid: usize) -> bool {
        self.components
            .values()
            .any(|c| c.internal_nodes.contains_key(&uid))
    }

    /// Get a primary node
    pub fn get_node(&self, uid: usize) -> CaseResult<&Node> {
        self.nodes.get(&uid).ok_or(CaseError::NodeNotFound(uid))
    }

    /// Get a component
    pub fn get_component(&self, uid: usize) -> CaseResult<&ComponentAssembly> {
        self.components
            .get(&uid)
            .ok_or(CaseError::ComponentNotFound(uid))
    }

    /// Primary nodes together with every component's internal nodes
    pub fn get_all_nodes(&self) -> BTreeMap<usize, &Node> {
        let mut all: BTreeMap<usize, &Node> =
            self.nodes.iter().map(|(uid, node)| (*uid, node)).collect();
        for component in self.components.values() {
            all.extend(component.internal_nodes.iter().map(|(uid, n)| (*uid, n)));
        }
        all
    }

    /// Primary nodes at an elevation, within `tolerance`
    pub fn nodes_at_elevation(&self, elevation: f64, tolerance: f64) -> Vec<&Node> {
        self.nodes
            .values()
            .filter(|node| (node.elevation() - elevation).abs() < tolerance)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::EPSILON;
    use crate::elements::AssemblyKind;

    fn portal() -> Model {
        let mut model = Model::new("portal", Dimensionality::Frame2D);
        model.grid_system.add_level("base", 0.0);
        model.grid_system.add_level("roof", 120.0);
        model.add_node(Node::new(1, &[0.0, 0.0])).unwrap();
        model.add_node(Node::new(2, &[240.0, 0.0])).unwrap();
        model.add_node(Node::new(3, &[0.0, 120.0])).unwrap();
        model.add_node(Node::new(4, &[240.0, 120.0])).unwrap();
        model
    }

    #[test]
    fn test_levels() {
        let model = portal();
        assert_eq!(model.grid_system.get_level("roof").unwrap().elevation(), 120.0);
        assert!(matches!(
            model.grid_system.get_level("mezzanine"),
            Err(CaseError::LevelNotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut model = portal();
        let result = model.add_node(Node::new(1, &[5.0, 5.0]));
        assert!(matches!(result, Err(CaseError::DuplicateUid { .. })));
    }

    #[test]
    fn test_component_requires_existing_nodes() {
        let mut model = portal();
        let component =
            ComponentAssembly::new(10, AssemblyKind::BeamColumn, "beam").with_external_nodes(&[3, 99]);
        assert!(matches!(
            model.add_component(component),
            Err(CaseError::NodeNotFound(99))
        ));
    }

    #[test]
    fn test_all_nodes_include_internal() {
        let mut model = portal();
        let component = ComponentAssembly::new(10, AssemblyKind::BeamColumn, "beam")
            .with_external_nodes(&[3, 4])
            .with_internal_node(Node::new(30, &[0.0, 120.0]))
            .with_internal_node(Node::new(40, &[240.0, 120.0]));
        model.add_component(component).unwrap();
        assert_eq!(model.get_all_nodes().len(), 6);
        assert_eq!(model.nodes_at_elevation(120.0, EPSILON).len(), 2);
    }
}
