//! Component assemblies - physical members made of one or more elements

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Element, Node, Section};

/// Type of a component assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssemblyKind {
    /// Beams, columns and braces modeled with beam-column elements
    BeamColumn,
    /// Truss members modeled with bar elements
    Bar,
    /// Panel zones, diaphragms and anything else
    Other,
}

/// A group of elements and nodes representing one part of a structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentAssembly {
    /// Unique identifier
    pub uid: usize,
    /// Type of assembly
    pub kind: AssemblyKind,
    /// Role of the component, e.g. `beam`, `column`, `brace`
    pub component_purpose: String,
    /// Primary nodes the component connects to
    pub external_nodes: Vec<usize>,
    /// Nodes that only exist as part of the component
    pub internal_nodes: BTreeMap<usize, Node>,
    /// Elements of the component
    pub elements: BTreeMap<usize, Element>,
    /// Section shared by the component's elements
    pub section: Option<Section>,
}

impl ComponentAssembly {
    /// Create an empty component
    pub fn new(uid: usize, kind: AssemblyKind, component_purpose: &str) -> Self {
        Self {
            uid,
            kind,
            component_purpose: component_purpose.to_string(),
            external_nodes: Vec::new(),
            internal_nodes: BTreeMap::new(),
            elements: BTreeMap::new(),
            section: None,
        }
    }

    /// Set the external nodes
    pub fn with_external_nodes(mut self, nodes: &[usize]) -> Self {
        self.external_nodes = nodes.to_vec();
        self
    }

    /// Add an internal node
    pub fn with_internal_node(mut self, node: Node) -> Self {
        self.internal_nodes.insert(node.uid, node);
        self
    }

    /// Add an element
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.insert(element.uid, element);
        self
    }

    /// Set the section
    pub fn with_section(mut self, section: Section) -> Self {
        self.section = Some(section);
        self
    }

    pub fn get_section(&self) -> Option<&Section> {
        self.section.as_ref()
    }

    /// Elements along which basic forces can be reconstructed
    pub fn line_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values().filter(|e| e.kind.is_line())
    }

    /// Clear length of the component: the sum of its line elements' clear
    /// lengths
    pub fn clear_length(&self) -> f64 {
        self.line_elements().map(Element::clear_length).sum()
    }

    /// Distributed load on each line element in local axes, derived from
    /// the component's global distributed load
    pub fn calculate_element_udl(&self, global_udl: &[f64]) -> BTreeMap<usize, Vec<f64>> {
        self.line_elements()
            .filter_map(|element| {
                element
                    .local_udl(global_udl)
                    .map(|local| (element.uid, local))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementKind;
    use approx::assert_relative_eq;

    fn beam_in_two_segments() -> ComponentAssembly {
        let n1 = Node::new(1, &[0.0, 0.0, 3.0]);
        let mid = Node::new(100, &[3.0, 0.0, 3.0]);
        let n2 = Node::new(2, &[6.0, 0.0, 3.0]);
        ComponentAssembly::new(7, AssemblyKind::BeamColumn, "beam")
            .with_external_nodes(&[1, 2])
            .with_internal_node(mid.clone())
            .with_element(Element::new(
                20,
                ElementKind::ElasticBeamColumn,
                n1,
                mid.clone(),
            ))
            .with_element(Element::new(21, ElementKind::ElasticBeamColumn, mid, n2))
    }

    #[test]
    fn test_clear_length_sums_segments() {
        assert_relative_eq!(beam_in_two_segments().clear_length(), 6.0);
    }

    #[test]
    fn test_element_udl_for_every_segment() {
        let udls = beam_in_two_segments().calculate_element_udl(&[0.0, 0.0, -5.0]);
        assert_eq!(udls.len(), 2);
        assert_relative_eq!(udls[&21][1], -5.0);
    }
}
