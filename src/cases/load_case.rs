//! State shared by every load case: supports, rigid diaphragms and the
//! analysis that solves it

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::{Analysis, AnalysisKind, CaseInputs};
use crate::common::{Dimensionality, EPSILON};
use crate::elements::{ElasticSupport, FixedSupport, Support};
use crate::error::CaseResult;
use crate::loads::{LoadRegistry, MassRegistry};
use crate::model::Model;

/// The six kinds of load case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseKind {
    Static,
    Modal,
    SeismicElf,
    SeismicRs,
    SeismicTransient,
    Other,
}

impl CaseKind {
    /// Type tag used in logs and result directory names
    pub fn case_type(&self) -> &'static str {
        match self {
            Self::Static => "Static",
            Self::Modal => "Modal",
            Self::SeismicElf => "SeismicELF",
            Self::SeismicRs => "SeismicRS",
            Self::SeismicTransient => "SeismicTransient",
            Self::Other => "Other",
        }
    }

    /// Analysis procedure a new case of this kind is given
    pub fn analysis_kind(&self) -> AnalysisKind {
        match self {
            Self::Static | Self::SeismicElf => AnalysisKind::Static,
            Self::Modal | Self::SeismicRs => AnalysisKind::Modal,
            Self::SeismicTransient => AnalysisKind::Transient,
            Self::Other => AnalysisKind::Other,
        }
    }
}

impl fmt::Display for CaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.case_type())
    }
}

/// Rigid-diaphragm restraint of the primary node for each dimensionality
fn diaphragm_fixity(dimensionality: Dimensionality) -> FixedSupport {
    match dimensionality {
        Dimensionality::Frame3D => FixedSupport::new(&[false, false, true, true, true, false]),
        Dimensionality::Truss3D => FixedSupport::new(&[false, false, true]),
        Dimensionality::Frame2D => FixedSupport::new(&[false, true, true]),
        Dimensionality::Truss2D => FixedSupport::new(&[false, true]),
    }
}

/// Supports, rigid diaphragms and analysis of one load case
#[derive(Debug)]
pub struct LoadCase {
    name: String,
    kind: CaseKind,
    model: Arc<Model>,
    /// node uid -> fixed support
    pub fixed_supports: BTreeMap<usize, FixedSupport>,
    /// node uid -> elastic support
    pub elastic_supports: BTreeMap<usize, ElasticSupport>,
    /// primary node uid -> dependent node uids
    pub rigid_diaphragm: BTreeMap<usize, Vec<usize>>,
    /// Analysis procedure and, once run, its recorders
    pub analysis: Box<dyn Analysis>,
}

impl LoadCase {
    pub fn new(name: &str, kind: CaseKind, model: Arc<Model>, analysis: Box<dyn Analysis>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            model,
            fixed_supports: BTreeMap::new(),
            elastic_supports: BTreeMap::new(),
            rigid_diaphragm: BTreeMap::new(),
            analysis,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> CaseKind {
        self.kind
    }

    pub fn get_load_case_type(&self) -> &'static str {
        self.kind.case_type()
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Assign a support to every primary node at a level.
    ///
    /// Nodes whose elevation is within [`EPSILON`] of the level's elevation
    /// receive the support. Returns the number of nodes assigned.
    pub fn add_supports_at_level(&mut self, support: Support, level_tag: &str) -> CaseResult<usize> {
        let elevation = self.model.grid_system.get_level(level_tag)?.elevation();
        let nodes: Vec<usize> = self
            .model
            .nodes_at_elevation(elevation, EPSILON)
            .iter()
            .map(|node| node.uid)
            .collect();
        for uid in &nodes {
            match &support {
                Support::Fixed(fixed) => {
                    self.elastic_supports.remove(uid);
                    self.fixed_supports.insert(*uid, fixed.clone());
                }
                Support::Elastic(elastic) => {
                    self.fixed_supports.remove(uid);
                    self.elastic_supports.insert(*uid, elastic.clone());
                }
            }
        }
        log::debug!(
            "Case `{}`: {} assigned to {} nodes at level `{}`",
            self.name,
            support.type_name(),
            nodes.len(),
            level_tag
        );
        Ok(nodes.len())
    }

    /// Tie every other primary node at the primary node's elevation to it
    /// and restrain the primary node's out-of-plane degrees of freedom
    pub fn define_rigid_diaphragm(&mut self, primary_node: usize) -> CaseResult<()> {
        let elevation = self.model.get_node(primary_node)?.elevation();
        let dependents: Vec<usize> = self
            .model
            .nodes_at_elevation(elevation, EPSILON)
            .iter()
            .map(|node| node.uid)
            .filter(|uid| *uid != primary_node)
            .collect();
        self.rigid_diaphragm.insert(primary_node, dependents);
        self.fixed_supports
            .insert(primary_node, diaphragm_fixity(self.model.dimensionality));
        Ok(())
    }

    /// Run the analysis with this case's supports plus the given loads and
    /// masses
    pub(crate) fn run_analysis(
        &mut self,
        loads: Option<&LoadRegistry>,
        mass: Option<&MassRegistry>,
    ) -> CaseResult<()> {
        let inputs = CaseInputs {
            name: &self.name,
            case_type: self.kind.case_type(),
            fixed_supports: &self.fixed_supports,
            elastic_supports: &self.elastic_supports,
            rigid_diaphragm: &self.rigid_diaphragm,
            loads,
            mass,
        };
        self.analysis.run(&self.model, &inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisSettings, StoredAnalysis};
    use crate::elements::Node;

    fn model() -> Arc<Model> {
        let mut model = Model::new("frame", Dimensionality::Frame3D);
        model.grid_system.add_level("base", 0.0);
        model.grid_system.add_level("1", 144.0);
        model.add_node(Node::new(1, &[0.0, 0.0, 0.0])).unwrap();
        model.add_node(Node::new(2, &[240.0, 0.0, 1.0e-7])).unwrap();
        model.add_node(Node::new(3, &[480.0, 0.0, 1.0e-5])).unwrap();
        model.add_node(Node::new(4, &[0.0, 0.0, 144.0])).unwrap();
        model.add_node(Node::new(5, &[240.0, 0.0, 144.0])).unwrap();
        model.add_node(Node::new(6, &[120.0, 0.0, 144.0])).unwrap();
        Arc::new(model)
    }

    fn case() -> LoadCase {
        let analysis = StoredAnalysis::new(AnalysisSettings::static_analysis());
        LoadCase::new("dead", CaseKind::Static, model(), Box::new(analysis))
    }

    #[test]
    fn test_supports_at_level_within_tolerance() {
        let mut case = case();
        let count = case
            .add_supports_at_level(FixedSupport::fixed(6).into(), "base")
            .unwrap();
        assert_eq!(count, 2);
        assert!(case.fixed_supports.contains_key(&1));
        assert!(case.fixed_supports.contains_key(&2));
        assert!(!case.fixed_supports.contains_key(&3));
    }

    #[test]
    fn test_elastic_support_replaces_fixed() {
        let mut case = case();
        case.add_supports_at_level(FixedSupport::fixed(6).into(), "base")
            .unwrap();
        case.add_supports_at_level(ElasticSupport::new(&[1.0; 6]).into(), "base")
            .unwrap();
        assert!(case.fixed_supports.is_empty());
        assert_eq!(case.elastic_supports.len(), 2);
    }

    #[test]
    fn test_unknown_level() {
        let mut case = case();
        let result = case.add_supports_at_level(FixedSupport::fixed(6).into(), "roof");
        assert!(matches!(result, Err(crate::error::CaseError::LevelNotFound(_))));
    }

    #[test]
    fn test_rigid_diaphragm() {
        let mut case = case();
        case.define_rigid_diaphragm(6).unwrap();
        assert_eq!(case.rigid_diaphragm[&6], vec![4, 5]);
        assert_eq!(
            case.fixed_supports[&6].restraints(),
            &[false, false, true, true, true, false]
        );
    }

    #[test]
    fn test_diaphragm_fixity_patterns() {
        assert_eq!(diaphragm_fixity(Dimensionality::Frame2D).restraints(), &[false, true, true]);
        assert_eq!(diaphragm_fixity(Dimensionality::Truss2D).restraints(), &[false, true]);
        assert_eq!(diaphragm_fixity(Dimensionality::Truss3D).restraints(), &[false, false, true]);
    }

    #[test]
    fn test_run_delegates_to_analysis() {
        let mut case = case();
        case.run_analysis(None, None).unwrap();
        assert_eq!(case.get_load_case_type(), "Static");
    }
}
