//! Static, modal, transient and general load cases

use std::sync::Arc;

use super::{CaseKind, LoadCase, LoadCaseVariant};
use crate::analysis::Analysis;
use crate::error::CaseResult;
use crate::loads::{LoadRegistry, MassRegistry};
use crate::model::Model;

/// Static load case: supports and loads
#[derive(Debug)]
pub struct StaticLoadCase {
    pub base: LoadCase,
    pub load_registry: LoadRegistry,
}

impl StaticLoadCase {
    /// Run the static analysis
    pub fn run(&mut self) -> CaseResult<()> {
        self.base.run_analysis(Some(&self.load_registry), None)
    }
}

impl LoadCaseVariant for StaticLoadCase {
    const KIND: CaseKind = CaseKind::Static;

    fn create(name: &str, model: Arc<Model>, analysis: Box<dyn Analysis>) -> Self {
        Self {
            base: LoadCase::new(name, Self::KIND, model, analysis),
            load_registry: LoadRegistry::new(),
        }
    }

    fn base(&self) -> &LoadCase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LoadCase {
        &mut self.base
    }

    fn loads(&self) -> Option<&LoadRegistry> {
        Some(&self.load_registry)
    }
}

/// Modal load case: supports and mass
#[derive(Debug)]
pub struct ModalLoadCase {
    pub base: LoadCase,
    pub mass_registry: MassRegistry,
}

impl ModalLoadCase {
    /// Run the eigenvalue analysis
    pub fn run(&mut self) -> CaseResult<()> {
        self.base.run_analysis(None, Some(&self.mass_registry))
    }

    /// Periods of the completed modal analysis
    pub fn periods(&self) -> &[f64] {
        self.base.analysis.periods()
    }
}

impl LoadCaseVariant for ModalLoadCase {
    const KIND: CaseKind = CaseKind::Modal;

    fn create(name: &str, model: Arc<Model>, analysis: Box<dyn Analysis>) -> Self {
        Self {
            base: LoadCase::new(name, Self::KIND, model, analysis),
            mass_registry: MassRegistry::new(),
        }
    }

    fn base(&self) -> &LoadCase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LoadCase {
        &mut self.base
    }

    fn mass(&self) -> Option<&MassRegistry> {
        Some(&self.mass_registry)
    }

    fn mass_mut(&mut self) -> Option<&mut MassRegistry> {
        Some(&mut self.mass_registry)
    }
}

/// Seismic time history load case: loads and mass
#[derive(Debug)]
pub struct SeismicTransientLoadCase {
    pub base: LoadCase,
    pub load_registry: LoadRegistry,
    pub mass_registry: MassRegistry,
}

impl SeismicTransientLoadCase {
    /// Run the time history analysis
    pub fn run(&mut self) -> CaseResult<()> {
        self.base
            .run_analysis(Some(&self.load_registry), Some(&self.mass_registry))
    }
}

impl LoadCaseVariant for SeismicTransientLoadCase {
    const KIND: CaseKind = CaseKind::SeismicTransient;

    fn create(name: &str, model: Arc<Model>, analysis: Box<dyn Analysis>) -> Self {
        Self {
            base: LoadCase::new(name, Self::KIND, model, analysis),
            load_registry: LoadRegistry::new(),
            mass_registry: MassRegistry::new(),
        }
    }

    fn base(&self) -> &LoadCase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LoadCase {
        &mut self.base
    }

    fn loads(&self) -> Option<&LoadRegistry> {
        Some(&self.load_registry)
    }

    fn mass(&self) -> Option<&MassRegistry> {
        Some(&self.mass_registry)
    }

    fn mass_mut(&mut self) -> Option<&mut MassRegistry> {
        Some(&mut self.mass_registry)
    }
}

/// Load case for custom analyses: loads and mass
#[derive(Debug)]
pub struct OtherLoadCase {
    pub base: LoadCase,
    pub load_registry: LoadRegistry,
    pub mass_registry: MassRegistry,
}

impl OtherLoadCase {
    pub fn run(&mut self) -> CaseResult<()> {
        self.base
            .run_analysis(Some(&self.load_registry), Some(&self.mass_registry))
    }
}

impl LoadCaseVariant for OtherLoadCase {
    const KIND: CaseKind = CaseKind::Other;

    fn create(name: &str, model: Arc<Model>, analysis: Box<dyn Analysis>) -> Self {
        Self {
            base: LoadCase::new(name, Self::KIND, model, analysis),
            load_registry: LoadRegistry::new(),
            mass_registry: MassRegistry::new(),
        }
    }

    fn base(&self) -> &LoadCase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LoadCase {
        &mut self.base
    }

    fn loads(&self) -> Option<&LoadRegistry> {
        Some(&self.load_registry)
    }

    fn mass(&self) -> Option<&MassRegistry> {
        Some(&self.mass_registry)
    }

    fn mass_mut(&mut self) -> Option<&mut MassRegistry> {
        Some(&mut self.mass_registry)
    }
}
