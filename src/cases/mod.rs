//! Load cases
//!
//! Every load case embeds a [`LoadCase`] holding its supports, rigid
//! diaphragms and analysis, plus the load and mass registries its kind
//! needs. Cases are created on first reference through a
//! [`CaseCollection`], bound to the shared [`Model`].

mod basic_forces;
mod load_case;
mod seismic;
mod variants;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::analysis::{Analysis, AnalysisFactory};
use crate::elements::ComponentAssembly;
use crate::error::{CaseError, CaseResult};
use crate::loads::{LoadRegistry, MassRegistry};
use crate::model::Model;

pub use basic_forces::{BasicForces, DEFAULT_NUM_STATIONS};
pub use load_case::{CaseKind, LoadCase};
pub use seismic::{
    ElfParameters, ElfReport, SeismicELFLoadCase, SeismicRSAnalysisResults, SeismicRSLoadCase,
    SpectrumLoadCase,
};
pub use variants::{ModalLoadCase, OtherLoadCase, SeismicTransientLoadCase, StaticLoadCase};

/// Behaviour shared by the concrete load case types
pub trait LoadCaseVariant: Sized {
    /// Kind of every case of this type
    const KIND: CaseKind;

    /// Create an empty case
    fn create(name: &str, model: Arc<Model>, analysis: Box<dyn Analysis>) -> Self;

    fn base(&self) -> &LoadCase;

    fn base_mut(&mut self) -> &mut LoadCase;

    /// Load registry, for kinds that carry loads
    fn loads(&self) -> Option<&LoadRegistry> {
        None
    }

    /// Mass registry, for kinds that carry mass
    fn mass(&self) -> Option<&MassRegistry> {
        None
    }

    fn mass_mut(&mut self) -> Option<&mut MassRegistry> {
        None
    }

    /// Basic forces along the elements of an element recorder, including
    /// the effect of this case's distributed loads
    fn calculate_basic_forces(
        &self,
        recorder_name: &str,
        components: &[&ComponentAssembly],
        ndm: usize,
        num_stations: usize,
    ) -> CaseResult<BasicForces> {
        self.base().basic_forces(
            recorder_name,
            components,
            ndm,
            num_stations,
            self.loads().map(|loads| &loads.component_udl),
        )
    }
}

/// Name-keyed load cases of one kind, created on first reference
pub struct CaseCollection<C> {
    model: Arc<Model>,
    factory: AnalysisFactory,
    cases: BTreeMap<String, C>,
}

impl<C: LoadCaseVariant> CaseCollection<C> {
    pub fn new(model: Arc<Model>, factory: AnalysisFactory) -> Self {
        Self {
            model,
            factory,
            cases: BTreeMap::new(),
        }
    }

    /// Get the case with this name, creating it if it does not exist yet
    pub fn get_or_create(&mut self, name: &str) -> &mut C {
        let model = &self.model;
        let factory = &self.factory;
        self.cases.entry(name.to_string()).or_insert_with(|| {
            log::debug!("Creating {} load case `{}`", C::KIND, name);
            C::create(name, Arc::clone(model), factory(C::KIND.analysis_kind()))
        })
    }

    /// Get an existing case
    pub fn get(&self, name: &str) -> CaseResult<&C> {
        self.cases
            .get(name)
            .ok_or_else(|| CaseError::LoadCaseNotFound(name.to_string()))
    }

    /// Get an existing case mutably
    pub fn get_mut(&mut self, name: &str) -> CaseResult<&mut C> {
        self.cases
            .get_mut(name)
            .ok_or_else(|| CaseError::LoadCaseNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cases.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cases.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &C)> {
        self.cases.iter().map(|(name, case)| (name.as_str(), case))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut C)> {
        self.cases.iter_mut().map(|(name, case)| (name.as_str(), case))
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl<C> fmt::Debug for CaseCollection<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaseCollection")
            .field("cases", &self.cases.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Borrowed view of a load case of any kind
#[derive(Debug, Clone, Copy)]
pub enum LoadCaseRef<'a> {
    Static(&'a StaticLoadCase),
    Modal(&'a ModalLoadCase),
    SeismicElf(&'a SeismicELFLoadCase),
    SeismicRs(&'a SeismicRSLoadCase),
    SeismicTransient(&'a SeismicTransientLoadCase),
    Other(&'a OtherLoadCase),
}

impl<'a> LoadCaseRef<'a> {
    pub fn base(&self) -> &'a LoadCase {
        match *self {
            Self::Static(case) => &case.base,
            Self::Modal(case) => &case.base,
            Self::SeismicElf(case) => &case.base,
            Self::SeismicRs(case) => &case.base,
            Self::SeismicTransient(case) => &case.base,
            Self::Other(case) => &case.base,
        }
    }

    pub fn name(&self) -> &'a str {
        self.base().name()
    }

    pub fn kind(&self) -> CaseKind {
        self.base().kind()
    }

    pub fn loads(&self) -> Option<&'a LoadRegistry> {
        match *self {
            Self::Static(case) => case.loads(),
            Self::Modal(case) => case.loads(),
            Self::SeismicElf(case) => case.loads(),
            Self::SeismicRs(case) => case.loads(),
            Self::SeismicTransient(case) => case.loads(),
            Self::Other(case) => case.loads(),
        }
    }

    pub fn mass(&self) -> Option<&'a MassRegistry> {
        match *self {
            Self::Static(case) => case.mass(),
            Self::Modal(case) => case.mass(),
            Self::SeismicElf(case) => case.mass(),
            Self::SeismicRs(case) => case.mass(),
            Self::SeismicTransient(case) => case.mass(),
            Self::Other(case) => case.mass(),
        }
    }
}
