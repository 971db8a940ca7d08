//! Frame Cases - load case orchestration for finite element frame models
//!
//! This library organizes the loads, masses and supports of a building frame
//! model into load cases and post-processes the results of their analyses:
//! - Static, modal, seismic (ELF, response spectrum, time history) and
//!   custom load cases, created by name through a [`registry::LoadCaseRegistry`]
//! - Self weight and self mass derivation
//! - Equivalent lateral force distribution and modal participation factors
//! - Adding and enveloping recorder tables across load cases
//! - Basic force diagrams along members recorded only at their ends
//!
//! The numerical solution itself is delegated to an external solver through
//! the [`analysis::Analysis`] trait.
//!
//! ## Example
//! ```rust,no_run
//! use frame_cases::prelude::*;
//!
//! let mut model = Model::new("frame", Dimensionality::Frame3D);
//! model.grid_system.add_level("base", 0.0);
//! model.add_node(Node::new(1, &[0.0, 0.0, 0.0])).unwrap();
//! model.add_node(Node::new(2, &[0.0, 0.0, 144.0])).unwrap();
//!
//! let mut registry = LoadCaseRegistry::new(model);
//! let dead = registry.static_cases.get_or_create("dead");
//! dead.base
//!     .add_supports_at_level(FixedSupport::fixed(6).into(), "base")
//!     .unwrap();
//! dead.load_registry
//!     .add_nodal_load(2, PointLoad::new(&[10.0, 0.0, 0.0, 0.0, 0.0, 0.0]));
//!
//! // Requires FRAME_CASES_SOLVER to name the solver executable
//! registry.run().unwrap();
//! ```

pub mod analysis;
pub mod cases;
pub mod combination;
pub mod common;
pub mod elements;
pub mod error;
pub mod loads;
pub mod model;
pub mod registry;
pub mod spectrum;
pub mod table;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{
        Analysis, AnalysisKind, AnalysisSettings, ExternalAnalysis, Recorder, StoredAnalysis,
    };
    pub use crate::cases::{
        BasicForces, CaseKind, ElfParameters, LoadCaseVariant, ModalLoadCase, OtherLoadCase,
        SeismicELFLoadCase, SeismicRSLoadCase, SeismicTransientLoadCase, SpectrumLoadCase,
        StaticLoadCase,
    };
    pub use crate::combination::{combine, combine_single, CombineAction};
    pub use crate::common::{Dimensionality, G_CONST_IMPERIAL, G_CONST_SI};
    pub use crate::elements::{
        AssemblyKind, ComponentAssembly, ElasticSupport, Element, ElementKind, FixedSupport,
        Node, Section, Support,
    };
    pub use crate::error::{CaseError, CaseResult};
    pub use crate::loads::{LoadCombination, PointLoad, PointMass, Udl};
    pub use crate::model::Model;
    pub use crate::registry::{AnalysisResultSetup, LoadCaseRegistry};
    pub use crate::spectrum::DesignSpectrum;
    pub use crate::table::{Label, Table};
}
