//! Analysis procedures run for each load case
//!
//! The numerical solution is delegated to an external finite element
//! solver. This module defines the interface load cases use to drive it
//! ([`Analysis`]), the settings it runs with, and the recorder output it
//! leaves behind.

mod external;
mod recorder;
mod stored;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::elements::{ElasticSupport, FixedSupport};
use crate::error::{CaseError, CaseResult};
use crate::loads::{LoadRegistry, MassRegistry};
use crate::model::Model;

pub use external::{ExternalAnalysis, SOLVER_ENV_VAR};
pub use recorder::{Recorder, RecorderKind, DEFAULT_NODE_RECORDER};
pub use stored::StoredAnalysis;

/// Type of analysis procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    /// Linear static analysis
    Static,
    /// Eigenvalue analysis for periods and mode shapes
    Modal,
    /// Time history analysis
    Transient,
    /// Anything else the solver understands
    Other,
}

impl Default for AnalysisKind {
    fn default() -> Self {
        Self::Static
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Static => "static",
            Self::Modal => "modal",
            Self::Transient => "transient",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Options for an analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Type of analysis
    pub kind: AnalysisKind,
    /// Directory the solver writes its output to
    pub result_directory: Option<PathBuf>,
    /// Number of modes to calculate (for modal analysis)
    pub num_modes: usize,
    /// Solver executable; falls back to the `FRAME_CASES_SOLVER`
    /// environment variable
    pub solver_command: Option<String>,
    /// Arguments passed to the solver before the case file
    pub solver_args: Vec<String>,
    /// Keep the solver input files after a successful run
    pub keep_input_files: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            kind: AnalysisKind::Static,
            result_directory: None,
            num_modes: 12,
            solver_command: None,
            solver_args: Vec::new(),
            keep_input_files: true,
        }
    }
}

impl AnalysisSettings {
    /// Create settings for a static analysis
    pub fn static_analysis() -> Self {
        Self::default()
    }

    /// Create settings for a modal analysis
    pub fn modal(num_modes: usize) -> Self {
        Self {
            kind: AnalysisKind::Modal,
            num_modes,
            ..Self::default()
        }
    }

    /// Default settings for an analysis kind
    pub fn for_kind(kind: AnalysisKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Set the result directory
    pub fn with_result_directory<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.result_directory = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set the solver executable
    pub fn with_solver_command(mut self, command: &str) -> Self {
        self.solver_command = Some(command.to_string());
        self
    }

    /// Add an argument passed to the solver ahead of the case file
    pub fn with_solver_arg(mut self, arg: &str) -> Self {
        self.solver_args.push(arg.to_string());
        self
    }

    /// Set the number of modes
    pub fn with_num_modes(mut self, num_modes: usize) -> Self {
        self.num_modes = num_modes;
        self
    }

    /// Remove the solver input files after a successful run
    pub fn discard_input_files(mut self) -> Self {
        self.keep_input_files = false;
        self
    }

    /// Result directory, which must have been assigned
    pub fn require_result_directory(&self) -> CaseResult<&Path> {
        self.result_directory
            .as_deref()
            .ok_or_else(|| CaseError::MissingConfiguration("analysis result directory".to_string()))
    }
}

/// Everything a load case hands to its analysis
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CaseInputs<'a> {
    pub name: &'a str,
    pub case_type: &'a str,
    pub fixed_supports: &'a BTreeMap<usize, FixedSupport>,
    pub elastic_supports: &'a BTreeMap<usize, ElasticSupport>,
    pub rigid_diaphragm: &'a BTreeMap<usize, Vec<usize>>,
    pub loads: Option<&'a LoadRegistry>,
    pub mass: Option<&'a MassRegistry>,
}

/// An analysis procedure backed by a finite element solver.
///
/// After a successful [`Analysis::run`] the recorders hold the solver
/// output and, for modal analyses, [`Analysis::periods`] holds one period
/// per mode.
pub trait Analysis: fmt::Debug {
    fn settings(&self) -> &AnalysisSettings;

    fn settings_mut(&mut self) -> &mut AnalysisSettings;

    /// Solve `model` under the supports, loads and masses of a load case
    fn run(&mut self, model: &Model, inputs: &CaseInputs<'_>) -> CaseResult<()>;

    /// Recorders by name
    fn recorders(&self) -> &BTreeMap<String, Recorder>;

    /// Natural periods, one per computed mode
    fn periods(&self) -> &[f64];

    fn kind(&self) -> AnalysisKind {
        self.settings().kind
    }

    /// Look up a recorder by name
    fn get_recorder(&self, name: &str) -> CaseResult<&Recorder> {
        self.recorders()
            .get(name)
            .ok_or_else(|| CaseError::RecorderNotFound(name.to_string()))
    }
}

/// Creates the analysis of each new load case
pub type AnalysisFactory = Arc<dyn Fn(AnalysisKind) -> Box<dyn Analysis>>;

/// Factory producing [`ExternalAnalysis`] instances
pub fn external_analysis_factory() -> AnalysisFactory {
    Arc::new(|kind| {
        Box::new(ExternalAnalysis::new(AnalysisSettings::for_kind(kind))) as Box<dyn Analysis>
    })
}
