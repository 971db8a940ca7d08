//! Seismic load cases: equivalent lateral force and response spectrum

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{CaseCollection, CaseKind, LoadCase, LoadCaseVariant, ModalLoadCase};
use crate::analysis::{Analysis, DEFAULT_NODE_RECORDER};
use crate::common::{interp_extrapolate, EPSILON};
use crate::error::{CaseError, CaseResult};
use crate::loads::{LoadRegistry, PointLoad};
use crate::model::Model;
use crate::spectrum::DesignSpectrum;
use crate::table::{Label, DOF_LEVEL, NODE_LEVEL};

/// Sd1 values of the Cu table, ascending
const CU_SD1: [f64; 5] = [0.1, 0.15, 0.2, 0.3, 0.4];
/// Upper limit period coefficient Cu for each Sd1
const CU_VALUES: [f64; 5] = [1.7, 1.6, 1.5, 1.4, 1.4];
/// Periods of the vertical distribution exponent table
const K_PERIODS: [f64; 2] = [0.5, 2.5];
/// Vertical distribution exponent k for each period
const K_VALUES: [f64; 2] = [1.0, 2.0];

/// Load cases carrying a design response spectrum
pub trait SpectrumLoadCase {
    fn design_spectrum(&self) -> Option<&DesignSpectrum>;

    fn set_design_spectrum(&mut self, spectrum: DesignSpectrum);

    /// Load the design spectrum from a `period,Sa(g)` CSV file
    fn define_design_spectrum_from_csv<P: AsRef<Path>>(&mut self, path: P) -> CaseResult<()> {
        self.set_design_spectrum(DesignSpectrum::from_csv(path)?);
        Ok(())
    }

    /// Define the design spectrum from matching periods and Sa values
    fn define_design_spectrum(&mut self, periods: &[f64], sa: &[f64]) -> CaseResult<()> {
        self.set_design_spectrum(DesignSpectrum::new(periods, sa)?);
        Ok(())
    }

    /// Spectral acceleration (g) at a period
    fn interpolate_spectrum(&self, period: f64) -> CaseResult<f64> {
        self.design_spectrum()
            .map(|spectrum| spectrum.interpolate(period))
            .ok_or_else(|| CaseError::MissingConfiguration("design spectrum".to_string()))
    }
}

/// Inputs of the equivalent lateral force procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElfParameters {
    /// Response modification factor, R
    pub response_modification_factor: f64,
    /// Importance factor, Ie
    pub importance_factor: f64,
    /// First mode period from a modal analysis
    pub first_mode_period: f64,
    /// Design spectral acceleration at 1 s, Sd1
    pub sd1: f64,
    /// Structural height, in feet after applying `length_to_feet_factor`
    pub structural_height: f64,
    /// Approximate period parameters Ct and x
    pub approximate_period_parameters: (f64, f64),
    /// Direction of loading as a vector with one entry per degree of
    /// freedom
    pub direction: Vec<f64>,
    /// Elevation of the base; nodes at or below it are not loaded
    pub base_elevation: f64,
    /// Factor converting model length units to feet
    pub length_to_feet_factor: f64,
}

impl ElfParameters {
    pub fn new(
        response_modification_factor: f64,
        importance_factor: f64,
        first_mode_period: f64,
        sd1: f64,
        structural_height: f64,
        approximate_period_parameters: (f64, f64),
        direction: &[f64],
    ) -> Self {
        Self {
            response_modification_factor,
            importance_factor,
            first_mode_period,
            sd1,
            structural_height,
            approximate_period_parameters,
            direction: direction.to_vec(),
            base_elevation: 0.0,
            length_to_feet_factor: 1.0,
        }
    }

    pub fn with_base_elevation(mut self, base_elevation: f64) -> Self {
        self.base_elevation = base_elevation;
        self
    }

    pub fn with_length_to_feet_factor(mut self, factor: f64) -> Self {
        self.length_to_feet_factor = factor;
        self
    }
}

/// Derivation of the ELF loads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElfReport {
    /// Approximate period Ta = Ct h^x
    pub approximate_period: f64,
    /// Upper limit coefficient Cu
    pub cu: f64,
    /// Upper limit period Cu Ta
    pub max_period: f64,
    /// First mode period T1
    pub first_mode_period: f64,
    /// Period used for design, min(T1, Cu Ta)
    pub controlling_period: f64,
    /// Spectral acceleration at the controlling period (g)
    pub sa: f64,
    /// Seismic response coefficient Cs
    pub cs: f64,
    /// Total seismic weight W
    pub seismic_weight: f64,
    /// Base shear Vb
    pub base_shear: f64,
    /// Vertical distribution exponent k
    pub exponent: f64,
    /// Lateral force applied at each node
    pub nodal_forces: BTreeMap<usize, f64>,
}

impl fmt::Display for ElfReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Approx. period = {:.2} s.", self.approximate_period)?;
        writeln!(f, "Cu = {:.2}.", self.cu)?;
        writeln!(f, "Tmax = {:.2} s.", self.max_period)?;
        writeln!(f, "T1 = {:.2} s.", self.first_mode_period)?;
        writeln!(f, "Sa(T) = {:.2} g.", self.sa)?;
        writeln!(f, "W = {:.0}.", self.seismic_weight)?;
        write!(f, "Vb = {:.0}.", self.base_shear)
    }
}

/// Equivalent lateral force load case
#[derive(Debug)]
pub struct SeismicELFLoadCase {
    pub base: LoadCase,
    pub load_registry: LoadRegistry,
    design_spectrum: Option<DesignSpectrum>,
    seismic_weight: BTreeMap<usize, f64>,
}

impl SeismicELFLoadCase {
    /// Seismic weight per node
    pub fn seismic_weight(&self) -> &BTreeMap<usize, f64> {
        &self.seismic_weight
    }

    /// Set the seismic weight of a node
    pub fn set_seismic_weight(&mut self, node: usize, weight: f64) {
        self.seismic_weight.insert(node, weight);
    }

    /// Derive the seismic weight of every massed node of a modal case:
    /// first mass component times `g_constant`
    pub fn extract_seismic_weight(&mut self, modal_case: &ModalLoadCase, g_constant: f64) {
        for (node, mass) in modal_case.mass_registry.iter() {
            self.seismic_weight.insert(*node, mass.component(0) * g_constant);
        }
    }

    /// Compute the equivalent lateral forces and store them as the case's
    /// nodal loads
    pub fn define_loads(&mut self, params: &ElfParameters) -> CaseResult<ElfReport> {
        if self.design_spectrum.is_none() {
            return Err(CaseError::MissingConfiguration("design spectrum".to_string()));
        }
        if self.seismic_weight.is_empty() {
            return Err(CaseError::MissingConfiguration("seismic weight".to_string()));
        }
        if params.direction.is_empty() {
            return Err(CaseError::InvalidArgument(
                "loading direction must have at least one component".to_string(),
            ));
        }

        let (c_t, x_param) = params.approximate_period_parameters;
        let approximate_period = c_t * params.structural_height.powf(x_param);
        let cu = interp_extrapolate(&CU_SD1, &CU_VALUES, params.sd1);
        let max_period = cu * approximate_period;
        let controlling_period = params.first_mode_period.min(max_period);
        let sa = self.interpolate_spectrum(controlling_period)?;
        let cs = sa / (params.response_modification_factor / params.importance_factor);
        let seismic_weight: f64 = self.seismic_weight.values().sum();
        let base_shear = cs * seismic_weight;
        let exponent = interp_extrapolate(&K_PERIODS, &K_VALUES, controlling_period);

        let all_nodes = self.base.model().get_all_nodes();
        let mut nodal_cvx = BTreeMap::new();
        for (uid, weight) in &self.seismic_weight {
            let node = all_nodes.get(uid).ok_or(CaseError::NodeNotFound(*uid))?;
            let height = node.elevation() - params.base_elevation;
            if height < EPSILON {
                continue;
            }
            let cvx = weight * (height * params.length_to_feet_factor).powf(exponent);
            nodal_cvx.insert(*uid, cvx);
        }
        let total_cvx: f64 = nodal_cvx.values().sum();
        if total_cvx <= 0.0 {
            return Err(CaseError::InvalidArgument(format!(
                "no seismic weight above base elevation {}",
                params.base_elevation
            )));
        }

        let nodal_forces: BTreeMap<usize, f64> = nodal_cvx
            .into_iter()
            .map(|(uid, cvx)| (uid, cvx * base_shear / total_cvx))
            .collect();
        for (uid, force) in &nodal_forces {
            let load: Vec<f64> = params.direction.iter().map(|d| d * force).collect();
            self.load_registry.add_nodal_load(*uid, PointLoad::from(load));
        }

        let report = ElfReport {
            approximate_period,
            cu,
            max_period,
            first_mode_period: params.first_mode_period,
            controlling_period,
            sa,
            cs,
            seismic_weight,
            base_shear,
            exponent,
            nodal_forces,
        };
        log::info!(
            "Case `{}`: ELF base shear {:.3} over {} nodes",
            self.base.name(),
            base_shear,
            report.nodal_forces.len()
        );
        Ok(report)
    }

    /// Run the static analysis under the lateral forces
    pub fn run(&mut self) -> CaseResult<()> {
        self.base.run_analysis(Some(&self.load_registry), None)
    }
}

impl SpectrumLoadCase for SeismicELFLoadCase {
    fn design_spectrum(&self) -> Option<&DesignSpectrum> {
        self.design_spectrum.as_ref()
    }

    fn set_design_spectrum(&mut self, spectrum: DesignSpectrum) {
        self.design_spectrum = Some(spectrum);
    }
}

impl LoadCaseVariant for SeismicELFLoadCase {
    const KIND: CaseKind = CaseKind::SeismicElf;

    fn create(name: &str, model: Arc<Model>, analysis: Box<dyn Analysis>) -> Self {
        Self {
            base: LoadCase::new(name, Self::KIND, model, analysis),
            load_registry: LoadRegistry::new(),
            design_spectrum: None,
            seismic_weight: BTreeMap::new(),
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

/// Modal response spectrum quantities, one entry per mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicRSAnalysisResults {
    /// Modal participation factors
    pub gamma_n: Vec<f64>,
    /// Effective modal masses
    pub m_star: Vec<f64>,
    /// Modal base shears
    pub vb_modal: Vec<f64>,
    /// Modal displacement amplitudes
    pub modal_q: Vec<f64>,
    /// Total mass in the excitation direction
    pub total_mass: f64,
}

/// Response spectrum load case, linked to a modal load case
#[derive(Debug)]
pub struct SeismicRSLoadCase {
    pub base: LoadCase,
    pub load_registry: LoadRegistry,
    design_spectrum: Option<DesignSpectrum>,
    direction: Option<usize>,
    g_constant: Option<f64>,
    linked_modal_case: Option<String>,
    results: Option<SeismicRSAnalysisResults>,
}

impl SeismicRSLoadCase {
    /// Set the excitation direction (0, 1 or 2) and the mass-to-weight
    /// constant, and link the modal case whose modes are combined.
    ///
    /// The modal case's supports and rigid diaphragms are copied.
    pub fn configure(
        &mut self,
        direction: usize,
        g_constant: f64,
        linked_modal_case: &ModalLoadCase,
    ) -> CaseResult<()> {
        if direction > 2 {
            return Err(CaseError::InvalidDirection(direction));
        }
        self.direction = Some(direction);
        self.g_constant = Some(g_constant);
        self.linked_modal_case = Some(linked_modal_case.base.name().to_string());
        self.base.fixed_supports = linked_modal_case.base.fixed_supports.clone();
        self.base.elastic_supports = linked_modal_case.base.elastic_supports.clone();
        self.base.rigid_diaphragm = linked_modal_case.base.rigid_diaphragm.clone();
        Ok(())
    }

    pub fn direction(&self) -> Option<usize> {
        self.direction
    }

    /// Name of the linked modal case
    pub fn linked_modal_case(&self) -> Option<&str> {
        self.linked_modal_case.as_deref()
    }

    /// Results of the last participation factor calculation
    pub fn results(&self) -> Option<&SeismicRSAnalysisResults> {
        self.results.as_ref()
    }

    /// Compute modal participation factors, effective masses, modal base
    /// shears and modal amplitudes from the linked modal case's modes and
    /// masses
    pub fn calculate_modal_participation_factors(
        &mut self,
        modal_cases: &CaseCollection<ModalLoadCase>,
    ) -> CaseResult<&SeismicRSAnalysisResults> {
        let link = self.linked_modal_case.as_deref().ok_or_else(|| {
            CaseError::MissingConfiguration("linked modal load case".to_string())
        })?;
        let spectrum = self
            .design_spectrum
            .as_ref()
            .ok_or_else(|| CaseError::MissingConfiguration("design spectrum".to_string()))?;
        let direction = self
            .direction
            .ok_or_else(|| CaseError::MissingConfiguration("excitation direction".to_string()))?;
        let g_constant = self
            .g_constant
            .ok_or_else(|| CaseError::MissingConfiguration("g constant".to_string()))?;
        let modal = modal_cases.get(link)?;

        let periods = modal.periods();
        let num_modes = periods.len();
        if num_modes == 0 {
            return Err(CaseError::MissingConfiguration(format!(
                "completed modal analysis in `{}`",
                link
            )));
        }

        let model = modal.base.model();
        let ndf = model.ndf();
        if direction >= ndf {
            return Err(CaseError::InvalidDirection(direction));
        }
        let displacements = modal.base.analysis.get_recorder(DEFAULT_NODE_RECORDER)?.get_data();
        if displacements.nrows() < num_modes {
            return Err(CaseError::ShapeMismatch(format!(
                "{} periods but {} recorded mode shapes",
                num_modes,
                displacements.nrows()
            )));
        }
        let node_position = displacements.level_position(NODE_LEVEL);
        let dof_position = displacements.level_position(DOF_LEVEL);
        if node_position != Some(0) || dof_position != Some(1) {
            return Err(CaseError::MissingColumn(format!(
                "levels `{}` and `{}`",
                NODE_LEVEL, DOF_LEVEL
            )));
        }

        // (column of the mode shape table, mass) for every node and dof
        let mut entries: Vec<(usize, usize, f64)> = Vec::new();
        for uid in model.get_all_nodes().keys() {
            let mass = modal.mass_registry.get(*uid);
            for dof in 0..ndf {
                let key = [Label::from(*uid), Label::from(dof + 1)];
                let column = displacements.column_position(&key).ok_or_else(|| {
                    CaseError::MissingColumn(format!("node {} dof {}", uid, dof + 1))
                })?;
                let m = mass.map_or(0.0, |m| m.component(dof));
                entries.push((column, dof, m));
            }
        }
        let total_mass: f64 = entries
            .iter()
            .filter(|(_, dof, _)| *dof == direction)
            .map(|(_, _, m)| m)
            .sum();

        let values = displacements.values();
        let mut results = SeismicRSAnalysisResults {
            gamma_n: Vec::with_capacity(num_modes),
            m_star: Vec::with_capacity(num_modes),
            vb_modal: Vec::with_capacity(num_modes),
            modal_q: Vec::with_capacity(num_modes),
            total_mass,
        };
        for (mode, period) in periods.iter().enumerate() {
            let mut l_n = 0.0;
            let mut m_n = 0.0;
            for (column, dof, m) in &entries {
                let phi = values[(mode, *column)];
                if *dof == direction {
                    l_n += phi * m;
                }
                m_n += phi * phi * m;
            }
            if m_n.abs() < f64::EPSILON {
                return Err(CaseError::InvalidArgument(format!(
                    "mode {} has zero generalized mass",
                    mode + 1
                )));
            }
            let gamma_n = l_n / m_n;
            let m_star = l_n * l_n / m_n;
            let sa = spectrum.interpolate(*period);
            let omega = 2.0 * PI / period;
            results.gamma_n.push(gamma_n);
            results.m_star.push(m_star);
            results.vb_modal.push(sa * m_star * g_constant);
            results.modal_q.push(gamma_n * sa / omega.powi(2) * g_constant);
        }

        log::info!(
            "Case `{}`: participation factors of {} modes from `{}`",
            self.base.name(),
            num_modes,
            link
        );
        Ok(&*self.results.insert(results))
    }

    /// Running a response spectrum case computes its modal quantities
    pub fn run(&mut self, modal_cases: &CaseCollection<ModalLoadCase>) -> CaseResult<()> {
        self.calculate_modal_participation_factors(modal_cases)?;
        Ok(())
    }
}

impl SpectrumLoadCase for SeismicRSLoadCase {
    fn design_spectrum(&self) -> Option<&DesignSpectrum> {
        self.design_spectrum.as_ref()
    }

    fn set_design_spectrum(&mut self, spectrum: DesignSpectrum) {
        self.design_spectrum = Some(spectrum);
    }
}

impl LoadCaseVariant for SeismicRSLoadCase {
    const KIND: CaseKind = CaseKind::SeismicRs;

    fn create(name: &str, model: Arc<Model>, analysis: Box<dyn Analysis>) -> Self {
        Self {
            base: LoadCase::new(name, Self::KIND, model, analysis),
            load_registry: LoadRegistry::new(),
            design_spectrum: None,
            direction: None,
            g_constant: None,
            linked_modal_case: None,
            results: None,
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
