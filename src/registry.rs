//! Load case registry
//!
//! The registry owns the model and one name-keyed collection per load case
//! kind. Besides plain bookkeeping it derives self-weight loads and lumped
//! masses, runs every case's analysis in its own result directory and
//! combines recorder output across cases.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::{external_analysis_factory, AnalysisFactory};
use crate::cases::{
    CaseCollection, LoadCase, LoadCaseRef, LoadCaseVariant, ModalLoadCase, OtherLoadCase,
    SeismicELFLoadCase, SeismicRSLoadCase, SeismicTransientLoadCase, StaticLoadCase,
};
use crate::combination::{combine, CombineAction};
use crate::elements::AssemblyKind;
use crate::error::{CaseError, CaseResult};
use crate::loads::{LoadCombination, LoadRegistry, MassRegistry, PointMass, Udl};
use crate::model::Model;
use crate::table::Table;

const TEMP_DIR_PREFIX: &str = "frame-cases-";

/// Where analysis results are stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResultSetup {
    /// Base results directory. A temporary directory is created on the
    /// first run when unset.
    pub directory: Option<PathBuf>,
}

impl AnalysisResultSetup {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: Some(directory.as_ref().to_path_buf()),
        }
    }

    /// Create the base directory, or a persistent temporary one if none
    /// was configured, and remember it
    fn resolve_directory(&mut self) -> CaseResult<PathBuf> {
        let dir = match &self.directory {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                dir.clone()
            }
            None => {
                let dir = tempfile::Builder::new()
                    .prefix(TEMP_DIR_PREFIX)
                    .tempdir()?
                    .keep();
                log::info!("Storing analysis results in {:?}", dir);
                dir
            }
        };
        self.directory = Some(dir.clone());
        Ok(dir)
    }
}

/// Organized collection of load cases bound to one model
#[derive(Debug)]
pub struct LoadCaseRegistry {
    model: Arc<Model>,
    pub result_setup: AnalysisResultSetup,
    pub static_cases: CaseCollection<StaticLoadCase>,
    pub modal: CaseCollection<ModalLoadCase>,
    pub seismic_elf: CaseCollection<SeismicELFLoadCase>,
    pub seismic_rs: CaseCollection<SeismicRSLoadCase>,
    pub seismic_transient: CaseCollection<SeismicTransientLoadCase>,
    pub other: CaseCollection<OtherLoadCase>,
}

impl LoadCaseRegistry {
    /// Create a registry whose cases run the external solver
    pub fn new(model: Model) -> Self {
        Self::with_factory(model, external_analysis_factory())
    }

    /// Create a registry whose cases get their analyses from `factory`
    pub fn with_factory(model: Model, factory: AnalysisFactory) -> Self {
        let model = Arc::new(model);
        Self {
            result_setup: AnalysisResultSetup::default(),
            static_cases: CaseCollection::new(Arc::clone(&model), Arc::clone(&factory)),
            modal: CaseCollection::new(Arc::clone(&model), Arc::clone(&factory)),
            seismic_elf: CaseCollection::new(Arc::clone(&model), Arc::clone(&factory)),
            seismic_rs: CaseCollection::new(Arc::clone(&model), Arc::clone(&factory)),
            seismic_transient: CaseCollection::new(Arc::clone(&model), Arc::clone(&factory)),
            other: CaseCollection::new(Arc::clone(&model), factory),
            model,
        }
    }

    pub fn with_result_setup(mut self, result_setup: AnalysisResultSetup) -> Self {
        self.result_setup = result_setup;
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Assign a downward distributed load equal to the section weight per
    /// length times `scaling_factor` to every beam-column component, in the
    /// static case `case_name` (created if needed)
    pub fn self_weight(&mut self, case_name: &str, scaling_factor: f64) -> CaseResult<()> {
        let ndm = self.model.ndm();
        let mut udls = Vec::new();
        for component in self.model.components.values() {
            if component.kind != AssemblyKind::BeamColumn {
                continue;
            }
            let section = component.get_section().ok_or_else(|| {
                CaseError::MissingConfiguration(format!("section of component {}", component.uid))
            })?;
            udls.push((component.uid, Udl::gravity(section.weight_per_length(scaling_factor), ndm)));
        }

        let case = self.static_cases.get_or_create(case_name);
        log::debug!(
            "Case `{}`: self weight on {} components",
            case_name,
            udls.len()
        );
        for (uid, udl) in udls {
            case.load_registry.add_component_udl(uid, udl);
        }
        Ok(())
    }

    /// Lump the loads of the source cases into nodal masses of the target
    /// case.
    ///
    /// `target` names an existing modal, seismic transient or other case.
    /// Each source is a `(case name, factor)` pair naming an existing case
    /// that carries loads. A component's distributed load becomes
    /// `|w| * L * factor / g / n` of translational mass at each of its
    /// internal nodes, `n` being its number of external nodes; components
    /// without internal nodes lump onto their external nodes. Point loads
    /// become `|P| * factor / g`, P being the vertical component. Masses add
    /// up with whatever the target already holds.
    pub fn self_mass(&mut self, target: &str, sources: &[(&str, f64)], g_constant: f64) -> CaseResult<()> {
        let ndm = self.model.ndm();
        let ndf = self.model.ndf();
        let mut masses: Vec<(usize, PointMass)> = Vec::new();

        for (source, factor) in sources {
            let loads = self.find_load_registry(source)?;
            for (uid, udl) in &loads.component_udl {
                let component = self.model.get_component(*uid)?;
                let num_nodes = component.external_nodes.len();
                if num_nodes == 0 {
                    return Err(CaseError::InvalidComponent(*uid));
                }
                let weight = (udl.vertical() * component.clear_length()).abs();
                let mass = weight * factor / g_constant / num_nodes as f64;
                let point_mass = PointMass::translational(mass, ndm, ndf);
                if component.internal_nodes.is_empty() {
                    for node in &component.external_nodes {
                        masses.push((*node, point_mass.clone()));
                    }
                } else {
                    for node in component.internal_nodes.keys() {
                        masses.push((*node, point_mass.clone()));
                    }
                }
            }
            for (uid, load) in &loads.nodal_loads {
                let mass = (load.component(ndm - 1) * factor / g_constant).abs();
                masses.push((*uid, PointMass::translational(mass, ndm, ndf)));
            }
        }

        let registry = self.find_mass_registry(target)?;
        log::debug!(
            "Case `{}`: {} self mass contributions from {} cases",
            target,
            masses.len(),
            sources.len()
        );
        for (node, mass) in masses {
            registry.accumulate(node, mass);
        }
        Ok(())
    }

    fn find_load_registry(&self, name: &str) -> CaseResult<&LoadRegistry> {
        self.get_load_cases()
            .into_iter()
            .filter(|case| case.name() == name)
            .find_map(|case| case.loads())
            .ok_or_else(|| CaseError::LoadCaseNotFound(name.to_string()))
    }

    fn find_mass_registry(&mut self, name: &str) -> CaseResult<&mut MassRegistry> {
        if let Ok(case) = self.modal.get_mut(name) {
            return Ok(&mut case.mass_registry);
        }
        if let Ok(case) = self.seismic_transient.get_mut(name) {
            return Ok(&mut case.mass_registry);
        }
        self.other
            .get_mut(name)
            .map(|case| &mut case.mass_registry)
    }

    /// Every load case, grouped by kind in run order
    pub fn get_load_cases(&self) -> Vec<LoadCaseRef<'_>> {
        let mut cases = Vec::new();
        cases.extend(self.static_cases.iter().map(|(_, c)| LoadCaseRef::Static(c)));
        cases.extend(self.modal.iter().map(|(_, c)| LoadCaseRef::Modal(c)));
        cases.extend(self.seismic_elf.iter().map(|(_, c)| LoadCaseRef::SeismicElf(c)));
        cases.extend(self.seismic_rs.iter().map(|(_, c)| LoadCaseRef::SeismicRs(c)));
        cases.extend(
            self.seismic_transient
                .iter()
                .map(|(_, c)| LoadCaseRef::SeismicTransient(c)),
        );
        cases.extend(self.other.iter().map(|(_, c)| LoadCaseRef::Other(c)));
        cases
    }

    /// Names of every load case, in run order
    pub fn get_load_case_list(&self) -> Vec<&str> {
        self.get_load_cases()
            .into_iter()
            .map(|case| case.name())
            .collect()
    }

    /// First case named `name`, in run order
    pub fn find_load_case(&self, name: &str) -> CaseResult<LoadCaseRef<'_>> {
        self.get_load_cases()
            .into_iter()
            .find(|case| case.name() == name)
            .ok_or_else(|| CaseError::LoadCaseNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.static_cases.len()
            + self.modal.len()
            + self.seismic_elf.len()
            + self.seismic_rs.len()
            + self.seismic_transient.len()
            + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every load case.
    ///
    /// Each case gets the result directory `<base>/<case type>_<name>`.
    /// Cases run one at a time: static, modal, ELF, response spectrum,
    /// transient, other. The first failure stops the run and leaves earlier
    /// results on disk.
    pub fn run(&mut self) -> CaseResult<()> {
        let base_dir = self.result_setup.resolve_directory()?;
        let total = self.len();
        let mut count = 0;

        run_collection(&mut self.static_cases, &base_dir, &mut count, total, |case| case.run())?;
        run_collection(&mut self.modal, &base_dir, &mut count, total, |case| case.run())?;
        run_collection(&mut self.seismic_elf, &base_dir, &mut count, total, |case| case.run())?;
        let modal = &self.modal;
        run_collection(&mut self.seismic_rs, &base_dir, &mut count, total, |case| case.run(modal))?;
        run_collection(&mut self.seismic_transient, &base_dir, &mut count, total, |case| {
            case.run()
        })?;
        run_collection(&mut self.other, &base_dir, &mut count, total, |case| case.run())?;

        log::info!("Finished {} load cases in {:?}", total, base_dir);
        Ok(())
    }

    fn recorder_tables(&self, case_names: &[&str], recorder_name: &str) -> CaseResult<Vec<Table>> {
        case_names
            .iter()
            .map(|name| {
                let case = self.find_load_case(name)?;
                Ok(case
                    .base()
                    .analysis
                    .get_recorder(recorder_name)?
                    .get_data()
                    .clone())
            })
            .collect()
    }

    /// Combine one recorder's output across the named cases
    pub fn combine_recorder(
        &self,
        case_names: &[&str],
        recorder_name: &str,
        action: CombineAction,
    ) -> CaseResult<Table> {
        let tables = self.recorder_tables(case_names, recorder_name)?;
        combine(&tables, action)
    }

    /// Evaluate a load combination on one recorder's output
    pub fn evaluate_combination(
        &self,
        combination: &LoadCombination,
        recorder_name: &str,
    ) -> CaseResult<Table> {
        let names: Vec<&str> = combination.case_names().collect();
        let tables = self.recorder_tables(&names, recorder_name)?;
        log::debug!(
            "Evaluating combination `{}` on recorder `{}`",
            combination.name,
            recorder_name
        );
        combination.apply(&tables)
    }
}

/// Point a case's analysis at its result directory
fn prepare_case(base_dir: &Path, case: &mut LoadCase, count: usize, total: usize) -> CaseResult<()> {
    let case_type = case.get_load_case_type();
    log::info!("Processing {}: {} ({}/{})", case_type, case.name(), count, total);
    let case_dir = base_dir.join(format!("{}_{}", case_type, case.name()));
    fs::create_dir_all(&case_dir)?;
    case.analysis.settings_mut().result_directory = Some(case_dir);
    Ok(())
}

fn run_collection<C, F>(
    cases: &mut CaseCollection<C>,
    base_dir: &Path,
    count: &mut usize,
    total: usize,
    mut run: F,
) -> CaseResult<()>
where
    C: LoadCaseVariant,
    F: FnMut(&mut C) -> CaseResult<()>,
{
    for (_, case) in cases.iter_mut() {
        *count += 1;
        prepare_case(base_dir, case.base_mut(), *count, total)?;
        run(case)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Analysis, AnalysisKind, AnalysisSettings, StoredAnalysis};
    use crate::common::Dimensionality;
    use crate::elements::{ComponentAssembly, Element, ElementKind, Node, Section};
    use crate::loads::PointLoad;
    use approx::assert_relative_eq;

    fn stored_factory() -> AnalysisFactory {
        Arc::new(|kind: AnalysisKind| {
            Box::new(StoredAnalysis::new(AnalysisSettings::for_kind(kind))) as Box<dyn Analysis>
        })
    }

    /// One beam between nodes 1 and 2 with clear span nodes 10 and 11
    fn model() -> Model {
        let mut model = Model::new("beam", Dimensionality::Frame3D);
        model.add_node(Node::new(1, &[0.0, 0.0, 120.0])).unwrap();
        model.add_node(Node::new(2, &[240.0, 0.0, 120.0])).unwrap();
        let i = Node::new(10, &[10.0, 0.0, 120.0]);
        let j = Node::new(11, &[230.0, 0.0, 120.0]);
        let beam = ComponentAssembly::new(5, AssemblyKind::BeamColumn, "beam")
            .with_external_nodes(&[1, 2])
            .with_internal_node(i.clone())
            .with_internal_node(j.clone())
            .with_element(Element::new(50, ElementKind::ElasticBeamColumn, i, j))
            .with_section(Section::new("W24X94", 27.7, 7.83));
        model.add_component(beam).unwrap();
        model
    }

    fn registry() -> LoadCaseRegistry {
        LoadCaseRegistry::with_factory(model(), stored_factory())
    }

    #[test]
    fn test_self_weight() {
        let mut registry = registry();
        registry.self_weight("dead", 1.2).unwrap();
        let udl = &registry.static_cases.get("dead").unwrap().load_registry.component_udl[&5];
        assert_eq!(udl.values()[..2], [0.0, 0.0]);
        assert_relative_eq!(udl.vertical(), -7.83 * 1.2);
    }

    #[test]
    fn test_self_weight_requires_section() {
        let mut model = model();
        model
            .add_component(
                ComponentAssembly::new(6, AssemblyKind::BeamColumn, "column")
                    .with_external_nodes(&[1]),
            )
            .unwrap();
        let mut registry = LoadCaseRegistry::with_factory(model, stored_factory());
        assert!(matches!(
            registry.self_weight("dead", 1.0),
            Err(CaseError::MissingConfiguration(_))
        ));
    }

    #[test]
    fn test_self_mass_accumulates_sources() {
        let mut registry = registry();
        registry.self_weight("dead", 1.0).unwrap();
        registry
            .static_cases
            .get_or_create("live")
            .load_registry
            .add_nodal_load(1, PointLoad::new(&[0.0, 0.0, -100.0, 0.0, 0.0, 0.0]));
        registry.modal.get_or_create("modal");

        registry
            .self_mass("modal", &[("dead", 1.0), ("live", 0.5)], 386.22)
            .unwrap();

        let mass = &registry.modal.get("modal").unwrap().mass_registry;
        let beam_mass = 7.83 * 220.0 / 386.22 / 2.0;
        assert_relative_eq!(mass.get(10).unwrap().component(0), beam_mass);
        assert_relative_eq!(mass.get(11).unwrap().component(2), beam_mass);
        assert_relative_eq!(mass.get(11).unwrap().component(3), 0.0);
        assert_relative_eq!(mass.get(1).unwrap().component(1), 50.0 / 386.22);
        assert_relative_eq!(
            mass.total(0),
            (7.83 * 220.0 + 50.0) / 386.22,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_self_mass_unknown_cases() {
        let mut registry = registry();
        registry.modal.get_or_create("modal");
        assert!(matches!(
            registry.self_mass("modal", &[("missing", 1.0)], 386.22),
            Err(CaseError::LoadCaseNotFound(_))
        ));
        registry.self_weight("dead", 1.0).unwrap();
        assert!(matches!(
            registry.self_mass("dead", &[("dead", 1.0)], 386.22),
            Err(CaseError::LoadCaseNotFound(_))
        ));
    }

    #[test]
    fn test_self_mass_rejects_component_without_external_nodes() {
        let mut model = model();
        model
            .add_component(
                ComponentAssembly::new(8, AssemblyKind::BeamColumn, "brace")
                    .with_section(Section::new("HSS6X6", 8.0, 2.0)),
            )
            .unwrap();
        let mut registry = LoadCaseRegistry::with_factory(model, stored_factory());
        registry.self_weight("dead", 1.0).unwrap();
        registry.modal.get_or_create("modal");

        assert!(matches!(
            registry.self_mass("modal", &[("dead", 1.0)], 386.22),
            Err(CaseError::InvalidComponent(8))
        ));
    }

    #[test]
    fn test_case_views_in_run_order() {
        let mut registry = registry();
        registry.other.get_or_create("custom");
        registry.modal.get_or_create("modal");
        registry.static_cases.get_or_create("live");
        registry.static_cases.get_or_create("dead");
        assert_eq!(registry.get_load_case_list(), vec!["dead", "live", "modal", "custom"]);
        assert_eq!(registry.find_load_case("modal").unwrap().kind(), crate::cases::CaseKind::Modal);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_run_assigns_result_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry().with_result_setup(AnalysisResultSetup::new(dir.path()));
        registry.static_cases.get_or_create("dead");
        registry.modal.get_or_create("modal");
        registry.run().unwrap();

        assert!(dir.path().join("Static_dead").is_dir());
        assert!(dir.path().join("Modal_modal").is_dir());
        let settings = registry.modal.get("modal").unwrap().base.analysis.settings();
        assert_eq!(
            settings.result_directory.as_deref(),
            Some(dir.path().join("Modal_modal").as_path())
        );
    }

    #[test]
    fn test_run_creates_temporary_directory() {
        let mut registry = registry();
        registry.static_cases.get_or_create("dead");
        registry.run().unwrap();
        let base = registry.result_setup.directory.clone().unwrap();
        assert!(base.join("Static_dead").is_dir());
        fs::remove_dir_all(base).unwrap();
    }
}
