//! Analysis whose results are already available

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::{Analysis, AnalysisSettings, CaseInputs, ExternalAnalysis, Recorder};
use crate::error::CaseResult;
use crate::model::Model;

/// Analysis that does not call a solver: its recorders and periods are
/// supplied up front, either directly or from the result directory of an
/// earlier run
#[derive(Debug, Clone, Default)]
pub struct StoredAnalysis {
    settings: AnalysisSettings,
    recorders: BTreeMap<String, Recorder>,
    periods: Vec<f64>,
    runs: usize,
}

impl StoredAnalysis {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Load the recorders and periods an external solver left in `dir`
    pub fn from_directory<P: AsRef<Path>>(settings: AnalysisSettings, dir: P) -> CaseResult<Self> {
        let dir = dir.as_ref();
        Ok(Self {
            recorders: ExternalAnalysis::load_recorders(dir)?,
            periods: ExternalAnalysis::load_periods(dir)?,
            ..Self::new(settings)
        })
    }

    /// Add a recorder
    pub fn with_recorder(mut self, name: &str, recorder: Recorder) -> Self {
        self.recorders.insert(name.to_string(), recorder);
        self
    }

    /// Set the natural periods
    pub fn with_periods(mut self, periods: &[f64]) -> Self {
        self.periods = periods.to_vec();
        self
    }

    /// Number of times [`Analysis::run`] was called
    pub fn runs(&self) -> usize {
        self.runs
    }
}

impl Analysis for StoredAnalysis {
    fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut AnalysisSettings {
        &mut self.settings
    }

    fn run(&mut self, _model: &Model, inputs: &CaseInputs<'_>) -> CaseResult<()> {
        if let Some(dir) = &self.settings.result_directory {
            fs::create_dir_all(dir)?;
        }
        self.runs += 1;
        log::debug!(
            "Case `{}` uses {} stored recorders",
            inputs.name,
            self.recorders.len()
        );
        Ok(())
    }

    fn recorders(&self) -> &BTreeMap<String, Recorder> {
        &self.recorders
    }

    fn periods(&self) -> &[f64] {
        &self.periods
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Dimensionality;
    use crate::table::{Label, Table, DOF_LEVEL, NODE_LEVEL};

    fn recorder() -> Recorder {
        let data = Table::from_rows(
            vec![Label::from(0usize), Label::from(1usize)],
            vec![NODE_LEVEL, DOF_LEVEL],
            vec![vec![Label::from(7usize), Label::from(1usize)]],
            &[vec![0.1], vec![-0.2]],
        )
        .unwrap();
        Recorder::node(vec![7], data)
    }

    #[test]
    fn test_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("recorders")).unwrap();
        fs::write(
            dir.path().join("recorders").join("drift.json"),
            serde_json::to_string(&recorder()).unwrap(),
        )
        .unwrap();
        fs::write(dir.path().join("periods.json"), "[1.2, 0.4]").unwrap();

        let analysis =
            StoredAnalysis::from_directory(AnalysisSettings::modal(2), dir.path()).unwrap();
        assert_eq!(analysis.periods(), &[1.2, 0.4]);
        assert_eq!(analysis.get_recorder("drift").unwrap(), &recorder());
    }

    #[test]
    fn test_run_counts_and_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("Static_dead");
        let mut analysis =
            StoredAnalysis::new(AnalysisSettings::static_analysis().with_result_directory(&out));
        let model = Model::new("m", Dimensionality::Frame2D);
        let (fixed, elastic, diaphragm) = (BTreeMap::new(), BTreeMap::new(), BTreeMap::new());
        let inputs = CaseInputs {
            name: "dead",
            case_type: "Static",
            fixed_supports: &fixed,
            elastic_supports: &elastic,
            rigid_diaphragm: &diaphragm,
            loads: None,
            mass: None,
        };
        analysis.run(&model, &inputs).unwrap();
        analysis.run(&model, &inputs).unwrap();
        assert_eq!(analysis.runs(), 2);
        assert!(out.is_dir());
    }
}
