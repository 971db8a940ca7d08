//! Analysis backed by an external solver executable
//!
//! The solver is run once per load case, inside the case's result
//! directory. It receives `model.json` and `case.json` and is expected to
//! leave one `recorders/<name>.json` file per recorder and, for modal
//! analyses, a `periods.json` array.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::process::Command;

use serde::Serialize;

use super::{Analysis, AnalysisSettings, CaseInputs, Recorder};
use crate::error::{CaseError, CaseResult};
use crate::model::Model;

/// Environment variable naming the solver executable
pub const SOLVER_ENV_VAR: &str = "FRAME_CASES_SOLVER";

const MODEL_FILE: &str = "model.json";
const CASE_FILE: &str = "case.json";
const RECORDER_DIR: &str = "recorders";
const PERIODS_FILE: &str = "periods.json";

#[derive(Serialize)]
struct CaseFile<'a> {
    settings: &'a AnalysisSettings,
    #[serde(flatten)]
    inputs: &'a CaseInputs<'a>,
}

/// Runs an external solver and reads back its recorders
#[derive(Debug, Clone, Default)]
pub struct ExternalAnalysis {
    settings: AnalysisSettings,
    recorders: BTreeMap<String, Recorder>,
    periods: Vec<f64>,
}

impl ExternalAnalysis {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self {
            settings,
            recorders: BTreeMap::new(),
            periods: Vec::new(),
        }
    }

    fn solver_command(&self) -> CaseResult<String> {
        if let Some(command) = &self.settings.solver_command {
            return Ok(command.clone());
        }
        std::env::var(SOLVER_ENV_VAR).map_err(|_| CaseError::SolverNotConfigured)
    }

    fn write_json<T: Serialize>(path: &Path, value: &T) -> CaseResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, value)?;
        Ok(())
    }

    pub(crate) fn load_recorders(dir: &Path) -> CaseResult<BTreeMap<String, Recorder>> {
        let mut recorders = BTreeMap::new();
        let recorder_dir = dir.join(RECORDER_DIR);
        if !recorder_dir.is_dir() {
            log::warn!("Solver produced no recorder directory in {:?}", dir);
            return Ok(recorders);
        }
        for entry in fs::read_dir(&recorder_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let reader = BufReader::new(File::open(&path)?);
            let recorder: Recorder = serde_json::from_reader(reader)?;
            log::debug!(
                "Loaded {} recorder `{}` ({} rows)",
                recorder.kind.name(),
                name,
                recorder.get_data().nrows()
            );
            recorders.insert(name.to_string(), recorder);
        }
        Ok(recorders)
    }

    pub(crate) fn load_periods(dir: &Path) -> CaseResult<Vec<f64>> {
        let path = dir.join(PERIODS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Analysis for ExternalAnalysis {
    fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut AnalysisSettings {
        &mut self.settings
    }

    fn run(&mut self, model: &Model, inputs: &CaseInputs<'_>) -> CaseResult<()> {
        let work_path = self.settings.require_result_directory()?.to_path_buf();
        fs::create_dir_all(&work_path)?;

        Self::write_json(&work_path.join(MODEL_FILE), model)?;
        Self::write_json(
            &work_path.join(CASE_FILE),
            &CaseFile {
                settings: &self.settings,
                inputs,
            },
        )?;

        let solver = self.solver_command()?;
        log::info!(
            "Running command: {} {} {} in {:?}",
            solver,
            self.settings.solver_args.join(" "),
            CASE_FILE,
            work_path
        );

        let output = Command::new(&solver)
            .args(&self.settings.solver_args)
            .arg(CASE_FILE)
            .current_dir(&work_path)
            .output()
            .map_err(|e| CaseError::SolverFailed(format!("failed to execute {}: {}", solver, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            log::error!("Solver failed. Stderr: {}\nStdout: {}", stderr, stdout);
            return Err(CaseError::SolverFailed(format!(
                "{} exited with status {} for case `{}`",
                solver, output.status, inputs.name
            )));
        }

        self.recorders = Self::load_recorders(&work_path)?;
        self.periods = Self::load_periods(&work_path)?;
        log::info!(
            "Case `{}` finished: {} recorders, {} periods",
            inputs.name,
            self.recorders.len(),
            self.periods.len()
        );

        if !self.settings.keep_input_files {
            for file in [MODEL_FILE, CASE_FILE] {
                if let Err(err) = fs::remove_file(work_path.join(file)) {
                    log::warn!("Failed to remove {}: {}", file, err);
                }
            }
        }
        Ok(())
    }

    fn recorders(&self) -> &BTreeMap<String, Recorder> {
        &self.recorders
    }

    fn periods(&self) -> &[f64] {
        &self.periods
    }
}
