//! Registry runs driving an external solver script
#![cfg(unix)]

mod common;

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use approx::assert_relative_eq;
use frame_cases::analysis::AnalysisFactory;
use frame_cases::prelude::*;

use common::*;

const NUM_STATIONS: usize = 3;

/// Solver that checks its inputs, fails for cases whose directory name
/// contains `broken`, and otherwise copies a fixture recorder
fn solver_script(dir: &Path) -> String {
    let fixture = dir.join("beam_forces.json");
    serde_json::to_writer(File::create(&fixture).unwrap(), &beam_forces(-10.0, 60.0, 0.0)).unwrap();
    let script = dir.join("solver.sh");
    fs::write(
        &script,
        format!(
            "test -f model.json || exit 2\n\
             grep -q '\"case_type\"' case.json || exit 3\n\
             case \"$(basename \"$PWD\")\" in *broken*) echo 'no convergence' >&2; exit 5;; esac\n\
             mkdir -p recorders\n\
             cp {} recorders/beam_forces.json\n",
            fixture.display()
        ),
    )
    .unwrap();
    script.to_string_lossy().into_owned()
}

fn external_factory(script: String) -> AnalysisFactory {
    Arc::new(move |kind| {
        let settings = AnalysisSettings::for_kind(kind)
            .with_solver_command("sh")
            .with_solver_arg(&script);
        Box::new(ExternalAnalysis::new(settings)) as Box<dyn Analysis>
    })
}

#[test]
fn test_external_solver_results_feed_post_processing() {
    init_logger();
    let tools = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    let mut registry = LoadCaseRegistry::with_factory(portal_frame(), external_factory(solver_script(tools.path())))
        .with_result_setup(AnalysisResultSetup::new(results.path()));
    registry.self_weight("dead", 1.0).unwrap();
    registry
        .static_cases
        .get_or_create("dead")
        .base
        .add_supports_at_level(FixedSupport::fixed(3).into(), "base")
        .unwrap();

    registry.run().unwrap();

    let case_dir = results.path().join("Static_dead");
    assert!(case_dir.join("recorders").join("beam_forces.json").is_file());
    assert!(case_dir.join("case.json").is_file());

    let model = registry.model();
    let beam = model.get_component(BEAM).unwrap();
    let forces = registry
        .static_cases
        .get("dead")
        .unwrap()
        .calculate_basic_forces("beam_forces", &[beam], model.ndm(), NUM_STATIONS)
        .unwrap();
    let mid = [Label::from(BEAM_ELEMENT), Label::from(0.5)];
    assert_relative_eq!(
        forces.moment_z.get(0, &mid).unwrap(),
        BEAM_WEIGHT * SPAN * SPAN / 8.0,
        epsilon = 1e-9
    );
}

#[test]
fn test_solver_failure_stops_the_run() {
    init_logger();
    let tools = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    let mut registry = LoadCaseRegistry::with_factory(portal_frame(), external_factory(solver_script(tools.path())))
        .with_result_setup(AnalysisResultSetup::new(results.path()));
    registry.static_cases.get_or_create("dead");
    registry.modal.get_or_create("broken");
    registry.other.get_or_create("never");

    let result = registry.run();

    assert!(matches!(result, Err(CaseError::SolverFailed(_))));
    // Earlier results stay on disk, later cases never start
    assert!(results
        .path()
        .join("Static_dead")
        .join("recorders")
        .is_dir());
    assert!(!results.path().join("Other_never").exists());
}
