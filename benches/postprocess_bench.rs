//! Benchmarks for result post-processing

use std::collections::BTreeMap;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use frame_cases::cases::LoadCase;
use frame_cases::prelude::*;
use frame_cases::table::{DOF_LEVEL, ELEMENT_LEVEL, NODE_LEVEL, STATION_LEVEL};

/// Node displacement table: `steps` rows by `nodes` x 6 dofs
fn node_table(nodes: usize, steps: usize, seed: f64) -> Table {
    let columns: Vec<Vec<Label>> = (1..=nodes)
        .flat_map(|node| (1..=6usize).map(move |dof| vec![Label::from(node), Label::from(dof)]))
        .collect();
    let rows: Vec<Vec<f64>> = (0..steps)
        .map(|step| {
            (0..columns.len())
                .map(|col| ((step * 31 + col) as f64 * seed).sin())
                .collect()
        })
        .collect();
    Table::from_rows(
        (0..steps).map(Label::from).collect(),
        vec![NODE_LEVEL, DOF_LEVEL],
        columns,
        &rows,
    )
    .unwrap()
}

/// Horizontal 3D beams of length 240 on a row, each its own component
fn beams(count: usize) -> Vec<ComponentAssembly> {
    (0..count)
        .map(|k| {
            let x = 240.0 * k as f64;
            let i = Node::new(1000 + 2 * k, &[x, 0.0, 144.0]);
            let j = Node::new(1001 + 2 * k, &[x + 240.0, 0.0, 144.0]);
            ComponentAssembly::new(k, AssemblyKind::BeamColumn, "beam")
                .with_element(Element::new(k, ElementKind::ElasticBeamColumn, i, j))
        })
        .collect()
}

/// Element recorder with i- and j-end forces of every beam
fn element_recorder(count: usize, steps: usize) -> Recorder {
    let mut columns = Vec::new();
    for element in 0..count {
        for station in [0.0, 1.0] {
            for dof in 1..=6usize {
                columns.push(vec![Label::from(element), Label::from(station), Label::from(dof)]);
            }
        }
    }
    let rows: Vec<Vec<f64>> = (0..steps)
        .map(|step| (0..columns.len()).map(|col| (step + col) as f64).collect())
        .collect();
    let data = Table::from_rows(
        (0..steps).map(Label::from).collect(),
        vec![ELEMENT_LEVEL, STATION_LEVEL, DOF_LEVEL],
        columns,
        &rows,
    )
    .unwrap();
    Recorder::element((0..count).collect(), data)
}

fn benchmark_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine");
    for cases in [2, 8, 32] {
        let tables: Vec<Table> = (0..cases)
            .map(|k| node_table(50, 20, 0.1 + k as f64))
            .collect();
        group.bench_with_input(BenchmarkId::new("add", cases), &tables, |b, tables| {
            b.iter(|| combine(black_box(tables), CombineAction::Add).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("envelope", cases), &tables, |b, tables| {
            b.iter(|| combine(black_box(tables), CombineAction::Envelope).unwrap())
        });
    }
    group.finish();
}

fn benchmark_basic_forces(c: &mut Criterion) {
    let count = 40;
    let components = beams(count);
    let component_refs: Vec<&ComponentAssembly> = components.iter().collect();
    let udls: BTreeMap<usize, Udl> = components
        .iter()
        .map(|component| (component.uid, Udl::gravity(0.5, 3)))
        .collect();
    let analysis = StoredAnalysis::new(AnalysisSettings::static_analysis())
        .with_recorder("forces", element_recorder(count, 10));
    let case = LoadCase::new(
        "dead",
        CaseKind::Static,
        Arc::new(Model::new("row", Dimensionality::Frame3D)),
        Box::new(analysis),
    );

    c.bench_function("basic_forces_40_beams", |b| {
        b.iter(|| {
            case.basic_forces(
                black_box("forces"),
                &component_refs,
                3,
                frame_cases::cases::DEFAULT_NUM_STATIONS,
                Some(&udls),
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, benchmark_combine, benchmark_basic_forces);
criterion_main!(benches);
