//! Shared fixtures: a one-bay portal frame and the recorder tables a solver
//! would leave for it

#![allow(dead_code)]

use frame_cases::prelude::*;
use frame_cases::table::{DOF_LEVEL, ELEMENT_LEVEL, NODE_LEVEL, STATION_LEVEL};

pub const BEAM: usize = 10;
pub const COLUMN: usize = 11;
pub const BEAM_ELEMENT: usize = 100;
pub const COLUMN_ELEMENT: usize = 110;
pub const BEAM_WEIGHT: f64 = 0.5;
pub const COLUMN_WEIGHT: f64 = 0.4;
pub const SPAN: f64 = 240.0;
pub const STORY_HEIGHT: f64 = 144.0;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 2D portal frame: base nodes 1 and 2, roof nodes 3 and 4. The beam spans
/// between clear-span nodes 30 and 31; the left column connects 1 and 3
/// directly.
pub fn portal_frame() -> Model {
    let mut model = Model::new("portal", Dimensionality::Frame2D);
    model.grid_system.add_level("base", 0.0);
    model.grid_system.add_level("roof", STORY_HEIGHT);
    let n1 = Node::new(1, &[0.0, 0.0]);
    let n3 = Node::new(3, &[0.0, STORY_HEIGHT]);
    model.add_node(n1.clone()).unwrap();
    model.add_node(Node::new(2, &[SPAN, 0.0])).unwrap();
    model.add_node(n3.clone()).unwrap();
    model.add_node(Node::new(4, &[SPAN, STORY_HEIGHT])).unwrap();

    let i = Node::new(30, &[0.0, STORY_HEIGHT]);
    let j = Node::new(31, &[SPAN, STORY_HEIGHT]);
    let beam = ComponentAssembly::new(BEAM, AssemblyKind::BeamColumn, "beam")
        .with_external_nodes(&[3, 4])
        .with_internal_node(i.clone())
        .with_internal_node(j.clone())
        .with_element(Element::new(BEAM_ELEMENT, ElementKind::ElasticBeamColumn, i, j))
        .with_section(Section::new("W14X30", 8.85, BEAM_WEIGHT));
    let column = ComponentAssembly::new(COLUMN, AssemblyKind::BeamColumn, "column")
        .with_external_nodes(&[1, 3])
        .with_element(Element::new(COLUMN_ELEMENT, ElementKind::ElasticBeamColumn, n1, n3))
        .with_section(Section::new("W10X33", 9.71, COLUMN_WEIGHT));
    model.add_component(beam).unwrap();
    model.add_component(column).unwrap();
    model
}

/// Element recorder of the beam with i-end forces (N, V, M) and equal and
/// opposite j-end values
pub fn beam_forces(n: f64, v: f64, m: f64) -> Recorder {
    let mut columns = Vec::new();
    let mut values = Vec::new();
    for (station, sign) in [(0.0, 1.0), (1.0, -1.0)] {
        for (dof, value) in [(1usize, n), (2, v), (3, m)] {
            columns.push(vec![
                Label::from(BEAM_ELEMENT),
                Label::from(station),
                Label::from(dof),
            ]);
            values.push(sign * value);
        }
    }
    let data = Table::from_rows(
        vec![Label::from(0usize)],
        vec![ELEMENT_LEVEL, STATION_LEVEL, DOF_LEVEL],
        columns,
        &[values],
    )
    .unwrap();
    Recorder::element(vec![BEAM_ELEMENT], data)
}

/// Single sway mode: unit x displacement of every roof node
pub fn sway_mode() -> Recorder {
    let nodes = [1usize, 2, 3, 4, 30, 31];
    let mut columns = Vec::new();
    let mut values = Vec::new();
    for node in nodes {
        for dof in 1..=3usize {
            columns.push(vec![Label::from(node), Label::from(dof)]);
            values.push(if dof == 1 && node > 2 { 1.0 } else { 0.0 });
        }
    }
    let data = Table::from_rows(
        vec![Label::from(0usize)],
        vec![NODE_LEVEL, DOF_LEVEL],
        columns,
        &[values],
    )
    .unwrap();
    Recorder::node(nodes.to_vec(), data)
}

/// Total self weight of the frame
pub fn frame_weight() -> f64 {
    BEAM_WEIGHT * SPAN + COLUMN_WEIGHT * STORY_HEIGHT
}
