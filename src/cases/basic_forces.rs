//! Internal force diagrams along line elements
//!
//! Solvers only record element end forces. Forces at intermediate stations
//! are reconstructed from the i-end forces and the element's local uniform
//! distributed load by equilibrium of the free body between the i-end and
//! the station.

use std::collections::BTreeMap;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::LoadCase;
use crate::common::{linspace, THREE_DIMENSIONAL, TWO_DIMENSIONAL};
use crate::elements::{AssemblyKind, ComponentAssembly};
use crate::error::{CaseError, CaseResult};
use crate::loads::Udl;
use crate::table::{Label, Table, DOF_LEVEL, ELEMENT_LEVEL, STATION_LEVEL};

/// Number of stations used when none is given
pub const DEFAULT_NUM_STATIONS: usize = 12;

/// The six basic force diagrams, each indexed like the source recorder and
/// with `(element, station)` columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicForces {
    pub axial: Table,
    pub shear_y: Table,
    pub shear_z: Table,
    pub torsion: Table,
    pub moment_y: Table,
    pub moment_z: Table,
}

impl BasicForces {
    /// Diagrams in order: axial, shear Y, shear Z, torsion, moment Y,
    /// moment Z
    pub fn as_array(&self) -> [&Table; 6] {
        [
            &self.axial,
            &self.shear_y,
            &self.shear_z,
            &self.torsion,
            &self.moment_y,
            &self.moment_z,
        ]
    }
}

/// Station labels: `num_stations` values from 0 to 1 rounded to two
/// decimals
fn station_labels(num_stations: usize) -> Vec<Label> {
    linspace(0.0, 1.0, num_stations)
        .into_iter()
        .map(|s| Label::Float((s * 100.0).round() / 100.0))
        .collect()
}

/// i-end value of `dof` for each element, one vector of rows per element
fn i_end_values(data: &Table, dof: i64, elements: &[usize]) -> CaseResult<Vec<Vec<f64>>> {
    let at_i = data
        .xs(&Label::Int(dof), DOF_LEVEL)?
        .xs(&Label::Float(0.0), STATION_LEVEL)?;
    elements
        .iter()
        .map(|uid| at_i.column(&[Label::from(*uid)]))
        .collect()
}

/// Line elements in scope and the local distributed load on each
fn elements_in_scope(
    components: &[&ComponentAssembly],
    global_udls: Option<&BTreeMap<usize, Udl>>,
) -> (BTreeMap<usize, f64>, BTreeMap<usize, Vec<f64>>) {
    let mut lengths = BTreeMap::new();
    let mut local_udls = BTreeMap::new();
    for component in components {
        match component.kind {
            AssemblyKind::BeamColumn => {
                if let Some(udl) = global_udls.and_then(|udls| udls.get(&component.uid)) {
                    local_udls.extend(component.calculate_element_udl(udl.values()));
                }
            }
            AssemblyKind::Bar => {}
            AssemblyKind::Other => continue,
        }
        for element in component.line_elements() {
            lengths.insert(element.uid, element.clear_length());
        }
    }
    (lengths, local_udls)
}

impl LoadCase {
    /// Calculate basic forces at evenly spaced stations along every element
    /// of an element recorder.
    ///
    /// `components` must contain every element the recorder covers, and
    /// `global_udls` holds the case's component distributed loads, if any.
    pub fn basic_forces(
        &self,
        recorder_name: &str,
        components: &[&ComponentAssembly],
        ndm: usize,
        num_stations: usize,
        global_udls: Option<&BTreeMap<usize, Udl>>,
    ) -> CaseResult<BasicForces> {
        let recorder = self.analysis.get_recorder(recorder_name)?;
        let elements = recorder.elements(recorder_name)?;
        if num_stations == 0 {
            return Err(CaseError::InvalidArgument(
                "at least one station is required".to_string(),
            ));
        }

        let (lengths, local_udls) = elements_in_scope(components, global_udls);

        let data = recorder.get_data();
        if !data.has_level(DOF_LEVEL) || !data.has_level(STATION_LEVEL) {
            return Err(CaseError::MissingColumn(format!(
                "levels `{}` and `{}`",
                DOF_LEVEL, STATION_LEVEL
            )));
        }
        let ndf = data
            .level_values(DOF_LEVEL)?
            .iter()
            .filter_map(Label::as_int)
            .max()
            .unwrap_or(0);
        let recorded_ndm = match ndf {
            3 => TWO_DIMENSIONAL,
            6 => THREE_DIMENSIONAL,
            other => return Err(CaseError::UnsupportedDofCount(other.max(0) as usize)),
        };
        if ndm != TWO_DIMENSIONAL && ndm != THREE_DIMENSIONAL {
            return Err(CaseError::UnsupportedDimensionality(format!("ndm = {}", ndm)));
        }
        if ndm != recorded_ndm {
            return Err(CaseError::ShapeMismatch(format!(
                "recorder `{}` has {} degrees of freedom, expected a {}D model",
                recorder_name, ndf, ndm
            )));
        }

        let missing: Vec<usize> = elements
            .iter()
            .filter(|uid| !lengths.contains_key(uid))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(CaseError::MissingElements(missing));
        }

        let three_d = ndm == THREE_DIMENSIONAL;
        let axial_i = i_end_values(data, 1, elements)?;
        let shear_y_i = i_end_values(data, 2, elements)?;
        let (shear_z_i, torsion_i, moment_y_i, moment_z_i) = if three_d {
            (
                Some(i_end_values(data, 3, elements)?),
                Some(i_end_values(data, 4, elements)?),
                Some(i_end_values(data, 5, elements)?),
                i_end_values(data, 6, elements)?,
            )
        } else {
            (None, None, None, i_end_values(data, 3, elements)?)
        };

        let nrows = data.nrows();
        let ncols = elements.len() * num_stations;
        let mut axial = DMatrix::zeros(nrows, ncols);
        let mut shear_y = DMatrix::zeros(nrows, ncols);
        let mut shear_z = DMatrix::zeros(nrows, ncols);
        let mut torsion = DMatrix::zeros(nrows, ncols);
        let mut moment_y = DMatrix::zeros(nrows, ncols);
        let mut moment_z = DMatrix::zeros(nrows, ncols);

        for (e, uid) in elements.iter().enumerate() {
            let w = |i: usize| {
                local_udls
                    .get(uid)
                    .and_then(|w| w.get(i))
                    .copied()
                    .unwrap_or(0.0)
            };
            let (w_x, w_y, w_z) = (w(0), w(1), w(2));
            let locations = linspace(0.0, lengths[uid], num_stations);

            for row in 0..nrows {
                let n_i = axial_i[e][row];
                let v_yi = shear_y_i[e][row];
                let m_zi = moment_z_i[e][row];
                for (k, x) in locations.iter().enumerate() {
                    let col = e * num_stations + k;
                    axial[(row, col)] = -(n_i + w_x * x);
                    shear_y[(row, col)] = v_yi + w_y * x;
                    moment_z[(row, col)] = 0.5 * w_y * x * x + v_yi * x - m_zi;
                }
                if let (Some(v_z), Some(t), Some(m_y)) = (&shear_z_i, &torsion_i, &moment_y_i) {
                    let (v_zi, t_i, m_yi) = (v_z[e][row], t[e][row], m_y[e][row]);
                    for (k, x) in locations.iter().enumerate() {
                        let col = e * num_stations + k;
                        shear_z[(row, col)] = v_zi + w_z * x;
                        // No distributed torque
                        torsion[(row, col)] = -t_i;
                        moment_y[(row, col)] = 0.5 * w_z * x * x + v_zi * x + m_yi;
                    }
                }
            }
        }

        let stations = station_labels(num_stations);
        let columns: Vec<Vec<Label>> = elements
            .iter()
            .flat_map(|uid| {
                stations
                    .iter()
                    .map(move |station| vec![Label::from(*uid), station.clone()])
            })
            .collect();
        let build = |values: DMatrix<f64>| {
            Table::new(
                data.index().to_vec(),
                vec![ELEMENT_LEVEL.to_string(), STATION_LEVEL.to_string()],
                columns.clone(),
                values,
            )
        };

        log::debug!(
            "Case `{}`: basic forces of {} elements at {} stations",
            self.name(),
            elements.len(),
            num_stations
        );

        Ok(BasicForces {
            axial: build(axial)?,
            shear_y: build(shear_y)?,
            shear_z: build(shear_z)?,
            torsion: build(torsion)?,
            moment_y: build(moment_y)?,
            moment_z: build(moment_z)?,
        })
    }
}
