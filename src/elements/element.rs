//! Line and link elements

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

use super::Node;
use crate::common::EPSILON;

/// Element formulation, as understood by the external solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    /// Elastic beam-column element
    ElasticBeamColumn,
    /// Displacement-based beam-column element
    DispBeamColumn,
    /// Truss bar
    Bar,
    /// Zero-length spring element
    ZeroLength,
    /// Two-node link element
    TwoNodeLink,
}

impl ElementKind {
    /// Beam-column formulations
    pub fn is_beam_column(&self) -> bool {
        matches!(self, Self::ElasticBeamColumn | Self::DispBeamColumn)
    }

    /// Elements with a length along which basic forces vary
    pub fn is_line(&self) -> bool {
        self.is_beam_column() || matches!(self, Self::Bar)
    }
}

/// A two-node element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier
    pub uid: usize,
    /// Formulation
    pub kind: ElementKind,
    /// i-node and j-node
    pub nodes: [Node; 2],
    /// Rigid offset at the i-end, in global coordinates
    pub offset_i: [f64; 3],
    /// Rigid offset at the j-end, in global coordinates
    pub offset_j: [f64; 3],
}

impl Element {
    /// Create a new element without rigid offsets
    pub fn new(uid: usize, kind: ElementKind, node_i: Node, node_j: Node) -> Self {
        Self {
            uid,
            kind,
            nodes: [node_i, node_j],
            offset_i: [0.0; 3],
            offset_j: [0.0; 3],
        }
    }

    /// Set rigid end offsets
    pub fn with_offsets(mut self, offset_i: [f64; 3], offset_j: [f64; 3]) -> Self {
        self.offset_i = offset_i;
        self.offset_j = offset_j;
        self
    }

    /// Vector from the offset i-end to the offset j-end
    fn clear_span(&self) -> Vector3<f64> {
        let p_i = Vector3::from(self.nodes[0].coords3()) + Vector3::from(self.offset_i);
        let p_j = Vector3::from(self.nodes[1].coords3()) + Vector3::from(self.offset_j);
        p_j - p_i
    }

    /// Length between the ends, without the rigid offsets
    pub fn clear_length(&self) -> f64 {
        self.clear_span().norm()
    }

    /// Local axes of a 3D element.
    ///
    /// Local x runs from i to j. Local y is the projection of global Z
    /// normal to x, or global X for vertical elements. Local z completes
    /// the right-handed system.
    pub fn local_axes_3d(&self) -> Option<[Vector3<f64>; 3]> {
        let span = self.clear_span();
        let length = span.norm();
        if length < EPSILON {
            return None;
        }
        let x_axis = span / length;
        let up = if x_axis.z.abs() > 1.0 - EPSILON {
            Vector3::x()
        } else {
            Vector3::z()
        };
        let y_axis = (up - x_axis * up.dot(&x_axis)).normalize();
        let z_axis = x_axis.cross(&y_axis);
        Some([x_axis, y_axis, z_axis])
    }

    /// Local axes of a 2D element: x from i to j, y rotated +90 degrees
    pub fn local_axes_2d(&self) -> Option<[Vector2<f64>; 2]> {
        let span = self.clear_span();
        let span = Vector2::new(span.x, span.y);
        let length = span.norm();
        if length < EPSILON {
            return None;
        }
        let x_axis = span / length;
        let y_axis = Vector2::new(-x_axis.y, x_axis.x);
        Some([x_axis, y_axis])
    }

    /// Project a global distributed load onto the local axes.
    ///
    /// `global` has two components for 2D models and three for 3D.
    pub fn local_udl(&self, global: &[f64]) -> Option<Vec<f64>> {
        match global.len() {
            2 => {
                let w = Vector2::new(global[0], global[1]);
                let axes = self.local_axes_2d()?;
                Some(axes.iter().map(|axis| axis.dot(&w)).collect())
            }
            3 => {
                let w = Vector3::new(global[0], global[1], global[2]);
                let axes = self.local_axes_3d()?;
                Some(axes.iter().map(|axis| axis.dot(&w)).collect())
            }
            _ => None,
        }
    }
}
