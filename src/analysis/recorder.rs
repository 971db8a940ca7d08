//! Recorders - tabular solver output for nodes or elements

use serde::{Deserialize, Serialize};

use crate::error::{CaseError, CaseResult};
use crate::table::Table;

/// Name of the node displacement recorder every analysis is expected to
/// produce
pub const DEFAULT_NODE_RECORDER: &str = "default_node";

/// What a recorder collects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecorderKind {
    /// Nodal response, columns keyed by `(node, dof)`
    Node { nodes: Vec<usize> },
    /// Element response, columns keyed by `(element, station, dof)`
    Element { elements: Vec<usize> },
}

impl RecorderKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Node { .. } => "Node",
            Self::Element { .. } => "Element",
        }
    }
}

/// Output of one recorder after an analysis has run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recorder {
    pub kind: RecorderKind,
    data: Table,
}

impl Recorder {
    /// Node recorder over `nodes`
    pub fn node(nodes: Vec<usize>, data: Table) -> Self {
        Self {
            kind: RecorderKind::Node { nodes },
            data,
        }
    }

    /// Element recorder over `elements`
    pub fn element(elements: Vec<usize>, data: Table) -> Self {
        Self {
            kind: RecorderKind::Element { elements },
            data,
        }
    }

    /// Recorded table
    pub fn get_data(&self) -> &Table {
        &self.data
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, RecorderKind::Element { .. })
    }

    /// Elements covered by an element recorder.
    ///
    /// `name` is only used for the error message.
    pub fn elements(&self, name: &str) -> CaseResult<&[usize]> {
        match &self.kind {
            RecorderKind::Element { elements } => Ok(elements),
            RecorderKind::Node { .. } => Err(CaseError::RecorderKind {
                name: name.to_string(),
                expected: "Element".to_string(),
            }),
        }
    }
}
