//! Error types for load case orchestration and post-processing

use thiserror::Error;

/// Main error type for load case operations
#[derive(Error, Debug)]
pub enum CaseError {
    // Configuration
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Duplicate {kind} uid: {uid}")]
    DuplicateUid { kind: &'static str, uid: usize },

    // Lookups
    #[error("Node '{0}' not found in model")]
    NodeNotFound(usize),

    #[error("Component '{0}' not found in model")]
    ComponentNotFound(usize),

    #[error("Level '{0}' not found in grid system")]
    LevelNotFound(String),

    #[error("Load case '{0}' not found")]
    LoadCaseNotFound(String),

    #[error("Specified recorder not available: {0}")]
    RecorderNotFound(String),

    #[error("Missing elements: {0:?}")]
    MissingElements(Vec<usize>),

    #[error("Column {0} not found in table")]
    MissingColumn(String),

    // Types
    #[error("Unsupported object type: {0}")]
    UnsupportedType(String),

    #[error("The specified recorder (`{name}`) is not an {expected} recorder")]
    RecorderKind { name: String, expected: String },

    // Shapes and alignment
    #[error("Cannot align tables with different columns: {0}")]
    ColumnMismatch(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Unsupported number of degrees of freedom: {0} (must be either 2D or 3D Frame)")]
    UnsupportedDofCount(usize),

    #[error("Unsupported model dimensionality: {0}")]
    UnsupportedDimensionality(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("At least two tables are required to combine, got {0}")]
    NotEnoughTables(usize),

    // Preconditions
    #[error("Invalid direction: {0}")]
    InvalidDirection(usize),

    #[error("Invalid component {0}: no external nodes")]
    InvalidComponent(usize),

    // External solver
    #[error("Solver failed: {0}")]
    SolverFailed(String),

    #[error("No solver configured - set FRAME_CASES_SOLVER or AnalysisSettings::solver_command")]
    SolverNotConfigured,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result type for load case operations
pub type CaseResult<T> = Result<T, CaseError>;
