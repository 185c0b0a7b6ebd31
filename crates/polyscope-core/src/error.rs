//! Error types for polyscope-rs.

use glam::IVec3;
use thiserror::Error;

/// The main error type for polyscope-rs operations.
#[derive(Error, Debug)]
pub enum PolyscopeError {
    /// Polyscope has not been initialized.
    #[error("polyscope not initialized - call polyscope_rs::init() first")]
    NotInitialized,

    /// Polyscope has already been initialized.
    #[error("polyscope already initialized")]
    AlreadyInitialized,

    /// A structure with the given name already exists.
    #[error("structure '{0}' already exists")]
    StructureExists(String),

    /// A structure with the given name was not found.
    #[error("structure '{0}' not found")]
    StructureNotFound(String),

    /// A quantity with the given name was not found.
    #[error("quantity '{0}' not found on structure '{1}'")]
    QuantityNotFound(String, String),

    /// Data size mismatch.
    #[error("data size mismatch for {what}: expected {expected}, got {actual}")]
    SizeMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    /// The occupied cell list of a sparse grid contains the same cell twice.
    #[error("sparse volume grid '{structure}' has repeated cell ({}, {}, {})", .cell.x, .cell.y, .cell.z)]
    DuplicateCell { structure: String, cell: IVec3 },

    /// A cell's far corner node does not fit in `i32`.
    #[error("sparse volume grid '{structure}' has cell ({}, {}, {}) at the edge of the index range", .cell.x, .cell.y, .cell.z)]
    CellOutOfRange { structure: String, cell: IVec3 },

    /// Node-valued input data does not cover a node required by the grid.
    #[error(
        "quantity '{quantity}' on sparse volume grid '{structure}' is missing a value for node ({}, {}, {})",
        .node.x, .node.y, .node.z
    )]
    MissingNode {
        quantity: String,
        structure: String,
        node: IVec3,
    },

    /// Node lookups were requested before the canonical node list was built.
    #[error("node indices of '{0}' have not been prepared")]
    NodeIndicesNotPrepared(String),

    /// A pick record was handed to a structure it does not belong to.
    #[error("pick result belongs to '{actual}', not to '{expected}'")]
    ForeignPick { expected: String, actual: String },

    /// A pick record refers to an element the structure does not have.
    #[error("picked element {index} is out of range ({len} elements)")]
    PickIndexOutOfRange { index: usize, len: usize },

    /// An option value (color map, material, ...) is not known.
    #[error("unknown {kind} '{name}'")]
    UnknownOption { kind: &'static str, name: String },

    /// Rendering error.
    #[error("render error: {0}")]
    RenderError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for polyscope-rs operations.
pub type Result<T> = std::result::Result<T, PolyscopeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_offending_values() {
        let err = PolyscopeError::DuplicateCell {
            structure: "grid".into(),
            cell: IVec3::new(1, -2, 3),
        };
        assert_eq!(
            err.to_string(),
            "sparse volume grid 'grid' has repeated cell (1, -2, 3)"
        );

        let err = PolyscopeError::MissingNode {
            quantity: "density".into(),
            structure: "grid".into(),
            node: IVec3::new(0, 0, 1),
        };
        let msg = err.to_string();
        assert!(msg.contains("density"));
        assert!(msg.contains("(0, 0, 1)"));
    }
}
