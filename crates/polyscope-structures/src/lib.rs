//! Structure implementations for polyscope-rs.
//!
//! This crate provides the sparse volume grid: a set of occupied cells of a
//! regular lattice, the canonical node list derived from them, and the cell
//! and node quantities drawn on top.

// Graphics code intentionally uses casts for indices, colors, and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

pub mod sparse_volume_grid;

pub use sparse_volume_grid::{
    DataType, GridQuantity, SparseVolumeGrid, SparseVolumeGridCellColorQuantity,
    SparseVolumeGridCellScalarQuantity, SparseVolumeGridElement, SparseVolumeGridNodeColorQuantity,
    SparseVolumeGridNodeScalarQuantity, SparseVolumeGridPickResult, SparseVolumeGridQuantity,
    SparseVolumeGridRenderMode,
};
