//! polyscope-rs: a Rust-native viewer for sparse volumetric data.
//!
//! Register a sparse volume grid (a set of occupied cells of a regular
//! lattice), attach scalar or color data to its cells or nodes, and draw it
//! through any backend implementing [`RenderContext`].
//!
//! # Quick Start
//!
//! ```no_run
//! use polyscope_rs::*;
//!
//! fn main() -> Result<()> {
//!     init()?;
//!
//!     let cells = vec![IVec3::new(0, 0, 0), IVec3::new(1, 0, 0)];
//!     let grid = register_sparse_volume_grid("cells", Vec3::ZERO, Vec3::ONE, cells)?;
//!     grid.add_cell_color_quantity("tint", vec![Vec3::X, Vec3::Y])?;
//!
//!     let mut backend = HeadlessRenderContext::new();
//!     draw_frame(&mut backend)?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Polyscope uses a paradigm of **structures** and **quantities**:
//!
//! - A **structure** is a geometric object in the scene ([`SparseVolumeGrid`])
//! - A **quantity** is data associated with a structure (scalars, colors)

// Graphics code intentionally uses casts for indices, colors, and coordinates
#![allow(clippy::cast_precision_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod frame;
mod init;
mod sparse_volume_grid;

pub use frame::*;
pub use init::*;
pub use sparse_volume_grid::*;

// Re-export core types
pub use polyscope_core::{
    error::{PolyscopeError, Result},
    options::Options,
    pick::PickResult,
    quantity::{Quantity, QuantityKind},
    registry::Registry,
    render::{RenderContext, ShaderProgram},
    state::{with_context, with_context_mut, Context},
    structure::Structure,
    widgets::WidgetBuilder,
    IVec3, Mat4, Vec2, Vec3, Vec4,
};

// Re-export render types
pub use polyscope_render::{ColorMap, ColorMapRegistry, HeadlessRenderContext, Material, MaterialRegistry};

// Re-export structures
pub use polyscope_structures::{
    DataType, SparseVolumeGrid, SparseVolumeGridElement, SparseVolumeGridPickResult,
    SparseVolumeGridQuantity, SparseVolumeGridRenderMode,
};
