//! Core abstractions for polyscope-rs.
//!
//! This crate provides the fundamental traits and types used throughout polyscope-rs:
//! - [`Structure`] trait for geometric objects (sparse volume grids, ...)
//! - [`Quantity`] trait for data associated with structures (scalars, colors)
//! - [`RenderContext`] and [`ShaderProgram`], the capability boundary to the render backend
//! - [`WidgetBuilder`], the capability boundary to the immediate-mode UI
//! - Global state management and structure registry
//! - Configuration options and persistent values

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Field names like structure_name are descriptive
#![allow(clippy::struct_field_names)]

pub mod error;
pub mod options;
pub mod persistent;
pub mod pick;
pub mod quantity;
pub mod registry;
pub mod render;
pub mod state;
pub mod structure;
pub mod widgets;

pub use error::{PolyscopeError, Result};
pub use options::Options;
pub use persistent::{PersistentCache, PersistentValue};
pub use pick::PickResult;
pub use quantity::{Quantity, QuantityKind};
pub use registry::Registry;
pub use render::{AttributeData, RenderContext, ShaderDefaults, ShaderProgram, UniformValue};
pub use state::{with_context, with_context_mut, Context};
pub use structure::Structure;
pub use widgets::WidgetBuilder;

// Re-export glam types for convenience
pub use glam::{IVec3, Mat4, Vec2, Vec3, Vec4};
