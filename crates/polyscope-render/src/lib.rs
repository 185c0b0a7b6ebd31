//! Render-side building blocks for polyscope-rs.
//!
//! This crate provides what backends and structures share:
//! - Names of base programs and shader rules
//! - Pick index encoding and pick buffer range allocation
//! - Gridcube geometry and uniform layouts
//! - Material and color map registries
//! - A headless, recording implementation of the render capability traits

pub mod color_maps;
pub mod error;
pub mod gridcube;
pub mod headless;
pub mod materials;
pub mod pick;
pub mod rules;

pub use color_maps::{builtin_color_maps, next_unique_color, ColorMap, ColorMapRegistry};
pub use error::{RenderError, RenderResult};
pub use gridcube::{GridcubePickUniforms, GridcubeUniforms, RaycastUniforms, GRIDCUBE_STRIP};
pub use headless::{DrawRecord, HeadlessRenderContext, RecordedAttribute, RenderLog};
pub use materials::{builtin_materials, Material, MaterialKind, MaterialRegistry};
pub use pick::{color_to_index, index_to_color, index_to_color_vec3, PickRangeAllocator};
