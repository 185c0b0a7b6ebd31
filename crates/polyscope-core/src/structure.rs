//! Structure trait and related types.
//!
//! A [`Structure`] represents a geometric object in the scene, such as a sparse
//! volume grid.

use std::any::Any;

use glam::{Mat4, Vec3};

use crate::error::Result;
use crate::render::RenderContext;

/// A geometric object that can be visualized in polyscope.
///
/// Structures are the primary objects managed by polyscope. Each structure has:
/// - A unique name within its type
/// - A transform matrix for positioning in the scene
/// - Visibility state
/// - Methods for rendering and picking
pub trait Structure: Any + Send + Sync {
    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to self as `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the unique name of this structure.
    fn name(&self) -> &str;

    /// Returns the type name of this structure (e.g., "Sparse Volume Grid").
    fn type_name(&self) -> &'static str;

    /// Prefix under which persistent options of this structure are stored.
    fn unique_prefix(&self) -> String {
        unique_prefix(self.type_name(), self.name())
    }

    /// Returns the axis-aligned bounding box in world coordinates.
    ///
    /// Returns `None` if the structure has no spatial extent.
    fn bounding_box(&self) -> Option<(Vec3, Vec3)>;

    /// Returns a characteristic length scale for this structure.
    fn length_scale(&self) -> f32;

    /// Returns the current model transform matrix.
    fn transform(&self) -> Mat4;

    /// Sets the model transform matrix.
    fn set_transform(&mut self, transform: Mat4);

    /// Returns whether this structure is currently visible.
    fn is_enabled(&self) -> bool;

    /// Sets the visibility of this structure.
    fn set_enabled(&mut self, enabled: bool);

    /// Draws this structure to the scene.
    ///
    /// Called during the main render pass. Render programs are built lazily here.
    fn draw(&mut self, ctx: &mut dyn RenderContext) -> Result<()>;

    /// Draws this structure for picking/selection.
    ///
    /// Called during the pick render pass.
    fn draw_pick(&mut self, ctx: &mut dyn RenderContext) -> Result<()>;

    /// Drops cached GPU resources so they are rebuilt on the next draw.
    fn refresh(&mut self);

    /// Resets the transform to identity.
    fn reset_transform(&mut self) {
        self.set_transform(Mat4::IDENTITY);
    }

    /// Returns the material name for this structure (e.g., "clay", "wax").
    fn material(&self) -> &str {
        "clay"
    }

    /// Sets the material for this structure by name.
    fn set_material(&mut self, _material: &str) {
        // Default no-op; structures that support materials override this
    }
}

/// Builds the persistent-option prefix for a structure of the given type and name.
pub fn unique_prefix(type_name: &str, name: &str) -> String {
    format!("{type_name}#{name}#")
}
