//! Raw pick records handed to structures by the picking subsystem.

use glam::Vec3;

/// Result of a pick/selection operation, before a structure interprets it.
#[derive(Debug, Clone)]
pub struct PickResult {
    /// The type of structure that was picked.
    pub structure_type: String,

    /// The name of the structure that was picked.
    pub structure_name: String,

    /// The structure-local index of the element that was picked (cell, point, ...).
    pub element_index: usize,

    /// The world position of the pick point.
    pub world_position: Vec3,

    /// The depth of the pick point.
    pub depth: f32,
}

impl PickResult {
    /// Creates a new pick result.
    pub fn new(
        structure_type: impl Into<String>,
        structure_name: impl Into<String>,
        element_index: usize,
        world_position: Vec3,
        depth: f32,
    ) -> Self {
        Self {
            structure_type: structure_type.into(),
            structure_name: structure_name.into(),
            element_index,
            world_position,
            depth,
        }
    }

    /// Returns whether this record was produced by the given structure.
    pub fn is_from(&self, structure_type: &str, structure_name: &str) -> bool {
        self.structure_type == structure_type && self.structure_name == structure_name
    }
}
