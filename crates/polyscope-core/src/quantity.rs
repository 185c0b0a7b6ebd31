//! Quantity trait and related types.
//!
//! A [`Quantity`] represents data associated with a structure, such as scalar values
//! or colors.

/// The kind of quantity (for categorization and UI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantityKind {
    /// Scalar values (single float per element).
    Scalar,
    /// Color values (RGB per element).
    Color,
}

/// Data associated with a structure that can be visualized.
///
/// Quantities are attached to structures and represent data like:
/// - Scalar fields (temperature, pressure, etc.)
/// - Colors
pub trait Quantity: Send + Sync {
    /// Returns the name of this quantity.
    fn name(&self) -> &str;

    /// Returns the name of the parent structure.
    fn structure_name(&self) -> &str;

    /// Returns the kind of this quantity.
    fn kind(&self) -> QuantityKind;

    /// Returns a display name, e.g. `"density (node scalar)"`.
    fn nice_name(&self) -> String;

    /// Returns whether this quantity is currently enabled/visible.
    fn is_enabled(&self) -> bool;

    /// Sets the enabled state of this quantity.
    fn set_enabled(&mut self, enabled: bool);

    /// Drops cached GPU resources so they are rebuilt on the next draw.
    fn refresh(&mut self);

    /// Returns the number of data elements.
    fn data_size(&self) -> usize;
}
