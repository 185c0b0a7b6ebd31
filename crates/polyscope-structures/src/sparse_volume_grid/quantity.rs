//! Quantities attachable to a sparse volume grid.

use polyscope_core::{Quantity, RenderContext, Result, ShaderProgram, WidgetBuilder};

use super::color_quantity::{SparseVolumeGridCellColorQuantity, SparseVolumeGridNodeColorQuantity};
use super::geometry::SparseGridGeometry;
use super::pick::SparseVolumeGridElement;
use super::render::GridcubeStyle;
use super::scalar_quantity::{
    SparseVolumeGridCellScalarQuantity, SparseVolumeGridNodeScalarQuantity,
};

/// What every grid quantity can do beyond the generic [`Quantity`] surface.
///
/// Quantities never own their grid. The grid lends its geometry and current
/// style for the duration of each call.
pub trait GridQuantity: Quantity {
    /// Whether values live on cells or nodes.
    fn defined_on(&self) -> SparseVolumeGridElement;

    /// Draws the quantity, building its program first if needed.
    fn draw(
        &mut self,
        ctx: &mut dyn RenderContext,
        geometry: &SparseGridGeometry,
        style: &GridcubeStyle<'_>,
    ) -> Result<()>;

    /// Builds the quantity's entry in the structure panel.
    fn build_ui(&mut self, ui: &mut dyn WidgetBuilder) -> bool;

    /// Adds a row for cell `cell_index` to a pick panel.
    fn build_cell_info(&self, _ui: &mut dyn WidgetBuilder, _cell_index: usize) {}

    /// Adds a row for canonical node `node_index` to a pick panel.
    fn build_node_info(&self, _ui: &mut dyn WidgetBuilder, _node_index: usize) {}
}

/// State every grid quantity carries.
pub(crate) struct QuantityState {
    pub name: String,
    pub structure_name: String,
    /// Prefix of this quantity's persistent options.
    pub unique_prefix: String,
    pub enabled: bool,
    pub program: Option<Box<dyn ShaderProgram>>,
}

impl QuantityState {
    pub fn new(name: String, structure_name: &str, structure_prefix: &str) -> Self {
        let unique_prefix = format!("{structure_prefix}{name}#");
        Self {
            name,
            structure_name: structure_name.to_string(),
            unique_prefix,
            enabled: false,
            program: None,
        }
    }

    pub fn refresh(&mut self) {
        if self.program.take().is_some() {
            log::debug!("dropped program of quantity '{}'", self.name);
        }
    }
}

/// Implements [`Quantity`] for a grid quantity with a `state` field.
macro_rules! impl_grid_quantity {
    ($ty:ty, $kind:expr, $label:literal) => {
        impl polyscope_core::Quantity for $ty {
            fn name(&self) -> &str {
                &self.state.name
            }

            fn structure_name(&self) -> &str {
                &self.state.structure_name
            }

            fn kind(&self) -> polyscope_core::QuantityKind {
                $kind
            }

            fn nice_name(&self) -> String {
                format!("{} ({})", self.state.name, $label)
            }

            fn is_enabled(&self) -> bool {
                self.state.enabled
            }

            fn set_enabled(&mut self, enabled: bool) {
                self.state.enabled = enabled;
            }

            fn refresh(&mut self) {
                self.state.refresh();
            }

            fn data_size(&self) -> usize {
                self.data_len()
            }
        }
    };
}

pub(crate) use impl_grid_quantity;

/// A quantity attached to a sparse volume grid.
pub enum SparseVolumeGridQuantity {
    CellScalar(SparseVolumeGridCellScalarQuantity),
    NodeScalar(SparseVolumeGridNodeScalarQuantity),
    CellColor(SparseVolumeGridCellColorQuantity),
    NodeColor(SparseVolumeGridNodeColorQuantity),
}

impl SparseVolumeGridQuantity {
    /// The quantity behind its capability interface.
    pub fn as_grid_quantity(&self) -> &dyn GridQuantity {
        match self {
            Self::CellScalar(q) => q,
            Self::NodeScalar(q) => q,
            Self::CellColor(q) => q,
            Self::NodeColor(q) => q,
        }
    }

    /// Mutable access through the capability interface.
    pub fn as_grid_quantity_mut(&mut self) -> &mut dyn GridQuantity {
        match self {
            Self::CellScalar(q) => q,
            Self::NodeScalar(q) => q,
            Self::CellColor(q) => q,
            Self::NodeColor(q) => q,
        }
    }

    pub fn name(&self) -> &str {
        self.as_grid_quantity().name()
    }

    pub fn nice_name(&self) -> String {
        self.as_grid_quantity().nice_name()
    }

    pub fn is_enabled(&self) -> bool {
        self.as_grid_quantity().is_enabled()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.as_grid_quantity_mut().set_enabled(enabled);
    }

    pub fn defined_on(&self) -> SparseVolumeGridElement {
        self.as_grid_quantity().defined_on()
    }

    pub fn refresh(&mut self) {
        self.as_grid_quantity_mut().refresh();
    }

    pub(crate) fn draw(
        &mut self,
        ctx: &mut dyn RenderContext,
        geometry: &SparseGridGeometry,
        style: &GridcubeStyle<'_>,
    ) -> Result<()> {
        self.as_grid_quantity_mut().draw(ctx, geometry, style)
    }

    pub(crate) fn build_ui(&mut self, ui: &mut dyn WidgetBuilder) -> bool {
        self.as_grid_quantity_mut().build_ui(ui)
    }

    pub(crate) fn build_cell_info(&self, ui: &mut dyn WidgetBuilder, cell_index: usize) {
        self.as_grid_quantity().build_cell_info(ui, cell_index);
    }

    pub(crate) fn build_node_info(&self, ui: &mut dyn WidgetBuilder, node_index: usize) {
        self.as_grid_quantity().build_node_info(ui, node_index);
    }

    /// Returns whether the quantity currently holds a built program.
    pub fn has_program(&self) -> bool {
        match self {
            Self::CellScalar(q) => q.state.program.is_some(),
            Self::NodeScalar(q) => q.state.program.is_some(),
            Self::CellColor(q) => q.state.program.is_some(),
            Self::NodeColor(q) => q.state.program.is_some(),
        }
    }
}
