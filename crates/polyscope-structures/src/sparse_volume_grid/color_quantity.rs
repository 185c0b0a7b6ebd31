//! Color quantities on sparse volume grids.

use glam::Vec3;
use polyscope_core::{AttributeData, QuantityKind, RenderContext, Result, WidgetBuilder};
use polyscope_render::rules;
use polyscope_ui::build_color_quantity_ui;

use super::geometry::SparseGridGeometry;
use super::pick::SparseVolumeGridElement;
use super::quantity::{impl_grid_quantity, GridQuantity, QuantityState};
use super::render::{bind_node_corners, draw_gridcube, request_gridcube_program, GridcubeStyle};

/// An RGB color per occupied cell.
pub struct SparseVolumeGridCellColorQuantity {
    pub(crate) state: QuantityState,
    colors: Vec<Vec3>,
}

impl SparseVolumeGridCellColorQuantity {
    pub(crate) fn new(
        name: String,
        structure_name: &str,
        structure_prefix: &str,
        colors: Vec<Vec3>,
    ) -> Self {
        Self {
            state: QuantityState::new(name, structure_name, structure_prefix),
            colors,
        }
    }

    /// Colors in cell order.
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    fn data_len(&self) -> usize {
        self.colors.len()
    }
}

impl_grid_quantity!(SparseVolumeGridCellColorQuantity, QuantityKind::Color, "cell color");

impl GridQuantity for SparseVolumeGridCellColorQuantity {
    fn defined_on(&self) -> SparseVolumeGridElement {
        SparseVolumeGridElement::Cell
    }

    fn draw(
        &mut self,
        ctx: &mut dyn RenderContext,
        geometry: &SparseGridGeometry,
        style: &GridcubeStyle<'_>,
    ) -> Result<()> {
        if !self.state.enabled {
            return Ok(());
        }
        if self.state.program.is_none() {
            let mut program = request_gridcube_program(
                ctx,
                geometry,
                style,
                &[rules::GRIDCUBE_PROPAGATE_ATTR_CELL_COLOR, rules::SHADE_COLOR],
            )?;
            program.set_attribute("a_color", AttributeData::Vec3(&self.colors));
            self.state.program = Some(program);
        }
        if let Some(program) = self.state.program.as_mut() {
            draw_gridcube(ctx, program.as_mut(), geometry, style);
        }
        Ok(())
    }

    fn build_ui(&mut self, ui: &mut dyn WidgetBuilder) -> bool {
        build_color_quantity_ui(ui, &self.state.name, &mut self.state.enabled, self.colors.len())
    }

    fn build_cell_info(&self, ui: &mut dyn WidgetBuilder, cell_index: usize) {
        if let Some(c) = self.colors.get(cell_index) {
            ui.color_row(&self.state.name, *c);
        }
    }
}

/// An RGB color per canonical node, interpolated across each cell.
pub struct SparseVolumeGridNodeColorQuantity {
    pub(crate) state: QuantityState,
    colors: Vec<Vec3>,
    was_canonical: bool,
}

impl SparseVolumeGridNodeColorQuantity {
    /// `colors` must already be in canonical node order.
    pub(crate) fn new(
        name: String,
        structure_name: &str,
        structure_prefix: &str,
        colors: Vec<Vec3>,
        was_canonical: bool,
    ) -> Self {
        Self {
            state: QuantityState::new(name, structure_name, structure_prefix),
            colors,
            was_canonical,
        }
    }

    /// Colors in canonical node order.
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Whether the node data was supplied in canonical order.
    pub fn was_canonical(&self) -> bool {
        self.was_canonical
    }

    fn data_len(&self) -> usize {
        self.colors.len()
    }
}

impl_grid_quantity!(SparseVolumeGridNodeColorQuantity, QuantityKind::Color, "node color");

impl GridQuantity for SparseVolumeGridNodeColorQuantity {
    fn defined_on(&self) -> SparseVolumeGridElement {
        SparseVolumeGridElement::Node
    }

    fn draw(
        &mut self,
        ctx: &mut dyn RenderContext,
        geometry: &SparseGridGeometry,
        style: &GridcubeStyle<'_>,
    ) -> Result<()> {
        if !self.state.enabled {
            return Ok(());
        }
        if self.state.program.is_none() {
            let mut program = request_gridcube_program(
                ctx,
                geometry,
                style,
                &[rules::GRIDCUBE_PROPAGATE_ATTR_NODE_COLOR, rules::SHADE_COLOR],
            )?;
            bind_node_corners(
                program.as_mut(),
                geometry.nodes(),
                rules::node_color_attribute,
                AttributeData::Vec3(&self.colors),
            );
            self.state.program = Some(program);
        }
        if let Some(program) = self.state.program.as_mut() {
            draw_gridcube(ctx, program.as_mut(), geometry, style);
        }
        Ok(())
    }

    fn build_ui(&mut self, ui: &mut dyn WidgetBuilder) -> bool {
        build_color_quantity_ui(ui, &self.state.name, &mut self.state.enabled, self.colors.len())
    }

    fn build_node_info(&self, ui: &mut dyn WidgetBuilder, node_index: usize) {
        if let Some(c) = self.colors.get(node_index) {
            ui.color_row(&self.state.name, *c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyscope_core::Quantity;

    #[test]
    fn test_nice_names_and_kind() {
        let q = SparseVolumeGridNodeColorQuantity::new(
            "rgb".into(),
            "grid",
            "Sparse Volume Grid#grid#",
            vec![Vec3::ONE; 8],
            false,
        );
        assert_eq!(q.nice_name(), "rgb (node color)");
        assert_eq!(q.kind(), QuantityKind::Color);
        assert_eq!(q.data_size(), 8);
        assert!(!q.was_canonical());
        assert!(!q.is_enabled());
    }

    #[test]
    fn test_cell_info_row() {
        let q = SparseVolumeGridCellColorQuantity::new(
            "tint".into(),
            "grid",
            "Sparse Volume Grid#grid#",
            vec![Vec3::X, Vec3::Y],
        );
        let mut ui = polyscope_ui::ScriptedUi::new();
        q.build_cell_info(&mut ui, 1);
        q.build_cell_info(&mut ui, 5);
        assert_eq!(
            ui.events(),
            &[polyscope_ui::UiEvent::ColorRow {
                key: "tint".into(),
                color: Vec3::Y
            }]
        );
    }
}
