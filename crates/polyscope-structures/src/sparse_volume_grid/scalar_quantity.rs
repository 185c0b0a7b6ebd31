//! Scalar quantities on sparse volume grids.

use polyscope_core::{
    AttributeData, PersistentValue, PolyscopeError, QuantityKind, RenderContext, Result,
    ShaderProgram, UniformValue, WidgetBuilder,
};
use polyscope_render::{builtin_color_maps, rules};
use polyscope_ui::build_scalar_quantity_ui;
use serde::{Deserialize, Serialize};

use super::geometry::SparseGridGeometry;
use super::pick::SparseVolumeGridElement;
use super::quantity::{impl_grid_quantity, GridQuantity, QuantityState};
use super::render::{bind_node_corners, draw_gridcube, request_gridcube_program, GridcubeStyle};

/// How scalar values are interpreted for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DataType {
    /// Arbitrary values.
    #[default]
    Standard,
    /// Values centered on zero.
    Symmetric,
    /// Non-negative magnitudes.
    Magnitude,
}

impl DataType {
    /// Color map a quantity of this type starts with.
    pub fn default_color_map(self) -> &'static str {
        match self {
            Self::Standard => "viridis",
            Self::Symmetric => "coolwarm",
            Self::Magnitude => "blues",
        }
    }
}

/// Default color range of `values`, ignoring non-finite entries.
pub fn compute_data_range(values: &[f32], data_type: DataType) -> (f32, f32) {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min > max {
        return (0.0, 1.0);
    }
    match data_type {
        DataType::Standard => (min, max),
        DataType::Symmetric => {
            let m = min.abs().max(max.abs());
            (-m, m)
        }
        DataType::Magnitude => (0.0, max),
    }
}

/// Values, color map and range shared by cell and node scalars.
pub struct ScalarQuantityBase {
    values: Vec<f32>,
    data_type: DataType,
    color_map: PersistentValue<String>,
    data_range: (f32, f32),
    range: (f32, f32),
}

impl ScalarQuantityBase {
    fn new(unique_prefix: &str, values: Vec<f32>, data_type: DataType) -> Self {
        let data_range = compute_data_range(&values, data_type);
        Self {
            color_map: PersistentValue::new(
                format!("{unique_prefix}colormap"),
                data_type.default_color_map().to_string(),
            ),
            values,
            data_type,
            data_range,
            range: data_range,
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn color_map(&self) -> &str {
        self.color_map.get()
    }

    /// Range the values span, as adjusted by the data type.
    pub fn data_range(&self) -> (f32, f32) {
        self.data_range
    }

    /// Range currently mapped onto the color map.
    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    /// Returns true if the color map changed.
    fn set_color_map(&mut self, name: &str) -> Result<bool> {
        if !builtin_color_maps().has(name) {
            return Err(PolyscopeError::UnknownOption {
                kind: "color map",
                name: name.to_string(),
            });
        }
        let changed = self.color_map.get() != name;
        self.color_map.set(name.to_string());
        Ok(changed)
    }

    fn bind(&self, program: &mut dyn ShaderProgram) {
        program.set_texture_from_colormap("t_colormap", self.color_map.get());
    }

    fn set_uniforms(&self, program: &mut dyn ShaderProgram) {
        program.set_uniform("u_rangeLow", UniformValue::Float(self.range.0));
        program.set_uniform("u_rangeHigh", UniformValue::Float(self.range.1));
    }

    /// Builds the scalar entry; returns `(anything changed, color map changed)`.
    fn build_ui(&mut self, ui: &mut dyn WidgetBuilder, name: &str, enabled: &mut bool) -> (bool, bool) {
        let mut color_map = self.color_map.get().clone();
        let (mut low, mut high) = self.range;
        let available = builtin_color_maps().names();
        let changed = build_scalar_quantity_ui(
            ui, name, enabled, &mut color_map, &mut low, &mut high, &available,
        );
        self.range = (low, high);
        let color_map_changed =
            color_map != *self.color_map.get() && matches!(self.set_color_map(&color_map), Ok(true));
        (changed, color_map_changed)
    }
}

macro_rules! scalar_setters {
    ($ty:ty) => {
        impl $ty {
            /// Scalar values, in the quantity's element order.
            pub fn values(&self) -> &[f32] {
                self.scalar.values()
            }

            pub fn scalar(&self) -> &ScalarQuantityBase {
                &self.scalar
            }

            pub fn color_map(&self) -> &str {
                self.scalar.color_map()
            }

            /// Sets the color map by name; unknown names are an error.
            pub fn set_color_map(&mut self, name: &str) -> Result<&mut Self> {
                if self.scalar.set_color_map(name)? {
                    self.state.refresh();
                }
                Ok(self)
            }

            /// Sets the range mapped onto the color map.
            pub fn set_data_range(&mut self, low: f32, high: f32) -> &mut Self {
                self.scalar.range = (low, high);
                self
            }

            /// Restores the range derived from the data.
            pub fn reset_data_range(&mut self) -> &mut Self {
                self.scalar.range = self.scalar.data_range;
                self
            }

            fn data_len(&self) -> usize {
                self.scalar.values.len()
            }

            fn build_scalar_ui(&mut self, ui: &mut dyn WidgetBuilder) -> bool {
                let (changed, color_map_changed) =
                    self.scalar
                        .build_ui(ui, &self.state.name, &mut self.state.enabled);
                if color_map_changed {
                    self.state.refresh();
                }
                changed
            }
        }
    };
}

/// A scalar value per occupied cell.
pub struct SparseVolumeGridCellScalarQuantity {
    pub(crate) state: QuantityState,
    scalar: ScalarQuantityBase,
}

impl SparseVolumeGridCellScalarQuantity {
    pub(crate) fn new(
        name: String,
        structure_name: &str,
        structure_prefix: &str,
        values: Vec<f32>,
        data_type: DataType,
    ) -> Self {
        let state = QuantityState::new(name, structure_name, structure_prefix);
        let scalar = ScalarQuantityBase::new(&state.unique_prefix, values, data_type);
        Self { state, scalar }
    }
}

scalar_setters!(SparseVolumeGridCellScalarQuantity);
impl_grid_quantity!(SparseVolumeGridCellScalarQuantity, QuantityKind::Scalar, "cell scalar");

impl GridQuantity for SparseVolumeGridCellScalarQuantity {
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
        let program = match &mut self.state.program {
            Some(program) => program,
            slot @ None => {
                let mut program = request_gridcube_program(
                    ctx,
                    geometry,
                    style,
                    &[rules::GRIDCUBE_PROPAGATE_ATTR_CELL_SCALAR, rules::SHADE_COLORMAP_VALUE],
                )?;
                program.set_attribute("a_value", AttributeData::Float(&self.scalar.values));
                self.scalar.bind(program.as_mut());
                slot.insert(program)
            }
        };
        self.scalar.set_uniforms(program.as_mut());
        draw_gridcube(ctx, program.as_mut(), geometry, style);
        Ok(())
    }

    fn build_ui(&mut self, ui: &mut dyn WidgetBuilder) -> bool {
        self.build_scalar_ui(ui)
    }

    fn build_cell_info(&self, ui: &mut dyn WidgetBuilder, cell_index: usize) {
        if let Some(v) = self.scalar.values.get(cell_index) {
            ui.info_row(&self.state.name, &v.to_string());
        }
    }
}

/// A scalar value per canonical node, interpolated across each cell.
pub struct SparseVolumeGridNodeScalarQuantity {
    pub(crate) state: QuantityState,
    scalar: ScalarQuantityBase,
    was_canonical: bool,
}

impl SparseVolumeGridNodeScalarQuantity {
    /// `values` must already be in canonical node order.
    pub(crate) fn new(
        name: String,
        structure_name: &str,
        structure_prefix: &str,
        values: Vec<f32>,
        data_type: DataType,
        was_canonical: bool,
    ) -> Self {
        let state = QuantityState::new(name, structure_name, structure_prefix);
        let scalar = ScalarQuantityBase::new(&state.unique_prefix, values, data_type);
        Self {
            state,
            scalar,
            was_canonical,
        }
    }

    /// Whether the node data was supplied in canonical order.
    pub fn was_canonical(&self) -> bool {
        self.was_canonical
    }
}

scalar_setters!(SparseVolumeGridNodeScalarQuantity);
impl_grid_quantity!(SparseVolumeGridNodeScalarQuantity, QuantityKind::Scalar, "node scalar");

impl GridQuantity for SparseVolumeGridNodeScalarQuantity {
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
        let program = match &mut self.state.program {
            Some(program) => program,
            slot @ None => {
                let mut program = request_gridcube_program(
                    ctx,
                    geometry,
                    style,
                    &[rules::GRIDCUBE_PROPAGATE_ATTR_NODE_SCALAR, rules::SHADE_COLORMAP_VALUE],
                )?;
                bind_node_corners(
                    program.as_mut(),
                    geometry.nodes(),
                    rules::node_value_attribute,
                    AttributeData::Float(&self.scalar.values),
                );
                self.scalar.bind(program.as_mut());
                slot.insert(program)
            }
        };
        self.scalar.set_uniforms(program.as_mut());
        draw_gridcube(ctx, program.as_mut(), geometry, style);
        Ok(())
    }

    fn build_ui(&mut self, ui: &mut dyn WidgetBuilder) -> bool {
        self.build_scalar_ui(ui)
    }

    fn build_node_info(&self, ui: &mut dyn WidgetBuilder, node_index: usize) {
        if let Some(v) = self.scalar.values.get(node_index) {
            ui.info_row(&self.state.name, &v.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyscope_core::Quantity;

    #[test]
    fn test_data_ranges() {
        let values = [-3.0, 1.0, 2.0, f32::NAN, f32::INFINITY];
        assert_eq!(compute_data_range(&values, DataType::Standard), (-3.0, 2.0));
        assert_eq!(compute_data_range(&values, DataType::Symmetric), (-3.0, 3.0));
        assert_eq!(compute_data_range(&values, DataType::Magnitude), (0.0, 2.0));
        assert_eq!(compute_data_range(&[], DataType::Standard), (0.0, 1.0));
    }

    #[test]
    fn test_default_color_maps() {
        let q = SparseVolumeGridCellScalarQuantity::new(
            "sym".into(),
            "scalar_test_grid",
            "Sparse Volume Grid#scalar_test_grid#",
            vec![-1.0, 2.0],
            DataType::Symmetric,
        );
        assert_eq!(q.color_map(), "coolwarm");
        assert_eq!(q.scalar().range(), (-2.0, 2.0));
        assert_eq!(q.nice_name(), "sym (cell scalar)");
    }

    #[test]
    fn test_set_color_map_validates() {
        let mut q = SparseVolumeGridCellScalarQuantity::new(
            "v".into(),
            "scalar_test_grid_2",
            "Sparse Volume Grid#scalar_test_grid_2#",
            vec![0.0, 1.0],
            DataType::Standard,
        );
        assert!(matches!(
            q.set_color_map("plasma-ish"),
            Err(PolyscopeError::UnknownOption { kind: "color map", .. })
        ));
        assert_eq!(q.color_map(), "viridis");
        q.set_color_map("reds").unwrap();
        assert_eq!(q.color_map(), "reds");
    }

    #[test]
    fn test_range_override_and_reset() {
        let mut q = SparseVolumeGridCellScalarQuantity::new(
            "r".into(),
            "scalar_test_grid_3",
            "Sparse Volume Grid#scalar_test_grid_3#",
            vec![0.0, 4.0],
            DataType::Standard,
        );
        q.set_data_range(1.0, 2.0);
        assert_eq!(q.scalar().range(), (1.0, 2.0));
        q.reset_data_range();
        assert_eq!(q.scalar().range(), (0.0, 4.0));
    }
}
