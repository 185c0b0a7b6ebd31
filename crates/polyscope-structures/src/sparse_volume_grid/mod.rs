//! Sparse volume grid structure: an arbitrary set of occupied cells of a
//! regular lattice.
//!
//! Cells are drawn as instanced cubes (or, in wireframe mode, as spheres at
//! their corners joined by cylinders). Nodes, the corners shared between
//! cells, are derived on demand and carry node-valued quantities.

mod canonicalize;
mod color_quantity;
mod geometry;
mod indexing;
mod pick;
mod quantity;
mod render;
mod scalar_quantity;

pub use canonicalize::{canonicalize_node_values, CanonicalNodeValues};
pub use color_quantity::{SparseVolumeGridCellColorQuantity, SparseVolumeGridNodeColorQuantity};
pub use geometry::SparseGridGeometry;
pub use indexing::{corner_offset, NodeIndexing};
pub use pick::{SparseVolumeGridElement, SparseVolumeGridPickResult, NODE_PICK_RADIUS};
pub use quantity::{GridQuantity, SparseVolumeGridQuantity};
pub use render::{GridcubeStyle, EDGE_WIDTH_MULTIPLIER, WIREFRAME_RADIUS_SCALE};
pub use scalar_quantity::{
    compute_data_range, DataType, ScalarQuantityBase, SparseVolumeGridCellScalarQuantity,
    SparseVolumeGridNodeScalarQuantity,
};

use std::any::Any;

use glam::{IVec3, Mat4, Vec3};
use polyscope_core::structure::unique_prefix;
use polyscope_core::{
    AttributeData, Options, PersistentValue, PickResult, PolyscopeError, RenderContext, Result,
    ShaderProgram, Structure, UniformValue, WidgetBuilder,
};
use polyscope_render::{builtin_materials, next_unique_color, rules};
use polyscope_ui::{build_selection_panel, build_sparse_volume_grid_ui, SparseGridAppearance};
use serde::{Deserialize, Serialize};

use pick::classify_hit;
use render::{
    draw_gridcube, request_gridcube_pick_program, request_gridcube_program,
    request_wireframe_program, set_gridcube_uniforms, wireframe_edge_endpoints,
    wireframe_node_positions, wireframe_radius,
};

/// Type name under which sparse volume grids are registered.
pub const STRUCTURE_TYPE: &str = "Sparse Volume Grid";

/// How the grid geometry is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SparseVolumeGridRenderMode {
    /// One shaded cube per cell; quantities are drawn on the cubes.
    #[default]
    Gridcube,
    /// Spheres at cell corners and cylinders along cell edges.
    Wireframe,
}

impl SparseVolumeGridRenderMode {
    pub const ALL: [Self; 2] = [Self::Gridcube, Self::Wireframe];

    /// Label shown in the render mode combo.
    pub fn label(self) -> &'static str {
        match self {
            Self::Gridcube => "Gridcube",
            Self::Wireframe => "Wireframe",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.label() == label)
    }
}

/// Persistent appearance options of one grid.
struct GridOptions {
    color: PersistentValue<Vec3>,
    edge_width: PersistentValue<f32>,
    edge_color: PersistentValue<Vec3>,
    material: PersistentValue<String>,
    cube_size_factor: PersistentValue<f32>,
    render_mode: PersistentValue<SparseVolumeGridRenderMode>,
    wireframe_radius: PersistentValue<f32>,
    wireframe_color: PersistentValue<Vec3>,
    cull_whole_elements: PersistentValue<bool>,
}

impl GridOptions {
    fn new(prefix: &str, options: &Options) -> Self {
        let key = |property: &str| format!("{prefix}{property}");
        Self {
            color: PersistentValue::new(key("color"), next_unique_color()),
            edge_width: PersistentValue::new(key("edgeWidth"), 0.0),
            edge_color: PersistentValue::new(key("edgeColor"), Vec3::ZERO),
            material: PersistentValue::new(key("material"), options.default_material.clone()),
            cube_size_factor: PersistentValue::new(key("cubeSizeFactor"), 0.0),
            render_mode: PersistentValue::new(
                key("renderMode"),
                SparseVolumeGridRenderMode::default(),
            ),
            wireframe_radius: PersistentValue::new(key("wireframeRadius"), 1.0),
            wireframe_color: PersistentValue::new(key("wireframeColor"), Vec3::splat(0.2)),
            cull_whole_elements: PersistentValue::new(key("cullWholeElements"), true),
        }
    }

    fn style(&self, transform: Mat4) -> GridcubeStyle<'_> {
        GridcubeStyle {
            material: self.material.get(),
            shrink: *self.cube_size_factor.get(),
            edge_width: *self.edge_width.get(),
            edge_color: *self.edge_color.get(),
            transform,
            cull_whole_elements: *self.cull_whole_elements.get(),
        }
    }

    fn appearance(&self) -> SparseGridAppearance {
        SparseGridAppearance {
            color: *self.color.get(),
            edge_width: *self.edge_width.get(),
            edge_color: *self.edge_color.get(),
            material: self.material.get().clone(),
            cube_size_factor: *self.cube_size_factor.get(),
            render_mode: self.render_mode.get().label().to_string(),
            wireframe_radius: *self.wireframe_radius.get(),
            wireframe_color: *self.wireframe_color.get(),
        }
    }
}

/// Cached render programs of the grid itself.
#[derive(Default)]
struct GridPrograms {
    cubes: Option<Box<dyn ShaderProgram>>,
    pick: Option<Box<dyn ShaderProgram>>,
    wireframe_nodes: Option<Box<dyn ShaderProgram>>,
    wireframe_edges: Option<Box<dyn ShaderProgram>>,
}

impl GridPrograms {
    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A set of occupied cells of a regular lattice, with cell and node data.
///
/// Cell `(i, j, k)` spans `origin + (i, j, k) * cell_width` to
/// `origin + (i + 1, j + 1, k + 1) * cell_width`. The order of the cell list
/// given at construction is the order of all per-cell data.
pub struct SparseVolumeGrid {
    name: String,
    geometry: SparseGridGeometry,

    enabled: bool,
    transform: Mat4,
    quantities: Vec<SparseVolumeGridQuantity>,

    /// Set once node picking is wanted; never cleared.
    nodes_have_been_used: bool,
    ui_scale: f32,

    options: GridOptions,

    programs: GridPrograms,
    pick_start: usize,
}

impl SparseVolumeGrid {
    /// Creates a grid with default options.
    ///
    /// Fails with [`PolyscopeError::DuplicateCell`] if a cell is listed twice.
    pub fn new(
        name: impl Into<String>,
        origin: Vec3,
        cell_width: Vec3,
        occupied_cells: Vec<IVec3>,
    ) -> Result<Self> {
        Self::with_options(name, origin, cell_width, occupied_cells, &Options::default())
    }

    /// Creates a grid, taking the default material and UI scale from `options`.
    pub fn with_options(
        name: impl Into<String>,
        origin: Vec3,
        cell_width: Vec3,
        occupied_cells: Vec<IVec3>,
        options: &Options,
    ) -> Result<Self> {
        let name = name.into();
        let geometry = SparseGridGeometry::new(&name, origin, cell_width, occupied_cells)?;
        let options_prefix = unique_prefix(STRUCTURE_TYPE, &name);
        Ok(Self {
            options: GridOptions::new(&options_prefix, options),
            name,
            geometry,
            enabled: true,
            transform: Mat4::IDENTITY,
            quantities: Vec::new(),
            nodes_have_been_used: false,
            ui_scale: options.ui_scale,
            programs: GridPrograms::default(),
            pick_start: 0,
        })
    }

    /// Returns the number of occupied cells.
    #[must_use]
    pub fn num_cells(&self) -> usize {
        self.geometry.num_cells()
    }

    /// Returns the number of canonical nodes, deriving them if needed.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.geometry.num_nodes()
    }

    #[must_use]
    pub fn origin(&self) -> Vec3 {
        self.geometry.origin()
    }

    #[must_use]
    pub fn cell_width(&self) -> Vec3 {
        self.geometry.cell_width()
    }

    /// Occupied cells in input order.
    #[must_use]
    pub fn occupied_cells(&self) -> &[IVec3] {
        self.geometry.cells()
    }

    /// Canonical nodes, sorted by `(x, y, z)`; derives them if needed.
    #[must_use]
    pub fn canonical_nodes(&self) -> &[IVec3] {
        &self.geometry.nodes().canonical_nodes
    }

    /// Cell geometry and derived node indexing.
    #[must_use]
    pub fn geometry(&self) -> &SparseGridGeometry {
        &self.geometry
    }

    /// Enables node picking even without a node quantity.
    pub fn mark_nodes_as_used(&mut self) -> &mut Self {
        self.geometry.nodes();
        self.nodes_have_been_used = true;
        self
    }

    #[must_use]
    pub fn nodes_have_been_used(&self) -> bool {
        self.nodes_have_been_used
    }

    /// Position of `cell` in the occupied list.
    #[must_use]
    pub fn find_cell_flat_index(&self, cell: IVec3) -> Option<usize> {
        self.geometry.find_cell_flat_index(cell)
    }

    /// Position of `node` in the canonical list.
    ///
    /// Fails with [`PolyscopeError::NodeIndicesNotPrepared`] if nodes were
    /// never derived.
    pub fn find_node_flat_index(&self, node: IVec3) -> Result<Option<usize>> {
        self.geometry.find_node_flat_index(&self.name, node)
    }

    // -- Appearance --

    #[must_use]
    pub fn color(&self) -> Vec3 {
        *self.options.color.get()
    }

    pub fn set_color(&mut self, color: Vec3) -> &mut Self {
        self.options.color.set(color);
        self
    }

    #[must_use]
    pub fn edge_width(&self) -> f32 {
        *self.options.edge_width.get()
    }

    /// Sets the edge width; 0 hides edges.
    ///
    /// Showing or hiding edges rebuilds the programs, other width changes do not.
    pub fn set_edge_width(&mut self, width: f32) -> &mut Self {
        let width = width.max(0.0);
        let had_edges = self.edge_width() > 0.0;
        self.options.edge_width.set(width);
        if had_edges != (width > 0.0) {
            self.refresh();
        }
        self
    }

    #[must_use]
    pub fn edge_color(&self) -> Vec3 {
        *self.options.edge_color.get()
    }

    pub fn set_edge_color(&mut self, color: Vec3) -> &mut Self {
        self.options.edge_color.set(color);
        self
    }

    /// Sets the material by name; unknown names are an error.
    pub fn set_material(&mut self, material: &str) -> Result<&mut Self> {
        if !builtin_materials().has(material) {
            return Err(PolyscopeError::UnknownOption {
                kind: "material",
                name: material.to_string(),
            });
        }
        self.options.material.set(material.to_string());
        self.refresh();
        Ok(self)
    }

    /// Shrink amount of the drawn cubes, 0 = cubes fill their cells.
    #[must_use]
    pub fn cube_size_factor(&self) -> f32 {
        *self.options.cube_size_factor.get()
    }

    /// Sets the shrink amount, clamped to `[0, 1]`.
    pub fn set_cube_size_factor(&mut self, factor: f32) -> &mut Self {
        self.options.cube_size_factor.set(factor.clamp(0.0, 1.0));
        self
    }

    #[must_use]
    pub fn render_mode(&self) -> SparseVolumeGridRenderMode {
        *self.options.render_mode.get()
    }

    /// Switches between cube and wireframe drawing. Cell, node and quantity
    /// data are untouched; cached programs of both modes are dropped.
    pub fn set_render_mode(&mut self, mode: SparseVolumeGridRenderMode) -> &mut Self {
        if self.render_mode() != mode {
            self.options.render_mode.set(mode);
            self.refresh();
        }
        self
    }

    /// Whether slice planes remove whole cubes rather than cutting through them.
    #[must_use]
    pub fn cull_whole_elements(&self) -> bool {
        *self.options.cull_whole_elements.get()
    }

    pub fn set_cull_whole_elements(&mut self, cull: bool) -> &mut Self {
        if self.cull_whole_elements() != cull {
            self.options.cull_whole_elements.set(cull);
            self.refresh();
        }
        self
    }

    #[must_use]
    pub fn wireframe_radius(&self) -> f32 {
        *self.options.wireframe_radius.get()
    }

    /// Sets the wireframe radius, relative to the smallest cell width.
    pub fn set_wireframe_radius(&mut self, radius: f32) -> &mut Self {
        self.options.wireframe_radius.set(radius);
        self
    }

    #[must_use]
    pub fn wireframe_color(&self) -> Vec3 {
        *self.options.wireframe_color.get()
    }

    pub fn set_wireframe_color(&mut self, color: Vec3) -> &mut Self {
        self.options.wireframe_color.set(color);
        self
    }

    /// Returns whether the base cube program is currently built.
    #[must_use]
    pub fn has_program(&self) -> bool {
        self.programs.cubes.is_some()
    }

    // -- Quantities --

    /// Attaches one scalar per cell, in cell order.
    pub fn add_cell_scalar_quantity(
        &mut self,
        name: impl Into<String>,
        values: Vec<f32>,
        data_type: DataType,
    ) -> Result<&mut SparseVolumeGridCellScalarQuantity> {
        let name = name.into();
        self.check_cell_data_len(&name, values.len())?;
        let quantity = SparseVolumeGridCellScalarQuantity::new(
            name,
            &self.name,
            &self.unique_prefix(),
            values,
            data_type,
        );
        match self.insert_quantity(SparseVolumeGridQuantity::CellScalar(quantity)) {
            SparseVolumeGridQuantity::CellScalar(q) => Ok(q),
            _ => unreachable!("inserted a cell scalar"),
        }
    }

    /// Attaches one scalar per node. `node_indices[i]` is the node of `values[i]`.
    ///
    /// Nodes may come in any order and extra nodes are ignored, but every
    /// canonical node needs a value.
    pub fn add_node_scalar_quantity(
        &mut self,
        name: impl Into<String>,
        node_indices: &[IVec3],
        values: Vec<f32>,
        data_type: DataType,
    ) -> Result<&mut SparseVolumeGridNodeScalarQuantity> {
        let name = name.into();
        let canonical = canonicalize_node_values(
            &self.geometry.nodes().canonical_nodes,
            node_indices,
            values,
            &name,
            &self.name,
        )?;
        self.nodes_have_been_used = true;
        let quantity = SparseVolumeGridNodeScalarQuantity::new(
            name,
            &self.name,
            &self.unique_prefix(),
            canonical.values,
            data_type,
            canonical.was_canonical,
        );
        match self.insert_quantity(SparseVolumeGridQuantity::NodeScalar(quantity)) {
            SparseVolumeGridQuantity::NodeScalar(q) => Ok(q),
            _ => unreachable!("inserted a node scalar"),
        }
    }

    /// Attaches one RGB color per cell, in cell order.
    pub fn add_cell_color_quantity(
        &mut self,
        name: impl Into<String>,
        colors: Vec<Vec3>,
    ) -> Result<&mut SparseVolumeGridCellColorQuantity> {
        let name = name.into();
        self.check_cell_data_len(&name, colors.len())?;
        let quantity =
            SparseVolumeGridCellColorQuantity::new(name, &self.name, &self.unique_prefix(), colors);
        match self.insert_quantity(SparseVolumeGridQuantity::CellColor(quantity)) {
            SparseVolumeGridQuantity::CellColor(q) => Ok(q),
            _ => unreachable!("inserted a cell color"),
        }
    }

    /// Attaches one RGB color per node; see [`Self::add_node_scalar_quantity`].
    pub fn add_node_color_quantity(
        &mut self,
        name: impl Into<String>,
        node_indices: &[IVec3],
        colors: Vec<Vec3>,
    ) -> Result<&mut SparseVolumeGridNodeColorQuantity> {
        let name = name.into();
        let canonical = canonicalize_node_values(
            &self.geometry.nodes().canonical_nodes,
            node_indices,
            colors,
            &name,
            &self.name,
        )?;
        self.nodes_have_been_used = true;
        let quantity = SparseVolumeGridNodeColorQuantity::new(
            name,
            &self.name,
            &self.unique_prefix(),
            canonical.values,
            canonical.was_canonical,
        );
        match self.insert_quantity(SparseVolumeGridQuantity::NodeColor(quantity)) {
            SparseVolumeGridQuantity::NodeColor(q) => Ok(q),
            _ => unreachable!("inserted a node color"),
        }
    }

    fn check_cell_data_len(&self, quantity: &str, len: usize) -> Result<()> {
        if len == self.num_cells() {
            Ok(())
        } else {
            Err(PolyscopeError::SizeMismatch {
                what: format!("cell quantity '{quantity}' on '{}'", self.name),
                expected: self.num_cells(),
                actual: len,
            })
        }
    }

    /// Adds `quantity`, replacing any quantity of the same name in place.
    fn insert_quantity(&mut self, quantity: SparseVolumeGridQuantity) -> &mut SparseVolumeGridQuantity {
        let index = match self.quantities.iter().position(|q| q.name() == quantity.name()) {
            Some(index) => {
                log::warn!(
                    "replacing quantity '{}' on sparse volume grid '{}'",
                    quantity.name(),
                    self.name
                );
                self.quantities[index] = quantity;
                index
            }
            None => {
                log::debug!(
                    "added {} to sparse volume grid '{}'",
                    quantity.nice_name(),
                    self.name
                );
                self.quantities.push(quantity);
                self.quantities.len() - 1
            }
        };
        &mut self.quantities[index]
    }

    /// Attached quantities in insertion order.
    #[must_use]
    pub fn quantities(&self) -> &[SparseVolumeGridQuantity] {
        &self.quantities
    }

    #[must_use]
    pub fn get_quantity(&self, name: &str) -> Option<&SparseVolumeGridQuantity> {
        self.quantities.iter().find(|q| q.name() == name)
    }

    pub fn get_quantity_mut(&mut self, name: &str) -> Option<&mut SparseVolumeGridQuantity> {
        self.quantities.iter_mut().find(|q| q.name() == name)
    }

    /// Enables or disables a quantity. Enabling disables every other quantity.
    pub fn set_quantity_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        let index = self
            .quantities
            .iter()
            .position(|q| q.name() == name)
            .ok_or_else(|| PolyscopeError::QuantityNotFound(name.to_string(), self.name.clone()))?;
        self.quantities[index].set_enabled(enabled);
        if enabled {
            self.make_dominant(index);
        }
        Ok(())
    }

    fn make_dominant(&mut self, index: usize) {
        for (i, q) in self.quantities.iter_mut().enumerate() {
            if i != index && q.is_enabled() {
                q.set_enabled(false);
            }
        }
    }

    /// Removes a quantity, dropping its program.
    pub fn remove_quantity(&mut self, name: &str) -> Result<()> {
        let index = self
            .quantities
            .iter()
            .position(|q| q.name() == name)
            .ok_or_else(|| PolyscopeError::QuantityNotFound(name.to_string(), self.name.clone()))?;
        self.quantities.remove(index);
        Ok(())
    }

    pub fn remove_all_quantities(&mut self) {
        self.quantities.clear();
    }

    // -- Picking --

    /// Resolves a raw pick hit on this grid to a cell or node selection.
    ///
    /// A hit close to a cube corner selects the node there, but only once
    /// nodes have been used (a node quantity was added or
    /// [`Self::mark_nodes_as_used`] was called).
    pub fn interpret_pick_result(&self, pick: &PickResult) -> Result<SparseVolumeGridPickResult> {
        if !pick.is_from(STRUCTURE_TYPE, &self.name) {
            return Err(PolyscopeError::ForeignPick {
                expected: format!("{STRUCTURE_TYPE} '{}'", self.name),
                actual: format!("{} '{}'", pick.structure_type, pick.structure_name),
            });
        }
        let cell = *self
            .geometry
            .cells()
            .get(pick.element_index)
            .ok_or(PolyscopeError::PickIndexOutOfRange {
                index: pick.element_index,
                len: self.num_cells(),
            })?;

        let local_pos = self.transform.inverse().transform_point3(pick.world_position);
        let (element_type, node_index) = classify_hit(
            cell,
            local_pos,
            self.origin(),
            self.cell_width(),
            self.cube_size_factor(),
            self.nodes_have_been_used,
        );
        if node_index.is_some() {
            self.geometry.nodes();
        }

        Ok(SparseVolumeGridPickResult {
            element_type,
            cell_index: cell,
            cell_flat_index: pick.element_index,
            node_index,
        })
    }

    /// Builds the selection panel for a pick hit on this grid.
    pub fn build_pick_ui(&self, ui: &mut dyn WidgetBuilder, pick: &PickResult) -> Result<()> {
        let result = self.interpret_pick_result(pick)?;
        build_selection_panel(ui, pick, |ui| match (result.element_type, result.node_index) {
            (SparseVolumeGridElement::Node, Some(node)) => self.build_node_info_gui(ui, node),
            _ => self.build_cell_info_gui(ui, &result),
        });
        Ok(())
    }

    fn build_cell_info_gui(&self, ui: &mut dyn WidgetBuilder, result: &SparseVolumeGridPickResult) {
        ui.info_row("Cell index", &format_ivec3(result.cell_index));
        ui.info_row("Cell #", &result.cell_flat_index.to_string());
        ui.info_row(
            "Position",
            &format_vec3(self.geometry.cell_center(result.cell_index)),
        );
        ui.separator();
        for q in &self.quantities {
            if q.defined_on() == SparseVolumeGridElement::Cell {
                q.build_cell_info(ui, result.cell_flat_index);
            }
        }
    }

    fn build_node_info_gui(&self, ui: &mut dyn WidgetBuilder, node: IVec3) {
        ui.info_row("Node index", &format_ivec3(node));
        let flat_index = self.find_node_flat_index(node).ok().flatten();
        if let Some(flat_index) = flat_index {
            ui.info_row("Node #", &flat_index.to_string());
        }
        ui.info_row("Position", &format_vec3(self.geometry.node_position(node)));
        ui.separator();
        if let Some(flat_index) = flat_index {
            for q in &self.quantities {
                if q.defined_on() == SparseVolumeGridElement::Node {
                    q.build_node_info(ui, flat_index);
                }
            }
        }
    }

    // -- UI --

    /// Builds the grid's panel and its quantity entries. Returns true if
    /// anything changed.
    pub fn build_ui(&mut self, ui: &mut dyn WidgetBuilder) -> bool {
        let before = self.options.appearance();
        let mut after = before.clone();
        let render_modes = SparseVolumeGridRenderMode::ALL.map(SparseVolumeGridRenderMode::label);
        let mut changed = build_sparse_volume_grid_ui(
            ui,
            self.num_cells(),
            &mut after,
            &render_modes,
            &builtin_materials().names(),
            self.ui_scale,
        );
        if changed {
            self.apply_appearance(&before, &after);
        }

        if !self.quantities.is_empty() {
            ui.separator();
        }
        for index in 0..self.quantities.len() {
            let was_enabled = self.quantities[index].is_enabled();
            if self.quantities[index].build_ui(ui) {
                changed = true;
            }
            if !was_enabled && self.quantities[index].is_enabled() {
                self.make_dominant(index);
            }
        }
        changed
    }

    #[allow(clippy::float_cmp)]
    fn apply_appearance(&mut self, before: &SparseGridAppearance, after: &SparseGridAppearance) {
        if after.color != before.color {
            self.set_color(after.color);
        }
        if after.edge_color != before.edge_color {
            self.set_edge_color(after.edge_color);
        }
        if after.edge_width != before.edge_width {
            if (after.edge_width > 0.0) == (before.edge_width > 0.0) {
                // dragging the width only changes a uniform
                self.options.edge_width.set(after.edge_width);
            } else {
                self.set_edge_width(after.edge_width);
            }
        }
        if after.material != before.material {
            if let Err(e) = self.set_material(&after.material) {
                log::warn!("{e}");
            }
        }
        if after.cube_size_factor != before.cube_size_factor {
            self.set_cube_size_factor(after.cube_size_factor);
        }
        if after.render_mode != before.render_mode {
            if let Some(mode) = SparseVolumeGridRenderMode::from_label(&after.render_mode) {
                self.set_render_mode(mode);
            }
        }
        if after.wireframe_radius != before.wireframe_radius {
            self.set_wireframe_radius(after.wireframe_radius);
        }
        if after.wireframe_color != before.wireframe_color {
            self.set_wireframe_color(after.wireframe_color);
        }
    }

    // -- Drawing --

    fn draw_gridcubes(&mut self, ctx: &mut dyn RenderContext) -> Result<()> {
        let style = self.options.style(self.transform);

        if self.quantities.iter().any(SparseVolumeGridQuantity::is_enabled) {
            for q in &mut self.quantities {
                q.draw(ctx, &self.geometry, &style)?;
            }
            return Ok(());
        }

        if self.programs.cubes.is_none() {
            log::debug!("building gridcube program of '{}'", self.name);
            self.programs.cubes = Some(request_gridcube_program(
                ctx,
                &self.geometry,
                &style,
                &[rules::SHADE_BASECOLOR],
            )?);
        }
        if let Some(program) = self.programs.cubes.as_mut() {
            program.set_uniform("u_baseColor", UniformValue::Vec3(*self.options.color.get()));
            draw_gridcube(ctx, program.as_mut(), &self.geometry, &style);
        }
        Ok(())
    }

    fn draw_wireframe(&mut self, ctx: &mut dyn RenderContext) -> Result<()> {
        let material = self.options.material.get();

        if self.programs.wireframe_nodes.is_none() {
            log::debug!("building wireframe programs of '{}'", self.name);
            let mut nodes = request_wireframe_program(ctx, rules::RAYCAST_SPHERE, material)?;
            let positions = wireframe_node_positions(&self.geometry);
            nodes.set_attribute("a_position", AttributeData::Vec3(&positions));
            self.programs.wireframe_nodes = Some(nodes);
        }
        if self.programs.wireframe_edges.is_none() {
            let mut edges = request_wireframe_program(ctx, rules::RAYCAST_CYLINDER, material)?;
            let (tails, tips) = wireframe_edge_endpoints(&self.geometry);
            edges.set_attribute("a_position_tail", AttributeData::Vec3(&tails));
            edges.set_attribute("a_position_tip", AttributeData::Vec3(&tips));
            self.programs.wireframe_edges = Some(edges);
        }

        let radius = wireframe_radius(&self.geometry, self.wireframe_radius());
        let color = UniformValue::Vec3(self.wireframe_color());
        let model = UniformValue::Mat4(self.transform);
        let programs = [
            (self.programs.wireframe_nodes.as_mut(), "u_pointRadius"),
            (self.programs.wireframe_edges.as_mut(), "u_radius"),
        ];
        for (program, radius_uniform) in programs {
            if let Some(program) = program {
                program.set_uniform("u_model", model);
                program.set_uniform(radius_uniform, UniformValue::Float(radius));
                program.set_uniform("u_baseColor", color);
                ctx.set_material_uniforms(program.as_mut(), material);
                program.draw();
            }
        }
        Ok(())
    }
}

fn format_ivec3(v: IVec3) -> String {
    format!("({}, {}, {})", v.x, v.y, v.z)
}

fn format_vec3(v: Vec3) -> String {
    format!("({:.4}, {:.4}, {:.4})", v.x, v.y, v.z)
}

impl Structure for SparseVolumeGrid {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        STRUCTURE_TYPE
    }

    fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let (min, max) = self.geometry.bounding_box();
        let (world_min, world_max) = (0..8).map(|c| corner_offset(c).as_vec3()).fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), t| {
                let p = self.transform.transform_point3(min + t * (max - min));
                (lo.min(p), hi.max(p))
            },
        );
        Some((world_min, world_max))
    }

    fn length_scale(&self) -> f32 {
        if self.num_cells() == 0 {
            return self.cell_width().length();
        }
        let (min, max) = self.geometry.bounding_box();
        (max - min).length()
    }

    fn transform(&self) -> Mat4 {
        self.transform
    }

    fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn draw(&mut self, ctx: &mut dyn RenderContext) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        match self.render_mode() {
            SparseVolumeGridRenderMode::Gridcube => self.draw_gridcubes(ctx),
            SparseVolumeGridRenderMode::Wireframe => self.draw_wireframe(ctx),
        }
    }

    fn draw_pick(&mut self, ctx: &mut dyn RenderContext) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let style = GridcubeStyle {
            edge_width: 0.0,
            ..self.options.style(self.transform)
        };
        if self.programs.pick.is_none() {
            self.pick_start =
                ctx.request_pick_buffer_range(STRUCTURE_TYPE, &self.name, self.num_cells())?;
            self.programs.pick = Some(request_gridcube_pick_program(
                ctx,
                &self.geometry,
                &style,
                self.pick_start,
            )?);
        }
        if let Some(program) = self.programs.pick.as_mut() {
            set_gridcube_uniforms(ctx, program.as_mut(), &self.geometry, &style);
            ctx.set_backface_cull(true);
            program.draw();
        }
        Ok(())
    }

    fn refresh(&mut self) {
        log::debug!("dropping programs of sparse volume grid '{}'", self.name);
        self.programs.clear();
        for q in &mut self.quantities {
            q.refresh();
        }
    }

    fn material(&self) -> &str {
        self.options.material.get()
    }

    fn set_material(&mut self, material: &str) {
        if let Err(e) = SparseVolumeGrid::set_material(self, material) {
            log::warn!("{e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyscope_render::HeadlessRenderContext;
    use polyscope_ui::{ScriptedEdit, ScriptedUi};

    fn two_cells(name: &str) -> SparseVolumeGrid {
        SparseVolumeGrid::new(name, Vec3::ZERO, Vec3::ONE, vec![IVec3::ZERO, IVec3::X]).unwrap()
    }

    fn block(name: &str, n: i32) -> SparseVolumeGrid {
        let mut cells = Vec::new();
        for i in -n..n {
            for j in -n..n {
                for k in -n..n {
                    cells.push(IVec3::new(i, j, k));
                }
            }
        }
        SparseVolumeGrid::new(name, Vec3::ZERO, Vec3::splat(0.5), cells).unwrap()
    }

    #[test]
    fn test_duplicate_cells_rejected() {
        let result = SparseVolumeGrid::new(
            "svg_dup",
            Vec3::ZERO,
            Vec3::ONE,
            vec![IVec3::ZERO, IVec3::ONE, IVec3::ZERO],
        );
        assert!(matches!(
            result,
            Err(PolyscopeError::DuplicateCell { cell, .. }) if cell == IVec3::ZERO
        ));
        assert!(SparseVolumeGrid::new("svg_dup", Vec3::ZERO, Vec3::ONE, vec![IVec3::ONE]).is_ok());
    }

    #[test]
    fn test_counts() {
        let grid = two_cells("svg_counts");
        assert_eq!(grid.num_cells(), 2);
        assert_eq!(grid.num_nodes(), 12);
        let nodes = grid.canonical_nodes();
        assert!(nodes.windows(2).all(|w| w[0].to_array() < w[1].to_array()));

        let grid = block("svg_block", 2);
        assert_eq!(grid.num_cells(), 64);
        assert_eq!(grid.num_nodes(), 125);
    }

    #[test]
    fn test_node_quantity_order() {
        let mut grid = two_cells("svg_node_order");
        let nodes = grid.canonical_nodes().to_vec();
        let values: Vec<f32> = (0..nodes.len()).map(|i| i as f32).collect();

        let q = grid
            .add_node_scalar_quantity("fwd", &nodes, values.clone(), DataType::Standard)
            .unwrap();
        assert!(q.was_canonical());
        assert_eq!(q.values(), values.as_slice());

        let reversed_nodes: Vec<IVec3> = nodes.iter().rev().copied().collect();
        let reversed_values: Vec<f32> = values.iter().rev().copied().collect();
        let q = grid
            .add_node_scalar_quantity("rev", &reversed_nodes, reversed_values, DataType::Standard)
            .unwrap();
        assert!(!q.was_canonical());
        assert_eq!(q.values(), values.as_slice());
        assert!(grid.nodes_have_been_used());
    }

    #[test]
    fn test_failed_attach_leaves_grid_untouched() {
        let mut grid = two_cells("svg_missing");
        let mut nodes = grid.canonical_nodes().to_vec();
        nodes.remove(3);
        let colors = vec![Vec3::ONE; nodes.len()];
        assert!(matches!(
            grid.add_node_color_quantity("c", &nodes, colors),
            Err(PolyscopeError::MissingNode { .. })
        ));
        assert!(grid.quantities().is_empty());
        assert!(!grid.nodes_have_been_used());

        assert!(matches!(
            grid.add_cell_scalar_quantity("s", vec![1.0], DataType::Standard),
            Err(PolyscopeError::SizeMismatch {
                expected: 2,
                actual: 1,
                ..
            })
        ));
        assert!(grid.quantities().is_empty());
    }

    #[test]
    fn test_replacing_quantity_keeps_one() {
        let mut grid = two_cells("svg_replace");
        grid.add_cell_color_quantity("c", vec![Vec3::X; 2]).unwrap();
        grid.add_cell_color_quantity("c", vec![Vec3::Y; 2]).unwrap();
        assert_eq!(grid.quantities().len(), 1);
        match grid.get_quantity("c") {
            Some(SparseVolumeGridQuantity::CellColor(q)) => assert_eq!(q.colors()[0], Vec3::Y),
            _ => panic!("expected a cell color quantity"),
        }
        grid.remove_quantity("c").unwrap();
        assert!(matches!(
            grid.remove_quantity("c"),
            Err(PolyscopeError::QuantityNotFound(..))
        ));
    }

    #[test]
    fn test_replacing_or_removing_quantity_drops_its_program() {
        let mut grid = two_cells("svg_replace_program");
        let mut ctx = HeadlessRenderContext::new();
        grid.add_cell_scalar_quantity("s", vec![0.0, 1.0], DataType::Standard)
            .unwrap();
        grid.set_quantity_enabled("s", true).unwrap();
        grid.draw(&mut ctx).unwrap();
        assert_eq!(ctx.log().live_programs, 1);
        assert!(grid.get_quantity("s").is_some_and(SparseVolumeGridQuantity::has_program));

        grid.add_cell_scalar_quantity("s", vec![2.0, 3.0], DataType::Standard)
            .unwrap();
        assert_eq!(ctx.log().live_programs, 0);
        assert!(grid.get_quantity("s").is_some_and(|q| !q.has_program()));

        grid.set_quantity_enabled("s", true).unwrap();
        grid.draw(&mut ctx).unwrap();
        assert_eq!(ctx.log().live_programs, 1);
        grid.remove_quantity("s").unwrap();
        assert_eq!(ctx.log().live_programs, 0);
    }

    #[test]
    fn test_pick_classification() {
        let mut grid = two_cells("svg_pick");
        let center = PickResult::new(STRUCTURE_TYPE, "svg_pick", 0, Vec3::splat(0.5), 0.5);
        let near_corner =
            PickResult::new(STRUCTURE_TYPE, "svg_pick", 1, Vec3::new(1.95, 0.95, 0.05), 0.5);

        let result = grid.interpret_pick_result(&near_corner).unwrap();
        assert_eq!(result.element_type, SparseVolumeGridElement::Cell);
        assert_eq!(result.cell_index, IVec3::X);

        grid.mark_nodes_as_used();
        let result = grid.interpret_pick_result(&center).unwrap();
        assert_eq!(result.element_type, SparseVolumeGridElement::Cell);
        assert_eq!(result.node_index, None);

        let result = grid.interpret_pick_result(&near_corner).unwrap();
        assert_eq!(result.element_type, SparseVolumeGridElement::Node);
        assert_eq!(result.node_index, Some(IVec3::new(2, 1, 0)));
        assert_eq!(result.cell_flat_index, 1);
    }

    #[test]
    fn test_pick_through_transform() {
        let mut grid = two_cells("svg_pick_transform");
        grid.mark_nodes_as_used();
        grid.set_transform(Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
        let pick = PickResult::new(
            STRUCTURE_TYPE,
            "svg_pick_transform",
            0,
            Vec3::new(10.02, 0.02, 0.98),
            0.1,
        );
        let result = grid.interpret_pick_result(&pick).unwrap();
        assert_eq!(result.node_index, Some(IVec3::new(0, 0, 1)));
    }

    #[test]
    fn test_pick_preconditions() {
        let grid = two_cells("svg_pick_pre");
        let foreign = PickResult::new(STRUCTURE_TYPE, "other", 0, Vec3::ZERO, 0.0);
        assert!(matches!(
            grid.interpret_pick_result(&foreign),
            Err(PolyscopeError::ForeignPick { .. })
        ));
        let out_of_range = PickResult::new(STRUCTURE_TYPE, "svg_pick_pre", 2, Vec3::ZERO, 0.0);
        assert!(matches!(
            grid.interpret_pick_result(&out_of_range),
            Err(PolyscopeError::PickIndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(matches!(
            grid.find_node_flat_index(IVec3::ZERO),
            Err(PolyscopeError::NodeIndicesNotPrepared(_))
        ));
    }

    #[test]
    fn test_slice_planes_add_cull_rules() {
        let mut grid = two_cells("svg_slice_rules");
        let mut ctx = HeadlessRenderContext::new();
        assert!(grid.cull_whole_elements());

        grid.draw(&mut ctx).unwrap();
        grid.draw_pick(&mut ctx).unwrap();
        for draw in ctx.take_draws() {
            assert!(!draw.has_rule(rules::CULL_POS_FROM_VIEW));
            assert!(!draw.has_rule(rules::GRIDCUBE_CULLPOS_FROM_CENTER));
        }

        ctx.set_num_active_slice_planes(1);
        grid.refresh();
        grid.draw(&mut ctx).unwrap();
        grid.draw_pick(&mut ctx).unwrap();
        let draws = ctx.take_draws();
        assert_eq!(draws.len(), 2);
        for draw in &draws {
            assert!(draw.has_rule(rules::CULL_POS_FROM_VIEW));
            assert!(draw.has_rule(rules::GRIDCUBE_CULLPOS_FROM_CENTER));
        }

        grid.set_cull_whole_elements(false);
        assert!(!grid.has_program());
        grid.draw(&mut ctx).unwrap();
        let draw = &ctx.take_draws()[0];
        assert!(draw.has_rule(rules::CULL_POS_FROM_VIEW));
        assert!(!draw.has_rule(rules::GRIDCUBE_CULLPOS_FROM_CENTER));
    }

    #[test]
    fn test_slice_planes_cull_wireframe() {
        let mut grid = two_cells("svg_slice_wireframe");
        grid.set_render_mode(SparseVolumeGridRenderMode::Wireframe);
        let mut ctx = HeadlessRenderContext::new();
        grid.draw(&mut ctx).unwrap();
        for draw in ctx.take_draws() {
            assert!(!draw.has_rule(rules::CULL_POS_FROM_VIEW));
        }

        ctx.set_num_active_slice_planes(1);
        grid.refresh();
        grid.draw(&mut ctx).unwrap();
        let draws = ctx.take_draws();
        assert_eq!(draws.len(), 2);
        for draw in &draws {
            assert!(draw.has_rule(rules::CULL_POS_FROM_VIEW));
            assert!(!draw.has_rule(rules::GRIDCUBE_CULLPOS_FROM_CENTER));
        }
    }

    #[test]
    fn test_render_mode_switch() {
        let mut grid = two_cells("svg_mode");
        grid.add_cell_scalar_quantity("s", vec![0.0, 1.0], DataType::Standard)
            .unwrap();
        let mut ctx = HeadlessRenderContext::new();

        grid.draw(&mut ctx).unwrap();
        let draws = ctx.take_draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].program_name, rules::GRIDCUBE);
        assert!(draws[0].has_rule(rules::SHADE_BASECOLOR));

        grid.set_render_mode(SparseVolumeGridRenderMode::Wireframe);
        assert!(!grid.has_program());
        grid.draw(&mut ctx).unwrap();
        let draws = ctx.take_draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].program_name, rules::RAYCAST_SPHERE);
        assert_eq!(draws[0].attributes["a_position"].len(), 16);
        assert_eq!(draws[1].program_name, rules::RAYCAST_CYLINDER);
        assert_eq!(draws[1].attributes["a_position_tail"].len(), 24);
        assert_eq!(draws[1].float_uniform("u_radius"), Some(0.1));

        grid.set_render_mode(SparseVolumeGridRenderMode::Gridcube);
        assert_eq!(grid.num_cells(), 2);
        assert_eq!(grid.quantities().len(), 1);
        grid.draw(&mut ctx).unwrap();
        assert_eq!(ctx.take_draws()[0].program_name, rules::GRIDCUBE);
    }

    #[test]
    fn test_invalidation_rules() {
        let mut grid = two_cells("svg_invalidate");
        let mut ctx = HeadlessRenderContext::new();
        grid.draw(&mut ctx).unwrap();
        assert!(grid.has_program());

        grid.set_color(Vec3::X).set_cube_size_factor(0.3).set_edge_color(Vec3::Y);
        assert!(grid.has_program());

        grid.set_edge_width(1.0);
        assert!(!grid.has_program());
        grid.draw(&mut ctx).unwrap();
        grid.set_edge_width(1.5);
        assert!(grid.has_program());

        grid.set_material("wax").unwrap();
        assert!(!grid.has_program());
        assert!(matches!(
            grid.set_material("velvet"),
            Err(PolyscopeError::UnknownOption { kind: "material", .. })
        ));
        assert_eq!(grid.material(), "wax");
    }

    #[test]
    fn test_gridcube_uniforms() {
        let mut grid = two_cells("svg_uniforms");
        grid.set_edge_width(0.5).set_cube_size_factor(2.0);
        assert!((grid.cube_size_factor() - 1.0).abs() < f32::EPSILON);
        grid.set_cube_size_factor(0.25);

        let mut ctx = HeadlessRenderContext::new().with_pixel_scaling(2.0);
        grid.draw(&mut ctx).unwrap();
        let draw = &ctx.take_draws()[0];
        assert!(draw.has_rule(rules::GRIDCUBE_WIREFRAME));
        assert_eq!(draw.float_uniform("u_edgeWidth"), Some(2.0));
        assert_eq!(draw.float_uniform("u_cubeSizeFactor"), Some(0.75));
        assert_eq!(draw.vec3_uniform("u_baseColor"), Some(grid.color()));
        assert!(draw.backface_cull);
        assert_eq!(draw.attributes["a_cellPosition"].len(), 2);
    }

    #[test]
    fn test_quantities_are_dominant() {
        let mut grid = two_cells("svg_dominant");
        let nodes = grid.canonical_nodes().to_vec();
        grid.add_cell_scalar_quantity("cell", vec![1.0, 2.0], DataType::Magnitude)
            .unwrap();
        grid.add_node_scalar_quantity("node", &nodes, vec![0.5; nodes.len()], DataType::Standard)
            .unwrap();

        grid.set_quantity_enabled("cell", true).unwrap();
        grid.set_quantity_enabled("node", true).unwrap();
        assert!(!grid.get_quantity("cell").unwrap().is_enabled());

        let mut ctx = HeadlessRenderContext::new();
        grid.draw(&mut ctx).unwrap();
        let draws = ctx.take_draws();
        assert_eq!(draws.len(), 1);
        let draw = &draws[0];
        assert!(draw.has_rule(rules::GRIDCUBE_PROPAGATE_ATTR_NODE_SCALAR));
        assert!(draw.has_rule(rules::SHADE_COLORMAP_VALUE));
        for corner in 0..8 {
            let attribute = &draw.attributes[&rules::node_value_attribute(corner)];
            assert_eq!(attribute.len(), 2);
        }
        assert_eq!(draw.textures["t_colormap"], "viridis");
        assert!(!grid.has_program());
    }

    #[test]
    fn test_draw_pick() {
        let mut grid = two_cells("svg_draw_pick");
        let mut ctx = HeadlessRenderContext::new();
        grid.draw_pick(&mut ctx).unwrap();
        let draw = &ctx.take_draws()[0];
        assert_eq!(draw.defaults, polyscope_core::ShaderDefaults::Pick);
        let colors = draw.attributes["a_color"].as_vec3s().unwrap();
        assert_eq!(colors.len(), 2);
        assert_ne!(colors[0], colors[1]);
        assert_eq!(
            ctx.resolve_pick(grid.pick_start + 1),
            Some((STRUCTURE_TYPE.to_string(), "svg_draw_pick".to_string(), 1))
        );
    }

    #[test]
    fn test_pick_survives_repeated_refresh() {
        let cells: Vec<IVec3> = (0..16)
            .flat_map(|i| (0..16).flat_map(move |j| (0..16).map(move |k| IVec3::new(i, j, k))))
            .collect();
        let mut grid =
            SparseVolumeGrid::new("svg_pick_refresh", Vec3::ZERO, Vec3::ONE, cells).unwrap();
        let mut ctx = HeadlessRenderContext::new();
        ctx.request_pick_buffer_range("Other", "neighbor", 7).unwrap();
        grid.draw_pick(&mut ctx).unwrap();
        let first_start = grid.pick_start;

        for round in 0..200 {
            let mode = if round % 2 == 0 {
                SparseVolumeGridRenderMode::Wireframe
            } else {
                SparseVolumeGridRenderMode::Gridcube
            };
            grid.set_render_mode(mode);
            grid.draw_pick(&mut ctx).unwrap();
            ctx.take_draws();
            assert_eq!(grid.pick_start, first_start);
            assert_eq!(
                ctx.resolve_pick(grid.pick_start + 4095),
                Some((STRUCTURE_TYPE.to_string(), "svg_pick_refresh".to_string(), 4095))
            );
        }
        assert_eq!(
            ctx.resolve_pick(1),
            Some(("Other".to_string(), "neighbor".to_string(), 0))
        );
    }

    #[test]
    fn test_draw_pick_reports_exhausted_pick_space() {
        let mut grid = two_cells("svg_pick_exhausted");
        let mut ctx = HeadlessRenderContext::new();
        ctx.request_pick_buffer_range("Other", "hog", 0xFF_FFFE).unwrap();
        assert!(matches!(
            grid.draw_pick(&mut ctx),
            Err(PolyscopeError::RenderError(_))
        ));
        assert!(grid.programs.pick.is_none());
    }

    #[test]
    fn test_bounds_follow_transform() {
        let mut grid = SparseVolumeGrid::new(
            "svg_bounds",
            Vec3::ZERO,
            Vec3::ONE,
            vec![IVec3::ZERO, IVec3::new(1, 1, 0)],
        )
        .unwrap();
        assert_eq!(grid.bounding_box(), Some((Vec3::ZERO, Vec3::new(2.0, 2.0, 1.0))));
        assert!((grid.length_scale() - 3.0).abs() < 1e-5);

        grid.set_transform(Mat4::from_scale(Vec3::splat(2.0)));
        assert_eq!(grid.bounding_box(), Some((Vec3::ZERO, Vec3::new(4.0, 4.0, 2.0))));

        let empty = SparseVolumeGrid::new("svg_empty", Vec3::ONE, Vec3::ONE, Vec::new()).unwrap();
        assert_eq!(empty.bounding_box(), Some((Vec3::ONE, Vec3::ONE)));
        assert_eq!(empty.num_nodes(), 0);
    }

    #[test]
    fn test_ui_width_drag_keeps_program() {
        let mut grid = two_cells("svg_ui_width");
        grid.set_edge_width(1.0);
        let mut ctx = HeadlessRenderContext::new();
        grid.draw(&mut ctx).unwrap();

        let mut ui = ScriptedUi::new();
        ui.script("Width", ScriptedEdit::SetFloat(1.5));
        assert!(grid.build_ui(&mut ui));
        assert!((grid.edge_width() - 1.5).abs() < f32::EPSILON);
        assert!(grid.has_program());

        ui.script("Edges", ScriptedEdit::Toggle);
        assert!(grid.build_ui(&mut ui));
        assert_eq!(grid.edge_width(), 0.0);
        assert!(!grid.has_program());
    }

    #[test]
    fn test_ui_enables_quantity_dominantly() {
        let mut grid = two_cells("svg_ui_quantity");
        grid.add_cell_color_quantity("a", vec![Vec3::X; 2]).unwrap();
        grid.add_cell_color_quantity("b", vec![Vec3::Y; 2]).unwrap();
        grid.set_quantity_enabled("a", true).unwrap();

        let mut ui = ScriptedUi::new();
        ui.script("b", ScriptedEdit::Toggle);
        assert!(grid.build_ui(&mut ui));
        assert!(grid.get_quantity("b").unwrap().is_enabled());
        assert!(!grid.get_quantity("a").unwrap().is_enabled());
        assert!(ui.texts().contains(&"2 cells"));
    }

    #[test]
    fn test_pick_ui_rows() {
        let mut grid = two_cells("svg_pick_ui");
        grid.add_cell_scalar_quantity("s", vec![3.0, 4.0], DataType::Standard)
            .unwrap();
        let mut ui = ScriptedUi::new();
        let pick = PickResult::new(STRUCTURE_TYPE, "svg_pick_ui", 1, Vec3::new(1.5, 0.5, 0.5), 0.2);
        grid.build_pick_ui(&mut ui, &pick).unwrap();
        assert_eq!(ui.info_value("Cell index"), Some("(1, 0, 0)"));
        assert_eq!(ui.info_value("Cell #"), Some("1"));
        assert_eq!(ui.info_value("s"), Some("4"));

        let nodes = grid.canonical_nodes().to_vec();
        let values: Vec<f32> = (0..nodes.len()).map(|i| i as f32).collect();
        grid.add_node_scalar_quantity("n", &nodes, values, DataType::Standard)
            .unwrap();
        let mut ui = ScriptedUi::new();
        let pick = PickResult::new(STRUCTURE_TYPE, "svg_pick_ui", 0, Vec3::splat(0.02), 0.2);
        grid.build_pick_ui(&mut ui, &pick).unwrap();
        assert_eq!(ui.info_value("Node index"), Some("(0, 0, 0)"));
        assert_eq!(ui.info_value("Node #"), Some("0"));
        assert_eq!(ui.info_value("n"), Some("0"));
        assert_eq!(ui.info_value("s"), None);
    }
}
