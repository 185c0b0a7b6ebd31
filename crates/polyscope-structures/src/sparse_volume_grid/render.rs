//! Program construction and uniforms shared by the grid and its quantities.

use glam::{Mat4, Vec3};
use polyscope_core::{
    AttributeData, RenderContext, Result, ShaderDefaults, ShaderProgram, UniformValue,
};
use polyscope_render::rules;

use super::geometry::SparseGridGeometry;
use super::indexing::{corner_offset, NodeIndexing};

/// Gridcube edges are drawn this many times the nominal edge width.
pub const EDGE_WIDTH_MULTIPLIER: f32 = 2.0;

/// Wireframe sphere radius as a fraction of the smallest cell width.
pub const WIREFRAME_RADIUS_SCALE: f32 = 0.1;

/// Grid appearance a gridcube program is drawn with.
#[derive(Debug, Clone, Copy)]
pub struct GridcubeStyle<'a> {
    pub material: &'a str,
    /// Shrink amount, 0 = cubes fill their cell.
    pub shrink: f32,
    pub edge_width: f32,
    pub edge_color: Vec3,
    pub transform: Mat4,
    /// Slice planes drop whole cubes by their center instead of cutting them.
    pub cull_whole_elements: bool,
}

impl GridcubeStyle<'_> {
    pub fn has_edges(&self) -> bool {
        self.edge_width > 0.0
    }
}

/// Rules common to every gridcube program, appended to `base`.
pub(crate) fn gridcube_rules(
    ctx: &dyn RenderContext,
    style: &GridcubeStyle<'_>,
    base: &[&str],
    for_pick: bool,
) -> Vec<String> {
    let mut rules: Vec<String> = base.iter().map(ToString::to_string).collect();
    if style.has_edges() && !for_pick {
        rules.push(rules::GRIDCUBE_WIREFRAME.to_string());
        rules.push(rules::MESH_WIREFRAME.to_string());
    }
    if ctx.num_active_slice_planes() > 0 {
        if style.cull_whole_elements {
            rules.push(rules::GRIDCUBE_CULLPOS_FROM_CENTER.to_string());
        }
        rules.push(rules::CULL_POS_FROM_VIEW.to_string());
    }
    rules
}

/// Requests a shaded gridcube program with cell geometry and material bound.
pub(crate) fn request_gridcube_program(
    ctx: &mut dyn RenderContext,
    geometry: &SparseGridGeometry,
    style: &GridcubeStyle<'_>,
    base_rules: &[&str],
) -> Result<Box<dyn ShaderProgram>> {
    let rules = gridcube_rules(ctx, style, base_rules, false);
    let rules = ctx.add_material_rules(style.material, rules);
    let mut program = ctx.request_shader(rules::GRIDCUBE, rules, ShaderDefaults::Standard)?;
    bind_cell_geometry(program.as_mut(), geometry);
    ctx.set_material(program.as_mut(), style.material);
    Ok(program)
}

/// Requests the pick program; cell `i` is colored with pick index `pick_start + i`.
pub(crate) fn request_gridcube_pick_program(
    ctx: &mut dyn RenderContext,
    geometry: &SparseGridGeometry,
    style: &GridcubeStyle<'_>,
    pick_start: usize,
) -> Result<Box<dyn ShaderProgram>> {
    let rules = gridcube_rules(
        ctx,
        style,
        &[rules::GRIDCUBE_PROPAGATE_ATTR_CELL_COLOR],
        true,
    );
    let mut program = ctx.request_shader(rules::GRIDCUBE, rules, ShaderDefaults::Pick)?;
    let pick_colors: Vec<Vec3> = (0..geometry.num_cells())
        .map(|i| ctx.pick_index_to_color(pick_start + i))
        .collect();
    program.set_attribute("a_color", AttributeData::Vec3(&pick_colors));
    bind_cell_geometry(program.as_mut(), geometry);
    Ok(program)
}

pub(crate) fn bind_cell_geometry(program: &mut dyn ShaderProgram, geometry: &SparseGridGeometry) {
    program.set_attribute("a_cellPosition", AttributeData::Vec3(geometry.cell_centers()));
    program.set_attribute("a_cellInd", AttributeData::IVec3(geometry.cells()));
}

/// Binds canonical-order node data as eight per-corner attributes.
pub(crate) fn bind_node_corners(
    program: &mut dyn ShaderProgram,
    nodes: &NodeIndexing,
    attribute_name: fn(usize) -> String,
    data: AttributeData<'_>,
) {
    for (corner, indices) in nodes.corner_node_indices.iter().enumerate() {
        program.set_indexed_attribute(&attribute_name(corner), data, indices);
    }
}

/// Per-frame gridcube uniforms.
pub(crate) fn set_gridcube_uniforms(
    ctx: &dyn RenderContext,
    program: &mut dyn ShaderProgram,
    geometry: &SparseGridGeometry,
    style: &GridcubeStyle<'_>,
) {
    program.set_uniform("u_model", UniformValue::Mat4(style.transform));
    program.set_uniform("u_gridSpacing", UniformValue::Vec3(geometry.cell_width()));
    program.set_uniform("u_cubeSizeFactor", UniformValue::Float(1.0 - style.shrink));
    if style.has_edges() {
        program.set_uniform(
            "u_edgeWidth",
            UniformValue::Float(EDGE_WIDTH_MULTIPLIER * style.edge_width * ctx.pixel_scaling()),
        );
        program.set_uniform("u_edgeColor", UniformValue::Vec3(style.edge_color));
    }
}

/// Corner positions of every cell, 8 per cell in corner order.
///
/// Corners shared between cells are repeated.
pub(crate) fn wireframe_node_positions(geometry: &SparseGridGeometry) -> Vec<Vec3> {
    geometry
        .cells()
        .iter()
        .flat_map(|cell| (0..8).map(move |c| geometry.node_position(*cell + corner_offset(c))))
        .collect()
}

/// Tail and tip positions of the 12 edges of every cell.
pub(crate) fn wireframe_edge_endpoints(geometry: &SparseGridGeometry) -> (Vec<Vec3>, Vec<Vec3>) {
    let n = 12 * geometry.num_cells();
    let mut tails = Vec::with_capacity(n);
    let mut tips = Vec::with_capacity(n);
    for cell in geometry.cells() {
        for c in 0..8 {
            for axis_bit in [4, 2, 1] {
                if c & axis_bit == 0 {
                    tails.push(geometry.node_position(*cell + corner_offset(c)));
                    tips.push(geometry.node_position(*cell + corner_offset(c | axis_bit)));
                }
            }
        }
    }
    (tails, tips)
}

/// Sphere and cylinder radius of the wireframe.
pub(crate) fn wireframe_radius(geometry: &SparseGridGeometry, radius: f32) -> f32 {
    WIREFRAME_RADIUS_SCALE * radius * geometry.cell_width().min_element()
}

/// Requests a base-colored ray-cast program for the wireframe.
pub(crate) fn request_wireframe_program(
    ctx: &mut dyn RenderContext,
    program_name: &str,
    material: &str,
) -> Result<Box<dyn ShaderProgram>> {
    let mut rules = vec![rules::SHADE_BASECOLOR.to_string()];
    if ctx.num_active_slice_planes() > 0 {
        rules.push(rules::CULL_POS_FROM_VIEW.to_string());
    }
    let rules = ctx.add_material_rules(material, rules);
    let mut program = ctx.request_shader(program_name, rules, ShaderDefaults::Standard)?;
    ctx.set_material(program.as_mut(), material);
    Ok(program)
}

/// Sets uniforms, material uniforms and back-face culling, then draws.
pub(crate) fn draw_gridcube(
    ctx: &mut dyn RenderContext,
    program: &mut dyn ShaderProgram,
    geometry: &SparseGridGeometry,
    style: &GridcubeStyle<'_>,
) {
    set_gridcube_uniforms(ctx, program, geometry, style);
    ctx.set_material_uniforms(program, style.material);
    ctx.set_backface_cull(true);
    program.draw();
}
