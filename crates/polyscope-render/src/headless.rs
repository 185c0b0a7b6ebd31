//! A recording render backend that needs no GPU.
//!
//! [`HeadlessRenderContext`] implements the render capability traits by
//! validating program requests and recording every binding and draw into a
//! shared [`RenderLog`]. It drives integration tests and offline tooling.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::{IVec3, Mat4, Vec3};
use polyscope_core::{
    AttributeData, RenderContext, Result, ShaderDefaults, ShaderProgram, UniformValue,
};

use crate::color_maps::builtin_color_maps;
use crate::error::RenderError;
use crate::gridcube::{GridcubePickUniforms, GridcubeUniforms, RaycastUniforms, GRIDCUBE_STRIP};
use crate::materials::{builtin_materials, MaterialRegistry};
use crate::pick::{index_to_color_vec3, PickRangeAllocator};
use crate::rules;

/// Owned copy of attribute data as the backend received it.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedAttribute {
    Float(Vec<f32>),
    UInt(Vec<u32>),
    Vec3(Vec<Vec3>),
    IVec3(Vec<IVec3>),
}

impl RecordedAttribute {
    fn from_data(data: AttributeData<'_>) -> Self {
        match data {
            AttributeData::Float(d) => Self::Float(d.to_vec()),
            AttributeData::UInt(d) => Self::UInt(d.to_vec()),
            AttributeData::Vec3(d) => Self::Vec3(d.to_vec()),
            AttributeData::IVec3(d) => Self::IVec3(d.to_vec()),
        }
    }

    /// Gathers `data[indices[i]]`, or `None` if an index is out of range.
    fn gather(data: AttributeData<'_>, indices: &[u32]) -> Option<Self> {
        fn pick<T: Copy>(d: &[T], indices: &[u32]) -> Option<Vec<T>> {
            indices.iter().map(|&i| d.get(i as usize).copied()).collect()
        }
        Some(match data {
            AttributeData::Float(d) => Self::Float(pick(d, indices)?),
            AttributeData::UInt(d) => Self::UInt(pick(d, indices)?),
            AttributeData::Vec3(d) => Self::Vec3(pick(d, indices)?),
            AttributeData::IVec3(d) => Self::IVec3(pick(d, indices)?),
        })
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Self::Float(d) => d.len(),
            Self::UInt(d) => d.len(),
            Self::Vec3(d) => d.len(),
            Self::IVec3(d) => d.len(),
        }
    }

    /// Returns true if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The float data, if this is a float attribute.
    pub fn as_floats(&self) -> Option<&[f32]> {
        match self {
            Self::Float(d) => Some(d),
            _ => None,
        }
    }

    /// The vector data, if this is a `Vec3` attribute.
    pub fn as_vec3s(&self) -> Option<&[Vec3]> {
        match self {
            Self::Vec3(d) => Some(d),
            _ => None,
        }
    }

    /// The integer vector data, if this is an `IVec3` attribute.
    pub fn as_ivec3s(&self) -> Option<&[IVec3]> {
        match self {
            Self::IVec3(d) => Some(d),
            _ => None,
        }
    }
}

/// Snapshot of a program's bindings at the moment it was drawn.
#[derive(Debug, Clone)]
pub struct DrawRecord {
    /// Identifier of the program instance.
    pub program_id: usize,
    pub program_name: String,
    pub rules: Vec<String>,
    pub defaults: ShaderDefaults,
    pub attributes: HashMap<String, RecordedAttribute>,
    pub uniforms: HashMap<String, UniformValue>,
    /// Texture slot to color map name.
    pub textures: HashMap<String, String>,
    pub backface_cull: bool,
    /// Vertices emitted per instance (14 for gridcubes, 1 for impostors).
    pub vertices_per_instance: usize,
    /// The uniforms packed into the program's uniform block layout.
    pub uniform_block: Vec<u8>,
}

impl DrawRecord {
    /// Returns whether the program was built with `rule`.
    pub fn has_rule(&self, rule: &str) -> bool {
        self.rules.iter().any(|r| r == rule)
    }

    /// Looks up a float uniform.
    pub fn float_uniform(&self, name: &str) -> Option<f32> {
        match self.uniforms.get(name)? {
            UniformValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Reads the uniform block back as gridcube uniforms.
    pub fn gridcube_uniforms(&self) -> Option<GridcubeUniforms> {
        let is_shaded_gridcube =
            self.program_name == rules::GRIDCUBE && self.defaults == ShaderDefaults::Standard;
        is_shaded_gridcube.then(|| bytemuck::pod_read_unaligned(&self.uniform_block))
    }

    /// Looks up a vector uniform.
    pub fn vec3_uniform(&self, name: &str) -> Option<Vec3> {
        match self.uniforms.get(name)? {
            UniformValue::Vec3(v) => Some(*v),
            _ => None,
        }
    }
}

/// Everything the headless backend has observed.
#[derive(Debug, Default)]
pub struct RenderLog {
    /// Total programs ever compiled.
    pub programs_created: usize,
    /// Programs compiled and not yet dropped.
    pub live_programs: usize,
    /// Draws in submission order.
    pub draws: Vec<DrawRecord>,
    /// `(program name, material)` for every material binding.
    pub material_bindings: Vec<(String, String)>,
}

impl RenderLog {
    /// Forgets recorded draws and bindings, keeping program counters.
    pub fn clear_draws(&mut self) {
        self.draws.clear();
        self.material_bindings.clear();
    }
}

fn lock(log: &Mutex<RenderLog>) -> MutexGuard<'_, RenderLog> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A program compiled by [`HeadlessRenderContext`].
pub struct HeadlessProgram {
    id: usize,
    program_name: String,
    rules: Vec<String>,
    defaults: ShaderDefaults,
    attributes: HashMap<String, RecordedAttribute>,
    uniforms: HashMap<String, UniformValue>,
    textures: HashMap<String, String>,
    backface_cull: Arc<Mutex<bool>>,
    log: Arc<Mutex<RenderLog>>,
}

impl ShaderProgram for HeadlessProgram {
    fn program_name(&self) -> &str {
        &self.program_name
    }

    fn rules(&self) -> &[String] {
        &self.rules
    }

    fn set_attribute(&mut self, name: &str, data: AttributeData<'_>) {
        self.attributes
            .insert(name.to_string(), RecordedAttribute::from_data(data));
    }

    fn set_indexed_attribute(&mut self, name: &str, data: AttributeData<'_>, indices: &[u32]) {
        match RecordedAttribute::gather(data, indices) {
            Some(gathered) => {
                self.attributes.insert(name.to_string(), gathered);
            }
            None => log::warn!(
                "indexed attribute '{name}' of '{}' has out-of-range indices",
                self.program_name
            ),
        }
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.uniforms.insert(name.to_string(), value);
    }

    fn set_texture_from_colormap(&mut self, name: &str, color_map: &str) {
        if !builtin_color_maps().has(color_map) {
            log::warn!("unknown color map '{color_map}' bound to '{name}'");
        }
        self.textures.insert(name.to_string(), color_map.to_string());
    }

    fn draw(&mut self) {
        let backface_cull = *self
            .backface_cull
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let (vertices_per_instance, uniform_block) =
            pack_uniform_block(&self.program_name, self.defaults, &self.uniforms);
        let record = DrawRecord {
            program_id: self.id,
            program_name: self.program_name.clone(),
            rules: self.rules.clone(),
            defaults: self.defaults,
            attributes: self.attributes.clone(),
            uniforms: self.uniforms.clone(),
            textures: self.textures.clone(),
            backface_cull,
            vertices_per_instance,
            uniform_block,
        };
        lock(&self.log).draws.push(record);
    }
}

impl Drop for HeadlessProgram {
    fn drop(&mut self) {
        let mut log = lock(&self.log);
        log.live_programs = log.live_programs.saturating_sub(1);
    }
}

/// Packs named uniforms into the block layout of `program_name`.
///
/// Returns the vertex count per instance along with the bytes. Uniforms that
/// were never set keep the layout's defaults.
fn pack_uniform_block(
    program_name: &str,
    defaults: ShaderDefaults,
    uniforms: &HashMap<String, UniformValue>,
) -> (usize, Vec<u8>) {
    let float = |name: &str| match uniforms.get(name) {
        Some(UniformValue::Float(v)) => Some(*v),
        _ => None,
    };
    let vec3 = |name: &str| match uniforms.get(name) {
        Some(UniformValue::Vec3(v)) => Some(v.to_array()),
        _ => None,
    };
    let model = match uniforms.get("u_model") {
        Some(UniformValue::Mat4(m)) => *m,
        _ => Mat4::IDENTITY,
    }
    .to_cols_array_2d();

    match (program_name, defaults) {
        (rules::GRIDCUBE, ShaderDefaults::Pick) => {
            let mut block = GridcubePickUniforms {
                model,
                ..Default::default()
            };
            block.grid_spacing = vec3("u_gridSpacing").unwrap_or(block.grid_spacing);
            block.cube_size_factor = float("u_cubeSizeFactor").unwrap_or(block.cube_size_factor);
            (GRIDCUBE_STRIP.len(), bytemuck::bytes_of(&block).to_vec())
        }
        (rules::GRIDCUBE, ShaderDefaults::Standard) => {
            let mut block = GridcubeUniforms {
                model,
                ..Default::default()
            };
            block.grid_spacing = vec3("u_gridSpacing").unwrap_or(block.grid_spacing);
            block.cube_size_factor = float("u_cubeSizeFactor").unwrap_or(block.cube_size_factor);
            block.edge_color = vec3("u_edgeColor").unwrap_or(block.edge_color);
            block.edge_width = float("u_edgeWidth").unwrap_or(block.edge_width);
            block.base_color = vec3("u_baseColor").unwrap_or(block.base_color);
            block.range_low = float("u_rangeLow").unwrap_or(block.range_low);
            block.range_high = float("u_rangeHigh").unwrap_or(block.range_high);
            (GRIDCUBE_STRIP.len(), bytemuck::bytes_of(&block).to_vec())
        }
        _ => {
            let mut block = RaycastUniforms {
                model,
                ..Default::default()
            };
            block.base_color = vec3("u_baseColor").unwrap_or(block.base_color);
            block.radius = float("u_pointRadius")
                .or_else(|| float("u_radius"))
                .unwrap_or(block.radius);
            (1, bytemuck::bytes_of(&block).to_vec())
        }
    }
}

/// Render backend that records instead of rasterizing.
pub struct HeadlessRenderContext {
    log: Arc<Mutex<RenderLog>>,
    backface_cull: Arc<Mutex<bool>>,
    pick_ranges: PickRangeAllocator,
    pixel_scaling: f32,
    num_slice_planes: usize,
    materials: &'static MaterialRegistry,
}

impl Default for HeadlessRenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessRenderContext {
    /// Creates a backend with unit pixel scaling and no slice planes.
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(RenderLog::default())),
            backface_cull: Arc::new(Mutex::new(false)),
            pick_ranges: PickRangeAllocator::new(),
            pixel_scaling: 1.0,
            num_slice_planes: 0,
            materials: builtin_materials(),
        }
    }

    /// Sets the framebuffer-to-logical pixel ratio.
    #[must_use]
    pub fn with_pixel_scaling(mut self, pixel_scaling: f32) -> Self {
        self.pixel_scaling = pixel_scaling;
        self
    }

    /// Sets how many slice planes are active.
    pub fn set_num_active_slice_planes(&mut self, n: usize) {
        self.num_slice_planes = n;
    }

    /// Locks and returns the recording.
    pub fn log(&self) -> MutexGuard<'_, RenderLog> {
        lock(&self.log)
    }

    /// Removes and returns the draws recorded so far.
    pub fn take_draws(&self) -> Vec<DrawRecord> {
        let mut log = lock(&self.log);
        log.material_bindings.clear();
        std::mem::take(&mut log.draws)
    }

    /// Resolves a global pick index to `(structure type, structure name, local index)`.
    pub fn resolve_pick(&self, global_index: usize) -> Option<(String, String, usize)> {
        self.pick_ranges
            .lookup(global_index)
            .map(|(t, n, i)| (t.to_string(), n.to_string(), i))
    }

    fn known_rule(&self, rule: &str) -> bool {
        rules::RULES.contains(&rule)
            || self
                .materials
                .names()
                .into_iter()
                .filter_map(|m| self.materials.get(m))
                .any(|m| m.rules().contains(&rule))
    }
}

impl RenderContext for HeadlessRenderContext {
    fn request_shader(
        &mut self,
        program_name: &str,
        rules: Vec<String>,
        defaults: ShaderDefaults,
    ) -> Result<Box<dyn ShaderProgram>> {
        if !rules::PROGRAMS.contains(&program_name) {
            return Err(RenderError::UnknownProgram(program_name.to_string()).into());
        }
        if let Some(bad) = rules.iter().find(|r| !self.known_rule(r)) {
            return Err(RenderError::UnknownRule {
                program: program_name.to_string(),
                rule: bad.clone(),
            }
            .into());
        }

        let id = {
            let mut log = lock(&self.log);
            log.programs_created += 1;
            log.live_programs += 1;
            log.programs_created
        };
        log::debug!("compiled {program_name} #{id} with rules {rules:?}");

        Ok(Box::new(HeadlessProgram {
            id,
            program_name: program_name.to_string(),
            rules,
            defaults,
            attributes: HashMap::new(),
            uniforms: HashMap::new(),
            textures: HashMap::new(),
            backface_cull: Arc::clone(&self.backface_cull),
            log: Arc::clone(&self.log),
        }))
    }

    fn add_material_rules(&self, material: &str, mut rules: Vec<String>) -> Vec<String> {
        let material = self.materials.get(material).or_else(|| {
            log::warn!("unknown material '{material}', using clay");
            self.materials.get("clay")
        });
        if let Some(material) = material {
            rules.extend(material.rules().iter().map(ToString::to_string));
        }
        rules
    }

    fn set_material(&mut self, program: &mut dyn ShaderProgram, material: &str) {
        lock(&self.log)
            .material_bindings
            .push((program.program_name().to_string(), material.to_string()));
    }

    fn set_material_uniforms(&mut self, program: &mut dyn ShaderProgram, material: &str) {
        let is_flat = self
            .materials
            .get(material)
            .is_some_and(|m| m.rules().contains(&"LIGHT_PASSTHRU"));
        program.set_uniform("u_exposure", UniformValue::Float(if is_flat { 1.0 } else { 1.1 }));
    }

    fn set_backface_cull(&mut self, enabled: bool) {
        *self
            .backface_cull
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = enabled;
    }

    fn pixel_scaling(&self) -> f32 {
        self.pixel_scaling
    }

    fn num_active_slice_planes(&self) -> usize {
        self.num_slice_planes
    }

    fn request_pick_buffer_range(
        &mut self,
        structure_type: &str,
        structure_name: &str,
        count: usize,
    ) -> Result<usize> {
        Ok(self
            .pick_ranges
            .allocate(structure_type, structure_name, count)?)
    }

    fn pick_index_to_color(&self, index: usize) -> Vec3 {
        index_to_color_vec3(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pick::MAX_PICK_INDEX;

    #[test]
    fn test_rejects_unknown_program_and_rule() {
        let mut ctx = HeadlessRenderContext::new();
        assert!(ctx
            .request_shader("NOPE", vec![], ShaderDefaults::Standard)
            .is_err());
        assert!(ctx
            .request_shader(rules::GRIDCUBE, vec!["NOPE".into()], ShaderDefaults::Standard)
            .is_err());
        assert_eq!(ctx.log().programs_created, 0);
    }

    #[test]
    fn test_records_draw_and_tracks_live_programs() {
        let mut ctx = HeadlessRenderContext::new();
        let rules = ctx.add_material_rules("wax", vec![rules::SHADE_BASECOLOR.to_string()]);
        let mut program = ctx
            .request_shader(rules::GRIDCUBE, rules, ShaderDefaults::Standard)
            .unwrap();
        program.set_uniform("u_edgeWidth", 2.0_f32.into());
        program.set_attribute("a_cellPosition", AttributeData::Vec3(&[Vec3::ONE]));
        ctx.set_backface_cull(true);
        program.draw();
        assert_eq!(ctx.log().live_programs, 1);

        let draws = ctx.take_draws();
        assert_eq!(draws.len(), 1);
        assert!(draws[0].has_rule("LIGHT_MATCAP"));
        assert!(draws[0].backface_cull);
        assert_eq!(draws[0].float_uniform("u_edgeWidth"), Some(2.0));

        drop(program);
        assert_eq!(ctx.log().live_programs, 0);
    }

    #[test]
    fn test_draw_packs_uniform_block() {
        let mut ctx = HeadlessRenderContext::new();
        let mut cubes = ctx
            .request_shader(rules::GRIDCUBE, vec![], ShaderDefaults::Standard)
            .unwrap();
        cubes.set_uniform("u_gridSpacing", Vec3::new(0.5, 1.0, 2.0).into());
        cubes.set_uniform("u_edgeWidth", 1.5_f32.into());
        cubes.draw();
        let mut pick = ctx
            .request_shader(rules::GRIDCUBE, vec![], ShaderDefaults::Pick)
            .unwrap();
        pick.draw();

        let draws = ctx.take_draws();
        assert_eq!(draws[0].vertices_per_instance, GRIDCUBE_STRIP.len());
        let block = draws[0].gridcube_uniforms().unwrap();
        assert_eq!(block.grid_spacing, [0.5, 1.0, 2.0]);
        assert_eq!(block.edge_width, 1.5);
        assert_eq!(block.range_high, 1.0);

        assert_eq!(draws[1].uniform_block.len(), std::mem::size_of::<GridcubePickUniforms>());
        assert!(draws[1].gridcube_uniforms().is_none());
    }

    #[test]
    fn test_indexed_attribute_gathers() {
        let mut ctx = HeadlessRenderContext::new();
        let mut program = ctx
            .request_shader(rules::GRIDCUBE, vec![], ShaderDefaults::Standard)
            .unwrap();
        program.set_indexed_attribute("a_nodeValue0", AttributeData::Float(&[10.0, 20.0, 30.0]), &[2, 0]);
        program.set_indexed_attribute("a_nodeValue1", AttributeData::Float(&[1.0]), &[5]);
        program.draw();

        let draws = ctx.take_draws();
        let gathered = draws[0].attributes["a_nodeValue0"].as_floats().unwrap();
        assert_eq!(gathered, &[30.0, 10.0]);
        assert!(!draws[0].attributes.contains_key("a_nodeValue1"));
    }

    #[test]
    fn test_pick_ranges_resolve() {
        let mut ctx = HeadlessRenderContext::new();
        let start = ctx.request_pick_buffer_range("Grid", "g", 4).unwrap();
        assert_eq!(ctx.resolve_pick(start + 3), Some(("Grid".into(), "g".into(), 3)));
        assert_eq!(ctx.resolve_pick(start + 4), None);

        assert!(ctx
            .request_pick_buffer_range("Grid", "huge", MAX_PICK_INDEX + 1)
            .is_err());
        assert_eq!(ctx.request_pick_buffer_range("Grid", "g", 4).unwrap(), start);
    }
}
