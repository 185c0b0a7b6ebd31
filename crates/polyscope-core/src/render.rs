//! Capability boundary between structures and the render backend.
//!
//! Structures never talk to a graphics API directly. They request programs
//! built from named shader rules, bind attributes and uniforms by name, and
//! issue draws. The backend (wgpu, a headless recorder, ...) implements
//! [`RenderContext`] and [`ShaderProgram`].

use glam::{IVec3, Mat4, Vec3};

use crate::error::Result;

/// Which default replacement set a program is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShaderDefaults {
    /// Regular shaded output.
    #[default]
    Standard,
    /// Flat pick-color output for the pick buffer.
    Pick,
}

/// Per-element attribute data. The backend copies it into its own buffers.
#[derive(Debug, Clone, Copy)]
pub enum AttributeData<'a> {
    Float(&'a [f32]),
    UInt(&'a [u32]),
    Vec3(&'a [Vec3]),
    IVec3(&'a [IVec3]),
}

impl AttributeData<'_> {
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
}

/// A uniform value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    UInt(u32),
    Vec3(Vec3),
    Mat4(Mat4),
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<u32> for UniformValue {
    fn from(v: u32) -> Self {
        Self::UInt(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        Self::Mat4(v)
    }
}

/// A compiled program owned by the structure or quantity that requested it.
///
/// Dropping the program releases its backend resources.
pub trait ShaderProgram: Send + Sync {
    /// Name of the base program (e.g. `GRIDCUBE`).
    fn program_name(&self) -> &str;

    /// The rules the program was composed from.
    fn rules(&self) -> &[String];

    /// Binds a per-element attribute.
    fn set_attribute(&mut self, name: &str, data: AttributeData<'_>);

    /// Binds an attribute whose element `i` is `data[indices[i]]`.
    ///
    /// The gather happens on the backend side; the caller never expands the data.
    fn set_indexed_attribute(&mut self, name: &str, data: AttributeData<'_>, indices: &[u32]);

    /// Sets a uniform value.
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    /// Binds a color map as a 1D texture.
    fn set_texture_from_colormap(&mut self, name: &str, color_map: &str);

    /// Issues the draw call.
    fn draw(&mut self);
}

/// The render capabilities consumed by structures.
pub trait RenderContext: Send {
    /// Compiles a program from a base program name and a list of rules.
    fn request_shader(
        &mut self,
        program_name: &str,
        rules: Vec<String>,
        defaults: ShaderDefaults,
    ) -> Result<Box<dyn ShaderProgram>>;

    /// Appends the rules a material needs.
    fn add_material_rules(&self, material: &str, rules: Vec<String>) -> Vec<String>;

    /// Binds the material textures of `material` to the program.
    fn set_material(&mut self, program: &mut dyn ShaderProgram, material: &str);

    /// Sets the per-frame material uniforms.
    fn set_material_uniforms(&mut self, program: &mut dyn ShaderProgram, material: &str);

    /// Enables or disables backface culling for subsequent draws.
    fn set_backface_cull(&mut self, enabled: bool);

    /// Ratio between framebuffer pixels and logical pixels.
    fn pixel_scaling(&self) -> f32;

    /// Number of slice planes currently cutting the scene.
    fn num_active_slice_planes(&self) -> usize;

    /// Reserves `count` consecutive pick indices for a structure and returns the first.
    ///
    /// Requesting again for the same structure releases its previous range.
    /// Fails when the pick index space cannot hold `count` more indices.
    fn request_pick_buffer_range(
        &mut self,
        structure_type: &str,
        structure_name: &str,
        count: usize,
    ) -> Result<usize>;

    /// Encodes a global pick index as a color.
    fn pick_index_to_color(&self, index: usize) -> Vec3;
}
