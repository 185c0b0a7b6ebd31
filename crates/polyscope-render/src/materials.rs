//! Material definitions and the shader rules they contribute.
//!
//! Blendable materials (clay, wax, candy) tint four matcap channels by the
//! surface color. Static materials (mud, ceramic, jade, normal) use a single
//! matcap. Flat skips lighting entirely.

use std::collections::HashMap;
use std::sync::OnceLock;

/// How a material lights a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    /// Unlit, the shaded color passes straight through.
    Flat,
    /// R/G/B/K matcap channels weighted by the surface color.
    Blendable,
    /// One matcap for every channel.
    Static,
}

/// A named material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    /// Material name.
    pub name: String,
    /// Lighting model.
    pub kind: MaterialKind,
}

impl Material {
    /// Creates a material.
    pub fn new(name: impl Into<String>, kind: MaterialKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Shader rules this material appends to a program.
    pub fn rules(&self) -> &'static [&'static str] {
        match self.kind {
            MaterialKind::Flat => &["LIGHT_PASSTHRU"],
            MaterialKind::Blendable => &["LIGHT_MATCAP", "MATCAP_BLEND_RGBK"],
            MaterialKind::Static => &["LIGHT_MATCAP"],
        }
    }

    /// Texture slots the material binds.
    pub fn texture_names(&self) -> &'static [&'static str] {
        match self.kind {
            MaterialKind::Flat => &[],
            MaterialKind::Blendable => &["t_mat_r", "t_mat_g", "t_mat_b", "t_mat_k"],
            MaterialKind::Static => &["t_mat_k"],
        }
    }
}

/// Built-in material names in display order.
pub const BUILTIN_MATERIALS: &[&str] = &[
    "clay", "wax", "candy", "flat", "mud", "ceramic", "jade", "normal",
];

/// Registry for managing materials.
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    materials: HashMap<String, Material>,
}

impl MaterialRegistry {
    /// Creates a new material registry with the built-in materials.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        for &name in BUILTIN_MATERIALS {
            let kind = match name {
                "flat" => MaterialKind::Flat,
                "clay" | "wax" | "candy" => MaterialKind::Blendable,
                _ => MaterialKind::Static,
            };
            registry.register(Material::new(name, kind));
        }
        registry
    }

    /// Registers a material, replacing one of the same name.
    pub fn register(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    /// Gets a material by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    /// Returns true if a material with the given name is registered.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    /// Built-ins first in display order, then custom materials alphabetically.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = BUILTIN_MATERIALS
            .iter()
            .copied()
            .filter(|n| self.has(n))
            .collect();
        let mut custom: Vec<&str> = self
            .materials
            .keys()
            .map(String::as_str)
            .filter(|n| !BUILTIN_MATERIALS.contains(n))
            .collect();
        custom.sort_unstable();
        names.extend(custom);
        names
    }
}

/// The built-in materials, shared process-wide.
pub fn builtin_materials() -> &'static MaterialRegistry {
    static REGISTRY: OnceLock<MaterialRegistry> = OnceLock::new();
    REGISTRY.get_or_init(MaterialRegistry::new)
}
