use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Phong material as authored, any property the asset leaves out stays `None`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RawMaterial {
    pub ambient: Option<Vec3>,
    pub diffuse: Option<Vec3>,
    pub specular: Option<Vec3>,
    pub shininess: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec3::ONE,
            diffuse: Vec3::splat(0.8),
            specular: Vec3::splat(0.1),
            shininess: 40.0,
        }
    }
}

impl RawMaterial {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fills in every missing property with the [`Material`] default.
    pub fn resolve(&self) -> Material {
        let mut material = Material::default();
        self.apply_to(&mut material);
        material
    }

    /// Overwrites only the properties that are set.
    pub fn apply_to(&self, material: &mut Material) {
        if let Some(ambient) = self.ambient {
            material.ambient = ambient;
        }
        if let Some(diffuse) = self.diffuse {
            material.diffuse = diffuse;
        }
        if let Some(specular) = self.specular {
            material.specular = specular;
        }
        if let Some(shininess) = self.shininess {
            material.shininess = shininess;
        }
    }
}

/// Shader-facing layout of a [`Material`].
#[derive(Debug, Pod, Clone, Copy, Zeroable)]
#[repr(C)]
pub struct MaterialData {
    pub ambient: Vec3,
    pub shininess: f32,
    pub diffuse: Vec3,
    _padding0: u32,
    pub specular: Vec3,
    _padding1: u32,
}

impl From<Material> for MaterialData {
    fn from(material: Material) -> Self {
        Self {
            ambient: material.ambient,
            shininess: material.shininess,
            diffuse: material.diffuse,
            _padding0: 0,
            specular: material.specular,
            _padding1: 0,
        }
    }
}
