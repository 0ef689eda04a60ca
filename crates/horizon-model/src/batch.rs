use std::sync::Arc;

use horizon_texture::{Texture, TextureHandle, TextureRole};

use crate::{material::Material, vertex::Vertex};

#[derive(Debug, Clone)]
pub struct TextureRef {
    pub identity: String,
    pub role: TextureRole,
    pub handle: TextureHandle,
    pub texture: Option<Arc<Texture>>,
    /// Material of the mesh this texture is bound to.
    pub material: Material,
}

/// Vertex and index streams of a batch, fixed once assembled.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Geometry {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        debug_assert!(indices.iter().all(|index| (*index as usize) < vertices.len()));

        Self { vertices, indices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Empty when triangles are drawn straight from the vertex stream.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }
}

/// Material and textures a batch is drawn with. Every texture carries the binding's material.
#[derive(Debug, Clone, Default)]
pub struct MaterialBinding {
    material: Material,
    textures: Vec<TextureRef>,
}

impl MaterialBinding {
    pub fn new(material: Material, textures: Vec<TextureRef>) -> Self {
        let mut binding = Self {
            material,
            textures: Vec::new(),
        };
        binding.replace_textures(textures);
        binding
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn textures(&self) -> &[TextureRef] {
        &self.textures
    }

    pub fn texture(&self, role: TextureRole) -> Option<&TextureRef> {
        self.textures.iter().find(|texture| texture.role == role)
    }

    /// Swaps the whole texture set, e.g. to switch from brick to wicker at runtime.
    pub fn replace_textures(&mut self, mut textures: Vec<TextureRef>) {
        for texture in &mut textures {
            texture.material = self.material;
        }
        self.textures = textures;
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
        for texture in &mut self.textures {
            texture.material = material;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Indexed { index_count: u32 },
    Arrays { vertex_count: u32 },
}

/// One drawable sub-mesh of a model.
#[derive(Debug, Clone)]
pub struct RenderBatch {
    pub name: String,
    geometry: Geometry,
    binding: MaterialBinding,
}

impl RenderBatch {
    pub fn new(name: String, geometry: Geometry, binding: MaterialBinding) -> Self {
        Self {
            name,
            geometry,
            binding,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn vertices(&self) -> &[Vertex] {
        self.geometry.vertices()
    }

    pub fn indices(&self) -> &[u32] {
        self.geometry.indices()
    }

    pub fn textures(&self) -> &[TextureRef] {
        self.binding.textures()
    }

    pub fn binding(&self) -> &MaterialBinding {
        &self.binding
    }

    /// Only the binding is mutable, geometry stays as assembled.
    pub fn binding_mut(&mut self) -> &mut MaterialBinding {
        &mut self.binding
    }

    pub fn draw_mode(&self) -> DrawMode {
        if self.geometry.is_indexed() {
            DrawMode::Indexed {
                index_count: self.geometry.indices().len() as u32,
            }
        } else {
            DrawMode::Arrays {
                vertex_count: self.geometry.vertices().len() as u32,
            }
        }
    }
}
