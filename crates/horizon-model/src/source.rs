//! Format independent description of an imported asset, as handed over by the format loaders.

use std::{collections::HashMap, sync::Arc};

use glam::{Vec2, Vec3};
use horizon_transform::Transform;

use crate::material::RawMaterial;

/// Texture slots as authored. Normal maps may be authored as height (bump) maps instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Diffuse,
    Specular,
    Normals,
    Height,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextureReference {
    /// Path as written in the asset, relative to the asset's directory unless absolute.
    Path(String),
    /// Encoded image stored inside the asset container.
    Embedded { identity: String, data: Arc<[u8]> },
}

#[derive(Debug, Clone, Default)]
pub struct SourceMaterial {
    pub name: String,
    pub raw: RawMaterial,
    pub textures: HashMap<TextureSlot, Vec<TextureReference>>,
}

impl SourceMaterial {
    pub fn textures(&self, slot: TextureSlot) -> &[TextureReference] {
        self.textures.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn add_texture(&mut self, slot: TextureSlot, texture: TextureReference) {
        self.textures.entry(slot).or_default().push(texture);
    }
}

/// Vertex attribute streams are either empty (absent) or as long as `positions`, see [`SourceMesh::sanitize`].
#[derive(Debug, Clone, Default)]
pub struct SourceMesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub tangents: Vec<Vec3>,
    pub bitangents: Vec<Vec3>,
    /// Empty when the vertex stream itself is a triangle list.
    pub faces: Vec<Vec<u32>>,
    pub material: Option<usize>,
}

impl SourceMesh {
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn has_tex_coords(&self) -> bool {
        !self.tex_coords.is_empty()
    }

    pub fn has_tangents(&self) -> bool {
        !self.tangents.is_empty() && !self.bitangents.is_empty()
    }

    pub fn is_indexed(&self) -> bool {
        !self.faces.is_empty()
    }

    pub fn num_triangles(&self) -> usize {
        if self.is_indexed() {
            self.faces.len()
        } else {
            self.positions.len() / 3
        }
    }

    /// Vertex index of corner `vert` of triangle `face`, for indexed and non-indexed meshes alike.
    pub fn triangle_vertex(&self, face: usize, vert: usize) -> usize {
        if self.is_indexed() {
            self.faces[face][vert] as usize
        } else {
            face * 3 + vert
        }
    }

    pub fn is_triangulated(&self) -> bool {
        self.faces.iter().all(|face| face.len() == 3)
    }

    /// Clears attribute streams whose length differs from the position count.
    ///
    /// Returns `false` when a face indexes past the vertex stream, such a mesh cannot be assembled.
    pub fn sanitize(&mut self) -> bool {
        let vertex_count = self.positions.len();

        drop_mismatched(&self.name, "normals", &mut self.normals, vertex_count);
        drop_mismatched(&self.name, "texture coordinates", &mut self.tex_coords, vertex_count);
        if self.tangents.len() != self.bitangents.len() {
            self.tangents.clear();
            self.bitangents.clear();
        }
        drop_mismatched(&self.name, "tangents", &mut self.tangents, vertex_count);
        drop_mismatched(&self.name, "bitangents", &mut self.bitangents, vertex_count);

        if let Some(index) = self
            .faces
            .iter()
            .flatten()
            .find(|index| **index as usize >= vertex_count)
        {
            log::warn!(
                "{} references vertex {} but only has {} vertices.",
                self.name,
                index,
                vertex_count
            );
            return false;
        }

        true
    }
}

fn drop_mismatched<T>(mesh: &str, attribute: &str, stream: &mut Vec<T>, vertex_count: usize) {
    if !stream.is_empty() && stream.len() != vertex_count {
        log::warn!(
            "Ignoring {} of {}, got {} for {} vertices.",
            attribute,
            mesh,
            stream.len(),
            vertex_count
        );
        stream.clear();
    }
}

#[derive(Debug, Clone, Default)]
pub struct SourceNode {
    pub name: String,
    pub transform: Transform,
    pub meshes: Vec<usize>,
    pub children: Vec<SourceNode>,
}

#[derive(Debug, Clone, Default)]
pub struct SourceScene {
    pub root: SourceNode,
    pub meshes: Vec<SourceMesh>,
    pub materials: Vec<SourceMaterial>,
}
