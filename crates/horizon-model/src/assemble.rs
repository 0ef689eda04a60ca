use glam::{Vec2, Vec3};
use horizon_texture::{path, ImageDecoder, TextureCache, TextureRole};

use crate::{
    batch::{Geometry, MaterialBinding, RenderBatch, TextureRef},
    material::{Material, RawMaterial},
    source::{SourceMaterial, SourceMesh, TextureReference, TextureSlot},
    vertex::Vertex,
};

/// Converts one source mesh into a render batch, materializing its textures through `textures`.
pub fn assemble_mesh<D: ImageDecoder>(
    textures: &mut TextureCache<D>,
    materials: &[SourceMaterial],
    mesh: &SourceMesh,
    directory: &str,
) -> RenderBatch {
    horizon_profiling::profile_function!();

    let vertices = mesh
        .positions
        .iter()
        .enumerate()
        .map(|(i, position)| Vertex {
            position: *position,
            normal: mesh.normals.get(i).copied().unwrap_or(Vec3::ZERO),
            tex_coord: mesh
                .tex_coords
                .get(i)
                .map_or(Vec2::ZERO, |tex_coord| Vec2::new(tex_coord.x, -tex_coord.y)),
            tangent: mesh.tangents.get(i).copied().unwrap_or(Vec3::ZERO),
            bitangent: mesh.bitangents.get(i).copied().unwrap_or(Vec3::ZERO),
        })
        .collect::<Vec<_>>();

    let indices = mesh.faces.iter().flatten().copied().collect::<Vec<_>>();

    let source_material = mesh.material.and_then(|index| materials.get(index));
    let material = match source_material {
        Some(source_material) => source_material.raw.resolve(),
        None => {
            log::debug!("No material info for {}, using defaults.", mesh.name);
            RawMaterial::default().resolve()
        }
    };

    let texture_refs = source_material
        .map(|source_material| load_material_textures(textures, source_material, material, directory))
        .unwrap_or_default();

    log::debug!(
        "Assembled {}: {} vertices, {} indices, {} textures.",
        mesh.name,
        vertices.len(),
        indices.len(),
        texture_refs.len()
    );

    RenderBatch::new(
        mesh.name.clone(),
        Geometry::new(vertices, indices),
        MaterialBinding::new(material, texture_refs),
    )
}

fn load_material_textures<D: ImageDecoder>(
    textures: &mut TextureCache<D>,
    source_material: &SourceMaterial,
    material: Material,
    directory: &str,
) -> Vec<TextureRef> {
    let mut texture_refs = Vec::new();

    for role in TextureRole::ALL {
        let references = match role {
            TextureRole::Diffuse => source_material.textures(TextureSlot::Diffuse),
            TextureRole::Specular => source_material.textures(TextureSlot::Specular),
            TextureRole::Normal => {
                let normals = source_material.textures(TextureSlot::Normals);
                if normals.is_empty() {
                    source_material.textures(TextureSlot::Height)
                } else {
                    normals
                }
            }
        };

        for reference in references {
            let (identity, handle) = match reference {
                TextureReference::Path(reference) => (
                    path::resolve_identity(reference, directory),
                    textures.acquire(reference, directory, role),
                ),
                TextureReference::Embedded { identity, data } => (
                    identity.clone(),
                    textures.acquire_embedded(identity, data, role),
                ),
            };

            if handle.is_none() {
                continue;
            }

            texture_refs.push(TextureRef {
                identity,
                role,
                handle,
                texture: textures.texture(handle),
                material,
            });
        }
    }

    texture_refs
}
