use anyhow::{Context, Result};
use glam::{Vec2, Vec3};

use crate::{
    material::RawMaterial,
    source::{SourceMaterial, SourceMesh, SourceNode, SourceScene, TextureReference, TextureSlot},
};

pub fn load(path: &str) -> Result<SourceScene> {
    horizon_profiling::profile_function!();

    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: false,
            ..Default::default()
        },
    )
    .with_context(|| format!("Failed to parse {}", path))?;

    let materials = match materials {
        Ok(materials) => materials.iter().map(process_material).collect(),
        Err(err) => {
            log::warn!("Failed to load materials of {}: {}", path, err);
            vec![]
        }
    };

    // Every object or group becomes a child of the root, owning at most one mesh
    let mut root = SourceNode {
        name: "Root".to_owned(),
        ..Default::default()
    };
    let mut meshes = Vec::with_capacity(models.len());
    for model in &models {
        log::debug!("Loading object {}", model.name);

        let mut node = SourceNode {
            name: model.name.clone(),
            ..Default::default()
        };
        let mut mesh = process_mesh(model);
        if mesh.sanitize() {
            node.meshes.push(meshes.len());
            meshes.push(mesh);
        } else {
            log::warn!("Skipping object {}, its indices are out of range.", model.name);
        }
        root.children.push(node);
    }

    Ok(SourceScene {
        root,
        meshes,
        materials,
    })
}

fn process_mesh(model: &tobj::Model) -> SourceMesh {
    let mesh = &model.mesh;

    let faces = if mesh.face_arities.is_empty() {
        mesh.indices.chunks_exact(3).map(|face| face.to_vec()).collect()
    } else {
        let mut faces = Vec::with_capacity(mesh.face_arities.len());
        let mut start = 0;
        for arity in &mesh.face_arities {
            let end = start + *arity as usize;
            faces.push(mesh.indices[start..end].to_vec());
            start = end;
        }
        faces
    };

    SourceMesh {
        name: model.name.clone(),
        positions: mesh
            .positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .collect(),
        normals: mesh
            .normals
            .chunks_exact(3)
            .map(|n| Vec3::new(n[0], n[1], n[2]))
            .collect(),
        tex_coords: mesh
            .texcoords
            .chunks_exact(2)
            .map(|t| Vec2::new(t[0], t[1]))
            .collect(),
        tangents: vec![],
        bitangents: vec![],
        faces,
        material: mesh.material_id,
    }
}

fn process_material(material: &tobj::Material) -> SourceMaterial {
    let mut source_material = SourceMaterial {
        name: material.name.clone(),
        raw: RawMaterial {
            ambient: material.ambient.map(Vec3::from),
            diffuse: material.diffuse.map(Vec3::from),
            specular: material.specular.map(Vec3::from),
            shininess: material.shininess,
        },
        ..Default::default()
    };

    let mut add_texture = |slot: TextureSlot, texture: Option<&String>| {
        if let Some(texture) = texture {
            source_material.add_texture(slot, TextureReference::Path(texture.clone()));
        }
    };

    add_texture(TextureSlot::Diffuse, material.diffuse_texture.as_ref());
    add_texture(TextureSlot::Specular, material.specular_texture.as_ref());
    add_texture(TextureSlot::Normals, material.unknown_param.get("norm"));
    // `map_Bump` is a height map by definition, even though exporters mostly store normal maps in it
    add_texture(
        TextureSlot::Height,
        material
            .normal_texture
            .as_ref()
            .or_else(|| material.unknown_param.get("bump")),
    );

    source_material
}
