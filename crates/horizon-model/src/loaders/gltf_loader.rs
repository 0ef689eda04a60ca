use std::{borrow::Cow, path::Path, sync::Arc};

use anyhow::{anyhow, Context, Result};
use base64::Engine;
use glam::{Quat, Vec2, Vec3, Vec4, Vec4Swizzles};
use horizon_transform::Transform;

use crate::{
    material::RawMaterial,
    source::{
        SourceMaterial, SourceMesh, SourceNode, SourceScene, TextureReference, TextureSlot,
    },
};

pub fn load(path: &str) -> Result<SourceScene> {
    horizon_profiling::profile_function!();

    let gltf::Gltf { document, blob } =
        gltf::Gltf::open(path).with_context(|| format!("Failed to parse {}", path))?;
    let buffers = gltf::import_buffers(&document, Path::new(path).parent(), blob)
        .with_context(|| format!("Failed to load buffers of {}", path))?;

    let materials = document
        .materials()
        .map(|material| process_material(path, &material, &buffers))
        .collect();

    // glTF meshes consist of primitives, each one becomes a separate source mesh
    let mut meshes = Vec::new();
    let mut mesh_primitives = Vec::with_capacity(document.meshes().len());
    for mesh in document.meshes() {
        let mut primitive_indices = Vec::new();
        for primitive in mesh.primitives() {
            if let Some(source_mesh) = process_primitive(&mesh, &primitive, &buffers) {
                primitive_indices.push(meshes.len());
                meshes.push(source_mesh);
            }
        }
        mesh_primitives.push(primitive_indices);
    }

    let mut root = SourceNode {
        name: "Root".to_owned(),
        ..Default::default()
    };
    if let Some(scene) = document.default_scene().or_else(|| document.scenes().next()) {
        root.children = scene
            .nodes()
            .map(|node| process_node_recursive(&node, &mesh_primitives))
            .collect();
    }

    Ok(SourceScene {
        root,
        meshes,
        materials,
    })
}

fn process_node_recursive(node: &gltf::Node, mesh_primitives: &[Vec<usize>]) -> SourceNode {
    let (translation, rotation, scale) = node.transform().decomposed();
    let transform = Transform::new(
        Vec3::from(translation),
        Quat::from_array(rotation),
        Vec3::from(scale),
    );

    SourceNode {
        name: node.name().unwrap_or("Unnamed").to_owned(),
        transform,
        meshes: node
            .mesh()
            .and_then(|mesh| mesh_primitives.get(mesh.index()).cloned())
            .unwrap_or_default(),
        children: node
            .children()
            .map(|child| process_node_recursive(&child, mesh_primitives))
            .collect(),
    }
}

fn process_primitive(
    mesh: &gltf::Mesh,
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
) -> Option<SourceMesh> {
    let name = format!(
        "{}[{}]",
        mesh.name().unwrap_or("Unnamed"),
        primitive.index()
    );

    if primitive.mode() != gltf::mesh::Mode::Triangles {
        log::warn!("Skipping {}, only triangle primitives are supported.", name);
        return None;
    }

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));

    let Some(positions) = reader.read_positions() else {
        log::warn!("Skipping {}, vertices must have positions.", name);
        return None;
    };
    let positions: Vec<Vec3> = positions.map(Vec3::from).collect();

    let normals: Vec<Vec3> = reader
        .read_normals()
        .map(|normals| normals.map(Vec3::from).collect())
        .unwrap_or_default();

    let tex_coords: Vec<Vec2> = reader
        .read_tex_coords(0)
        .map(|tex_coords| tex_coords.into_f32().map(Vec2::from).collect())
        .unwrap_or_default();

    let (tangents, bitangents) = match reader.read_tangents() {
        Some(tangents) if !normals.is_empty() => tangents
            .map(Vec4::from)
            .zip(&normals)
            .map(|(tangent, normal)| (tangent.xyz(), normal.cross(tangent.xyz()) * tangent.w))
            .unzip(),
        _ => (vec![], vec![]),
    };

    let faces = reader
        .read_indices()
        .map(|indices| {
            indices
                .into_u32()
                .collect::<Vec<_>>()
                .chunks_exact(3)
                .map(|triangle| triangle.to_vec())
                .collect()
        })
        .unwrap_or_default();

    let mut source_mesh = SourceMesh {
        name,
        positions,
        normals,
        tex_coords,
        tangents,
        bitangents,
        faces,
        material: primitive.material().index(),
    };
    if !source_mesh.sanitize() {
        log::warn!("Skipping {}, its indices are out of range.", source_mesh.name);
        return None;
    }

    Some(source_mesh)
}

fn process_material(
    path: &str,
    material: &gltf::Material,
    buffers: &[gltf::buffer::Data],
) -> SourceMaterial {
    let pbr = material.pbr_metallic_roughness();
    let specular = material.specular();

    let mut source_material = SourceMaterial {
        name: material.name().unwrap_or("Unnamed").to_owned(),
        raw: RawMaterial {
            diffuse: Some(Vec4::from(pbr.base_color_factor()).xyz()),
            specular: specular
                .as_ref()
                .map(|specular| Vec3::from(specular.specular_color_factor())),
            ..Default::default()
        },
        ..Default::default()
    };

    let mut add_texture = |slot: TextureSlot, texture: gltf::Texture| {
        if let Some(reference) = process_tex(path, &texture, buffers) {
            source_material.add_texture(slot, reference);
        }
    };

    if let Some(info) = pbr.base_color_texture() {
        add_texture(TextureSlot::Diffuse, info.texture());
    }
    if let Some(info) = specular.and_then(|specular| specular.specular_color_texture()) {
        add_texture(TextureSlot::Specular, info.texture());
    }
    if let Some(normal) = material.normal_texture() {
        add_texture(TextureSlot::Normals, normal.texture());
    }

    source_material
}

fn process_tex(
    path: &str,
    texture: &gltf::Texture,
    buffers: &[gltf::buffer::Data],
) -> Option<TextureReference> {
    let image = texture.source();

    match image.source() {
        gltf::image::Source::Uri { uri, .. } => {
            if uri.starts_with("data:") {
                match decode_data_uri(uri) {
                    Ok(data) => Some(TextureReference::Embedded {
                        identity: format!("{}#image{}", path, image.index()),
                        data: Arc::from(data),
                    }),
                    Err(err) => {
                        log::warn!("Ignoring image {} in {}: {:#}", image.index(), path, err);
                        None
                    }
                }
            } else {
                let reference = urlencoding::decode(uri).map(Cow::into_owned).unwrap_or_else(|err| {
                    log::warn!("Keeping undecodable uri {} in {}: {}", uri, path, err);
                    uri.to_owned()
                });
                Some(TextureReference::Path(reference))
            }
        }
        gltf::image::Source::View { view, .. } => {
            let start = view.offset();
            let end = start + view.length();
            let data = buffers
                .get(view.buffer().index())
                .and_then(|buffer| buffer.0.get(start..end));

            match data {
                Some(data) => Some(TextureReference::Embedded {
                    identity: format!("{}#image{}", path, image.index()),
                    data: Arc::from(data),
                }),
                None => {
                    log::warn!("Image {} in {} points outside of its buffer.", image.index(), path);
                    None
                }
            }
        }
    }
}

/// Payload of a base64 `data:` uri, the media type is left for the image decoder to sniff.
fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let (_, payload) = uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .ok_or_else(|| anyhow!("Only base64 data uris are supported"))?;

    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .context("Invalid base64 payload")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0] } ],
        "nodes": [
            { "name": "parent", "translation": [0.0, 5.0, 0.0], "children": [1] },
            { "name": "child", "translation": [1.0, 0.0, 0.0], "mesh": 0 }
        ],
        "meshes": [
            { "name": "triangle", "primitives": [ { "attributes": { "POSITION": 0 }, "indices": 1, "material": 0 } ] }
        ],
        "materials": [
            { "name": "red", "pbrMetallicRoughness": { "baseColorFactor": [1.0, 0.0, 0.0, 1.0], "baseColorTexture": { "index": 0 } } }
        ],
        "textures": [ { "source": 0 } ],
        "images": [ { "uri": "albedo.png" } ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3", "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }
        ],
        "buffers": [ { "uri": "triangle.bin", "byteLength": 42 } ]
    }"#;

    fn write_gltf(directory: &Path, indices: [u16; 3], image_uri: &str) -> String {
        let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];

        let mut data = bytemuck::cast_slice::<f32, u8>(&positions).to_vec();
        data.extend_from_slice(bytemuck::cast_slice::<u16, u8>(&indices));
        fs::write(directory.join("triangle.bin"), data).unwrap();

        let path = directory.join("triangle.gltf");
        fs::write(&path, TRIANGLE_GLTF.replace("albedo.png", image_uri)).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn write_triangle(directory: &Path) -> String {
        write_gltf(directory, [0, 1, 2], "albedo.png")
    }

    fn encode_png() -> Vec<u8> {
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image::RgbaImage::new(2, 4))
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn loads_hierarchy_geometry_and_materials() {
        let directory = tempfile::tempdir().unwrap();
        let scene = load(&write_triangle(directory.path())).unwrap();

        assert_eq!(scene.root.children.len(), 1);
        let parent = &scene.root.children[0];
        assert_eq!(parent.name, "parent");
        assert_eq!(parent.transform.get_translation(), Vec3::new(0.0, 5.0, 0.0));
        assert!(parent.meshes.is_empty());

        let child = &parent.children[0];
        assert_eq!(child.name, "child");
        assert_eq!(child.meshes, vec![0]);

        let mesh = &scene.meshes[0];
        assert_eq!(mesh.positions.len(), 3);
        assert_eq!(mesh.faces, vec![vec![0, 1, 2]]);
        assert!(!mesh.has_normals());
        assert_eq!(mesh.material, Some(0));

        let material = &scene.materials[0];
        assert_eq!(material.name, "red");
        assert_eq!(material.raw.diffuse, Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(material.raw.shininess, None);
        assert_eq!(
            material.textures(TextureSlot::Diffuse),
            &[TextureReference::Path("albedo.png".to_owned())]
        );
    }

    #[test]
    fn out_of_range_indices_skip_the_primitive() {
        let directory = tempfile::tempdir().unwrap();
        let path = write_gltf(directory.path(), [0, 1, 7], "albedo.png");

        let scene = load(&path).unwrap();
        assert!(scene.meshes.is_empty());
        assert!(scene.root.children[0].children[0].meshes.is_empty());

        let model = crate::ImportSession::new().import_model(&path, Vec3::ZERO);
        assert!(model.batches.is_empty());
        assert_eq!(model.nodes.len(), 3);
    }

    #[test]
    fn data_uri_images_are_embedded() {
        let png = encode_png();
        let uri = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&png)
        );
        let directory = tempfile::tempdir().unwrap();
        let path = write_gltf(directory.path(), [0, 1, 2], &uri);

        let scene = load(&path).unwrap();
        match &scene.materials[0].textures(TextureSlot::Diffuse)[0] {
            TextureReference::Embedded { identity, data } => {
                assert_eq!(identity, &format!("{}#image0", path));
                assert_eq!(&data[..], &png[..]);
            }
            reference => panic!("expected an embedded image, got {:?}", reference),
        }

        let mut session = crate::ImportSession::new();
        let model = session.import_model(&path, Vec3::ZERO);
        let texture = model.batches[0].textures()[0].texture.as_ref().unwrap();
        assert_eq!((texture.width(), texture.height()), (2, 4));
        assert!(session.textures.contains(&format!("{}#image0", path)));
    }

    #[test]
    fn malformed_data_uris_are_ignored() {
        let directory = tempfile::tempdir().unwrap();
        let path = write_gltf(directory.path(), [0, 1, 2], "data:image/png;base64,!!!");

        let scene = load(&path).unwrap();
        assert!(scene.materials[0].textures(TextureSlot::Diffuse).is_empty());
        assert!(decode_data_uri("data:text/plain,hello").is_err());
    }

    #[test]
    fn uris_are_percent_decoded() {
        let directory = tempfile::tempdir().unwrap();
        let path = write_gltf(directory.path(), [0, 1, 2], "textures/my%20tex.png");

        let scene = load(&path).unwrap();
        assert_eq!(
            scene.materials[0].textures(TextureSlot::Diffuse),
            &[TextureReference::Path("textures/my tex.png".to_owned())]
        );
    }

    #[test]
    fn broken_files_are_errors() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("broken.gltf");
        fs::write(&path, "{ not json").unwrap();

        assert!(load(&path.to_string_lossy()).is_err());
    }
}
