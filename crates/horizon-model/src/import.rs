use glam::Vec3;
use horizon_texture::{path, ImageDecoder, ImageFileDecoder, TextureCache};
use horizon_transform::Transform;

use crate::{
    assemble::assemble_mesh,
    loaders, postprocess,
    source::{SourceMesh, SourceNode, SourceScene},
    ImportFlags, Model, ModelNode,
};

/// State shared by all imports of one session, most notably the texture cache.
pub struct ImportSession<D: ImageDecoder = ImageFileDecoder> {
    pub textures: TextureCache<D>,
    pub flags: ImportFlags,
}

impl Default for ImportSession<ImageFileDecoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportSession<ImageFileDecoder> {
    pub fn new() -> Self {
        Self::with_decoder(ImageFileDecoder)
    }
}

impl<D: ImageDecoder> ImportSession<D> {
    pub fn with_decoder(decoder: D) -> Self {
        Self {
            textures: TextureCache::with_decoder(decoder),
            flags: ImportFlags::default(),
        }
    }

    pub fn with_flags(mut self, flags: ImportFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Imports the asset at `path` placed at `position`.
    ///
    /// Never fails, an asset that cannot be read is logged and results in a model without batches.
    pub fn import_model(&mut self, path: &str, position: Vec3) -> Model {
        horizon_profiling::profile_function!();

        match loaders::load_source_scene(path) {
            Ok(scene) => self.assemble_scene(scene, path, position),
            Err(err) => {
                log::error!("Failed to import {}: {:#}", path, err);
                Model::empty(path, position)
            }
        }
    }

    /// Post-processes an already loaded scene and assembles it into a model, `path` locates its textures.
    pub fn assemble_scene(&mut self, mut scene: SourceScene, path: &str, position: Vec3) -> Model {
        horizon_profiling::profile_function!();

        for mesh in &mut scene.meshes {
            if !mesh.sanitize() {
                log::warn!("Dropping the geometry of {}.", mesh.name);
                *mesh = SourceMesh {
                    name: std::mem::take(&mut mesh.name),
                    ..Default::default()
                };
            }
        }
        postprocess::apply(&mut scene, self.flags);

        let directory = path::directory_of(path);
        let mut model = Model::empty(path, position);
        let root = self.process_nodes_recursive(&scene, &scene.root, directory, &mut model);
        model.root_nodes.push(root);

        log::info!(
            "Imported {}: {} nodes, {} batches, {} cached textures.",
            path,
            model.nodes.len(),
            model.batches.len(),
            self.textures.len()
        );

        model
    }

    fn process_nodes_recursive(
        &mut self,
        scene: &SourceScene,
        node: &SourceNode,
        directory: &str,
        model: &mut Model,
    ) -> u32 {
        let node_index = model.nodes.len() as u32;
        let transform = if self.flags.contains(ImportFlags::FLATTEN_HIERARCHY) {
            Transform::IDENTITY
        } else {
            node.transform
        };
        model.nodes.push(ModelNode {
            name: node.name.clone(),
            transform,
            children: Vec::with_capacity(node.children.len()),
            batches: Vec::with_capacity(node.meshes.len()),
        });

        for mesh_index in &node.meshes {
            let Some(mesh) = scene.meshes.get(*mesh_index) else {
                log::warn!("Node {} references missing mesh {}.", node.name, mesh_index);
                continue;
            };

            let batch = assemble_mesh(&mut self.textures, &scene.materials, mesh, directory);
            model.nodes[node_index as usize]
                .batches
                .push(model.batches.len() as u32);
            model.batches.push(batch);
        }

        for child in &node.children {
            let child_index = self.process_nodes_recursive(scene, child, directory, model);
            model.nodes[node_index as usize].children.push(child_index);
        }

        node_index
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, fs, path::Path};

    use anyhow::{anyhow, Result};
    use glam::Vec2;
    use horizon_texture::{Texture, TextureCreateDesc, TextureFormat, TextureRole};

    use super::*;
    use crate::source::{SourceMaterial, SourceMesh, TextureReference, TextureSlot};

    #[derive(Default)]
    struct CountingDecoder {
        decoded: Vec<String>,
        broken: HashSet<String>,
    }

    impl ImageDecoder for CountingDecoder {
        fn decode_bytes(&mut self, name: &str, _data: &[u8]) -> Result<Texture> {
            self.decoded.push(name.to_owned());
            if self.broken.contains(name) {
                return Err(anyhow!("corrupt"));
            }

            Ok(Texture::new(TextureCreateDesc {
                name: Some(name.to_owned()),
                width: 2,
                height: 2,
                format: TextureFormat::R8Unorm,
                data: vec![0; 4].into_boxed_slice(),
            }))
        }

        fn decode_file(&mut self, path: &Path) -> Result<Texture> {
            self.decode_bytes(&path.to_string_lossy(), &[])
        }
    }

    fn triangle(name: &str, material: usize) -> SourceMesh {
        SourceMesh {
            name: name.to_owned(),
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            tex_coords: vec![Vec2::ZERO, Vec2::X, Vec2::Y],
            faces: vec![vec![0, 1, 2]],
            material: Some(material),
            ..Default::default()
        }
    }

    fn shared_texture_scene() -> SourceScene {
        let mut material = SourceMaterial {
            name: "shared".to_owned(),
            ..Default::default()
        };
        material.add_texture(
            TextureSlot::Diffuse,
            TextureReference::Path("textures\\albedo.png".to_owned()),
        );

        SourceScene {
            root: SourceNode {
                name: "Root".to_owned(),
                meshes: vec![0],
                children: vec![
                    SourceNode {
                        name: "a".to_owned(),
                        transform: Transform::from_translation(Vec3::X),
                        meshes: vec![1],
                        children: vec![SourceNode {
                            name: "a.child".to_owned(),
                            meshes: vec![2],
                            ..Default::default()
                        }],
                    },
                    SourceNode {
                        name: "b".to_owned(),
                        meshes: vec![3, 7],
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
            meshes: vec![
                triangle("root", 0),
                triangle("a", 0),
                triangle("a.child", 0),
                triangle("b", 0),
            ],
            materials: vec![material],
        }
    }

    #[test]
    fn shared_textures_are_decoded_once() {
        let mut session = ImportSession::with_decoder(CountingDecoder::default());
        let model = session.assemble_scene(shared_texture_scene(), "assets/scene.obj", Vec3::ZERO);

        assert_eq!(session.textures.len(), 1);
        assert_eq!(session.textures.decoder().decoded, vec!["assets/textures/albedo.png".to_owned()]);

        let handle = model.batches[0].textures()[0].handle;
        assert!(!handle.is_none());
        for batch in &model.batches {
            assert_eq!(batch.textures().len(), 1);
            assert_eq!(batch.textures()[0].handle, handle);
            assert_eq!(batch.textures()[0].role, TextureRole::Diffuse);
        }
    }

    #[test]
    fn batches_follow_depth_first_node_order() {
        let mut session = ImportSession::with_decoder(CountingDecoder::default());
        let model = session.assemble_scene(shared_texture_scene(), "scene.obj", Vec3::ZERO);

        let names = model.batches.iter().map(|batch| batch.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["root", "a", "a.child", "b"]);

        assert_eq!(model.root_nodes, vec![0]);
        assert_eq!(model.nodes[0].children, vec![1, 3]);
        assert_eq!(model.nodes[1].children, vec![2]);
        assert_eq!(model.nodes[3].batches, vec![3]);
    }

    #[test]
    fn node_transforms_are_kept_unless_flattened() {
        let mut session = ImportSession::with_decoder(CountingDecoder::default());
        let model = session.assemble_scene(shared_texture_scene(), "scene.obj", Vec3::ZERO);
        let items = model.draw_items();
        assert_eq!(items[2].world.w_axis.truncate(), Vec3::X);

        let mut session = ImportSession::with_decoder(CountingDecoder::default())
            .with_flags(ImportFlags::default() | ImportFlags::FLATTEN_HIERARCHY);
        let model = session.assemble_scene(shared_texture_scene(), "scene.obj", Vec3::ZERO);
        let items = model.draw_items();
        assert_eq!(items[2].world.w_axis.truncate(), Vec3::ZERO);
    }

    #[test]
    fn post_processing_runs_before_assembly() {
        let mut session = ImportSession::with_decoder(CountingDecoder::default());
        let model = session.assemble_scene(shared_texture_scene(), "scene.obj", Vec3::ZERO);
        assert_eq!(model.batches[0].vertices()[0].normal, Vec3::Z);

        let mut session =
            ImportSession::with_decoder(CountingDecoder::default()).with_flags(ImportFlags::empty());
        let model = session.assemble_scene(shared_texture_scene(), "scene.obj", Vec3::ZERO);
        assert_eq!(model.batches[0].vertices()[0].normal, Vec3::ZERO);
    }

    #[test]
    fn broken_meshes_lose_their_geometry_without_panicking() {
        let mut scene = shared_texture_scene();
        scene.meshes[1].faces = vec![vec![0, 1, 9]];
        scene.meshes[2].tex_coords.truncate(1);

        let mut session = ImportSession::with_decoder(CountingDecoder::default());
        let model = session.assemble_scene(scene, "scene.obj", Vec3::ZERO);

        assert_eq!(model.batches.len(), 4);
        assert_eq!(model.batches[1].name, "a");
        assert!(model.batches[1].vertices().is_empty());
        assert!(model.batches[1].indices().is_empty());
        assert_eq!(model.batches[2].vertices().len(), 3);
        assert!(model.batches[2]
            .vertices()
            .iter()
            .all(|vertex| vertex.tex_coord == Vec2::ZERO));
    }

    #[test]
    fn failed_imports_give_an_empty_model() {
        let mut session = ImportSession::with_decoder(CountingDecoder::default());
        let position = Vec3::new(0.0, -2.0, 4.0);

        let model = session.import_model("does/not/exist.obj", position);
        assert!(model.is_empty());
        assert_eq!(model.transform.get_translation(), position);

        let model = session.import_model("model.fbx", position);
        assert!(model.is_empty());
        assert!(session.textures.is_empty());
    }

    #[test]
    fn imports_obj_with_real_textures() {
        let directory = tempfile::tempdir().unwrap();
        let textures = directory.path().join("textures");
        fs::create_dir(&textures).unwrap();
        image::RgbImage::from_pixel(4, 2, image::Rgb([200, 100, 50]))
            .save(textures.join("brick.png"))
            .unwrap();

        fs::write(
            directory.path().join("wall.mtl"),
            "newmtl brick\nKd 0.4 0.4 0.4\nmap_Kd textures\\brick.png\nmap_Bump -bm 0.2 textures\\missing.png\n",
        )
        .unwrap();
        fs::write(
            directory.path().join("wall.obj"),
            "mtllib wall.mtl\no wall\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\nusemtl brick\nf 1/1 2/2 3/3 4/4\n",
        )
        .unwrap();

        let path = directory.path().join("wall.obj");
        let mut session = ImportSession::new();
        let model = session.import_model(&path.to_string_lossy(), Vec3::ZERO);

        assert_eq!(model.batches.len(), 1);
        let batch = &model.batches[0];
        assert_eq!(batch.indices(), &[0, 1, 2, 0, 2, 3]);
        assert_eq!(batch.binding().material().diffuse, Vec3::splat(0.4));
        assert!(batch.vertices().iter().all(|vertex| vertex.normal == Vec3::Z));

        // The missing height map is skipped, the diffuse map is decoded for real
        assert_eq!(batch.textures().len(), 1);
        let diffuse = batch.textures()[0].texture.as_ref().unwrap();
        assert_eq!((diffuse.width(), diffuse.height()), (4, 2));
        assert_eq!(diffuse.format(), TextureFormat::Rgb8Unorm);
        assert_eq!(session.textures.len(), 2);
    }
}
