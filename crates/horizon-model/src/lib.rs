use batch::RenderBatch;
use glam::{Mat4, Vec3};
use horizon_transform::{ModelTransform, Transform};
use material::RawMaterial;
use preset::MaterialPreset;
use uuid::Uuid;

pub mod assemble;
pub mod batch;
pub mod import;
pub mod loaders;
pub mod material;
pub mod postprocess;
pub mod preset;
pub mod source;
pub mod vertex;

pub use import::ImportSession;
pub use postprocess::ImportFlags;

pub struct ModelNode {
    pub name: String,

    /// Local transform relative to the parent node.
    pub transform: Transform,
    pub children: Vec<u32>,

    /// Indices into [`Model::batches`].
    pub batches: Vec<u32>,
}

pub struct Model {
    pub uuid: Uuid,
    pub name: String,
    pub transform: ModelTransform,

    /// Every batch of the model in depth-first node order.
    pub batches: Vec<RenderBatch>,
    pub nodes: Vec<ModelNode>,
    pub root_nodes: Vec<u32>,

    /// Last override applied through [`Model::apply_material_override`].
    pub material_override: RawMaterial,
}

/// A batch together with the world matrix it is drawn with.
pub struct DrawItem<'a> {
    pub world: Mat4,
    pub batch: &'a RenderBatch,
}

impl Model {
    /// A model without any geometry, placed at `position`.
    pub fn empty(name: &str, position: Vec3) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_owned(),
            transform: ModelTransform::from_translation(position),
            batches: Vec::new(),
            nodes: Vec::new(),
            root_nodes: Vec::new(),
            material_override: RawMaterial::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.transform.translate(offset);
    }

    pub fn rotate(&mut self, euler_degrees: Vec3) {
        self.transform.rotate(euler_degrees);
    }

    pub fn rotate_about(&mut self, pivot: Vec3, euler_degrees: Vec3) {
        self.transform.rotate_about(pivot, euler_degrees);
    }

    /// Overwrites the set properties of `material_override` on every batch and texture of the model.
    pub fn apply_material_override(&mut self, material_override: RawMaterial) {
        for batch in &mut self.batches {
            let mut material = batch.binding().material();
            material_override.apply_to(&mut material);
            batch.binding_mut().set_material(material);
        }
        self.material_override = material_override;
    }

    /// Swaps the textures of every batch for the ones of `preset`, materials stay as they are.
    pub fn apply_preset(&mut self, preset: &MaterialPreset) {
        log::info!("Applying material preset {} to {}.", preset.name, self.name);

        for batch in &mut self.batches {
            batch.binding_mut().replace_textures(preset.textures.clone());
        }
    }

    pub fn draw_items(&self) -> Vec<DrawItem<'_>> {
        horizon_profiling::profile_function!();

        let mut items = Vec::with_capacity(self.batches.len());
        for root in &self.root_nodes {
            self.collect_draw_items_recursive(*root, self.transform.get_matrix(), &mut items);
        }
        items
    }

    fn collect_draw_items_recursive<'a>(
        &'a self,
        node_index: u32,
        parent: Mat4,
        items: &mut Vec<DrawItem<'a>>,
    ) {
        let Some(node) = self.nodes.get(node_index as usize) else {
            return;
        };

        let world = parent * node.transform.get_matrix();
        items.extend(
            node.batches
                .iter()
                .filter_map(|batch| self.batches.get(*batch as usize))
                .map(|batch| DrawItem { world, batch }),
        );

        for child in &node.children {
            self.collect_draw_items_recursive(*child, world, items);
        }
    }
}
