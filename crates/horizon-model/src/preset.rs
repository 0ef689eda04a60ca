use horizon_texture::{path, ImageDecoder, TextureCache, TextureRole};

use crate::{batch::TextureRef, material::Material};

/// A named set of textures that can be put on every batch of a model.
#[derive(Debug, Clone)]
pub struct MaterialPreset {
    pub name: String,
    pub textures: Vec<TextureRef>,
}

impl MaterialPreset {
    /// Acquires a diffuse and a normal map relative to `directory`. Textures that fail to load are left out.
    pub fn load<D: ImageDecoder>(
        textures: &mut TextureCache<D>,
        name: &str,
        diffuse: &str,
        normal: &str,
        directory: &str,
    ) -> Self {
        horizon_profiling::profile_function!();

        let texture_refs = [(diffuse, TextureRole::Diffuse), (normal, TextureRole::Normal)]
            .into_iter()
            .filter_map(|(reference, role)| {
                let handle = textures.acquire(reference, directory, role);
                if handle.is_none() {
                    return None;
                }

                Some(TextureRef {
                    identity: path::resolve_identity(reference, directory),
                    role,
                    handle,
                    texture: textures.texture(handle),
                    // Restamped by the binding the preset is applied to
                    material: Material::default(),
                })
            })
            .collect();

        Self {
            name: name.to_owned(),
            textures: texture_refs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetDesc {
    pub name: &'static str,
    pub diffuse: &'static str,
    pub normal: &'static str,
}

/// Texture pairs relative to a texture directory, selectable by name.
#[derive(Debug, Clone)]
pub struct MaterialLibrary {
    presets: Vec<PresetDesc>,
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::new(vec![
            PresetDesc {
                name: "brick",
                diffuse: "brick/diffuse.jpg",
                normal: "brick/normal.jpg",
            },
            PresetDesc {
                name: "wicker",
                diffuse: "wicker/diffuse.jpg",
                normal: "wicker/normal.png",
            },
            PresetDesc {
                name: "checker",
                diffuse: "chess.png",
                normal: "wicker/normal.png",
            },
        ])
    }
}

impl MaterialLibrary {
    pub fn new(presets: Vec<PresetDesc>) -> Self {
        Self { presets }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.presets.iter().map(|preset| preset.name)
    }

    pub fn find(&self, name: &str) -> Option<&PresetDesc> {
        self.presets.iter().find(|preset| preset.name == name)
    }

    /// Loads the preset called `name` from `directory`, `None` if there is no such preset.
    pub fn select<D: ImageDecoder>(
        &self,
        textures: &mut TextureCache<D>,
        name: &str,
        directory: &str,
    ) -> Option<MaterialPreset> {
        let Some(desc) = self.find(name) else {
            log::warn!(
                "Unknown material preset {}, available: {}",
                name,
                self.names().collect::<Vec<_>>().join(", ")
            );
            return None;
        };

        Some(MaterialPreset::load(
            textures,
            desc.name,
            desc.diffuse,
            desc.normal,
            directory,
        ))
    }
}
