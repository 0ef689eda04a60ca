use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::Result;

use crate::{
    path, ImageDecoder, ImageFileDecoder, MipmapMode, SamplerDesc, Texture, TextureHandle,
    TextureRole,
};

#[derive(Debug, Clone)]
pub struct CachedTexture {
    pub identity: String,
    pub handle: TextureHandle,
    pub role: TextureRole,
    pub texture: Arc<Texture>,
    pub sampler: SamplerDesc,
}

/// Materializes every texture identity at most once.
///
/// Lives as long as the import session owning it, a failed decode is remembered as [`TextureHandle::NONE`] so the
/// file is not retried by every mesh referencing it.
pub struct TextureCache<D: ImageDecoder = ImageFileDecoder> {
    decoder: D,
    default_sampler: SamplerDesc,
    handles: HashMap<String, TextureHandle>,
    textures: Vec<CachedTexture>,
}

impl Default for TextureCache<ImageFileDecoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureCache<ImageFileDecoder> {
    pub fn new() -> Self {
        Self::with_decoder(ImageFileDecoder)
    }
}

impl<D: ImageDecoder> TextureCache<D> {
    pub fn with_decoder(decoder: D) -> Self {
        Self {
            decoder,
            default_sampler: SamplerDesc::default(),
            handles: HashMap::new(),
            textures: Vec::new(),
        }
    }

    /// Returns the handle of the texture referenced from an asset in `directory`, decoding it on first use.
    pub fn acquire(&mut self, reference: &str, directory: &str, role: TextureRole) -> TextureHandle {
        horizon_profiling::profile_function!();

        let identity = path::resolve_identity(reference, directory);
        self.acquire_with(identity, role, |decoder, identity| {
            decoder.decode_file(Path::new(identity))
        })
    }

    /// Like [`Self::acquire`] for images stored inside the asset container itself.
    pub fn acquire_embedded(&mut self, identity: &str, data: &[u8], role: TextureRole) -> TextureHandle {
        horizon_profiling::profile_function!();

        self.acquire_with(identity.to_owned(), role, |decoder, identity| {
            decoder.decode_bytes(identity, data)
        })
    }

    fn acquire_with<F>(&mut self, identity: String, role: TextureRole, decode: F) -> TextureHandle
    where
        F: FnOnce(&mut D, &str) -> Result<Texture>,
    {
        if let Some(handle) = self.handles.get(&identity) {
            return *handle;
        }

        let handle = match decode(&mut self.decoder, &identity) {
            Ok(texture) => {
                let handle = TextureHandle::from_index(self.textures.len());
                log::debug!(
                    "Loaded texture {} ({}x{} {:?}) as {:?}.",
                    identity,
                    texture.width(),
                    texture.height(),
                    texture.format(),
                    handle
                );

                self.textures.push(CachedTexture {
                    identity: identity.clone(),
                    handle,
                    role,
                    texture: Arc::new(texture),
                    sampler: self.default_sampler,
                });
                handle
            }
            Err(err) => {
                log::warn!("Texture failed to load at path: {} ({:#})", identity, err);
                TextureHandle::NONE
            }
        };

        self.handles.insert(identity, handle);
        handle
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&CachedTexture> {
        handle.index().and_then(|index| self.textures.get(index))
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<Arc<Texture>> {
        self.get(handle).map(|cached| cached.texture.clone())
    }

    /// Handle previously stored for an identity, [`TextureHandle::NONE`] included.
    pub fn handle_of(&self, identity: &str) -> Option<TextureHandle> {
        self.handles.get(identity).copied()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.handles.contains_key(identity)
    }

    /// Number of distinct identities seen, including the ones that failed to decode.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Successfully materialized textures in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &CachedTexture> {
        self.textures.iter()
    }

    pub fn default_sampler(&self) -> SamplerDesc {
        self.default_sampler
    }

    /// Changes the minification filtering of all cached textures and of the ones created from now on.
    pub fn set_mipmap_mode(&mut self, mipmap_mode: MipmapMode) {
        self.default_sampler.mipmap_mode = mipmap_mode;
        for cached in &mut self.textures {
            cached.sampler.mipmap_mode = mipmap_mode;
        }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }
}
