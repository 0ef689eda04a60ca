pub mod cache;
pub mod decoder;
pub mod path;
pub mod sampler;

pub use cache::{CachedTexture, TextureCache};
pub use decoder::{ImageDecoder, ImageFileDecoder};
pub use sampler::{FilterMode, MipmapMode, SamplerDesc, WrapMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    R8Unorm,
    Rgb8Unorm,
    Rgba8Unorm,
}

impl TextureFormat {
    pub fn num_channels(&self) -> usize {
        match self {
            Self::R8Unorm => 1,
            Self::Rgb8Unorm => 3,
            Self::Rgba8Unorm => 4,
        }
    }
}

/// What a texture is sampled for by the lighting shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureRole {
    Diffuse,
    Specular,
    Normal,
}

impl TextureRole {
    pub const ALL: [TextureRole; 3] = [Self::Diffuse, Self::Specular, Self::Normal];

    /// Sampler name the shaders expect for this role.
    pub fn uniform_name(&self) -> &'static str {
        match self {
            Self::Diffuse => "texture_diffuse",
            Self::Specular => "texture_specular",
            Self::Normal => "texture_normal",
        }
    }
}

/// Identifies a materialized texture. Zero is reserved for "no texture", which is what a failed decode yields.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(u32);

impl TextureHandle {
    pub const NONE: Self = Self(0);

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    pub(crate) fn index(&self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }

    pub fn id(&self) -> u32 {
        self.0
    }

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

pub struct TextureCreateDesc {
    pub name: Option<String>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub data: Box<[u8]>,
}

#[derive(Debug)]
pub struct Texture {
    name: Option<String>,
    width: u32,
    height: u32,
    format: TextureFormat,
    data: Box<[u8]>,
}

impl Texture {
    pub fn new(create_desc: TextureCreateDesc) -> Self {
        debug_assert_eq!(
            create_desc.data.len(),
            create_desc.width as usize * create_desc.height as usize * create_desc.format.num_channels()
        );

        Self {
            name: create_desc.name,
            width: create_desc.width,
            height: create_desc.height,
            format: create_desc.format,
            data: create_desc.data,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn stride(&self) -> usize {
        self.format.num_channels()
    }

    /// Number of levels in a full mip chain down to 1x1.
    pub fn mip_level_count(&self) -> u32 {
        32 - self.width.max(self.height).max(1).leading_zeros()
    }
}
