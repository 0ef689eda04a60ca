#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
}

/// Minification filtering, selectable at runtime for all cached textures.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MipmapMode {
    #[default]
    Trilinear,
    Bilinear,
    Nearest,
    NoMip,
}

impl MipmapMode {
    pub const ALL: [MipmapMode; 4] = [Self::Trilinear, Self::Bilinear, Self::Nearest, Self::NoMip];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Trilinear => "Trilinear",
            Self::Bilinear => "Bilinear",
            Self::Nearest => "Nearest",
            Self::NoMip => "No Mipmapping",
        }
    }

    pub fn min_filter(&self) -> FilterMode {
        match self {
            Self::Nearest => FilterMode::Nearest,
            Self::Trilinear | Self::Bilinear | Self::NoMip => FilterMode::Linear,
        }
    }

    /// Filter between mip levels, `None` when mip levels are not sampled at all.
    pub fn mipmap_filter(&self) -> Option<FilterMode> {
        match self {
            Self::Trilinear => Some(FilterMode::Linear),
            Self::Bilinear | Self::Nearest => Some(FilterMode::Nearest),
            Self::NoMip => None,
        }
    }
}

impl std::str::FromStr for MipmapMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.label().eq_ignore_ascii_case(s) || format!("{:?}", mode).eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Unknown mipmap mode \"{}\".", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerDesc {
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
    pub mag_filter: FilterMode,
    pub mipmap_mode: MipmapMode,
}

impl Default for SamplerDesc {
    fn default() -> Self {
        Self {
            wrap_u: WrapMode::Repeat,
            wrap_v: WrapMode::Repeat,
            mag_filter: FilterMode::Linear,
            mipmap_mode: MipmapMode::Trilinear,
        }
    }
}
