use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::{Texture, TextureCreateDesc, TextureFormat};

/// Turns encoded image files into raw pixel buffers.
pub trait ImageDecoder {
    fn decode_bytes(&mut self, name: &str, data: &[u8]) -> Result<Texture>;

    fn decode_file(&mut self, path: &Path) -> Result<Texture> {
        let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        self.decode_bytes(&path.to_string_lossy(), &data)
    }
}

/// Decodes PNG, JPEG and BMP through the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageFileDecoder;

impl ImageDecoder for ImageFileDecoder {
    fn decode_bytes(&mut self, name: &str, data: &[u8]) -> Result<Texture> {
        horizon_profiling::profile_function!();

        let image = image::load_from_memory(data).with_context(|| format!("Failed to decode {}", name))?;

        let (format, width, height, data) = match image {
            image::DynamicImage::ImageLuma8(image) => (
                TextureFormat::R8Unorm,
                image.width(),
                image.height(),
                image.into_raw(),
            ),
            image::DynamicImage::ImageRgb8(image) => (
                TextureFormat::Rgb8Unorm,
                image.width(),
                image.height(),
                image.into_raw(),
            ),
            image::DynamicImage::ImageRgba8(image) => (
                TextureFormat::Rgba8Unorm,
                image.width(),
                image.height(),
                image.into_raw(),
            ),
            image => {
                log::debug!("Converting {:?} image {} to rgba8.", image.color(), name);
                let image = image.to_rgba8();
                (
                    TextureFormat::Rgba8Unorm,
                    image.width(),
                    image.height(),
                    image.into_raw(),
                )
            }
        };

        Ok(Texture::new(TextureCreateDesc {
            name: Some(name.to_owned()),
            width,
            height,
            format,
            data: data.into_boxed_slice(),
        }))
    }
}
