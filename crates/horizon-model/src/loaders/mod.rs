use anyhow::{anyhow, Result};

use crate::source::SourceScene;

pub mod gltf_loader;
pub mod obj_loader;

/// Reads the asset at `path` with the loader matching its extension.
pub fn load_source_scene(path: &str) -> Result<SourceScene> {
    horizon_profiling::profile_function!();

    let extension = path
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "gltf" | "glb" => gltf_loader::load(path),
        "obj" => obj_loader::load(path),
        _ => Err(anyhow!("Unsupported model format \"{}\".", extension)),
    }
}
