use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use glam::Vec3;
use horizon::horizon_light::{DayCycleConfig, DirectionalLight};
use horizon::horizon_model::preset::MaterialLibrary;
use horizon::horizon_model::{ImportFlags, ImportSession, Model};
use horizon::horizon_texture::{ImageDecoder, MipmapMode, TextureCache};
use horizon::horizon_time::FrameTimer;
use horizon::Horizon;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Model to import (.obj, .gltf or .glb)
    model: String,

    /// Initial model position as x,y,z
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_value = "0,0,0")]
    position: Vec<f32>,

    /// Rotation about the model's own position in degrees per second as x,y,z
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_value = "0,45,0")]
    rotation_speed: Vec<f32>,

    /// Ignore node transforms inside the model
    #[arg(long, default_value_t = false)]
    flatten: bool,

    /// Material preset to put on every batch (brick, wicker or checker)
    #[arg(long)]
    preset: Option<String>,

    /// Directory the preset textures are loaded from
    #[arg(long, default_value = "textures")]
    textures_dir: String,

    /// Texture minification filtering (trilinear, bilinear, nearest or nomip)
    #[arg(long, default_value = "trilinear")]
    mipmap_mode: String,

    /// Seconds for one full day
    #[arg(long, default_value_t = 60.0)]
    cycle_duration: f32,

    /// Initial time of day, 0 is midnight and 0.5 noon
    #[arg(long, default_value_t = 0.5)]
    phase: f32,

    /// Keep the time of day fixed
    #[arg(long, default_value_t = false)]
    frozen: bool,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 10)]
    frames: u32,

    /// Fixed frame delta in seconds, measured from the wall clock when left out
    #[arg(long)]
    delta_time: Option<f32>,

    /// Record puffin profiling scopes
    #[arg(long, default_value_t = false)]
    profile: bool,
}

fn parse_vec3(name: &str, components: &[f32]) -> Result<Vec3> {
    match components {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(anyhow!(
            "--{} expects 3 components, got {}.",
            name,
            components.len()
        )),
    }
}

fn log_model(model: &Model) {
    log::info!(
        "Model {} ({}): {} batches, {} nodes.",
        model.name,
        model.uuid,
        model.batches.len(),
        model.nodes.len()
    );

    for item in model.draw_items() {
        let batch = item.batch;
        let material = batch.binding().material();
        log::info!(
            "  {}: {} vertices, {:?}, shininess {}, textures [{}], at {}",
            batch.name,
            batch.vertices().len(),
            batch.draw_mode(),
            material.shininess,
            batch
                .textures()
                .iter()
                .map(|texture| format!("{} {}", texture.role.uniform_name(), texture.identity))
                .collect::<Vec<_>>()
                .join(", "),
            item.world.w_axis.truncate()
        );
    }
}

fn log_textures<D: ImageDecoder>(textures: &TextureCache<D>) {
    log::info!(
        "Texture cache: {} identities, {} decoded, {} filtering.",
        textures.len(),
        textures.iter().count(),
        textures.default_sampler().mipmap_mode.label()
    );

    for cached in textures.iter() {
        log::info!(
            "  {:?} {:?} {}: {}x{} {:?}, {} mip levels",
            cached.handle,
            cached.role,
            cached.identity,
            cached.texture.width(),
            cached.texture.height(),
            cached.texture.format(),
            cached.texture.mip_level_count()
        );
    }
}

pub fn internal_main() -> Result<()> {
    let args = Args::parse();
    let _horizon = Horizon::new("Scene Inspector");
    horizon::horizon_profiling::set_enabled(args.profile);

    let position = parse_vec3("position", &args.position)?;
    let rotation_speed = parse_vec3("rotation-speed", &args.rotation_speed)?;
    let mipmap_mode: MipmapMode = args.mipmap_mode.parse()?;

    let mut flags = ImportFlags::default();
    flags.set(ImportFlags::FLATTEN_HIERARCHY, args.flatten);
    let mut session = ImportSession::new().with_flags(flags);

    let mut model = session.import_model(&args.model, position);
    if model.is_empty() {
        log::warn!("{} has nothing to draw.", args.model);
    }

    if let Some(preset) = &args.preset {
        let library = MaterialLibrary::default();
        if let Some(preset) = library.select(&mut session.textures, preset, &args.textures_dir) {
            model.apply_preset(&preset);
        }
    }
    session.textures.set_mipmap_mode(mipmap_mode);

    log_model(&model);
    log_textures(&session.textures);

    let mut light = DirectionalLight::new(DayCycleConfig {
        cycle_duration: args.cycle_duration,
        initial_phase: args.phase,
        cycling: !args.frozen,
        ..Default::default()
    });

    let mut frame_timer = FrameTimer::new();
    for frame in 0..args.frames {
        if args.profile {
            horizon::horizon_profiling::new_frame();
        }
        horizon::horizon_profiling::profile_scope!("frame");

        let delta_time = match args.delta_time {
            Some(delta_time) => delta_time,
            None => {
                std::thread::sleep(Duration::from_millis(16));
                frame_timer.tick()
            }
        };

        light.advance(delta_time);
        let pivot = model.transform.get_translation();
        model.rotate_about(pivot, rotation_speed * delta_time);

        if model.transform.handle_has_changed() {
            log::debug!("Frame {}: model matrix {}", frame, model.transform.get_matrix());
        }

        log::info!(
            "Frame {}: phase {:.3} ({:?}), light at {}, diffuse {}, ambient {}",
            frame,
            light.phase(),
            light.segment(),
            light.position(),
            light.diffuse(),
            light.ambient()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_day_cycle() {
        let args = Args::try_parse_from(["scene-inspector", "cube.obj"]).unwrap();

        assert_eq!(args.model, "cube.obj");
        assert_eq!(args.cycle_duration, DayCycleConfig::default().cycle_duration);
        assert_eq!(args.phase, DayCycleConfig::default().initial_phase);
        assert_eq!(parse_vec3("position", &args.position).unwrap(), Vec3::ZERO);
        assert_eq!(args.mipmap_mode.parse::<MipmapMode>().unwrap(), MipmapMode::Trilinear);
    }

    #[test]
    fn vectors_take_three_components() {
        let args = Args::try_parse_from([
            "scene-inspector",
            "cube.obj",
            "--position",
            "1,-2,3.5",
            "--rotation-speed",
            "0,90",
        ])
        .unwrap();

        assert_eq!(parse_vec3("position", &args.position).unwrap(), Vec3::new(1.0, -2.0, 3.5));
        assert!(parse_vec3("rotation-speed", &args.rotation_speed).is_err());
    }
}
