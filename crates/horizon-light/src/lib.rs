use bytemuck::{Pod, Zeroable};
use glam::Vec3;

pub mod sky;

pub use sky::{ambient_color, light_position, sky_color, DaySegment};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayCycleConfig {
    /// Seconds for one full day.
    pub cycle_duration: f32,
    pub orbit_radius: f32,
    pub initial_phase: f32,
    pub cycling: bool,
}

impl Default for DayCycleConfig {
    fn default() -> Self {
        Self {
            cycle_duration: 60.0,
            orbit_radius: 1000.0,
            initial_phase: 0.5,
            cycling: false,
        }
    }
}

/// Shader-facing layout of a [`DirectionalLight`].
#[derive(Debug, Pod, Clone, Copy, Zeroable)]
#[repr(C)]
pub struct DirectionalLightData {
    pub position: Vec3,
    _padding0: u32,
    pub diffuse: Vec3,
    _padding1: u32,
    pub specular: Vec3,
    _padding2: u32,
    pub ambient: Vec3,
    _padding3: u32,
}

/// Sun orbiting the scene, all outputs are derived from the time of day.
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    /// Time of day in [0, 1), 0 is midnight and 0.5 noon.
    phase: f32,
    cycling: bool,
    cycle_duration: f32,
    orbit_radius: f32,

    position: Vec3,
    diffuse: Vec3,
    specular: Vec3,
    ambient: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(DayCycleConfig::default())
    }
}

impl DirectionalLight {
    pub fn new(config: DayCycleConfig) -> Self {
        let cycle_duration = if config.cycle_duration > 0.0 {
            config.cycle_duration
        } else {
            log::warn!(
                "Invalid cycle duration {}, falling back to {} seconds.",
                config.cycle_duration,
                DayCycleConfig::default().cycle_duration
            );
            DayCycleConfig::default().cycle_duration
        };

        let mut light = Self {
            phase: wrap_phase(config.initial_phase),
            cycling: config.cycling,
            cycle_duration,
            orbit_radius: config.orbit_radius,
            position: Vec3::ZERO,
            diffuse: Vec3::ZERO,
            specular: Vec3::ZERO,
            ambient: Vec3::ZERO,
        };
        light.update_outputs();
        light
    }

    /// Moves the time of day forward by `delta_time` seconds when cycling, then refreshes all outputs.
    pub fn advance(&mut self, delta_time: f32) {
        horizon_profiling::profile_function!();

        if self.cycling {
            self.phase = wrap_phase(self.phase + delta_time / self.cycle_duration);
        }
        self.update_outputs();
    }

    /// Jumps to a fixed time of day, wrapped into [0, 1).
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = wrap_phase(phase);
        self.update_outputs();
    }

    pub fn set_cycling(&mut self, cycling: bool) {
        self.cycling = cycling;
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn is_cycling(&self) -> bool {
        self.cycling
    }

    pub fn cycle_duration(&self) -> f32 {
        self.cycle_duration
    }

    pub fn orbit_radius(&self) -> f32 {
        self.orbit_radius
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Direction the light travels in, from the sun towards the origin.
    pub fn direction(&self) -> Vec3 {
        (-self.position).normalize_or_zero()
    }

    pub fn diffuse(&self) -> Vec3 {
        self.diffuse
    }

    pub fn specular(&self) -> Vec3 {
        self.specular
    }

    pub fn ambient(&self) -> Vec3 {
        self.ambient
    }

    pub fn segment(&self) -> DaySegment {
        DaySegment::from_phase(self.phase)
    }

    pub fn shader_data(&self) -> DirectionalLightData {
        DirectionalLightData {
            position: self.position,
            _padding0: 0,
            diffuse: self.diffuse,
            _padding1: 0,
            specular: self.specular,
            _padding2: 0,
            ambient: self.ambient,
            _padding3: 0,
        }
    }

    fn update_outputs(&mut self) {
        self.position = light_position(self.phase, self.orbit_radius);
        self.diffuse = sky_color(self.phase);
        self.specular = self.diffuse;
        self.ambient = ambient_color(self.phase);
    }
}

fn wrap_phase(phase: f32) -> f32 {
    if !phase.is_finite() {
        return 0.0;
    }

    let wrapped = phase.rem_euclid(1.0);
    // `rem_euclid` rounds tiny negative inputs up to exactly 1.0
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}
