use std::f32::consts::TAU;

use glam::Vec3;

pub const NIGHT_COLOR: Vec3 = Vec3::new(0.1, 0.1, 0.2);
pub const DAWN_COLOR: Vec3 = Vec3::new(1.0, 0.6, 0.3);
pub const NOON_COLOR: Vec3 = Vec3::new(1.0, 1.0, 0.95);
pub const DUSK_COLOR: Vec3 = Vec3::new(1.0, 0.5, 0.2);

pub const NIGHT_AMBIENT: Vec3 = Vec3::new(0.15, 0.15, 0.2);
pub const DAY_AMBIENT: Vec3 = Vec3::new(0.5, 0.5, 0.6);

/// Quarter of the day the sky color is interpolated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySegment {
    /// Midnight to dawn.
    BeforeDawn,
    /// Dawn to noon.
    Morning,
    /// Noon to dusk.
    Afternoon,
    /// Dusk back to midnight.
    Evening,
}

impl DaySegment {
    pub const LENGTH: f32 = 0.25;

    pub fn from_phase(phase: f32) -> Self {
        if phase < 0.25 {
            Self::BeforeDawn
        } else if phase < 0.5 {
            Self::Morning
        } else if phase < 0.75 {
            Self::Afternoon
        } else {
            Self::Evening
        }
    }

    pub fn start(&self) -> f32 {
        match self {
            Self::BeforeDawn => 0.0,
            Self::Morning => 0.25,
            Self::Afternoon => 0.5,
            Self::Evening => 0.75,
        }
    }

    /// Colors at the start and at the end of the segment.
    pub fn anchors(&self) -> (Vec3, Vec3) {
        match self {
            Self::BeforeDawn => (NIGHT_COLOR, DAWN_COLOR),
            Self::Morning => (DAWN_COLOR, NOON_COLOR),
            Self::Afternoon => (NOON_COLOR, DUSK_COLOR),
            Self::Evening => (DUSK_COLOR, NIGHT_COLOR),
        }
    }

    /// Color at `t` in [0, 1] through this segment.
    pub fn color(&self, t: f32) -> Vec3 {
        let (start, end) = self.anchors();
        start.lerp(end, t)
    }
}

/// Diffuse and specular light color for a phase in [0, 1).
pub fn sky_color(phase: f32) -> Vec3 {
    let segment = DaySegment::from_phase(phase);
    segment.color((phase - segment.start()) / DaySegment::LENGTH)
}

/// Ambient term, follows the height of the sun instead of the sky segments.
pub fn ambient_color(phase: f32) -> Vec3 {
    let sun_height = (phase * TAU).sin();
    NIGHT_AMBIENT.lerp(DAY_AMBIENT, (sun_height + 1.0) / 2.0)
}

/// Light position on a circle of `radius` in the XY plane.
pub fn light_position(phase: f32, radius: f32) -> Vec3 {
    let angle = phase * TAU;
    Vec3::new(radius * angle.cos(), radius * angle.sin(), 0.0)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn anchors_are_hit_at_segment_starts() {
        assert_eq!(sky_color(0.0), NIGHT_COLOR);
        assert_eq!(sky_color(0.25), DAWN_COLOR);
        assert_eq!(sky_color(0.5), NOON_COLOR);
        assert_eq!(sky_color(0.75), DUSK_COLOR);
    }

    #[test]
    fn colors_are_continuous_at_segment_boundaries() {
        let segments = [
            DaySegment::BeforeDawn,
            DaySegment::Morning,
            DaySegment::Afternoon,
            DaySegment::Evening,
        ];

        for pair in segments.windows(2) {
            let end_of_previous = pair[0].color(1.0);
            let start_of_next = pair[1].color(0.0);
            assert!(end_of_previous.abs_diff_eq(start_of_next, 1e-6));
        }

        // Dusk wraps back to night
        assert!(DaySegment::Evening
            .color(1.0)
            .abs_diff_eq(DaySegment::BeforeDawn.color(0.0), 1e-6));
        assert!(sky_color(0.999_999).abs_diff_eq(sky_color(0.0), 1e-4));
    }

    #[test]
    fn segments_blend_linearly() {
        let halfway = sky_color(0.625);
        assert!(halfway.abs_diff_eq((NOON_COLOR + DUSK_COLOR) / 2.0, 1e-6));
        assert_eq!(DaySegment::from_phase(0.625), DaySegment::Afternoon);
    }

    #[test]
    fn ambient_follows_the_sun() {
        assert!(ambient_color(0.25).abs_diff_eq(DAY_AMBIENT, 1e-6));
        assert!(ambient_color(0.75).abs_diff_eq(NIGHT_AMBIENT, 1e-6));
        assert!(ambient_color(0.0).abs_diff_eq((NIGHT_AMBIENT + DAY_AMBIENT) / 2.0, 1e-6));
    }

    #[test]
    fn position_orbits_in_the_xy_plane() {
        let noon = light_position(0.5, 1000.0);
        assert_abs_diff_eq!(noon.x, -1000.0, epsilon = 1e-3);
        assert_abs_diff_eq!(noon.y, 0.0, epsilon = 1e-3);
        assert_eq!(noon.z, 0.0);

        let dawn = light_position(0.25, 10.0);
        assert_abs_diff_eq!(dawn.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(dawn.y, 10.0, epsilon = 1e-5);
    }
}
