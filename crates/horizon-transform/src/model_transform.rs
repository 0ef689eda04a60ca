use glam::{Mat4, Vec3};

/// Object-to-world matrix shared by every batch of one model.
///
/// Incremental operations left-multiply the current matrix, so they compose in world space rather than in the
/// model's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    matrix: Mat4,
    has_changed: bool,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
            has_changed: true,
        }
    }
}

impl ModelTransform {
    pub fn from_translation(position: Vec3) -> Self {
        Self {
            matrix: Mat4::from_translation(position),
            has_changed: true,
        }
    }

    pub fn get_matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn set_matrix(&mut self, matrix: Mat4) {
        self.matrix = matrix;
        self.has_changed = true;
    }

    /// World-space position of the model origin.
    pub fn get_translation(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.matrix = Mat4::from_translation(offset) * self.matrix;
        self.has_changed = true;
    }

    /// Rotates by euler angles in degrees, X first, then Y, then Z. Each axis is its own world-space step.
    pub fn rotate(&mut self, euler_degrees: Vec3) {
        self.matrix = Mat4::from_rotation_x(euler_degrees.x.to_radians()) * self.matrix;
        self.matrix = Mat4::from_rotation_y(euler_degrees.y.to_radians()) * self.matrix;
        self.matrix = Mat4::from_rotation_z(euler_degrees.z.to_radians()) * self.matrix;
        self.has_changed = true;
    }

    /// Rotates around a world-space pivot, leaving the pivot itself in place.
    pub fn rotate_about(&mut self, pivot: Vec3, euler_degrees: Vec3) {
        self.translate(-pivot);
        self.rotate(euler_degrees);
        self.translate(pivot);
    }

    pub fn scale(&mut self, scale: Vec3) {
        self.matrix = Mat4::from_scale(scale) * self.matrix;
        self.has_changed = true;
    }

    /// Returns whether the matrix changed since the last call, then clears the flag.
    pub fn handle_has_changed(&mut self) -> bool {
        std::mem::replace(&mut self.has_changed, false)
    }
}
