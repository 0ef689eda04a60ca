use bitflags::bitflags;
use glam::Vec3;

use crate::source::{SourceMesh, SourceScene};

bitflags! {
    /// Processing steps requested from the import, applied before meshes are assembled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ImportFlags: u32 {
        /// Split polygons into triangle fans.
        const TRIANGULATE = 1 << 0;
        /// Generate smooth vertex normals for meshes without them.
        const GEN_NORMALS = 1 << 1;
        /// Generate tangents and bitangents for meshes with normals and texture coordinates.
        const CALC_TANGENT_SPACE = 1 << 2;
        /// Ignore node-local transforms, every batch is drawn with the model transform only.
        const FLATTEN_HIERARCHY = 1 << 3;
    }
}

impl Default for ImportFlags {
    fn default() -> Self {
        Self::TRIANGULATE | Self::GEN_NORMALS | Self::CALC_TANGENT_SPACE
    }
}

pub fn apply(scene: &mut SourceScene, flags: ImportFlags) {
    horizon_profiling::profile_function!();

    for mesh in &mut scene.meshes {
        if flags.contains(ImportFlags::TRIANGULATE) {
            triangulate(mesh);
        }
        if flags.contains(ImportFlags::GEN_NORMALS) && !mesh.has_normals() {
            generate_normals(mesh);
        }
        if flags.contains(ImportFlags::CALC_TANGENT_SPACE) && !mesh.has_tangents() {
            generate_tangents(mesh);
        }
    }
}

/// Fans every polygon around its first corner. Points and lines are kept as they are.
pub fn triangulate(mesh: &mut SourceMesh) {
    if mesh.is_triangulated() {
        return;
    }

    let mut faces = Vec::with_capacity(mesh.faces.len());
    for face in mesh.faces.drain(..) {
        if face.len() <= 3 {
            faces.push(face);
            continue;
        }

        for i in 1..(face.len() - 1) {
            faces.push(vec![face[0], face[i], face[i + 1]]);
        }
    }
    mesh.faces = faces;
}

pub fn generate_normals(mesh: &mut SourceMesh) {
    horizon_profiling::profile_function!();

    if !mesh.is_triangulated() {
        log::warn!("Skipping normal generation for {}, it is not triangulated.", mesh.name);
        return;
    }

    mesh.normals.clear();
    mesh.normals.resize(mesh.positions.len(), Vec3::ZERO);

    for face in 0..mesh.num_triangles() {
        let i0 = mesh.triangle_vertex(face, 0);
        let i1 = mesh.triangle_vertex(face, 1);
        let i2 = mesh.triangle_vertex(face, 2);

        let p0 = mesh.positions[i0];
        let p1 = mesh.positions[i1];
        let p2 = mesh.positions[i2];
        let n = (p1 - p0).cross(p2 - p0).normalize_or_zero();

        mesh.normals[i0] += n;
        mesh.normals[i1] += n;
        mesh.normals[i2] += n;
    }

    for normal in &mut mesh.normals {
        *normal = normal.normalize_or_zero();
    }
}

pub fn generate_tangents(mesh: &mut SourceMesh) {
    horizon_profiling::profile_function!();

    if !mesh.has_tex_coords() || !mesh.has_normals() || !mesh.is_triangulated() {
        return;
    }

    mesh.tangents = vec![Vec3::ZERO; mesh.positions.len()];
    mesh.bitangents = vec![Vec3::ZERO; mesh.positions.len()];

    if !mikktspace::generate_tangents(mesh) {
        log::warn!("Failed to generate tangents for {}.", mesh.name);
        mesh.tangents.clear();
        mesh.bitangents.clear();
    }
}

impl mikktspace::Geometry for SourceMesh {
    fn num_faces(&self) -> usize {
        self.num_triangles()
    }

    fn num_vertices_of_face(&self, _face: usize) -> usize {
        3
    }

    fn position(&self, face: usize, vert: usize) -> [f32; 3] {
        self.positions[self.triangle_vertex(face, vert)].into()
    }

    fn normal(&self, face: usize, vert: usize) -> [f32; 3] {
        self.normals[self.triangle_vertex(face, vert)].into()
    }

    fn tex_coord(&self, face: usize, vert: usize) -> [f32; 2] {
        self.tex_coords[self.triangle_vertex(face, vert)].into()
    }

    fn set_tangent(
        &mut self,
        tangent: [f32; 3],
        _bi_tangent: [f32; 3],
        _f_mag_s: f32,
        _f_mag_t: f32,
        bi_tangent_preserves_orientation: bool,
        face: usize,
        vert: usize,
    ) {
        let sign = if bi_tangent_preserves_orientation {
            1.0
        } else {
            -1.0
        };

        let i = self.triangle_vertex(face, vert);
        let tangent = Vec3::from(tangent);
        self.tangents[i] = tangent;
        self.bitangents[i] = self.normals[i].cross(tangent) * sign;
    }
}
