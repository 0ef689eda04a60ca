use std::mem::offset_of;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

#[derive(Debug, Default, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    // V is flipped relative to the authoring convention
    pub tex_coord: Vec2,
    pub tangent: Vec3,
    pub bitangent: Vec3,
}

/// Float attribute inside the interleaved vertex stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: &'static str,
    pub components: u32,
    pub offset: usize,
}

impl Vertex {
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    pub const ATTRIBUTES: [VertexAttribute; 5] = [
        VertexAttribute {
            name: "vertex_position",
            components: 3,
            offset: offset_of!(Vertex, position),
        },
        VertexAttribute {
            name: "vertex_normal",
            components: 3,
            offset: offset_of!(Vertex, normal),
        },
        VertexAttribute {
            name: "vertex_texture",
            components: 2,
            offset: offset_of!(Vertex, tex_coord),
        },
        VertexAttribute {
            name: "vertex_tangent",
            components: 3,
            offset: offset_of!(Vertex, tangent),
        },
        VertexAttribute {
            name: "vertex_bitangent",
            components: 3,
            offset: offset_of!(Vertex, bitangent),
        },
    ];
}
