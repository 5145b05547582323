//! Unit cuboid geometry with per-vertex colours for each scene object.
//!
//! Every object is a 1 x 1 x 1 box anchored at its minimum corner, so a draw
//! request's translation places the corner and the box covers
//! `[x, x + 1] x [y, y + 1] x [z, z + 1]`.

use bytemuck::{Pod, Zeroable};
use tilehop_kernel::SceneObject;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

pub(crate) const VERTICES_PER_CUBOID: usize = 36;

type Rgb = [f32; 3];

/// Faces in triangle order: z = 0, x = 0, z = 1, x = 1, top (y = 1), bottom.
#[rustfmt::skip]
const CUBOID_POSITIONS: [[f32; 3]; VERTICES_PER_CUBOID] = [
    [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0],
    [1.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0],

    [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 1.0],
    [0.0, 1.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0],

    [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0],

    [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0],
    [1.0, 1.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0],

    [0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0],

    [0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 1.0],
    [1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0],
];

const TOP_FACE: usize = 4;

/// One colour per face.
fn solid_faces(faces: [Rgb; 6]) -> [Rgb; VERTICES_PER_CUBOID] {
    std::array::from_fn(|i| faces[i / 6])
}

fn palette(object: SceneObject) -> [Rgb; VERTICES_PER_CUBOID] {
    match object {
        SceneObject::Player => {
            let pink = [1.0, 0.8, 1.0];
            let peach = [1.0, 0.8, 0.6];
            let blue = [0.6, 0.75, 1.0];
            solid_faces([pink, peach, pink, peach, blue, blue])
        }
        SceneObject::Floor => {
            let soil = [0.6, 0.2, 0.0];
            let grass = [0.0, 0.5, 0.0];
            let moss = [0.5, 0.5, 0.0];
            let mut colors = solid_faces([soil; 6]);
            let top = TOP_FACE * 6;
            colors[top..top + 6].copy_from_slice(&[grass, moss, grass, grass, moss, grass]);
            colors
        }
        SceneObject::Water => {
            let water = [0.3, 0.58, 1.0];
            let deep = [0.0, 0.23, 0.6];
            let mut colors = solid_faces([water; 6]);
            let top = TOP_FACE * 6;
            colors[top + 1] = deep;
            colors[top + 4] = deep;
            colors
        }
        SceneObject::Obstacle => {
            let dark = [0.2, 0.06, 0.0];
            let mid = [0.3, 0.09, 0.0];
            let light = [0.4, 0.12, 0.0];
            solid_faces([dark, mid, dark, mid, light, light])
        }
    }
}

/// Triangle-list vertices for `object`.
pub(crate) fn cuboid(object: SceneObject) -> Vec<Vertex> {
    CUBOID_POSITIONS
        .iter()
        .zip(palette(object))
        .map(|(&position, color)| Vertex { position, color })
        .collect()
}
