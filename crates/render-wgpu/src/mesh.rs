//! CPU-side mesh generation. All meshes are unit sized and centred on the
//! origin; draw items scale them to match their colliders.

use bytemuck::{Pod, Zeroable};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

const FACE_UV: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

/// Cube with edge length 1 and per-face texture coordinates.
pub fn cube_mesh() -> MeshData {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let faces: [([[f32; 3]; 4], [f32; 3]); 6] = [
        ([[-p, -p,  p], [ p, -p,  p], [ p,  p,  p], [-p,  p,  p]], [0.0, 0.0, 1.0]),
        ([[ p, -p, -p], [-p, -p, -p], [-p,  p, -p], [ p,  p, -p]], [0.0, 0.0, -1.0]),
        ([[ p, -p,  p], [ p, -p, -p], [ p,  p, -p], [ p,  p,  p]], [1.0, 0.0, 0.0]),
        ([[-p, -p, -p], [-p, -p,  p], [-p,  p,  p], [-p,  p, -p]], [-1.0, 0.0, 0.0]),
        ([[-p,  p,  p], [ p,  p,  p], [ p,  p, -p], [-p,  p, -p]], [0.0, 1.0, 0.0]),
        ([[-p, -p, -p], [ p, -p, -p], [ p, -p,  p], [-p, -p,  p]], [0.0, -1.0, 0.0]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (corners, normal) in faces {
        let base = vertices.len() as u16;
        for (position, uv) in corners.into_iter().zip(FACE_UV) {
            vertices.push(Vertex {
                position,
                normal,
                uv,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    MeshData { vertices, indices }
}

/// UV sphere of diameter 1. `stacks` rings from pole to pole, `sectors`
/// slices around the Y axis.
pub fn sphere_mesh(sectors: u16, stacks: u16) -> MeshData {
    let sectors = sectors.max(3);
    let stacks = stacks.max(2);
    let r = 0.5_f32;

    let mut vertices = Vec::with_capacity(((stacks + 1) * (sectors + 1)) as usize);
    for i in 0..=stacks {
        let phi = FRAC_PI_2 - i as f32 * PI / stacks as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for j in 0..=sectors {
            let theta = j as f32 * TAU / sectors as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let normal = [cos_phi * cos_theta, sin_phi, -cos_phi * sin_theta];
            vertices.push(Vertex {
                position: [normal[0] * r, normal[1] * r, normal[2] * r],
                normal,
                uv: [j as f32 / sectors as f32, i as f32 / stacks as f32],
            });
        }
    }

    let mut indices = Vec::with_capacity((stacks as usize) * (sectors as usize) * 6);
    for i in 0..stacks {
        for j in 0..sectors {
            let k1 = i * (sectors + 1) + j;
            let k2 = k1 + sectors + 1;
            if i != 0 {
                indices.extend_from_slice(&[k1, k2, k1 + 1]);
            }
            if i != stacks - 1 {
                indices.extend_from_slice(&[k1 + 1, k2, k2 + 1]);
            }
        }
    }
    MeshData { vertices, indices }
}

/// X (red), Y (green) and Z (blue) axes spanning `-extent..extent`.
pub fn axis_lines(extent: f32) -> Vec<LineVertex> {
    let axes = [
        ([1.0, 0.0, 0.0], [1.0, 0.0, 0.0, 1.0]),
        ([0.0, 1.0, 0.0], [0.0, 1.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [0.0, 0.0, 1.0, 1.0]),
    ];
    axes.iter()
        .flat_map(|&(dir, color)| {
            let end = dir.map(|d| d * extent);
            [
                LineVertex {
                    position: end.map(|d| -d),
                    color,
                },
                LineVertex {
                    position: end,
                    color,
                },
            ]
        })
        .collect()
}

/// Gray grid on y = 0 with `2 * half_extent + 1` lines in each direction.
pub fn floor_grid(half_extent: i32, spacing: f32) -> Vec<LineVertex> {
    let mut verts = Vec::new();
    let color = [0.4, 0.4, 0.4, 1.0];
    let extent = half_extent as f32 * spacing;

    for i in -half_extent..=half_extent {
        // The axes already cover the centre lines.
        if i == 0 {
            continue;
        }
        let offset = i as f32 * spacing;
        verts.push(LineVertex {
            position: [-extent, 0.0, offset],
            color,
        });
        verts.push(LineVertex {
            position: [extent, 0.0, offset],
            color,
        });
        verts.push(LineVertex {
            position: [offset, 0.0, -extent],
            color,
        });
        verts.push(LineVertex {
            position: [offset, 0.0, extent],
            color,
        });
    }
    verts
}
