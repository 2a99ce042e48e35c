//! CPU-side mesh descriptions and the generators the globe uses.
//!
//! A [`Mesh`] is plain data: positions, triangle indices and optional texture
//! coordinates. It is uploaded once by [`crate::pipelines::mesh_renderer::MeshBuffers`]
//! and never touched again.

use std::{collections::HashMap, f32::consts::PI};

use cgmath::{InnerSpace, Vector3};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<u16>,
    pub uv: Option<Vec<[f32; 2]>>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.triangles.len()
    }
}

/// Unit quad in the xy plane, facing +z.
pub fn quad() -> Mesh {
    Mesh {
        vertices: vec![
            [-0.5, -0.5, 0.0],
            [-0.5, 0.5, 0.0],
            [0.5, -0.5, 0.0],
            [0.5, 0.5, 0.0],
        ],
        triangles: vec![3, 1, 0, 2, 3, 0],
        uv: Some(vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]),
    }
}

// Anything above this no longer fits u16 indices.
const MAX_SUBDIVISIONS: u32 = 6;

/// Unit icosphere with equirectangular texture coordinates.
///
/// Every subdivision splits each triangle into four. Vertices on the texture seam are
/// duplicated so no triangle interpolates across the wrap-around.
pub fn icosphere(subdivisions: u32) -> Mesh {
    let subdivisions = if subdivisions > MAX_SUBDIVISIONS {
        log::warn!(
            "icosphere subdivision level {} exceeds the 16-bit index range, using {}",
            subdivisions,
            MAX_SUBDIVISIONS
        );
        MAX_SUBDIVISIONS
    } else {
        subdivisions
    };

    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let mut vertices: Vec<Vector3<f32>> = [
        (-1.0, t, 0.0),
        (1.0, t, 0.0),
        (-1.0, -t, 0.0),
        (1.0, -t, 0.0),
        (0.0, -1.0, t),
        (0.0, 1.0, t),
        (0.0, -1.0, -t),
        (0.0, 1.0, -t),
        (t, 0.0, -1.0),
        (t, 0.0, 1.0),
        (-t, 0.0, -1.0),
        (-t, 0.0, 1.0),
    ]
    .into_iter()
    .map(|v| Vector3::from(v).normalize())
    .collect();

    #[rustfmt::skip]
    let mut triangles: Vec<u16> = vec![
        0, 11, 5,   0, 5, 1,    0, 1, 7,    0, 7, 10,   0, 10, 11,
        1, 5, 9,    5, 11, 4,   11, 10, 2,  10, 7, 6,   7, 1, 8,
        3, 9, 4,    3, 4, 2,    3, 2, 6,    3, 6, 8,    3, 8, 9,
        4, 9, 5,    2, 4, 11,   6, 2, 10,   8, 6, 7,    9, 8, 1,
    ];

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(u16, u16), u16> = HashMap::new();
        let mut midpoint = |a: u16, b: u16, vertices: &mut Vec<Vector3<f32>>| -> u16 {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                let mid = (vertices[a as usize] + vertices[b as usize]).normalize();
                vertices.push(mid);
                (vertices.len() - 1) as u16
            })
        };
        let mut next = Vec::with_capacity(triangles.len() * 4);
        for tri in triangles.chunks(3) {
            let (a, b, c) = (tri[0], tri[1], tri[2]);
            let ab = midpoint(a, b, &mut vertices);
            let bc = midpoint(b, c, &mut vertices);
            let ca = midpoint(c, a, &mut vertices);
            next.extend_from_slice(&[a, ab, ca, b, bc, ab, c, ca, bc, ab, bc, ca]);
        }
        triangles = next;
    }

    let mut uv: Vec<[f32; 2]> = vertices.iter().map(|v| spherical_uv(*v)).collect();

    // Triangles spanning the seam get their low-u corners duplicated at u + 1.
    let mut seam_copies: HashMap<u16, u16> = HashMap::new();
    for tri in triangles.chunks_mut(3) {
        let us = [uv[tri[0] as usize][0], uv[tri[1] as usize][0], uv[tri[2] as usize][0]];
        let max = us.iter().cloned().fold(f32::MIN, f32::max);
        let min = us.iter().cloned().fold(f32::MAX, f32::min);
        if max - min <= 0.5 {
            continue;
        }
        for index in tri.iter_mut() {
            if uv[*index as usize][0] < 0.5 {
                let original = *index;
                *index = *seam_copies.entry(original).or_insert_with(|| {
                    vertices.push(vertices[original as usize]);
                    let [u, v] = uv[original as usize];
                    uv.push([u + 1.0, v]);
                    (vertices.len() - 1) as u16
                });
            }
        }
    }

    Mesh {
        vertices: vertices.into_iter().map(Into::into).collect(),
        triangles,
        uv: Some(uv),
    }
}

fn spherical_uv(v: Vector3<f32>) -> [f32; 2] {
    [
        v.z.atan2(v.x) / (2.0 * PI) + 0.5,
        v.y.clamp(-1.0, 1.0).asin() / PI + 0.5,
    ]
}
