use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;

/// Desert floor colour.
pub const GROUND_COLOR: [f32; 3] = [0.31, 0.34, 0.04];
/// Prop trunk colour.
pub const TRUNK_COLOR: [f32; 3] = [0.24, 0.18, 0.01];
pub const CANOPY_COLOR: [f32; 3] = [0.16, 0.42, 0.09];

/// Vertex layout shared by every scene mesh
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

/// Indexed triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Append `other`, rebasing its indices after the existing vertices
    pub fn merge(&mut self, other: &Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|index| index + base));
    }

    /// Recolour every vertex from its position
    pub fn painted(mut self, paint: impl Fn(Vec3) -> [f32; 3]) -> Self {
        for vertex in &mut self.vertices {
            vertex.color = paint(Vec3::from(vertex.position));
        }
        self
    }
}

/// Flat square grid centred on the origin at `height`.
///
/// Produces `(n + 1)²` vertices and `6n²` indices for `n` subdivisions
/// (at least one). Alternating vertices are slightly darkened so motion over
/// the plane stays visible.
pub fn ground_plane(size: f32, subdivisions: u32, height: f32, color: [f32; 3]) -> Mesh {
    let n = subdivisions.max(1);
    let row = n + 1;
    let step = size / n as f32;
    let half = size * 0.5;

    let mut vertices = Vec::with_capacity((row * row) as usize);
    for i in 0..row {
        for j in 0..row {
            let shade = if (i + j) % 2 == 0 { 1.0 } else { 0.85 };
            vertices.push(Vertex::new(
                [-half + j as f32 * step, height, -half + i as f32 * step],
                [color[0] * shade, color[1] * shade, color[2] * shade],
            ));
        }
    }

    let mut indices = Vec::with_capacity((6 * n * n) as usize);
    for i in 0..n {
        for j in 0..n {
            let k1 = i * row + j;
            let k2 = k1 + row;
            indices.extend_from_slice(&[k1, k2, k1 + 1, k1 + 1, k2, k2 + 1]);
        }
    }

    Mesh { vertices, indices }
}

/// UV sphere with normal-derived vertex colours.
///
/// Yields `(stacks + 1)(sectors + 1)` vertices and `6·sectors·(stacks − 1)`
/// indices; the pole rows emit a single triangle per sector. `stacks` is
/// raised to 2 and `sectors` to 3 when smaller.
pub fn sphere(stacks: u32, sectors: u32, center: Vec3, radius: f32) -> Mesh {
    let stacks = stacks.max(2);
    let sectors = sectors.max(3);
    let row = sectors + 1;

    let mut vertices = Vec::with_capacity(((stacks + 1) * row) as usize);
    for i in 0..=stacks {
        let t = i as f32 / stacks as f32;
        let stack_angle = FRAC_PI_2 - t * PI;
        let (ny, nxz) = stack_angle.sin_cos();

        for j in 0..=sectors {
            let s = j as f32 / sectors as f32;
            let (sin_sector, cos_sector) = (s * TAU).sin_cos();

            let normal = Vec3::new(nxz * sin_sector, ny, nxz * cos_sector);
            let position = center + normal * radius;
            let color = Vec3::splat(0.5) + normal * 0.5;

            vertices.push(Vertex::new(position.to_array(), color.to_array()));
        }
    }

    let mut indices = Vec::with_capacity((6 * sectors * (stacks - 1)) as usize);

    for j in 0..sectors {
        indices.extend_from_slice(&[j, row + j, row + j + 1]);
    }

    for i in 1..stacks - 1 {
        let k1 = i * row;
        let k2 = k1 + row;
        for j in 0..sectors {
            indices.extend_from_slice(&[k1 + j, k2 + j, k2 + j + 1]);
            indices.extend_from_slice(&[k1 + j, k2 + j + 1, k1 + j + 1]);
        }
    }

    let k1 = (stacks - 1) * row;
    let k2 = k1 + row;
    for j in 0..sectors {
        indices.extend_from_slice(&[k1 + j, k2 + j, k1 + j + 1]);
    }

    Mesh { vertices, indices }
}

/// Axis-aligned box, 8 shared corners and 36 indices
pub fn cuboid(min: Vec3, max: Vec3, color: [f32; 3]) -> Mesh {
    let corners = [
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(min.x, max.y, max.z),
        Vec3::new(max.x, max.y, max.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(min.x, max.y, min.z),
    ];

    let vertices = corners
        .iter()
        .map(|corner| {
            // darker at the base
            let shade = if corner.y == min.y { 0.6 } else { 1.0 };
            Vertex::new(
                corner.to_array(),
                [color[0] * shade, color[1] * shade, color[2] * shade],
            )
        })
        .collect();

    Mesh {
        vertices,
        indices: BOX_INDICES.to_vec(),
    }
}

/// Triangles of a box whose corners are numbered
/// 0-3 around the bottom face and 4-7 around the top face
pub const BOX_INDICES: [u32; 36] = [
    1, 2, 6, 6, 5, 1, // right
    0, 4, 7, 7, 3, 0, // left
    4, 5, 6, 6, 7, 4, // top
    0, 3, 2, 2, 1, 0, // bottom
    0, 1, 5, 5, 4, 0, // back
    3, 7, 6, 6, 2, 3, // front
];

/// The repeated scene prop: a trunk topped by a round canopy, standing on y = 0
pub fn prop() -> Mesh {
    let mut mesh = cuboid(
        Vec3::new(-0.25, 0.0, -0.25),
        Vec3::new(0.25, 3.0, 0.25),
        TRUNK_COLOR,
    );

    let canopy_center = Vec3::new(0.0, 3.6, 0.0);
    let canopy = sphere(12, 16, canopy_center, 1.4).painted(|position| {
        let light = 0.6 + 0.4 * ((position - canopy_center).y / 1.4);
        [
            CANOPY_COLOR[0] * light,
            CANOPY_COLOR[1] * light,
            CANOPY_COLOR[2] * light,
        ]
    });

    mesh.merge(&canopy);
    mesh
}
