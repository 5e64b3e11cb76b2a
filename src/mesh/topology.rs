//! Lattice triangulation with island-radius culling.

use crate::grid::{Grid, HeightSample};

/// Triangle list for a lattice plus culling counts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Topology {
    pub indices: Vec<u32>,
    /// Triangles considered before culling: `2 * (rows-1) * (cols-1)`
    pub candidates: usize,
    pub culled: usize,
}

impl Topology {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Number of triangles in a fully triangulated `rows x cols` lattice.
pub fn candidate_triangles(rows: usize, cols: usize) -> usize {
    2 * rows.saturating_sub(1) * cols.saturating_sub(1)
}

/// The two counter-clockwise (seen from +y) triangles of quad `(i, j)`.
///
/// With `a=(i,j)`, `b=(i+1,j)`, `c=(i+1,j+1)`, `d=(i,j+1)` these are
/// `(a, d, b)` and `(d, c, b)`.
pub fn quad_triangles(cols: usize, i: usize, j: usize) -> [[u32; 3]; 2] {
    let a = (i * cols + j) as u32;
    let b = ((i + 1) * cols + j) as u32;
    let c = ((i + 1) * cols + j + 1) as u32;
    let d = (i * cols + j + 1) as u32;
    [[a, d, b], [d, c, b]]
}

/// Triangulate the lattice, keeping only triangles with at least one corner
/// within `island_radius` of the origin in the X-Z plane.
///
/// Culled vertices stay in the vertex buffer; they are simply never indexed.
pub fn build_topology(samples: &Grid<HeightSample>, island_radius: f32) -> Topology {
    let rows = samples.rows;
    let cols = samples.cols;
    let candidates = candidate_triangles(rows, cols);

    let inside: Vec<bool> = samples
        .as_slice()
        .iter()
        .map(|s| s.planar_distance() <= island_radius)
        .collect();

    let mut indices = Vec::with_capacity(candidates * 3);
    let mut culled = 0;

    for i in 0..rows.saturating_sub(1) {
        for j in 0..cols.saturating_sub(1) {
            for tri in quad_triangles(cols, i, j) {
                if tri.iter().any(|&v| inside[v as usize]) {
                    indices.extend_from_slice(&tri);
                } else {
                    culled += 1;
                }
            }
        }
    }

    Topology {
        indices,
        candidates,
        culled,
    }
}
