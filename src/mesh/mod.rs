//! Mesh output: triangulation, normals and interleaved vertex packing.
//!
//! A [`Mesh`] is the only artifact that outlives a generation call. It holds
//! raw vertex floats and triangle indices for the renderer to upload; it has
//! no GPU dependencies of its own.

pub mod normals;
pub mod packing;
pub mod topology;

pub use packing::{TerrainVertex, WaterVertex};

use crate::error::{Result, TerrainError};

/// Attribute layout of a packed vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexLayout {
    /// position(3) + normal(3) + uv(2)
    Terrain,
    /// position(3) + normal(3) + uv(2) + tangent(3) + bitangent(3)
    Water,
}

impl VertexLayout {
    pub fn floats_per_vertex(&self) -> usize {
        match self {
            VertexLayout::Terrain => 8,
            VertexLayout::Water => 14,
        }
    }

    /// Byte stride of one packed vertex.
    pub fn stride(&self) -> usize {
        self.floats_per_vertex() * std::mem::size_of::<f32>()
    }
}

/// Packed vertices and triangle indices, ready for upload.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    vertices: Vec<f32>,
    indices: Vec<u32>,
    vertex_count: usize,
    layout: VertexLayout,
}

impl Mesh {
    pub(crate) fn new(layout: VertexLayout, vertices: Vec<f32>, indices: Vec<u32>) -> Self {
        let vertex_count = vertices.len() / layout.floats_per_vertex();
        let mesh = Self {
            vertices,
            indices,
            vertex_count,
            layout,
        };
        debug_assert!(mesh.validate().is_ok(), "packed mesh violates its invariants");
        mesh
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    pub fn floats_per_vertex(&self) -> usize {
        self.layout.floats_per_vertex()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    fn attribute<const N: usize>(&self, vertex: usize, offset: usize) -> [f32; N] {
        let base = vertex * self.floats_per_vertex() + offset;
        let mut out = [0.0; N];
        out.copy_from_slice(&self.vertices[base..base + N]);
        out
    }

    /// Position of vertex `vertex`. Panics if out of range.
    pub fn position(&self, vertex: usize) -> [f32; 3] {
        self.attribute(vertex, 0)
    }

    pub fn normal(&self, vertex: usize) -> [f32; 3] {
        self.attribute(vertex, 3)
    }

    pub fn uv(&self, vertex: usize) -> [f32; 2] {
        self.attribute(vertex, 6)
    }

    /// Lowest and highest vertex `y`, or `None` for an empty mesh.
    pub fn height_range(&self) -> Option<(f32, f32)> {
        (0..self.vertex_count)
            .map(|v| self.position(v)[1])
            .fold(None, |acc, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
    }

    /// Vertex buffer as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Typed view for terrain meshes.
    pub fn terrain_vertices(&self) -> Option<&[TerrainVertex]> {
        match self.layout {
            VertexLayout::Terrain => bytemuck::try_cast_slice(&self.vertices).ok(),
            VertexLayout::Water => None,
        }
    }

    /// Typed view for water meshes.
    pub fn water_vertices(&self) -> Option<&[WaterVertex]> {
        match self.layout {
            VertexLayout::Water => bytemuck::try_cast_slice(&self.vertices).ok(),
            VertexLayout::Terrain => None,
        }
    }

    /// Per-vertex flag, set when at least one triangle references the vertex.
    pub fn referenced_vertices(&self) -> Vec<bool> {
        let mut used = vec![false; self.vertex_count];
        for &idx in &self.indices {
            if let Some(slot) = used.get_mut(idx as usize) {
                *slot = true;
            }
        }
        used
    }

    /// Check the buffer-shape invariants.
    pub fn validate(&self) -> Result<()> {
        if self.vertices.len() != self.vertex_count * self.floats_per_vertex() {
            return Err(TerrainError::invalid(
                "vertices",
                format!(
                    "{} floats for {} vertices of {} floats",
                    self.vertices.len(),
                    self.vertex_count,
                    self.floats_per_vertex()
                ),
            ));
        }
        if self.indices.len() % 3 != 0 {
            return Err(TerrainError::invalid(
                "indices",
                format!("{} indices do not form whole triangles", self.indices.len()),
            ));
        }
        if let Some(&bad) = self.indices.iter().find(|&&idx| idx as usize >= self.vertex_count) {
            return Err(TerrainError::invalid(
                "indices",
                format!("index {} out of range for {} vertices", bad, self.vertex_count),
            ));
        }
        Ok(())
    }
}
