//! Procedural island terrain generation
//!
//! Turns a flat lattice into an island mesh through fractal noise, a radial
//! falloff mask, hydraulic and thermal erosion, radius-culled triangulation
//! and area-weighted normals. The resulting [`Mesh`] is plain data for a
//! renderer to upload.

pub mod erosion;
pub mod error;
pub mod export;
pub mod grid;
pub mod heightmap;
pub mod mesh;
pub mod seeds;
pub mod terrain;
pub mod water;

pub use erosion::{ErosionParams, ErosionPreset, ErosionStats, TransferWeighting};
pub use error::{Result, TerrainError};
pub use heightmap::NoiseParams;
pub use mesh::{Mesh, VertexLayout};
pub use seeds::{NoiseOffset, TerrainSeeds};
pub use terrain::{
    generate_island, generate_terrain, generate_terrain_seeded, generate_terrain_with_offset,
    Island, TerrainConfig,
};
pub use water::generate_water_plane;
