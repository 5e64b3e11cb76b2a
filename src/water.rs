//! Flat water plane.
//!
//! A subdivided quad just below sea level with a fixed up normal and a
//! fixed tangent frame for normal-mapped water shading. No noise, no erosion.

use crate::error::{ensure_positive, Result, TerrainError};
use crate::mesh::packing::{pack_water, WaterVertex};
use crate::mesh::topology::quad_triangles;
use crate::mesh::{Mesh, VertexLayout};

/// Height of the water surface.
pub const WATER_LEVEL: f32 = -0.02;

const UP: [f32; 3] = [0.0, 1.0, 0.0];
const TANGENT: [f32; 3] = [1.0, 0.0, 0.0];
const BITANGENT: [f32; 3] = [0.0, 0.0, 1.0];

/// Build a `width x depth` plane split into `divisions x divisions` quads,
/// centered at the origin.
pub fn generate_water_plane(width: f32, depth: f32, divisions: usize) -> Result<Mesh> {
    ensure_positive("width", width)?;
    ensure_positive("depth", depth)?;
    if divisions == 0 {
        return Err(TerrainError::invalid("divisions", "water plane needs at least one division"));
    }
    let side = divisions
        .checked_add(1)
        .filter(|side| side.checked_mul(*side).is_some_and(|count| count <= u32::MAX as usize))
        .ok_or_else(|| {
            TerrainError::invalid(
                "divisions",
                format!("{} divisions overflow 32-bit vertex indices", divisions),
            )
        })?;

    let step_x = width / divisions as f32;
    let step_z = depth / divisions as f32;
    let start_x = -width * 0.5;
    let start_z = -depth * 0.5;

    let mut records = Vec::with_capacity(side * side);
    for i in 0..side {
        for j in 0..side {
            records.push(WaterVertex {
                position: [start_x + i as f32 * step_x, WATER_LEVEL, start_z + j as f32 * step_z],
                normal: UP,
                uv: [i as f32 / divisions as f32, j as f32 / divisions as f32],
                tangent: TANGENT,
                bitangent: BITANGENT,
            });
        }
    }

    let mut indices = Vec::with_capacity(divisions * divisions * 6);
    for i in 0..divisions {
        for j in 0..divisions {
            for tri in quad_triangles(side, i, j) {
                indices.extend_from_slice(&tri);
            }
        }
    }

    log::debug!(
        "water plane: {}x{} quads, {} vertices",
        divisions,
        divisions,
        records.len()
    );
    Ok(Mesh::new(VertexLayout::Water, pack_water(&records), indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_quad_plane() {
        let mesh = generate_water_plane(100.0, 100.0, 1).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices().len(), 6);
        assert_eq!(mesh.vertices().len(), 4 * 14);
        for v in 0..4 {
            assert_eq!(mesh.position(v)[1], -0.02);
            assert_eq!(mesh.normal(v), [0.0, 1.0, 0.0]);
        }
        assert_eq!(mesh.position(0), [-50.0, -0.02, -50.0]);
        assert_eq!(mesh.position(3), [50.0, -0.02, 50.0]);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_subdivided_plane() {
        let mesh = generate_water_plane(8.0, 4.0, 4).unwrap();
        assert_eq!(mesh.vertex_count(), 25);
        assert_eq!(mesh.triangle_count(), 32);
        let typed = mesh.water_vertices().unwrap();
        assert!(typed
            .iter()
            .all(|v| v.tangent == [1.0, 0.0, 0.0] && v.bitangent == [0.0, 0.0, 1.0]));
        assert_eq!(typed[24].uv, [1.0, 1.0]);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(generate_water_plane(10.0, 10.0, 0).is_err());
        assert!(generate_water_plane(0.0, 10.0, 1).is_err());
        assert!(generate_water_plane(10.0, f32::NAN, 1).is_err());
    }

    #[test]
    fn test_rejects_overflowing_divisions() {
        for divisions in [usize::MAX, 1 << 16] {
            assert!(matches!(
                generate_water_plane(10.0, 10.0, divisions),
                Err(TerrainError::InvalidArgument { name: "divisions", .. })
            ));
        }
    }
}
