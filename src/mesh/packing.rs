//! Interleaved vertex records.

use bytemuck::{Pod, Zeroable};

use crate::grid::{Grid, HeightSample};

/// Terrain vertex: position, normal, uv.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Water vertex: position, normal, uv, tangent, bitangent.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct WaterVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

/// One record per lattice point, row-major.
pub fn pack_terrain(samples: &Grid<HeightSample>, normals: &[[f32; 3]]) -> Vec<f32> {
    debug_assert_eq!(samples.len(), normals.len());

    let records: Vec<TerrainVertex> = samples
        .as_slice()
        .iter()
        .zip(normals)
        .map(|(sample, &normal)| TerrainVertex {
            position: sample.position,
            normal,
            uv: sample.uv,
        })
        .collect();

    bytemuck::cast_slice(&records).to_vec()
}

/// Flatten water records into the interleaved float buffer.
pub fn pack_water(records: &[WaterVertex]) -> Vec<f32> {
    bytemuck::cast_slice(records).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sizes_match_layouts() {
        assert_eq!(std::mem::size_of::<TerrainVertex>(), 8 * 4);
        assert_eq!(std::mem::size_of::<WaterVertex>(), 14 * 4);
    }

    #[test]
    fn test_terrain_packing_order() {
        let mut samples = Grid::new(2, 2);
        for (i, j) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            samples.set(
                i,
                j,
                HeightSample {
                    position: [i as f32, (i * 2 + j) as f32, j as f32],
                    uv: [i as f32, j as f32],
                },
            );
        }
        let normals = vec![[0.0, 1.0, 0.0]; 4];
        let packed = pack_terrain(&samples, &normals);

        assert_eq!(packed.len(), 32);
        // Third record is lattice point (1, 0)
        assert_eq!(&packed[16..24], &[1.0, 2.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_water_packing() {
        let record = WaterVertex {
            position: [1.0, -0.02, 2.0],
            normal: [0.0, 1.0, 0.0],
            uv: [0.5, 0.5],
            tangent: [1.0, 0.0, 0.0],
            bitangent: [0.0, 0.0, 1.0],
        };
        let packed = pack_water(&[record, record]);
        assert_eq!(packed.len(), 28);
        assert_eq!(packed[1], -0.02);
        assert_eq!(&packed[8..14], &[1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    }
}
