//! Island terrain generation pipeline.
//!
//! Stages run strictly in sequence, each consuming the previous output:
//! lattice, height synthesis, hydraulic erosion, thermal erosion,
//! triangulation, normals, packing. Only the packed [`Mesh`] survives.

use std::path::Path;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::erosion::{simulate_erosion, ErosionParams, ErosionPreset, ErosionStats};
use crate::error::Result;
use crate::grid::{initialize_lattice, validate_lattice};
use crate::heightmap::{apply_heights, island_radius, synthesize_heights, HeightStats, NoiseParams};
use crate::mesh::normals::estimate_normals;
use crate::mesh::packing::pack_terrain;
use crate::mesh::topology::build_topology;
use crate::mesh::{Mesh, VertexLayout};
use crate::seeds::NoiseOffset;

/// Everything needed to generate one island.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// World extent along X
    pub width: f32,
    /// World extent along Z
    pub depth: f32,
    /// Lattice points along X (m)
    pub rows: usize,
    /// Lattice points along Z (n)
    pub cols: usize,
    pub noise: NoiseParams,
    pub erosion: ErosionParams,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 10.0,
            depth: 10.0,
            rows: 256,
            cols: 256,
            noise: NoiseParams::default(),
            erosion: ErosionParams::default(),
        }
    }
}

impl TerrainConfig {
    pub fn new(width: f32, depth: f32, rows: usize, cols: usize) -> Self {
        Self {
            width,
            depth,
            rows,
            cols,
            ..Default::default()
        }
    }

    pub fn with_erosion(mut self, erosion: ErosionParams) -> Self {
        self.erosion = erosion;
        self
    }

    pub fn with_preset(self, preset: ErosionPreset) -> Self {
        self.with_erosion(ErosionParams::from_preset(preset))
    }

    pub fn with_noise(mut self, noise: NoiseParams) -> Self {
        self.noise = noise;
        self
    }

    /// Reject bad dimensions or tuning values before anything is allocated.
    pub fn validate(&self) -> Result<()> {
        validate_lattice(self.width, self.depth, self.rows, self.cols)?;
        self.noise.validate()?;
        self.erosion.validate()?;
        Ok(())
    }

    pub fn island_radius(&self) -> f32 {
        island_radius(self.width, self.depth, &self.noise)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A generated island: the mesh plus what it took to build it.
#[derive(Clone, Debug)]
pub struct Island {
    pub mesh: Mesh,
    pub offset: NoiseOffset,
    pub island_radius: f32,
    /// Heights after erosion
    pub heights: HeightStats,
    pub erosion: ErosionStats,
    pub culled_triangles: usize,
    /// Wall-clock time per stage, in pipeline order
    pub timings: Vec<(&'static str, Duration)>,
}

impl Island {
    pub fn total_time(&self) -> Duration {
        self.timings.iter().map(|(_, d)| *d).sum()
    }
}

/// Records how long each stage takes.
struct StageTimer {
    start: Instant,
    timings: Vec<(&'static str, Duration)>,
}

impl StageTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            timings: Vec::with_capacity(6),
        }
    }

    fn finish(&mut self, name: &'static str) {
        let elapsed = self.start.elapsed();
        log::debug!("stage {}: {:.2}ms", name, elapsed.as_secs_f64() * 1000.0);
        self.timings.push((name, elapsed));
        self.start = Instant::now();
    }
}

/// Run the full pipeline for an explicit noise offset.
pub fn generate_island(config: &TerrainConfig, offset: NoiseOffset) -> Result<Island> {
    config.validate()?;

    let mut timer = StageTimer::new();
    let radius = config.island_radius();

    let mut samples = initialize_lattice(config.width, config.depth, config.rows, config.cols)?;
    timer.finish("lattice");

    let mut heights = synthesize_heights(&samples, radius, offset, &config.noise);
    let raw = HeightStats::from_heights(heights.as_slice());
    if raw.land_fraction == 0.0 {
        log::warn!("offset {} produced no land above sea level", offset);
    }
    timer.finish("heights");

    let erosion = simulate_erosion(&mut heights, &config.erosion);
    apply_heights(&mut samples, &heights);
    let eroded = HeightStats::from_heights(heights.as_slice());
    timer.finish("erosion");

    let topology = build_topology(&samples, radius);
    if topology.indices.is_empty() {
        log::warn!(
            "no triangle has a corner inside island radius {:.3}; mesh has no faces",
            radius
        );
    }
    timer.finish("topology");

    let positions: Vec<[f32; 3]> = samples.as_slice().iter().map(|s| s.position).collect();
    let normals = estimate_normals(&positions, &topology.indices);
    timer.finish("normals");

    let vertices = pack_terrain(&samples, &normals);
    let culled_triangles = topology.culled;
    let mesh = Mesh::new(VertexLayout::Terrain, vertices, topology.indices);
    timer.finish("packing");

    log::info!(
        "island {}x{} at offset {}: {} vertices, {} triangles ({} culled), height {:.3}..{:.3}",
        config.rows,
        config.cols,
        offset,
        mesh.vertex_count(),
        mesh.triangle_count(),
        culled_triangles,
        eroded.min,
        eroded.max
    );

    Ok(Island {
        mesh,
        offset,
        island_radius: radius,
        heights: eroded,
        erosion,
        culled_triangles,
        timings: timer.timings,
    })
}

/// Generate terrain for an explicit noise offset.
pub fn generate_terrain_with_offset(config: &TerrainConfig, offset: NoiseOffset) -> Result<Mesh> {
    generate_island(config, offset).map(|island| island.mesh)
}

/// Generate terrain with the offset derived from `seed`.
pub fn generate_terrain_seeded(config: &TerrainConfig, seed: u64) -> Result<Mesh> {
    generate_terrain_with_offset(config, NoiseOffset::from_seed(seed))
}

/// Generate terrain with a fresh random offset.
pub fn generate_terrain(config: &TerrainConfig) -> Result<Mesh> {
    let seed: u64 = rand::random();
    log::info!("generating island with seed {}", seed);
    generate_terrain_seeded(config, seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TerrainError;

    fn length(v: [f32; 3]) -> f32 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    #[test]
    fn test_buffer_shapes() {
        for (rows, cols) in [(2, 2), (5, 9), (16, 16), (33, 20)] {
            let config = TerrainConfig::new(10.0, 10.0, rows, cols);
            let mesh = generate_terrain_seeded(&config, 7).unwrap();
            assert_eq!(mesh.vertex_count(), rows * cols);
            assert_eq!(mesh.vertices().len(), rows * cols * 8);
            assert_eq!(mesh.indices().len() % 3, 0);
            assert!(mesh.indices().iter().all(|&i| (i as usize) < rows * cols));
        }
    }

    #[test]
    fn test_five_by_five_scenario() {
        let config =
            TerrainConfig::new(10.0, 10.0, 5, 5).with_erosion(ErosionParams::new(0, 0.0, 0.0));
        let island = generate_island(&config, NoiseOffset::new(250.0, 500.0)).unwrap();
        let mesh = &island.mesh;

        assert_eq!(mesh.vertex_count(), 25);
        assert!((island.island_radius - 4.0).abs() < 1e-6);
        assert_eq!(mesh.triangle_count() + island.culled_triangles, 32);
        assert_eq!(island.culled_triangles, 2);

        // Center quad (1,1)-(2,2): a=6, b=11, c=12, d=7
        let triangles: Vec<[u32; 3]> = mesh.triangles().collect();
        assert!(triangles.contains(&[6, 7, 11]));
        assert!(triangles.contains(&[7, 12, 11]));

        // The (-5,-5) and (5,5) corners lose their only triangle
        let used = mesh.referenced_vertices();
        assert!(!used[0]);
        assert!(!used[24]);
        assert_eq!(mesh.normal(0), [0.0; 3]);
        assert_eq!(mesh.normal(24), [0.0; 3]);
    }

    #[test]
    fn test_normals_unit_or_zero() {
        let config = TerrainConfig::new(10.0, 10.0, 40, 40);
        let mesh = generate_terrain_seeded(&config, 99).unwrap();
        let used = mesh.referenced_vertices();
        for v in 0..mesh.vertex_count() {
            let n = mesh.normal(v);
            if used[v] {
                assert!((length(n) - 1.0).abs() < 1e-5, "vertex {} normal {:?}", v, n);
            } else {
                assert_eq!(n, [0.0; 3]);
            }
        }
    }

    #[test]
    fn test_tiny_world_keeps_unit_normals() {
        let config = TerrainConfig::new(0.001, 0.001, 11, 11).with_preset(ErosionPreset::None);
        let island = generate_island(&config, NoiseOffset::new(0.0, 0.0)).unwrap();
        let mesh = &island.mesh;
        let used = mesh.referenced_vertices();
        assert!(used.iter().any(|&u| u));
        for v in 0..mesh.vertex_count() {
            let n = mesh.normal(v);
            if used[v] {
                assert!((length(n) - 1.0).abs() < 1e-5, "vertex {} normal {:?}", v, n);
            } else {
                assert_eq!(n, [0.0; 3]);
            }
        }
    }

    #[test]
    fn test_kept_triangles_touch_the_island() {
        let config = TerrainConfig::new(12.0, 8.0, 30, 20);
        let island = generate_island(&config, NoiseOffset::from_seed(3)).unwrap();
        let mesh = &island.mesh;
        for tri in mesh.triangles() {
            assert!(tri.iter().any(|&v| {
                let [x, _, z] = mesh.position(v as usize);
                (x * x + z * z).sqrt() <= island.island_radius
            }));
        }
    }

    #[test]
    fn test_same_offset_bit_identical() {
        let config = TerrainConfig::new(10.0, 10.0, 24, 24);
        let offset = NoiseOffset::new(321.5, 17.25);
        let a = generate_terrain_with_offset(&config, offset).unwrap();
        let b = generate_terrain_with_offset(&config, offset).unwrap();
        assert_eq!(a.vertex_bytes(), b.vertex_bytes());
        assert_eq!(a.indices(), b.indices());
    }

    #[test]
    fn test_different_seeds_differ() {
        let config = TerrainConfig::new(10.0, 10.0, 24, 24);
        let meshes: Vec<Mesh> = (1..=4)
            .map(|seed| generate_terrain_seeded(&config, seed).unwrap())
            .collect();
        assert!(meshes.windows(2).any(|w| w[0].vertex_bytes() != w[1].vertex_bytes()));
    }

    #[test]
    fn test_uneroded_heights_never_negative() {
        let config = TerrainConfig::new(10.0, 10.0, 32, 32).with_preset(ErosionPreset::None);
        for seed in 0..4 {
            let island = generate_island(&config, NoiseOffset::from_seed(seed)).unwrap();
            assert!(island.heights.min >= 0.0);
            let (lo, _) = island.mesh.height_range().unwrap();
            assert!(lo >= 0.0);
        }
    }

    #[test]
    fn test_random_generation_is_valid() {
        let config = TerrainConfig::new(10.0, 10.0, 12, 12);
        let mesh = generate_terrain(&config).unwrap();
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        let err = generate_terrain_seeded(&TerrainConfig::new(10.0, 10.0, 1, 5), 0).unwrap_err();
        assert!(matches!(err, TerrainError::InvalidArgument { name: "rows", .. }));
        assert!(generate_terrain_seeded(&TerrainConfig::new(10.0, 10.0, 5, 1), 0).is_err());
        assert!(generate_terrain_seeded(&TerrainConfig::new(-10.0, 10.0, 5, 5), 0).is_err());
        assert!(generate_terrain_seeded(&TerrainConfig::new(10.0, 0.0, 5, 5), 0).is_err());
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = TerrainConfig::new(20.0, 15.0, 64, 48).with_preset(ErosionPreset::Gentle);
        let json = config.to_json_string().unwrap();
        let parsed = TerrainConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "rows": 32, "erosion": { "talus_angle": 0.1 } }"#;
        let parsed = TerrainConfig::from_json_str(json).unwrap();
        assert_eq!(parsed.rows, 32);
        assert_eq!(parsed.cols, 256);
        assert_eq!(parsed.erosion.talus_angle, 0.1);
        assert_eq!(parsed.erosion.erosion_iterations, 20);
    }

    #[test]
    fn test_json_validation_errors() {
        assert!(matches!(
            TerrainConfig::from_json_str(r#"{ "rows": 1 }"#),
            Err(TerrainError::InvalidArgument { .. })
        ));
        assert!(matches!(
            TerrainConfig::from_json_str(r#"{ "rows": -3 }"#),
            Err(TerrainError::Config(_))
        ));
    }

    #[test]
    fn test_stage_timings_recorded() {
        let config = TerrainConfig::new(10.0, 10.0, 8, 8);
        let island = generate_island(&config, NoiseOffset::default()).unwrap();
        let names: Vec<&str> = island.timings.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["lattice", "heights", "erosion", "topology", "normals", "packing"]);
    }
}
