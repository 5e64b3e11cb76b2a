use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, Result, TerrainError};
use crate::grid::{Grid, HeightSample};
use crate::seeds::NoiseOffset;

// =============================================================================
// NOISE PARAMETERS
// =============================================================================

/// Parameters for height field synthesis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Base frequency applied to world coordinates
    pub scale: f64,
    /// Peak height of the island before erosion
    pub amplitude: f32,
    /// Number of noise octaves
    pub octaves: u32,
    /// Amplitude decay per octave
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
    /// Island radius as a fraction of the larger world extent
    pub island_radius_factor: f32,
    /// Perlin permutation seed
    pub noise_seed: u32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 0.5,
            amplitude: 3.0,
            octaves: 3,
            persistence: 0.5,
            lacunarity: 2.0,
            island_radius_factor: 0.4,
            noise_seed: 0,
        }
    }
}

impl NoiseParams {
    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(TerrainError::invalid(
                "scale",
                format!("must be a positive finite number, got {}", self.scale),
            ));
        }
        ensure_non_negative("amplitude", self.amplitude)?;
        ensure_positive("island_radius_factor", self.island_radius_factor)?;
        if self.octaves == 0 {
            return Err(TerrainError::invalid("octaves", "at least one octave is required"));
        }
        Ok(())
    }
}

/// Heights at or below this are flat sea floor.
pub const SEA_LEVEL: f32 = 0.0;

// =============================================================================
// ISLAND MASK
// =============================================================================

/// Radius of the island silhouette for a world of the given extent.
pub fn island_radius(width: f32, depth: f32, params: &NoiseParams) -> f32 {
    params.island_radius_factor * width.max(depth)
}

/// Squared radial falloff: 1 at the center, 0 at and beyond `radius`.
pub fn island_falloff(x: f32, z: f32, radius: f32) -> f32 {
    let dist = (x * x + z * z).sqrt();
    let t = dist / radius;
    (1.0 - t * t).clamp(0.0, 1.0)
}

// =============================================================================
// NOISE FUNCTIONS
// =============================================================================

/// Fractal sum of 3D Perlin noise sampled in the y = 0 plane.
///
/// Octave `o` is weighted by `persistence^o` and sampled at
/// `lacunarity^o` times the base frequency. The sum is not normalized;
/// callers clamp it.
fn fractal_noise(noise: &Perlin, x: f64, z: f64, params: &NoiseParams) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;

    for _ in 0..params.octaves {
        let f = params.scale * frequency;
        total += amplitude * noise.get([x * f, 0.0, z * f]);
        amplitude *= params.persistence;
        frequency *= params.lacunarity;
    }

    total
}

// =============================================================================
// HEIGHT FIELD SYNTHESIS
// =============================================================================

/// Compute pre-erosion heights for every lattice point.
///
/// Layers:
/// 1. Fractal Perlin noise at the offset position, clamped to [-1, 1]
/// 2. Scaled by amplitude and the radial island falloff
/// 3. Floored at sea level
pub fn synthesize_heights(
    samples: &Grid<HeightSample>,
    island_radius: f32,
    offset: NoiseOffset,
    params: &NoiseParams,
) -> Grid<f32> {
    let noise = Perlin::new(params.noise_seed);

    samples.map(|sample| {
        let [x, _, z] = sample.position;
        let n = fractal_noise(
            &noise,
            (x + offset.x) as f64,
            (z + offset.z) as f64,
            params,
        )
        .clamp(-1.0, 1.0) as f32;

        let raw = n * params.amplitude * island_falloff(x, z, island_radius);
        raw.max(SEA_LEVEL)
    })
}

/// Write a height grid back into the lattice samples.
pub fn apply_heights(samples: &mut Grid<HeightSample>, heights: &Grid<f32>) {
    for (sample, &h) in samples.as_mut_slice().iter_mut().zip(heights.as_slice()) {
        sample.position[1] = h;
    }
}

/// Summary of a height field, mostly for logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct HeightStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    /// Fraction of samples strictly above sea level
    pub land_fraction: f32,
}

impl HeightStats {
    pub fn from_heights<'a>(heights: impl IntoIterator<Item = &'a f32>) -> Self {
        let mut min_h = f32::MAX;
        let mut max_h = f32::MIN;
        let mut sum = 0.0f64;
        let mut land = 0usize;
        let mut count = 0usize;

        for &h in heights {
            min_h = min_h.min(h);
            max_h = max_h.max(h);
            if h > SEA_LEVEL {
                land += 1;
            }
            sum += h as f64;
            count += 1;
        }

        if count == 0 {
            return Self::default();
        }

        Self {
            min: min_h,
            max: max_h,
            mean: (sum / count as f64) as f32,
            land_fraction: land as f32 / count as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::initialize_lattice;

    #[test]
    fn test_falloff_profile() {
        assert_eq!(island_falloff(0.0, 0.0, 4.0), 1.0);
        assert!((island_falloff(2.0, 0.0, 4.0) - 0.75).abs() < 1e-6);
        assert_eq!(island_falloff(4.0, 0.0, 4.0), 0.0);
        assert_eq!(island_falloff(5.0, 5.0, 4.0), 0.0);
    }

    #[test]
    fn test_island_radius_uses_larger_extent() {
        let params = NoiseParams::default();
        assert!((island_radius(10.0, 25.0, &params) - 10.0).abs() < 1e-6);
        assert!((island_radius(10.0, 10.0, &params) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_heights_never_below_sea_level() {
        let samples = initialize_lattice(10.0, 10.0, 40, 40).unwrap();
        let params = NoiseParams::default();
        for seed in 0..8 {
            let heights = synthesize_heights(&samples, 4.0, NoiseOffset::from_seed(seed), &params);
            assert!(heights.as_slice().iter().all(|&h| h >= 0.0));
        }
    }

    #[test]
    fn test_heights_bounded_by_amplitude() {
        let samples = initialize_lattice(10.0, 10.0, 32, 32).unwrap();
        let params = NoiseParams::default();
        let heights = synthesize_heights(&samples, 4.0, NoiseOffset::new(12.5, 700.25), &params);
        assert!(heights.as_slice().iter().all(|&h| h <= params.amplitude));
    }

    #[test]
    fn test_outside_radius_is_flat() {
        let samples = initialize_lattice(10.0, 10.0, 21, 21).unwrap();
        let radius = 4.0;
        let offset = NoiseOffset::new(3.3, 9.9);
        let heights = synthesize_heights(&samples, radius, offset, &NoiseParams::default());
        for (i, j, sample) in samples.iter() {
            if sample.planar_distance() >= radius {
                assert_eq!(*heights.get(i, j), 0.0);
            }
        }
    }

    #[test]
    fn test_same_offset_is_bit_identical() {
        let samples = initialize_lattice(10.0, 10.0, 16, 16).unwrap();
        let params = NoiseParams::default();
        let offset = NoiseOffset::new(123.456, 789.012);
        let a = synthesize_heights(&samples, 4.0, offset, &params);
        let b = synthesize_heights(&samples, 4.0, offset, &params);
        let bits_a: Vec<u32> = a.as_slice().iter().map(|h| h.to_bits()).collect();
        let bits_b: Vec<u32> = b.as_slice().iter().map(|h| h.to_bits()).collect();
        assert_eq!(bits_a, bits_b);
    }

    #[test]
    fn test_height_stats() {
        let stats = HeightStats::from_heights(&[0.0, 1.0, 2.0, 0.0]);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 2.0);
        assert!((stats.mean - 0.75).abs() < 1e-6);
        assert!((stats.land_fraction - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_params_validation() {
        assert!(NoiseParams::default().validate().is_ok());
        let bad = NoiseParams { octaves: 0, ..Default::default() };
        assert!(bad.validate().is_err());
        let bad = NoiseParams { scale: -1.0, ..Default::default() };
        assert!(bad.validate().is_err());
    }
}
