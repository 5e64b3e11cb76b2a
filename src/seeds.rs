//! Seed management for island generation
//!
//! The random spatial offset is the only nondeterministic input to the
//! pipeline. Everything here exists so that offset can be pinned down.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) of the per-run noise offset.
pub const OFFSET_RANGE: f32 = 1000.0;

/// Spatial offset added to lattice coordinates before sampling noise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseOffset {
    pub x: f32,
    pub z: f32,
}

impl NoiseOffset {
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Draw both components uniformly from `[0, 1000)`.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let x = rng.gen_range(0.0..OFFSET_RANGE);
        let z = rng.gen_range(0.0..OFFSET_RANGE);
        Self { x, z }
    }

    /// Reproducible offset for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::sample(&mut rng)
    }
}

impl std::fmt::Display for NoiseOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.z)
    }
}

/// Seeds for the randomized parts of generation.
///
/// Sub-seeds are derived from a master seed by default and can be
/// overridden individually.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Per-run spatial noise offset
    pub offset: u64,
    /// Perlin permutation table
    pub noise: u32,
}

impl TerrainSeeds {
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            offset: derive_seed(master, OFFSET_STREAM),
            noise: derive_seed(master, NOISE_STREAM) as u32,
        }
    }

    pub fn builder(master: u64) -> TerrainSeedsBuilder {
        TerrainSeedsBuilder::new(master)
    }

    pub fn noise_offset(&self) -> NoiseOffset {
        NoiseOffset::from_seed(self.offset)
    }
}

impl Default for TerrainSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// Builder for overriding individual seeds while deriving others from master
pub struct TerrainSeedsBuilder {
    seeds: TerrainSeeds,
}

impl TerrainSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: TerrainSeeds::from_master(master),
        }
    }

    pub fn offset(mut self, seed: u64) -> Self {
        self.seeds.offset = seed;
        self
    }

    pub fn noise(mut self, seed: u32) -> Self {
        self.seeds.noise = seed;
        self
    }

    pub fn build(self) -> TerrainSeeds {
        self.seeds
    }
}

/// ChaCha stream reserved for each derived seed.
const OFFSET_STREAM: u64 = 1;
const NOISE_STREAM: u64 = 2;

/// Derive a sub-seed from a master seed on its own ChaCha stream.
///
/// ChaCha output is fixed by its algorithm, so derived seeds do not change
/// between toolchains.
fn derive_seed(master: u64, stream: u64) -> u64 {
    let mut rng = ChaCha8Rng::seed_from_u64(master);
    rng.set_stream(stream);
    rng.next_u64()
}

impl std::fmt::Display for TerrainSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TerrainSeeds {{ master: {}, offset: {}, noise: {} }}",
            self.master, self.offset, self.noise,
        )
    }
}
