//! Thermal erosion: slope collapse above the talus angle.
//!
//! Wherever the drop from an interior point to a neighbor exceeds the talus
//! angle, half of the excess slides to the neighbor. Slides from several
//! neighbors accumulate in the same pass without normalization, so this is
//! local smoothing rather than mass-balanced transport.

use crate::erosion::params::ErosionParams;
use crate::erosion::ErosionStats;
use crate::grid::{Grid, GridPair};

/// Run `params.thermal_passes` talus passes in place.
pub fn simulate(heights: &mut Grid<f32>, params: &ErosionParams) -> ErosionStats {
    let mut stats = ErosionStats::default();
    if params.thermal_passes == 0 {
        return stats;
    }

    let mut pair = GridPair::new(std::mem::replace(heights, Grid::new_with(0, 0, 0.0)));
    for pass in 0..params.thermal_passes {
        let (read, write) = pair.begin_pass();
        let pass_stats = collapse_pass(read, write, params.talus_angle);
        pair.swap();

        log::debug!("thermal pass {}: moved {:.4}", pass, pass_stats.total_eroded);
        stats.merge(&pass_stats);
    }

    *heights = pair.into_front();
    stats
}

/// One talus pass: reads `read`, accumulates into `write`.
///
/// `write` must start as a copy of `read`.
pub fn collapse_pass(read: &Grid<f32>, write: &mut Grid<f32>, talus_angle: f32) -> ErosionStats {
    let mut stats = ErosionStats {
        thermal_passes: 1,
        ..Default::default()
    };

    for (i, j) in read.interior() {
        let center = *read.get(i, j);
        for (ni, nj) in read.neighbors_8(i, j) {
            let slope = center - *read.get(ni, nj);
            if slope <= talus_angle {
                continue;
            }

            let amount = (slope - talus_angle) * 0.5;
            *write.get_mut(i, j) -= amount;
            stats.total_eroded += amount as f64;
            stats.max_transfer = stats.max_transfer.max(amount);

            if write.is_interior(ni, nj) {
                *write.get_mut(ni, nj) += amount;
                stats.total_deposited += amount as f64;
            } else {
                stats.boundary_leakage += amount as f64;
            }
        }
    }

    stats
}
