//! Hydraulic erosion as neighbor-to-neighbor height transfer.
//!
//! Every pass, each interior lattice point sheds material to its lower
//! 8-neighbors. Deltas for pass *k* are computed entirely from the heights
//! of pass *k-1*, so the lattice is double-buffered.
//!
//! The outermost ring is a fixed boundary: it never erodes and never
//! accumulates. Material sent across the seam leaves the simulation and is
//! reported as boundary leakage.

use crate::erosion::params::{ErosionParams, TransferWeighting};
use crate::erosion::ErosionStats;
use crate::grid::{Grid, GridPair};

/// Run `params.erosion_iterations` hydraulic passes in place.
pub fn simulate(heights: &mut Grid<f32>, params: &ErosionParams) -> ErosionStats {
    let mut stats = ErosionStats::default();
    if params.erosion_iterations == 0 {
        return stats;
    }

    let rows = heights.rows;
    let cols = heights.cols;
    let mut pair = GridPair::new(std::mem::replace(heights, Grid::new_with(0, 0, 0.0)));

    for iteration in 0..params.erosion_iterations {
        let (read, write) = pair.begin_pass();
        let pass = erode_pass(read, write, params);
        pair.swap();

        log::debug!(
            "hydraulic pass {}: moved {:.4}, leaked {:.4}",
            iteration,
            pass.total_eroded,
            pass.boundary_leakage
        );
        stats.merge(&pass);
    }

    *heights = pair.into_front();
    debug_assert_eq!((heights.rows, heights.cols), (rows, cols));
    stats
}

/// One hydraulic pass: reads `read`, accumulates into `write`.
///
/// `write` must start as a copy of `read`.
pub fn erode_pass(read: &Grid<f32>, write: &mut Grid<f32>, params: &ErosionParams) -> ErosionStats {
    let mut stats = ErosionStats {
        hydraulic_passes: 1,
        ..Default::default()
    };

    let mut deltas = [0.0f32; 8];
    let mut targets = [(0usize, 0usize); 8];

    for (i, j) in read.interior() {
        let center = *read.get(i, j);

        let mut count = 0;
        let mut total = 0.0f32;
        for (ni, nj) in read.neighbors_8(i, j) {
            let drop = center - *read.get(ni, nj);
            if drop > params.slope_threshold {
                let delta = (drop * params.hydraulic_factor * 0.5).min(params.max_transfer);
                deltas[count] = delta;
                targets[count] = (ni, nj);
                count += 1;
                total += delta;
            }
        }

        if count == 0 || total <= 0.0 {
            continue;
        }

        *write.get_mut(i, j) -= total;
        stats.total_eroded += total as f64;

        for k in 0..count {
            let delta = match params.transfer_weighting {
                TransferWeighting::Trailing => deltas[count - 1],
                TransferWeighting::PerNeighbor => deltas[k],
            };
            let amount = total * (delta / total);
            stats.max_transfer = stats.max_transfer.max(amount);

            let (ni, nj) = targets[k];
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
