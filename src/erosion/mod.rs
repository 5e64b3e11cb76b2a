//! Erosion simulation module
//!
//! Two complementary stages run back to back on the height lattice:
//! - **Hydraulic erosion**: iterative downhill height transfer between neighbors
//! - **Thermal erosion**: slope collapse wherever the drop exceeds the talus angle
//!
//! Both stages double-buffer the lattice and leave the outermost ring fixed.

pub mod hydraulic;
pub mod params;
pub mod thermal;

pub use params::{ErosionParams, ErosionPreset, TransferWeighting};

use serde::Serialize;

use crate::grid::Grid;

/// Statistics from erosion simulation
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ErosionStats {
    /// Hydraulic passes run
    pub hydraulic_passes: usize,
    /// Thermal passes run
    pub thermal_passes: usize,
    /// Total material removed from interior points
    pub total_eroded: f64,
    /// Total material that landed on interior points
    pub total_deposited: f64,
    /// Material sent into the fixed border ring
    pub boundary_leakage: f64,
    /// Largest single neighbor transfer
    pub max_transfer: f32,
}

impl ErosionStats {
    /// Fold another stage's or pass's stats into this one.
    pub fn merge(&mut self, other: &ErosionStats) {
        self.hydraulic_passes += other.hydraulic_passes;
        self.thermal_passes += other.thermal_passes;
        self.total_eroded += other.total_eroded;
        self.total_deposited += other.total_deposited;
        self.boundary_leakage += other.boundary_leakage;
        self.max_transfer = self.max_transfer.max(other.max_transfer);
    }
}

/// Run hydraulic erosion followed by thermal erosion.
pub fn simulate_erosion(heights: &mut Grid<f32>, params: &ErosionParams) -> ErosionStats {
    let mut stats = ErosionStats::default();

    let hydraulic_stats = hydraulic::simulate(heights, params);
    log::debug!(
        "hydraulic erosion: {} passes, eroded {:.3}, deposited {:.3}",
        hydraulic_stats.hydraulic_passes,
        hydraulic_stats.total_eroded,
        hydraulic_stats.total_deposited
    );
    stats.merge(&hydraulic_stats);

    let thermal_stats = thermal::simulate(heights, params);
    log::debug!(
        "thermal erosion: {} passes, moved {:.3}",
        thermal_stats.thermal_passes,
        thermal_stats.total_eroded
    );
    stats.merge(&thermal_stats);

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_accumulates() {
        let mut a = ErosionStats {
            hydraulic_passes: 2,
            total_eroded: 1.0,
            max_transfer: 0.05,
            ..Default::default()
        };
        let b = ErosionStats {
            thermal_passes: 3,
            total_eroded: 0.5,
            boundary_leakage: 0.25,
            max_transfer: 0.4,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.hydraulic_passes, 2);
        assert_eq!(a.thermal_passes, 3);
        assert_eq!(a.total_eroded, 1.5);
        assert_eq!(a.boundary_leakage, 0.25);
        assert_eq!(a.max_transfer, 0.4);
    }

    #[test]
    fn test_full_erosion_runs_both_stages() {
        let mut heights = Grid::new_with(9, 9, 0.0f32);
        heights.set(4, 4, 2.0);
        let stats = simulate_erosion(&mut heights, &ErosionParams::default());
        assert_eq!(stats.hydraulic_passes, 20);
        assert_eq!(stats.thermal_passes, 3);
        assert!(*heights.get(4, 4) < 2.0);
    }

    #[test]
    fn test_none_preset_leaves_heights_alone() {
        let mut heights = Grid::new_with(6, 6, 0.0f32);
        heights.set(2, 3, 1.0);
        let before = heights.clone();
        let params = ErosionParams::from_preset(ErosionPreset::None);
        let stats = simulate_erosion(&mut heights, &params);
        assert_eq!(heights, before);
        assert_eq!(stats, ErosionStats::default());
    }
}
