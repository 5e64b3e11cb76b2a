//! Erosion simulation parameters and configuration

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, Result, TerrainError};

/// How a center point's outgoing material is split among its downhill
/// neighbors during hydraulic erosion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferWeighting {
    /// Every receiving neighbor gets the weight of the last recorded delta.
    /// Not mass-conserving when deltas differ; reproduces existing islands.
    #[default]
    Trailing,
    /// Each receiving neighbor gets its own delta.
    PerNeighbor,
}

/// Erosion intensity preset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErosionPreset {
    /// No erosion - raw terrain
    None,
    /// Light smoothing
    Gentle,
    /// Balanced erosion
    #[default]
    Normal,
    /// Long simulation with a low talus angle
    Dramatic,
}

impl ErosionPreset {
    pub fn all() -> &'static [Self] {
        &[Self::None, Self::Gentle, Self::Normal, Self::Dramatic]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::None => "No erosion (raw terrain)",
            Self::Gentle => "Light smoothing",
            Self::Normal => "Balanced erosion",
            Self::Dramatic => "Worn-down slopes and wide shelves",
        }
    }
}

impl std::fmt::Display for ErosionPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Gentle => write!(f, "gentle"),
            Self::Normal => write!(f, "normal"),
            Self::Dramatic => write!(f, "dramatic"),
        }
    }
}

impl std::str::FromStr for ErosionPreset {
    type Err = TerrainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|preset| preset.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                TerrainError::invalid(
                    "preset",
                    format!(
                        "unknown erosion preset '{}' (expected none, gentle, normal or dramatic)",
                        s
                    ),
                )
            })
    }
}

/// Erosion simulation parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErosionParams {
    // =========================================================================
    // Hydraulic Erosion Parameters
    // =========================================================================

    /// Number of hydraulic passes over the lattice
    pub erosion_iterations: usize,

    /// Fraction of the height difference moved per neighbor (halved again
    /// before the per-step cap is applied)
    pub hydraulic_factor: f32,

    /// Neighbors must be lower than the center by more than this
    pub slope_threshold: f32,

    /// Hard cap on a single neighbor transfer
    pub max_transfer: f32,

    /// Split policy for outgoing material
    pub transfer_weighting: TransferWeighting,

    // =========================================================================
    // Thermal Erosion Parameters
    // =========================================================================

    /// Number of talus passes
    pub thermal_passes: usize,

    /// Maximum stable slope between neighbors
    pub talus_angle: f32,
}

impl Default for ErosionParams {
    fn default() -> Self {
        Self {
            erosion_iterations: 20,
            hydraulic_factor: 0.5,
            slope_threshold: 0.01,
            max_transfer: 0.05,
            transfer_weighting: TransferWeighting::Trailing,
            thermal_passes: 3,
            talus_angle: 0.2,
        }
    }
}

impl ErosionParams {
    /// Parameters matching `generate_terrain(.., iterations, factor, talus)`.
    pub fn new(erosion_iterations: usize, hydraulic_factor: f32, talus_angle: f32) -> Self {
        Self {
            erosion_iterations,
            hydraulic_factor,
            talus_angle,
            ..Default::default()
        }
    }

    /// Create parameters from a preset
    pub fn from_preset(preset: ErosionPreset) -> Self {
        match preset {
            ErosionPreset::None => Self {
                erosion_iterations: 0,
                thermal_passes: 0,
                ..Default::default()
            },
            ErosionPreset::Gentle => Self {
                erosion_iterations: 8,
                hydraulic_factor: 0.3,
                thermal_passes: 1,
                talus_angle: 0.35,
                ..Default::default()
            },
            ErosionPreset::Normal => Self::default(),
            ErosionPreset::Dramatic => Self {
                erosion_iterations: 60,
                hydraulic_factor: 0.8,
                thermal_passes: 6,
                talus_angle: 0.1,
                ..Default::default()
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("hydraulic_factor", self.hydraulic_factor)?;
        ensure_non_negative("slope_threshold", self.slope_threshold)?;
        ensure_non_negative("max_transfer", self.max_transfer)?;
        ensure_non_negative("talus_angle", self.talus_angle)?;
        Ok(())
    }
}
