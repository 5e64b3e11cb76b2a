//! Error types for island generation

use thiserror::Error;

/// Errors raised while generating or exporting terrain.
///
/// Generation itself is pure computation: once arguments pass validation
/// nothing inside the pipeline can fail.
#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl TerrainError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        TerrainError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type alias for terrain operations
pub type Result<T> = std::result::Result<T, TerrainError>;

/// Reject non-finite or non-positive extents.
pub(crate) fn ensure_positive(name: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(TerrainError::invalid(
            name,
            format!("must be a positive finite number, got {}", value),
        ));
    }
    Ok(())
}

/// Reject non-finite or negative tuning values.
pub(crate) fn ensure_non_negative(name: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(TerrainError::invalid(
            name,
            format!("must be a non-negative finite number, got {}", value),
        ));
    }
    Ok(())
}
