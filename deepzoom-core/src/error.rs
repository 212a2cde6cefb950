use thiserror::Error;

/// Errors originating from the core camera/state layer.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid viewport dimensions: {width}×{height} (must be > 0)")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("gradient needs at least one stop")]
    EmptyGradient,

    #[error("gradient stop position {0} outside [0, 1]")]
    StopOutOfRange(f32),
}
