use thiserror::Error;

/// Errors surfaced by the compute backend.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("kernel entry point not found: {0}")]
    MissingKernel(String),

    #[error("allocation failed: {0}")]
    Allocation(String),

    #[error("dispatch rejected: {0}")]
    Dispatch(String),

    #[error("present failed: {0}")]
    Present(String),
}

/// Errors originating from the frame engine.
///
/// None of these terminate anything. Configuration errors are
/// unrecoverable for the active variant (the kernel simply is not
/// there); everything else is retried naturally on the next frame
/// because the dirty flag stays set.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("kernel '{entry}' unavailable: {source}")]
    Configuration {
        entry: &'static str,
        #[source]
        source: DeviceError,
    },

    #[error("cannot render to a {width}×{height} target")]
    InvalidDimensions { width: u32, height: u32 },

    #[error(transparent)]
    Resource(#[from] DeviceError),

    #[error(transparent)]
    Core(#[from] deepzoom_core::CoreError),
}

impl EngineError {
    /// Whether the next frame's natural retry can succeed.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Configuration { .. })
    }
}
