pub mod cache;
pub mod device;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod input;

// Re-export primary types for convenience.
pub use cache::RenderCache;
pub use device::ComputeDevice;
pub use dispatch::{grid_for, plan, sample_lut, GridSize, KernelParams, ScalarUniform};
pub use engine::{Engine, FrameOutcome};
pub use error::{DeviceError, EngineError};
pub use input::{map_input, InputSnapshot, Intent, Key};

/// Convenience result type for the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;
