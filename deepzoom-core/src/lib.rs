pub mod error;
pub mod gradient;
pub mod split;
pub mod variant;
pub mod view;

// Re-export primary types for convenience.
pub use error::CoreError;
pub use gradient::{Gradient, GradientStop, Rgba8};
pub use split::SplitF32;
pub use variant::{DefaultTable, FractalKind, MotionRates, ParamSchema, VariantDescriptor};
pub use view::ViewState;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
