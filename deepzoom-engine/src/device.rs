use deepzoom_core::Rgba8;

use crate::dispatch::{GridSize, KernelParams};
use crate::error::DeviceError;

/// The external compute backend the engine drives.
///
/// Designed for **static dispatch** — the engine is generic over
/// `D: ComputeDevice` so a backend's handle types stay zero-cost and
/// the per-frame path can be inlined. The per-pixel iteration math
/// lives entirely behind [`dispatch`](Self::dispatch); this host only
/// plans parameters and grids.
///
/// Ordering contract: the writes of a `dispatch` must be visible to a
/// later `present` of the same target. Backends whose queues do not
/// already guarantee this must insert the appropriate barrier
/// themselves — the engine models no explicit fence.
pub trait ComputeDevice {
    /// Off-screen render target handle.
    type Target;

    /// Gradient lookup texture handle.
    type Lut;

    /// Kernel entry-point handle.
    type Kernel;

    /// Allocate a target sized to the output dimensions.
    fn create_target(&mut self, width: u32, height: u32) -> Result<Self::Target, DeviceError>;

    /// Release a target. Must be called before reallocation so resizes
    /// do not leak GPU memory.
    fn release_target(&mut self, target: Self::Target);

    /// Allocate a 1-D lookup texture of `len` texels.
    fn create_lut(&mut self, len: u32) -> Result<Self::Lut, DeviceError>;

    fn release_lut(&mut self, lut: Self::Lut);

    /// Upload sampled gradient colors into the LUT.
    fn upload_lut(&mut self, lut: &Self::Lut, colors: &[Rgba8]) -> Result<(), DeviceError>;

    /// Resolve a kernel entry point by name.
    fn find_kernel(&mut self, entry: &str) -> Result<Self::Kernel, DeviceError>;

    /// Launch `grid` workgroups of the kernel with the given parameter
    /// set, writing into `target` and sampling `lut`.
    fn dispatch(
        &mut self,
        kernel: &Self::Kernel,
        target: &Self::Target,
        lut: &Self::Lut,
        params: &KernelParams,
        grid: GridSize,
    ) -> Result<(), DeviceError>;

    /// Copy a completed target to the display surface.
    fn present(&mut self, target: &Self::Target) -> Result<(), DeviceError>;
}
