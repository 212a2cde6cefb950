use deepzoom_core::{GradientStop, ViewState};
use tracing::{debug, warn};

use crate::device::ComputeDevice;
use crate::dispatch::{grid_for, plan, sample_lut};
use crate::error::{DeviceError, EngineError};

/// An owned off-screen target plus what we know about its contents.
struct TargetSlot<T> {
    handle: T,
    width: u32,
    height: u32,
    /// Set after the first completed dispatch. An allocated-but-never-
    /// written target is never presented.
    valid: bool,
}

/// An owned gradient LUT plus the definition it was built from.
struct LutSlot<L> {
    handle: L,
    len: u32,
    stops: Vec<GradientStop>,
}

/// Owns the cached render target and gradient LUT, and decides when
/// the expensive kernel actually has to run.
///
/// The core performance invariant lives here: recompute cost is
/// O(dirty transitions), not O(frames). A static camera presents the
/// same target every frame without touching the kernel.
pub struct RenderCache<D: ComputeDevice> {
    target: Option<TargetSlot<D::Target>>,
    lut: Option<LutSlot<D::Lut>>,
}

impl<D: ComputeDevice> RenderCache<D> {
    pub fn new() -> Self {
        Self {
            target: None,
            lut: None,
        }
    }

    /// Whether the cached target holds at least one completed dispatch.
    pub fn has_valid_target(&self) -> bool {
        self.target.as_ref().is_some_and(|t| t.valid)
    }

    /// Bring the cached target up to date with the view.
    ///
    /// Returns `Ok(true)` when a dispatch was issued, `Ok(false)` when
    /// the cache was reused verbatim. On error nothing is cleared: the
    /// view stays dirty and the next frame retries, while the last
    /// valid target (if any) remains presentable. The one exception is
    /// a resize whose reallocation fails: the old target has already
    /// been released (it must be, to avoid leaking GPU memory), so that
    /// tick presents nothing and the stale frame is sacrificed until
    /// the retry succeeds.
    pub fn sync(&mut self, device: &mut D, view: &mut ViewState) -> Result<bool, EngineError> {
        let (width, height) = (view.width, view.height);
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }

        // Borrow the two slots separately so each stays bound from its
        // fill site through the dispatch below.
        let Self { target, lut } = self;

        let (target, stale_target) = match target.take() {
            Some(slot) if slot.width == width && slot.height == height => {
                (target.insert(slot), false)
            }
            prior => {
                // Release before reallocating; a failed allocation
                // leaves the slot empty rather than pointing at freed
                // memory.
                if let Some(slot) = prior {
                    device.release_target(slot.handle);
                }
                let handle = device.create_target(width, height)?;
                debug!(width, height, "allocated render target");
                let slot = TargetSlot {
                    handle,
                    width,
                    height,
                    valid: false,
                };
                (target.insert(slot), true)
            }
        };

        let lut = Self::sync_lut(lut, device, view)?;

        if !view.is_dirty() && !stale_target {
            return Ok(false);
        }

        let descriptor = view.descriptor();
        let kernel = device
            .find_kernel(descriptor.kernel_entry)
            .map_err(|source| EngineError::Configuration {
                entry: descriptor.kernel_entry,
                source,
            })?;

        let params = plan(view, descriptor);
        let grid = grid_for(width, height, descriptor.local_group_size);

        device.dispatch(&kernel, &target.handle, &lut.handle, &params, grid)?;

        target.valid = true;
        view.mark_clean();
        debug!(
            entry = descriptor.kernel_entry,
            grid_x = grid.x,
            grid_y = grid.y,
            iterations = params.iterations,
            "dispatched fractal kernel"
        );
        Ok(true)
    }

    /// Rebuild the gradient LUT if its resolution or the stop
    /// definition changed since the last build, and hand back the live
    /// slot either way.
    fn sync_lut<'a>(
        slot: &'a mut Option<LutSlot<D::Lut>>,
        device: &mut D,
        view: &ViewState,
    ) -> Result<&'a LutSlot<D::Lut>, DeviceError> {
        let len = view.lut_resolution();
        let stops = view.gradient.stops();
        let live = match slot.take() {
            Some(prior) if prior.len == len && prior.stops == stops => prior,
            prior => {
                if let Some(prior) = prior {
                    device.release_lut(prior.handle);
                }
                let handle = device.create_lut(len)?;
                let colors = sample_lut(view, len);
                device.upload_lut(&handle, &colors)?;
                debug!(len, "rebuilt gradient LUT");
                LutSlot {
                    handle,
                    len,
                    stops: stops.to_vec(),
                }
            }
        };
        Ok(slot.insert(live))
    }

    /// Blit the cached target to the display. Runs every frame,
    /// independent of dirty state — this is what keeps a static camera
    /// at full frame rate. Returns whether a frame was presented.
    pub fn present(&self, device: &mut D) -> bool {
        let Some(slot) = &self.target else {
            return false;
        };
        if !slot.valid {
            return false;
        }
        match device.present(&slot.handle) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "present failed, dropping frame");
                false
            }
        }
    }

    /// Hand every owned GPU handle back to the device.
    pub fn release(&mut self, device: &mut D) {
        if let Some(slot) = self.target.take() {
            device.release_target(slot.handle);
        }
        if let Some(slot) = self.lut.take() {
            device.release_lut(slot.handle);
        }
    }
}

impl<D: ComputeDevice> Default for RenderCache<D> {
    fn default() -> Self {
        Self::new()
    }
}
