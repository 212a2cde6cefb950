use deepzoom_core::{FractalKind, ViewState};
use tracing::{error, info, warn};

use crate::cache::RenderCache;
use crate::device::ComputeDevice;
use crate::input::{map_input, InputSnapshot, Intent};

/// What one tick actually did, for HUDs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOutcome {
    /// A kernel dispatch was issued this frame.
    pub dispatched: bool,
    /// The cached target was blitted to the display.
    pub presented: bool,
}

/// One fractal engine instance: camera state, cache, and the device.
///
/// Tick-driven and single-threaded: input sampling, state mutation,
/// conditional recompute, and presentation run in sequence inside
/// [`tick`](Self::tick). The view has exactly one writer (the input
/// mapper, through here) and one reader (the dispatch planner), never
/// concurrently active, so there is nothing to lock.
pub struct Engine<D: ComputeDevice> {
    device: D,
    view: ViewState,
    cache: RenderCache<D>,
}

impl<D: ComputeDevice> Engine<D> {
    /// Activate a variant at its default view.
    pub fn new(device: D, kind: FractalKind, width: u32, height: u32) -> crate::Result<Self> {
        let view = ViewState::new(kind, width, height)?;
        info!(?kind, width, height, "fractal engine activated");
        Ok(Self {
            device,
            view,
            cache: RenderCache::new(),
        })
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// The display surface changed size.
    pub fn resize(&mut self, width: u32, height: u32) -> crate::Result<()> {
        self.view.resize(width, height)?;
        Ok(())
    }

    /// Run one logical frame: map input to mutations, recompute the
    /// cached target if anything went stale, then present.
    ///
    /// Never fails. Recompute errors degrade to a skipped update — the
    /// dirty flag stays set, the last frame stays on screen, and the
    /// next tick retries.
    pub fn tick(&mut self, input: &InputSnapshot, dt: f64) -> FrameOutcome {
        for intent in map_input(input, &self.view.descriptor().schema) {
            self.apply(intent, input, dt);
        }

        let dispatched = match self.cache.sync(&mut self.device, &mut self.view) {
            Ok(dispatched) => dispatched,
            Err(err) if err.is_recoverable() => {
                warn!(%err, "skipping recompute this frame");
                false
            }
            Err(err) => {
                error!(%err, "variant cannot render");
                false
            }
        };

        let presented = self.cache.present(&mut self.device);
        FrameOutcome {
            dispatched,
            presented,
        }
    }

    fn apply(&mut self, intent: Intent, input: &InputSnapshot, dt: f64) {
        let fine = input.fine;
        match intent {
            Intent::Pan { dx, dy } => self.view.pan(dx, dy, dt, fine),
            Intent::Zoom { sign } => self.view.zoom(sign, dt, fine),
            Intent::Shift { dx, dy } => self.view.adjust_shift(dx, dy, dt, fine),
            Intent::AdjustIterations { sign } => self.view.adjust_iterations(sign, dt, fine),
            Intent::AdjustPower { sign } => self.view.adjust_power(sign, dt as f32, fine),
            Intent::StepGroups { sign } => self.view.adjust_groups(sign, fine),
            Intent::Recenter { x, y } => self.view.recenter_on(x, y),
            Intent::Reset => self.view.reset(),
        }
    }
}

impl<D: ComputeDevice> Drop for Engine<D> {
    fn drop(&mut self) {
        self.cache.release(&mut self.device);
    }
}
