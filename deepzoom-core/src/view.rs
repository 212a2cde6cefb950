use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::gradient::Gradient;
use crate::variant::{FractalKind, VariantDescriptor};

/// Iteration budget domain.
pub const MIN_ITERATIONS: i32 = 1;
pub const MAX_ITERATIONS: i32 = 256;

/// Color-group count domain.
pub const MIN_GROUPS: i32 = 1;
pub const MAX_GROUPS: i32 = 10;

/// Lower bound for `pixel_size` under sustained zoom-in.
///
/// Without a floor, holding zoom long enough drives `pixel_size` to
/// zero (and a subsequent zoom-out can never recover, since every
/// delta is proportional to the current value).
pub const PIXEL_SIZE_FLOOR: f64 = 1e-300;

/// The authoritative camera and render parameters for one engine.
///
/// Exactly one writer (the input mapper, via the engine) and one reader
/// (the dispatch planner) touch this state, never concurrently. Every
/// mutation sets the dirty flag; the render cache clears it after a
/// successful dispatch. All camera scalars are kept at `f64` — the
/// narrowing to split `f32` pairs happens at dispatch time and is never
/// persisted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    kind: FractalKind,

    /// Camera center on the complex plane.
    pub center_re: f64,
    pub center_im: f64,

    /// World units per device pixel. Strictly positive.
    pub pixel_size: f64,

    /// Iteration budget (Newton) or iterations per color group.
    pub iterations: i32,

    /// Number of color groups the palette cycles through.
    pub num_groups: i32,

    /// Julia constant offset channel.
    pub shift_re: f64,
    pub shift_im: f64,

    /// Iteration exponent, for variants that expose it.
    pub power: f32,

    /// Newton root-convergence tolerance.
    pub epsilon: f32,

    /// Newton basin coloring toggle.
    pub use_basins: bool,

    pub gradient: Gradient,

    /// Output dimensions in device pixels.
    pub width: u32,
    pub height: u32,

    #[serde(skip, default = "dirty_default")]
    dirty: bool,
}

fn dirty_default() -> bool {
    // A deserialized view has no cached frame behind it.
    true
}

impl ViewState {
    /// Create a view at the variant's documented defaults.
    pub fn new(kind: FractalKind, width: u32, height: u32) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        let mut view = Self {
            kind,
            center_re: 0.0,
            center_im: 0.0,
            pixel_size: 1.0,
            iterations: MIN_ITERATIONS,
            num_groups: MIN_GROUPS,
            shift_re: 0.0,
            shift_im: 0.0,
            power: 2.0,
            epsilon: 0.0,
            use_basins: false,
            gradient: Gradient::default(),
            width,
            height,
            dirty: true,
        };
        view.reset();
        Ok(view)
    }

    pub fn kind(&self) -> FractalKind {
        self.kind
    }

    pub fn descriptor(&self) -> &'static VariantDescriptor {
        self.kind.descriptor()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Acknowledge that the cached target now reflects this state.
    /// Called by the render cache after a successful dispatch.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// The gradient LUT resolution this view calls for.
    ///
    /// Group-colored variants size the LUT to the per-group iteration
    /// count; Newton samples a fixed 256-entry ramp over its budget.
    pub fn lut_resolution(&self) -> u32 {
        if self.descriptor().schema.grouped_coloring {
            self.iterations as u32
        } else {
            256
        }
    }

    // -----------------------------------------------------------------------
    // Mutations — every one of these marks the view dirty
    // -----------------------------------------------------------------------

    /// Pan by a world-axis unit direction, scaled so apparent speed in
    /// screen pixels is independent of zoom depth.
    pub fn pan(&mut self, dx: f64, dy: f64, dt: f64, fine: bool) {
        let rates = &self.descriptor().rates;
        let modifier = if fine { rates.pan_fine } else { 1.0 };
        let amount = self.height as f64 * rates.pan * self.pixel_size * dt * modifier;
        self.center_re += dx * amount;
        self.center_im += dy * amount;
        self.dirty = true;
    }

    /// Scale-proportional zoom: `sign < 0` zooms in, `sign > 0` out.
    pub fn zoom(&mut self, sign: f64, dt: f64, fine: bool) {
        let rates = &self.descriptor().rates;
        let modifier = if fine { rates.zoom_fine } else { 1.0 };
        self.pixel_size += sign * self.pixel_size * rates.zoom * dt * modifier;
        self.pixel_size = self.pixel_size.max(PIXEL_SIZE_FLOOR);
        self.dirty = true;
    }

    /// Nudge the iteration budget, rounding to the nearest integer and
    /// clamping to the domain. The fine modifier selects the slow step.
    pub fn adjust_iterations(&mut self, sign: f64, dt: f64, fine: bool) {
        let rates = &self.descriptor().rates;
        let step = if fine { 1.0 } else { rates.iterations_coarse };
        let raw = self.iterations as f64 + sign * step * rates.iterations * dt;
        self.iterations = (raw.round() as i32).clamp(MIN_ITERATIONS, MAX_ITERATIONS);
        self.dirty = true;
    }

    /// Step the color-group count by one key edge.
    pub fn adjust_groups(&mut self, sign: i32, fine: bool) {
        let step = if fine {
            1
        } else {
            self.descriptor().rates.group_step
        };
        self.num_groups = (self.num_groups + sign * step).clamp(MIN_GROUPS, MAX_GROUPS);
        self.dirty = true;
    }

    /// Drift the iteration exponent.
    pub fn adjust_power(&mut self, sign: f32, dt: f32, fine: bool) {
        let rates = &self.descriptor().rates;
        let modifier = if fine { rates.power_fine } else { 1.0 };
        self.power += sign * rates.power * dt * modifier;
        self.dirty = true;
    }

    /// Drift the Julia constant offsets, zoom-compensated like panning.
    pub fn adjust_shift(&mut self, dx: f64, dy: f64, dt: f64, fine: bool) {
        let rates = &self.descriptor().rates;
        let modifier = if fine { rates.shift_fine } else { 1.0 };
        let amount = self.height as f64 * rates.shift * self.pixel_size * dt * modifier;
        self.shift_re += dx * amount;
        self.shift_im += dy * amount;
        self.dirty = true;
    }

    /// Recenter on a cursor position given in device pixels with a
    /// top-left origin (screen-y grows downward, imaginary axis up).
    pub fn recenter_on(&mut self, cursor_x: f64, cursor_y: f64) {
        let dx = cursor_x - self.width as f64 / 2.0;
        let dy = cursor_y - self.height as f64 / 2.0;
        self.center_re += dx * self.pixel_size;
        self.center_im -= dy * self.pixel_size;
        self.dirty = true;
    }

    /// Restore the variant's literal default table. Idempotent.
    pub fn reset(&mut self) {
        let d = &self.descriptor().defaults;
        self.center_re = d.center_re;
        self.center_im = d.center_im;
        self.pixel_size = d.vertical_span / self.height as f64;
        self.iterations = d.iterations;
        self.num_groups = d.num_groups;
        self.shift_re = 0.0;
        self.shift_im = 0.0;
        self.power = d.power;
        self.epsilon = d.epsilon;
        self.use_basins = d.use_basins;
        self.dirty = true;
        debug!(kind = ?self.kind, "view reset to defaults");
    }

    /// Record new output dimensions. The camera itself is untouched;
    /// the render cache notices the size change and reallocates.
    pub fn resize(&mut self, width: u32, height: u32) -> crate::Result<()> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        if (width, height) != (self.width, self.height) {
            self.width = width;
            self.height = height;
            self.dirty = true;
        }
        Ok(())
    }

    /// Swap in a new gradient definition.
    pub fn set_gradient(&mut self, gradient: Gradient) {
        if gradient != self.gradient {
            self.gradient = gradient;
            self.dirty = true;
        }
    }

    /// Toggle Newton basin coloring.
    pub fn toggle_basins(&mut self) {
        self.use_basins = !self.use_basins;
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 0.016;

    fn newton() -> ViewState {
        ViewState::new(FractalKind::Newton, 1920, 1080).unwrap()
    }

    fn julia() -> ViewState {
        ViewState::new(FractalKind::Julia, 1920, 1080).unwrap()
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert!(ViewState::new(FractalKind::Newton, 0, 1080).is_err());
        assert!(ViewState::new(FractalKind::Newton, 1920, 0).is_err());
    }

    #[test]
    fn newton_defaults() {
        let v = newton();
        assert_eq!(v.center_re, 0.0);
        assert_eq!(v.center_im, 0.0);
        assert_eq!(v.pixel_size, 4.0 / 1080.0);
        assert_eq!(v.iterations, 64);
        assert_eq!(v.epsilon, 0.01);
        assert!(v.use_basins);
        assert!(v.is_dirty());
    }

    #[test]
    fn julia_defaults() {
        let v = julia();
        assert_eq!(v.center_re, 0.2744);
        assert_eq!(v.center_im, 0.0057);
        assert_eq!(v.shift_re, 0.0);
        assert_eq!(v.shift_im, 0.0);
        assert_eq!(v.power, 2.0);
        assert_eq!(v.iterations, 64);
        assert_eq!(v.num_groups, 1);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut v = julia();
        v.pan(1.0, -1.0, DT, false);
        v.zoom(-1.0, DT, false);
        v.reset();
        let once = v.clone();
        v.reset();
        assert_eq!(v, once);
    }

    #[test]
    fn every_mutation_sets_dirty() {
        let mut v = julia();
        let muts: Vec<fn(&mut ViewState)> = vec![
            |v| v.pan(1.0, 0.0, DT, false),
            |v| v.zoom(1.0, DT, false),
            |v| v.adjust_iterations(1.0, DT, false),
            |v| v.adjust_groups(1, false),
            |v| v.adjust_power(1.0, DT as f32, false),
            |v| v.adjust_shift(0.0, 1.0, DT, true),
            |v| v.recenter_on(10.0, 10.0),
            |v| v.reset(),
        ];
        for m in muts {
            v.mark_clean();
            m(&mut v);
            assert!(v.is_dirty());
        }
    }

    #[test]
    fn pan_speed_constant_in_screen_pixels() {
        // At two very different zoom depths, one tick of panning must
        // cover the same number of screen pixels.
        let mut a = newton();
        let mut b = newton();
        b.pixel_size = a.pixel_size * 1e-6;
        a.pan(1.0, 0.0, DT, false);
        b.pan(1.0, 0.0, DT, false);
        let px_a = a.center_re / a.pixel_size;
        let px_b = b.center_re / b.pixel_size;
        assert!((px_a - px_b).abs() < 1e-9);
    }

    #[test]
    fn zoom_is_exponential() {
        let mut v = newton();
        let p0 = v.pixel_size;
        v.zoom(-1.0, DT, false);
        let p1 = v.pixel_size;
        v.zoom(-1.0, DT, false);
        let p2 = v.pixel_size;
        assert!(p1 < p0);
        // Equal ticks shrink by an equal factor, not an equal amount.
        assert!((p1 / p0 - p2 / p1).abs() < 1e-12);
    }

    #[test]
    fn fine_modifier_slows_zoom() {
        let mut coarse = newton();
        let mut fine = newton();
        coarse.zoom(-1.0, DT, false);
        fine.zoom(-1.0, DT, true);
        assert!(fine.pixel_size > coarse.pixel_size);
    }

    #[test]
    fn pixel_size_never_reaches_zero() {
        let mut v = newton();
        for _ in 0..1_000_000 {
            v.zoom(-1.0, 0.25, false);
        }
        assert!(v.pixel_size > 0.0);
        assert!(v.pixel_size >= PIXEL_SIZE_FLOOR);
    }

    #[test]
    fn iterations_clamped_under_adversarial_adjustment() {
        let mut v = julia();
        for _ in 0..10_000 {
            v.adjust_iterations(1.0, 1.0, false);
        }
        assert_eq!(v.iterations, MAX_ITERATIONS);
        for _ in 0..10_000 {
            v.adjust_iterations(-1.0, 1.0, false);
        }
        assert_eq!(v.iterations, MIN_ITERATIONS);
    }

    #[test]
    fn groups_clamped_under_adversarial_adjustment() {
        let mut v = julia();
        for _ in 0..100 {
            v.adjust_groups(1, false);
        }
        assert_eq!(v.num_groups, MAX_GROUPS);
        for _ in 0..100 {
            v.adjust_groups(-1, true);
        }
        assert_eq!(v.num_groups, MIN_GROUPS);
    }

    #[test]
    fn iteration_adjustment_rounds_to_nearest() {
        let mut v = julia();
        // One coarse 16 ms tick: 4 * 100 * 0.016 = 6.4 → rounds to +6.
        v.adjust_iterations(1.0, DT, false);
        assert_eq!(v.iterations, 70);
        // One fine tick: 100 * 0.016 = 1.6 → rounds to +2.
        v.adjust_iterations(1.0, DT, true);
        assert_eq!(v.iterations, 72);
    }

    #[test]
    fn recenter_moves_toward_cursor() {
        let mut v = ViewState::new(FractalKind::Mandelbrot, 1000, 800).unwrap();
        // Cursor at the top-right quadrant: +re, +im.
        v.recenter_on(750.0, 200.0);
        assert!((v.center_re - 250.0 * v.pixel_size).abs() < 1e-12);
        assert!((v.center_im - 200.0 * v.pixel_size).abs() < 1e-12);
    }

    #[test]
    fn recenter_at_screen_center_is_noop_in_position() {
        let mut v = ViewState::new(FractalKind::Mandelbrot, 1000, 800).unwrap();
        v.mark_clean();
        v.recenter_on(500.0, 400.0);
        assert_eq!(v.center_re, 0.0);
        assert_eq!(v.center_im, 0.0);
        assert!(v.is_dirty());
    }

    #[test]
    fn resize_same_dims_stays_clean() {
        let mut v = newton();
        v.mark_clean();
        v.resize(1920, 1080).unwrap();
        assert!(!v.is_dirty());
        v.resize(1280, 720).unwrap();
        assert!(v.is_dirty());
        assert_eq!((v.width, v.height), (1280, 720));
    }

    #[test]
    fn lut_resolution_per_variant() {
        let mut j = julia();
        j.iterations = 48;
        assert_eq!(j.lut_resolution(), 48);
        let mut n = newton();
        n.iterations = 48;
        assert_eq!(n.lut_resolution(), 256);
    }

    #[test]
    fn set_gradient_only_dirties_on_change() {
        let mut v = julia();
        v.mark_clean();
        v.set_gradient(v.gradient.clone());
        assert!(!v.is_dirty());
    }

    #[test]
    fn serde_round_trip_restores_camera() {
        let mut v = julia();
        v.pan(1.0, 1.0, DT, false);
        v.zoom(-1.0, DT, false);
        let json = serde_json::to_string(&v).unwrap();
        let back: ViewState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.center_re, v.center_re);
        assert_eq!(back.pixel_size, v.pixel_size);
        // A restored view always needs its first recompute.
        assert!(back.is_dirty());
    }
}
