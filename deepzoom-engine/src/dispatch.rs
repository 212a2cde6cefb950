use deepzoom_core::{Rgba8, SplitF32, VariantDescriptor, ViewState};

/// A camera scalar as the kernel will receive it.
///
/// Kernels with the extended-precision capability take (head, tail)
/// split pairs; the one legacy kernel without it takes a plain cast
/// and visibly degrades under deep zoom. The planner never papers over
/// that difference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarUniform {
    Split(SplitF32),
    Single(f32),
}

impl ScalarUniform {
    fn encode(v: f64, extended: bool) -> Self {
        if extended {
            Self::Split(SplitF32::split(v))
        } else {
            Self::Single(v as f32)
        }
    }
}

/// The full uniform set for one kernel launch.
///
/// Built fresh from the [`ViewState`] on every recompute and discarded
/// afterwards; nothing in here is authoritative state.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelParams {
    pub width: u32,
    pub height: u32,
    pub center_re: ScalarUniform,
    pub center_im: ScalarUniform,
    pub pixel_size: ScalarUniform,
    /// Julia constant offsets, when the schema carries them.
    pub shift: Option<(ScalarUniform, ScalarUniform)>,
    pub power: Option<f32>,
    pub epsilon: Option<f32>,
    pub use_basins: Option<bool>,
    pub iterations: u32,
    pub num_groups: u32,
}

/// Workgroups launched per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub x: u32,
    pub y: u32,
}

/// Size the dispatch grid for an output of `width`×`height` pixels.
///
/// Ceiling division: a partial workgroup is launched for the border
/// strip when a dimension is not a multiple of the kernel's local
/// group size, so every pixel is covered (the kernel clips the
/// overhang against the image bounds).
pub fn grid_for(width: u32, height: u32, local_group_size: (u32, u32)) -> GridSize {
    GridSize {
        x: width.div_ceil(local_group_size.0),
        y: height.div_ceil(local_group_size.1),
    }
}

/// Assemble the kernel parameter set from the current view.
///
/// Every extended-precision scalar is split here, immediately before
/// the dispatch — split pairs are never stored across frames.
pub fn plan(view: &ViewState, descriptor: &VariantDescriptor) -> KernelParams {
    let extended = descriptor.extended_precision;
    let schema = &descriptor.schema;
    KernelParams {
        width: view.width,
        height: view.height,
        center_re: ScalarUniform::encode(view.center_re, extended),
        center_im: ScalarUniform::encode(view.center_im, extended),
        pixel_size: ScalarUniform::encode(view.pixel_size, extended),
        shift: schema.has_shift.then(|| {
            (
                ScalarUniform::encode(view.shift_re, extended),
                ScalarUniform::encode(view.shift_im, extended),
            )
        }),
        power: schema.has_power.then_some(view.power),
        epsilon: schema.has_epsilon.then_some(view.epsilon),
        use_basins: schema.has_basins.then_some(view.use_basins),
        iterations: view.iterations as u32,
        num_groups: view.num_groups as u32,
    }
}

/// Sample the view's gradient into LUT colors at resolution `n`.
///
/// Texel `i` holds `evaluate(i / (n - 1))`; the degenerate single-texel
/// LUT is sampled at the top of the ramp.
pub fn sample_lut(view: &ViewState, n: u32) -> Vec<Rgba8> {
    (0..n)
        .map(|i| {
            let t = if n > 1 {
                i as f32 / (n - 1) as f32
            } else {
                1.0
            };
            view.gradient.evaluate(t)
        })
        .collect()
}
