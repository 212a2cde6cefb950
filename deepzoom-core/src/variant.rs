use serde::{Deserialize, Serialize};

/// Which fractal family an engine instance drives.
///
/// The four kernels share one host engine; everything that differs
/// between them lives in the [`VariantDescriptor`] this kind resolves
/// to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FractalKind {
    Newton,
    Julia,
    Mandelbrot,
    Multibrot,
}

impl FractalKind {
    pub fn descriptor(self) -> &'static VariantDescriptor {
        match self {
            Self::Newton => &NEWTON,
            Self::Julia => &JULIA,
            Self::Mandelbrot => &MANDELBROT,
            Self::Multibrot => &MULTIBROT,
        }
    }
}

/// Which optional parameters a variant's kernel consumes.
///
/// The input mapper drops intents for parameters the active schema does
/// not carry, and the dispatch planner omits the matching uniforms.
#[derive(Debug, Clone, Copy)]
pub struct ParamSchema {
    /// Julia: a second coordinate pair shifting the iterated constant.
    pub has_shift: bool,
    /// Julia/Multibrot: adjustable exponent in the iteration formula.
    pub has_power: bool,
    /// Newton: root-convergence tolerance.
    pub has_epsilon: bool,
    /// Newton: color by root basin instead of iteration count.
    pub has_basins: bool,
    /// Mandelbrot: click recenters the camera on the pointer.
    pub pointer_recenter: bool,
    /// Colors cycle through `num_groups` bands of `iterations` each;
    /// the LUT is sized to the per-group resolution. Newton instead
    /// uses a fixed 256-entry LUT over the whole budget.
    pub grouped_coloring: bool,
}

/// Per-variant motion rates.
///
/// Pan and shift deltas are expressed per second as a multiple of the
/// viewport height in world units (`height · rate · pixel_size`), so
/// apparent speed in screen pixels is constant at every zoom depth.
/// Each continuous rate has a fine-modifier factor applied while the
/// precision key is held; iteration adjustment inverts that convention
/// (held modifier selects the slow step).
#[derive(Debug, Clone, Copy)]
pub struct MotionRates {
    pub pan: f64,
    pub pan_fine: f64,
    pub zoom: f64,
    pub zoom_fine: f64,
    pub shift: f64,
    pub shift_fine: f64,
    pub power: f32,
    pub power_fine: f32,
    /// Iterations per second at the fine step; coarse multiplies by 4.
    pub iterations: f64,
    pub iterations_coarse: f64,
    /// Group-count step per key edge; fine step is always 1.
    pub group_step: i32,
}

/// Literal reset/activation values for a variant.
#[derive(Debug, Clone, Copy)]
pub struct DefaultTable {
    pub center_re: f64,
    pub center_im: f64,
    /// Vertical world-space span; `pixel_size = span / height`.
    pub vertical_span: f64,
    pub iterations: i32,
    pub num_groups: i32,
    pub power: f32,
    pub epsilon: f32,
    pub use_basins: bool,
}

/// Everything that distinguishes one fractal engine from another.
///
/// The four per-fractal engines in this system are a single engine
/// parameterized by this descriptor: kernel entry name, workgroup
/// geometry, parameter schema, motion rates, defaults, and whether the
/// kernel accepts split-pair uniforms at all.
#[derive(Debug)]
pub struct VariantDescriptor {
    pub kind: FractalKind,
    /// Kernel entry-point name resolved on the compute device.
    pub kernel_entry: &'static str,
    /// The kernel's declared local workgroup size (x, y).
    pub local_group_size: (u32, u32),
    /// Whether the kernel takes (head, tail) split pairs for the camera
    /// scalars. When false the planner sends plain `f32` casts and deep
    /// zoom degrades accordingly; this mirrors a real capability gap in
    /// one kernel rather than pretending all four behave alike.
    pub extended_precision: bool,
    pub schema: ParamSchema,
    pub rates: MotionRates,
    pub defaults: DefaultTable,
}

// ---------------------------------------------------------------------------
// Variant tables
// ---------------------------------------------------------------------------

static NEWTON: VariantDescriptor = VariantDescriptor {
    kind: FractalKind::Newton,
    kernel_entry: "Newton",
    local_group_size: (8, 8),
    extended_precision: true,
    schema: ParamSchema {
        has_shift: false,
        has_power: false,
        has_epsilon: true,
        has_basins: true,
        pointer_recenter: false,
        grouped_coloring: false,
    },
    rates: MotionRates {
        pan: 1.5,
        pan_fine: 0.2,
        zoom: 4.0,
        zoom_fine: 0.15,
        shift: 0.0,
        shift_fine: 1.0,
        power: 0.0,
        power_fine: 1.0,
        iterations: 100.0,
        iterations_coarse: 4.0,
        group_step: 1,
    },
    defaults: DefaultTable {
        center_re: 0.0,
        center_im: 0.0,
        vertical_span: 4.0,
        iterations: 64,
        num_groups: 1,
        power: 2.0,
        epsilon: 0.01,
        use_basins: true,
    },
};

static JULIA: VariantDescriptor = VariantDescriptor {
    kind: FractalKind::Julia,
    kernel_entry: "Julia",
    local_group_size: (32, 32),
    extended_precision: true,
    schema: ParamSchema {
        has_shift: true,
        has_power: true,
        has_epsilon: false,
        has_basins: false,
        pointer_recenter: false,
        grouped_coloring: true,
    },
    rates: MotionRates {
        pan: 0.125,
        pan_fine: 0.1,
        zoom: 4.0,
        zoom_fine: 0.15,
        shift: 0.25,
        shift_fine: 0.2,
        power: 2.0,
        power_fine: 0.2,
        iterations: 100.0,
        iterations_coarse: 4.0,
        group_step: 2,
    },
    defaults: DefaultTable {
        center_re: 0.2744,
        center_im: 0.0057,
        vertical_span: 4.0,
        iterations: 64,
        num_groups: 1,
        power: 2.0,
        epsilon: 0.0,
        use_basins: false,
    },
};

static MANDELBROT: VariantDescriptor = VariantDescriptor {
    kind: FractalKind::Mandelbrot,
    kernel_entry: "Mandelbrot",
    local_group_size: (32, 32),
    // This kernel only takes plain f32 uniforms.
    extended_precision: false,
    schema: ParamSchema {
        has_shift: false,
        has_power: false,
        has_epsilon: false,
        has_basins: false,
        pointer_recenter: true,
        grouped_coloring: true,
    },
    rates: MotionRates {
        pan: 0.25,
        pan_fine: 1.0,
        zoom: 1.0,
        zoom_fine: 1.0,
        shift: 0.0,
        shift_fine: 1.0,
        power: 0.0,
        power_fine: 1.0,
        iterations: 100.0,
        iterations_coarse: 4.0,
        group_step: 2,
    },
    defaults: DefaultTable {
        center_re: 0.0,
        center_im: 0.0,
        vertical_span: 4.0,
        iterations: 256,
        num_groups: 1,
        power: 2.0,
        epsilon: 0.0,
        use_basins: false,
    },
};

static MULTIBROT: VariantDescriptor = VariantDescriptor {
    kind: FractalKind::Multibrot,
    kernel_entry: "Multibrot",
    local_group_size: (32, 32),
    extended_precision: true,
    schema: ParamSchema {
        has_shift: false,
        has_power: true,
        has_epsilon: false,
        has_basins: false,
        pointer_recenter: false,
        grouped_coloring: true,
    },
    rates: MotionRates {
        pan: 0.125,
        pan_fine: 0.1,
        zoom: 4.0,
        zoom_fine: 0.15,
        shift: 0.0,
        shift_fine: 1.0,
        power: 2.0,
        power_fine: 0.2,
        iterations: 100.0,
        iterations_coarse: 4.0,
        group_step: 2,
    },
    defaults: DefaultTable {
        center_re: 0.0,
        center_im: 0.0,
        vertical_span: 4.0,
        iterations: 64,
        num_groups: 1,
        power: 2.0,
        epsilon: 0.0,
        use_basins: false,
    },
};
