use deepzoom_core::ParamSchema;

/// Logical keys the engine reacts to.
///
/// The windowing backend translates its own key codes into these
/// before building a snapshot; the engine never sees raw scancodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    W,
    A,
    S,
    D,
    Q,
    E,
    Z,
    X,
    C,
    V,
    B,
    N,
    R,
}

/// Immutable input state sampled once per tick.
///
/// `held` keys drive dt-scaled continuous adjustments; `pressed` edges
/// fire once. No buffering or event queue exists — the mapper is
/// stateless between ticks, so sampling and state change stay fully
/// decoupled and deterministic.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    held: Vec<Key>,
    pressed: Vec<Key>,
    /// Cursor position in device pixels, top-left origin.
    pub cursor: Option<(f64, f64)>,
    /// Primary pointer button down-edge this tick.
    pub clicked: bool,
    /// Precision modifier held (fine adjustment rates).
    pub fine: bool,
}

impl InputSnapshot {
    pub fn hold(mut self, key: Key) -> Self {
        self.held.push(key);
        self
    }

    pub fn press(mut self, key: Key) -> Self {
        self.pressed.push(key);
        self
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }
}

/// One requested ViewState mutation.
///
/// Continuous intents carry only sign/direction — the engine applies
/// them with the tick's `dt` and the snapshot's fine modifier, using
/// the active variant's rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Pan { dx: f64, dy: f64 },
    Zoom { sign: f64 },
    Shift { dx: f64, dy: f64 },
    AdjustIterations { sign: f64 },
    AdjustPower { sign: f32 },
    StepGroups { sign: i32 },
    Recenter { x: f64, y: f64 },
    Reset,
}

/// Map a tick's input snapshot to mutation intents.
///
/// Pure function of the snapshot and the active parameter schema:
/// intents for parameters the schema does not carry are simply not
/// produced (a power key held on Newton does nothing). At most one
/// reset per tick.
pub fn map_input(input: &InputSnapshot, schema: &ParamSchema) -> Vec<Intent> {
    let mut intents = Vec::new();

    // Arrows always pan. WASD pans too, unless the variant routes it
    // to the Julia shift-offset channel.
    let wasd_shifts = schema.has_shift;
    let axis = |neg: bool, pos: bool| (pos as i32 - neg as i32) as f64;

    let pan_dx = axis(
        input.is_held(Key::ArrowLeft) || (!wasd_shifts && input.is_held(Key::A)),
        input.is_held(Key::ArrowRight) || (!wasd_shifts && input.is_held(Key::D)),
    );
    let pan_dy = axis(
        input.is_held(Key::ArrowDown) || (!wasd_shifts && input.is_held(Key::S)),
        input.is_held(Key::ArrowUp) || (!wasd_shifts && input.is_held(Key::W)),
    );
    if pan_dx != 0.0 || pan_dy != 0.0 {
        intents.push(Intent::Pan {
            dx: pan_dx,
            dy: pan_dy,
        });
    }

    if wasd_shifts {
        let dx = axis(input.is_held(Key::A), input.is_held(Key::D));
        let dy = axis(input.is_held(Key::S), input.is_held(Key::W));
        if dx != 0.0 || dy != 0.0 {
            intents.push(Intent::Shift { dx, dy });
        }
    }

    let zoom = axis(input.is_held(Key::Q), input.is_held(Key::E));
    if zoom != 0.0 {
        intents.push(Intent::Zoom { sign: zoom });
    }

    let iter = axis(input.is_held(Key::V), input.is_held(Key::C));
    if iter != 0.0 {
        intents.push(Intent::AdjustIterations { sign: iter });
    }

    if schema.has_power {
        let power = axis(input.is_held(Key::Z), input.is_held(Key::X));
        if power != 0.0 {
            intents.push(Intent::AdjustPower { sign: power as f32 });
        }
    }

    if schema.grouped_coloring {
        let step = axis(input.was_pressed(Key::N), input.was_pressed(Key::B));
        if step != 0.0 {
            intents.push(Intent::StepGroups { sign: step as i32 });
        }
    }

    if schema.pointer_recenter && input.clicked {
        if let Some((x, y)) = input.cursor {
            intents.push(Intent::Recenter { x, y });
        }
    }

    if input.was_pressed(Key::R) {
        intents.push(Intent::Reset);
    }

    intents
}
