use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// An RGBA8 color, straight into the LUT texture format.
pub type Rgba8 = [u8; 4];

/// A single gradient stop: a color pinned at a position in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub position: f32,
    pub color: Rgba8,
}

/// An ordered list of color stops with clamped linear evaluation.
///
/// The engine never authors gradients — it only calls [`evaluate`]
/// while building the lookup texture. Authoring lives outside this
/// workspace; the `PartialEq` on the stop list is what lets the render
/// cache detect that a definition changed and the LUT must be rebuilt.
///
/// [`evaluate`]: Gradient::evaluate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gradient {
    stops: Vec<GradientStop>,
}

/// Helper for deserialization — re-validates the stop list on load so a
/// hand-edited or corrupted snapshot can never smuggle in an empty or
/// out-of-range gradient.
impl<'de> Deserialize<'de> for Gradient {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            stops: Vec<GradientStop>,
        }
        let raw = Raw::deserialize(deserializer)?;
        Gradient::new(raw.stops).map_err(serde::de::Error::custom)
    }
}

impl Gradient {
    /// Build a gradient from stops, sorting them by position.
    pub fn new(mut stops: Vec<GradientStop>) -> crate::Result<Self> {
        if stops.is_empty() {
            return Err(CoreError::EmptyGradient);
        }
        for stop in &stops {
            if !(0.0..=1.0).contains(&stop.position) || !stop.position.is_finite() {
                return Err(CoreError::StopOutOfRange(stop.position));
            }
        }
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Sample the gradient at `t`, clamped to the domain ends.
    ///
    /// Between two stops the color is linearly interpolated per channel.
    pub fn evaluate(&self, t: f32) -> Rgba8 {
        let t = t.clamp(0.0, 1.0);
        let first = &self.stops[0];
        if t <= first.position {
            return first.color;
        }
        let last = &self.stops[self.stops.len() - 1];
        if t >= last.position {
            return last.color;
        }
        // Find the bracketing pair. Stop lists are tiny; linear scan.
        for pair in self.stops.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if t <= b.position {
                let span = b.position - a.position;
                if span <= f32::EPSILON {
                    return b.color;
                }
                let blend = (t - a.position) / span;
                return lerp_color(a.color, b.color, blend);
            }
        }
        last.color
    }
}

/// Default: the classic black → blue → white → orange escape-time ramp.
impl Default for Gradient {
    fn default() -> Self {
        Self {
            stops: vec![
                GradientStop {
                    position: 0.0,
                    color: [0, 0, 40, 255],
                },
                GradientStop {
                    position: 0.35,
                    color: [20, 90, 200, 255],
                },
                GradientStop {
                    position: 0.65,
                    color: [240, 240, 255, 255],
                },
                GradientStop {
                    position: 1.0,
                    color: [255, 170, 30, 255],
                },
            ],
        }
    }
}

#[inline]
fn lerp_color(a: Rgba8, b: Rgba8, t: f32) -> Rgba8 {
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_stop() -> Gradient {
        Gradient::new(vec![
            GradientStop {
                position: 0.0,
                color: [0, 0, 0, 255],
            },
            GradientStop {
                position: 1.0,
                color: [255, 255, 255, 255],
            },
        ])
        .unwrap()
    }

    #[test]
    fn empty_rejected() {
        assert!(Gradient::new(vec![]).is_err());
    }

    #[test]
    fn out_of_range_stop_rejected() {
        let bad = vec![GradientStop {
            position: 1.5,
            color: [0, 0, 0, 255],
        }];
        assert!(Gradient::new(bad).is_err());
    }

    #[test]
    fn stops_sorted_on_construction() {
        let g = Gradient::new(vec![
            GradientStop {
                position: 1.0,
                color: [255, 0, 0, 255],
            },
            GradientStop {
                position: 0.0,
                color: [0, 0, 0, 255],
            },
        ])
        .unwrap();
        assert_eq!(g.stops()[0].position, 0.0);
    }

    #[test]
    fn endpoints_exact() {
        let g = two_stop();
        assert_eq!(g.evaluate(0.0), [0, 0, 0, 255]);
        assert_eq!(g.evaluate(1.0), [255, 255, 255, 255]);
    }

    #[test]
    fn clamped_outside_domain() {
        let g = two_stop();
        assert_eq!(g.evaluate(-5.0), g.evaluate(0.0));
        assert_eq!(g.evaluate(5.0), g.evaluate(1.0));
    }

    #[test]
    fn midpoint_interpolates() {
        let g = two_stop();
        let mid = g.evaluate(0.5);
        for ch in &mid[..3] {
            assert!((126..=129).contains(ch), "mid channel {ch}");
        }
    }

    #[test]
    fn equality_detects_definition_change() {
        let a = two_stop();
        let mut stops = a.stops().to_vec();
        stops[1].color = [200, 200, 200, 255];
        let b = Gradient::new(stops).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn serde_round_trip() {
        let g = Gradient::default();
        let json = serde_json::to_string(&g).unwrap();
        let back: Gradient = serde_json::from_str(&json).unwrap();
        assert_eq!(g, back);
    }

    #[test]
    fn deserializing_empty_stop_list_is_an_error() {
        // An empty gradient would make evaluate() index past the end;
        // loading one must fail cleanly instead.
        let result: Result<Gradient, _> = serde_json::from_str(r#"{"stops":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn deserializing_out_of_range_stop_is_an_error() {
        let json = r#"{"stops":[{"position":1.5,"color":[0,0,0,255]}]}"#;
        let result: Result<Gradient, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn deserialized_gradient_evaluates_safely() {
        let json = r#"{"stops":[{"position":0.5,"color":[10,20,30,255]}]}"#;
        let g: Gradient = serde_json::from_str(json).unwrap();
        assert_eq!(g.evaluate(0.0), [10, 20, 30, 255]);
        assert_eq!(g.evaluate(1.0), [10, 20, 30, 255]);
    }
}
