use std::fmt;

/// A double split into two single-precision parts: `head + tail ≈ v`.
///
/// GPU kernels here compute in `f32` only, so the host hands each
/// camera scalar over as a (head, tail) pair: `head` is the plain
/// single-precision cast and `tail` captures the residual the cast
/// threw away. The kernel re-bases its per-pixel coordinates on the
/// pair, which keeps deep zooms stable long after a naive `f32` cast
/// has collapsed neighbouring pixels onto the same value.
///
/// The pair is recomputed from the authoritative `f64` immediately
/// before every dispatch and never stored across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitF32 {
    pub head: f32,
    pub tail: f32,
}

impl SplitF32 {
    /// Split a double into (head, tail) single-precision parts.
    ///
    /// `head = v as f32`, `tail = (v - head) as f32`. The reconstruction
    /// error is bounded by the `f32` epsilon of the *residual* `v - head`
    /// rather than of `v` itself. Meaningful for finite input only;
    /// non-finite values pass through as-is.
    #[inline]
    pub fn split(v: f64) -> Self {
        let head = v as f32;
        let tail = (v - head as f64) as f32;
        Self { head, tail }
    }

    /// Recombine the two parts into a double.
    #[inline]
    pub fn reconstruct(self) -> f64 {
        self.head as f64 + self.tail as f64
    }
}

impl From<f64> for SplitF32 {
    #[inline]
    fn from(v: f64) -> Self {
        Self::split(v)
    }
}

impl fmt::Display for SplitF32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+e} + {:+e})", self.head, self.tail)
    }
}
