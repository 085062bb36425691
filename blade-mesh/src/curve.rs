//! Sampled 1-D control curves
//!
//! Falloff, influence and blend shapes are all expressed as a function of a
//! normalized parameter. Anything implementing [`ControlCurve`] can drive them;
//! [`KeyframeCurve`] is the serializable keyed form used in presets.

use serde::{Deserialize, Serialize};

/// A time -> value mapping sampled by the generation stages
pub trait ControlCurve {
    /// Sample the curve at `t`
    fn sample(&self, t: f32) -> f32;
}

impl<F: Fn(f32) -> f32> ControlCurve for F {
    fn sample(&self, t: f32) -> f32 {
        self(t)
    }
}

/// A single curve key
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

impl CurveKey {
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Keyframed curve with monotone cubic interpolation
///
/// Keys are kept sorted by time. Sampling before the first key or after the
/// last one returns the boundary value. Between keys the tangents are limited
/// so a monotonic run of keys never overshoots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CurveKey>", into = "Vec<CurveKey>")]
pub struct KeyframeCurve {
    keys: Vec<CurveKey>,
}

impl KeyframeCurve {
    /// Build a curve from keys in any order
    pub fn new(mut keys: Vec<CurveKey>) -> Self {
        keys.retain(|k| k.time.is_finite() && k.value.is_finite());
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        keys.dedup_by(|a, b| (a.time - b.time).abs() < f32::EPSILON);
        Self { keys }
    }

    /// Straight line from (0, 0) to (1, 1)
    pub fn linear() -> Self {
        Self::new(vec![CurveKey::new(0.0, 0.0), CurveKey::new(1.0, 1.0)])
    }

    /// Flat curve returning `value` everywhere
    pub fn constant(value: f32) -> Self {
        Self::new(vec![CurveKey::new(0.0, value)])
    }

    /// S-shaped ramp from 0 to 1 with flat ends
    pub fn ease_in_out() -> Self {
        Self::new(vec![
            CurveKey::new(0.0, 0.0),
            CurveKey::new(0.5, 0.5),
            CurveKey::new(1.0, 1.0),
        ])
        .with_flat_ends()
    }

    /// Smooth ramp from 0 at t=0 up to 1 at t=1
    pub fn ramp_up() -> Self {
        Self::new(vec![
            CurveKey::new(0.0, 0.0),
            CurveKey::new(0.25, 0.1),
            CurveKey::new(0.75, 0.9),
            CurveKey::new(1.0, 1.0),
        ])
    }

    /// Smooth falloff from 1 at the center (t=0) to 0 at the rim (t=1)
    pub fn falloff() -> Self {
        Self::new(vec![
            CurveKey::new(0.0, 1.0),
            CurveKey::new(0.35, 0.92),
            CurveKey::new(0.75, 0.35),
            CurveKey::new(1.0, 0.0),
        ])
    }

    /// Add zero-slope guard keys just inside both ends
    fn with_flat_ends(mut self) -> Self {
        if let (Some(first), Some(last)) = (self.keys.first().copied(), self.keys.last().copied()) {
            let span = last.time - first.time;
            if span > 0.0 {
                self.keys.insert(1, CurveKey::new(first.time + span * 0.05, first.value));
                let len = self.keys.len();
                self.keys
                    .insert(len - 1, CurveKey::new(last.time - span * 0.05, last.value));
            }
        }
        self
    }

    /// Sorted keys
    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Secant slope of segment `k`
    fn secant(&self, k: usize) -> f32 {
        let a = self.keys[k];
        let b = self.keys[k + 1];
        (b.value - a.value) / (b.time - a.time)
    }

    /// Unlimited tangent at key `k` (three-point estimate, zero at extrema)
    fn tangent(&self, k: usize) -> f32 {
        let last = self.keys.len() - 1;
        if k == 0 {
            return self.secant(0);
        }
        if k == last {
            return self.secant(last - 1);
        }
        let d0 = self.secant(k - 1);
        let d1 = self.secant(k);
        if d0 * d1 <= 0.0 { 0.0 } else { (d0 + d1) * 0.5 }
    }
}

impl Default for KeyframeCurve {
    fn default() -> Self {
        Self::linear()
    }
}

impl From<Vec<CurveKey>> for KeyframeCurve {
    fn from(keys: Vec<CurveKey>) -> Self {
        Self::new(keys)
    }
}

impl From<KeyframeCurve> for Vec<CurveKey> {
    fn from(curve: KeyframeCurve) -> Self {
        curve.keys
    }
}

impl ControlCurve for KeyframeCurve {
    fn sample(&self, t: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return 0.0,
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // Index of the segment containing t
        let k = self.keys.partition_point(|key| key.time <= t) - 1;
        let a = self.keys[k];
        let b = self.keys[k + 1];
        let dt = b.time - a.time;
        let s = (t - a.time) / dt;

        let secant = self.secant(k);
        let (mut m0, mut m1) = (self.tangent(k), self.tangent(k + 1));
        if secant.abs() < f32::EPSILON {
            m0 = 0.0;
            m1 = 0.0;
        } else {
            // Fritsch-Carlson limiter
            let alpha = m0 / secant;
            let beta = m1 / secant;
            let mag = alpha * alpha + beta * beta;
            if mag > 9.0 {
                let tau = 3.0 / mag.sqrt();
                m0 = tau * alpha * secant;
                m1 = tau * beta * secant;
            }
        }

        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        h00 * a.value + h10 * dt * m0 + h01 * b.value + h11 * dt * m1
    }
}
