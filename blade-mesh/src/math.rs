//! Scalar and spline helpers shared by the generation stages

use glam::Vec3;

/// Linear interpolation between two scalars
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite smoothstep of `x` over `[edge0, edge1]`
///
/// A zero-width edge degenerates to a hard step at `edge0`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x >= edge0 { 1.0 } else { 0.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Uniform Catmull-Rom interpolation between `p1` and `p2`
///
/// `p0` and `p3` only steer the tangents. `t` is in `[0, 1]`.
pub fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;

    0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Catmull-Rom sample kept within half the chord length of the straight segment
///
/// Sharp turns in the control polygon otherwise make the spline loop past
/// its neighbours and kink the resampled rings.
pub fn catmull_rom_clamped(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let spline = catmull_rom(p0, p1, p2, p3, t);
    let linear = p1.lerp(p2, t);
    let max_deviation = p1.distance(p2) * 0.5;

    let offset = spline - linear;
    let deviation = offset.length();
    if deviation > max_deviation && deviation > f32::EPSILON {
        linear + offset * (max_deviation / deviation)
    } else {
        spline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_smoothstep_zero_width_is_step() {
        assert_eq!(smoothstep(0.3, 0.3, 0.29), 0.0);
        assert_eq!(smoothstep(0.3, 0.3, 0.3), 1.0);
    }

    #[test]
    fn test_catmull_rom_passes_through_controls() {
        let p0 = Vec3::new(0.0, 0.0, 0.0);
        let p1 = Vec3::new(1.0, 1.0, 0.0);
        let p2 = Vec3::new(2.0, 0.5, 0.0);
        let p3 = Vec3::new(3.0, 2.0, 0.0);

        assert!(catmull_rom(p0, p1, p2, p3, 0.0).distance(p1) < 1e-5);
        assert!(catmull_rom(p0, p1, p2, p3, 1.0).distance(p2) < 1e-5);
    }

    #[test]
    fn test_catmull_rom_clamp_limits_overshoot() {
        // Far-away guide points would pull the spline well off the chord
        let p0 = Vec3::new(0.0, -50.0, 0.0);
        let p1 = Vec3::new(0.0, 0.0, 0.0);
        let p2 = Vec3::new(1.0, 0.0, 0.0);
        let p3 = Vec3::new(1.0, 50.0, 0.0);

        for i in 0..=10 {
            let t = i as f32 / 10.0;
            let p = catmull_rom_clamped(p0, p1, p2, p3, t);
            let linear = p1.lerp(p2, t);
            assert!(p.distance(linear) <= 0.5 + 1e-5, "t={t} deviated {}", p.distance(linear));
        }
    }
}
