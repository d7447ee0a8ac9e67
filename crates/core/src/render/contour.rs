//! Pure geometry for one waveform layer: value transforms, rotation and the
//! closed cubic contour traced around the canvas centre.

use std::f64::consts::TAU;

/// Milliseconds for one full turn of the layers.
const ROTATION_PERIOD_MS: f64 = 30_000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn polar(center: Vec2, angle: f64, radius: f64) -> Self {
        Self::new(
            center.x + angle.cos() * radius,
            center.y + angle.sin() * radius,
        )
    }

    fn lerp(self, to: Vec2, t: f64) -> Self {
        Self::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }

    pub fn distance(self, other: Vec2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cubic {
    pub ctrl1: Vec2,
    pub ctrl2: Vec2,
    pub to: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    pub start: Vec2,
    pub curves: Vec<Cubic>,
}

/// Per-layer reshaping applied to the smoothed frame before tracing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueTransform {
    Identity,
    /// `v * 0.9 + sin(i / 3) * 10`
    SineRipple,
    /// `v * 0.8 + cos(i / 2) * 15`
    CosineRipple,
}

impl ValueTransform {
    pub fn apply(self, index: usize, value: f64) -> f64 {
        let i = index as f64;
        match self {
            ValueTransform::Identity => value,
            ValueTransform::SineRipple => value * 0.9 + (i / 3.0).sin() * 10.0,
            ValueTransform::CosineRipple => value * 0.8 + (i / 2.0).cos() * 15.0,
        }
    }

    pub fn map<const N: usize>(self, frame: &[f64; N]) -> [f64; N] {
        std::array::from_fn(|i| self.apply(i, frame[i]))
    }
}

/// Shared layer rotation for `now_ms`, in `[0, 2π)`.
pub fn rotation(now_ms: f64) -> f64 {
    (now_ms / ROTATION_PERIOD_MS).rem_euclid(TAU)
}

/// Traces `values` as a closed curve around `center`.
///
/// Each point averages its value with both circular neighbours. The curve into
/// point `i` leaves from the position of index `i - 1` at its own, unaveraged
/// value, with control points at one and two thirds of the way across.
/// Returns `None` for an empty frame.
pub fn trace(
    values: &[f64],
    center: Vec2,
    base_radius: f64,
    amplitude_factor: f64,
    rotation: f64,
) -> Option<Contour> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    let step = TAU / n as f64;
    let radius_at = |scaled: f64| base_radius * (1.0 + scaled * amplitude_factor);
    let angle_at = |i: usize| (i as f64 * step + rotation).rem_euclid(TAU);

    let mut start = center;
    let mut curves = Vec::with_capacity(n);

    for i in 0..=n {
        let idx = i % n;
        let prev_idx = (idx + n - 1) % n;
        let next_idx = (idx + 1) % n;

        let value = values[idx] / 100.0;
        let prev_value = values[prev_idx] / 100.0;
        let next_value = values[next_idx] / 100.0;
        let averaged = (prev_value + value + next_value) / 3.0;

        let point = Vec2::polar(center, angle_at(i), radius_at(averaged));

        if i == 0 {
            start = point;
            continue;
        }

        let from = Vec2::polar(center, angle_at(i - 1), radius_at(prev_value));
        curves.push(Cubic {
            ctrl1: from.lerp(point, 1.0 / 3.0),
            ctrl2: from.lerp(point, 2.0 / 3.0),
            to: point,
        });
    }

    Some(Contour { start, curves })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Vec2 = Vec2::new(64.0, 64.0);

    #[test]
    fn ripple_transforms_on_constant_frame() {
        let frame = [50.0; 24];
        let middle = ValueTransform::SineRipple.map(&frame);
        let inner = ValueTransform::CosineRipple.map(&frame);
        for i in 0..24 {
            let x = i as f64;
            assert!((middle[i] - (50.0 * 0.9 + (x / 3.0).sin() * 10.0)).abs() < 1e-12);
            assert!((inner[i] - (50.0 * 0.8 + (x / 2.0).cos() * 15.0)).abs() < 1e-12);
        }
        assert_eq!(ValueTransform::Identity.map(&frame), frame);
    }

    #[test]
    fn rotation_wraps_into_one_turn() {
        assert_eq!(rotation(0.0), 0.0);
        assert!((rotation(30_000.0) - 1.0).abs() < 1e-12);
        let r = rotation(1_712_345_678_901.0);
        assert!((0.0..TAU).contains(&r));
    }

    #[test]
    fn empty_frame_has_no_contour() {
        assert!(trace(&[], CENTER, 10.0, 0.4, 0.0).is_none());
    }

    #[test]
    fn zero_values_trace_the_base_circle() {
        let contour = trace(&[0.0; 24], CENTER, 40.0, 0.4, 0.3).expect("contour");
        assert_eq!(contour.curves.len(), 24);
        assert!((contour.start.distance(CENTER) - 40.0).abs() < 1e-9);
        for curve in &contour.curves {
            assert!((curve.to.distance(CENTER) - 40.0).abs() < 1e-9);
        }
    }

    #[test]
    fn first_point_sits_at_rotation_angle() {
        let contour = trace(&[0.0; 24], CENTER, 40.0, 0.4, 0.5).expect("contour");
        let angle = (contour.start.y - CENTER.y).atan2(contour.start.x - CENTER.x);
        assert!((angle - 0.5).abs() < 1e-9);
    }

    #[test]
    fn contour_closes_on_its_start() {
        let values: Vec<f64> = (0..24).map(|i| 30.0 + i as f64 * 2.0).collect();
        let contour = trace(&values, CENTER, 40.0, 0.4, 1.2).expect("contour");
        let last = contour.curves.last().expect("curves").to;
        assert!(last.distance(contour.start) < 1e-9);
    }

    #[test]
    fn amplitude_scales_radius() {
        let contour = trace(&[100.0; 24], CENTER, 40.0, 0.4, 0.0).expect("contour");
        assert!((contour.start.distance(CENTER) - 56.0).abs() < 1e-9);
    }

    #[test]
    fn curves_leave_from_the_unaveraged_previous_point() {
        let values: Vec<f64> = (0..24).map(|i| if i % 2 == 0 { 80.0 } else { 20.0 }).collect();
        let (base, amplitude) = (40.0, 0.3);
        let contour = trace(&values, CENTER, base, amplitude, 0.0).expect("contour");
        let step = TAU / 24.0;

        for (k, curve) in contour.curves.iter().enumerate() {
            let from = curve.ctrl1.lerp(curve.to, -0.5);
            let raw_radius = base * (1.0 + values[k] / 100.0 * amplitude);
            assert!((from.distance(CENTER) - raw_radius).abs() < 1e-9, "curve {k}");
            let expected = Vec2::polar(CENTER, k as f64 * step, raw_radius);
            assert!(from.distance(expected) < 1e-9, "curve {k}");

            let averaged_prev = if k == 0 {
                contour.start
            } else {
                contour.curves[k - 1].to
            };
            assert!((averaged_prev.distance(CENTER) - raw_radius).abs() > 1.0);
        }

        let second = contour.curves[1].ctrl1.lerp(contour.curves[1].to, -0.5);
        assert!((second.distance(CENTER) - 42.4).abs() < 1e-9);
    }

    #[test]
    fn control_points_sit_at_thirds_of_the_chord() {
        let values: Vec<f64> = (0..24).map(|i| 40.0 + i as f64).collect();
        let contour = trace(&values, CENTER, 40.0, 0.4, 0.7).expect("contour");
        for (k, curve) in contour.curves.iter().enumerate() {
            let from = Vec2::polar(
                CENTER,
                (k as f64 * TAU / 24.0 + 0.7).rem_euclid(TAU),
                40.0 * (1.0 + values[k] / 100.0 * 0.4),
            );
            assert!(from.lerp(curve.to, 1.0 / 3.0).distance(curve.ctrl1) < 1e-9);
            assert!(from.lerp(curve.to, 2.0 / 3.0).distance(curve.ctrl2) < 1e-9);
        }
    }
}
