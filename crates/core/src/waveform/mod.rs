//! Synthetic amplitude envelope shown while a recording is active.
//!
//! No audio is read: each frame is a pure function of wall-clock time, built
//! from three slow sinusoids laid around a circle of [`POINTS`] positions.

mod smoother;

use std::f64::consts::PI;

pub use smoother::{Smoother, SMOOTHING_FACTOR};

/// Number of angular positions in a frame.
pub const POINTS: usize = 24;

/// Resting amplitude the sinusoids oscillate around.
pub const BASELINE: f64 = 50.0;

/// Milliseconds per unit of synthesis time.
const TIME_SCALE_MS: f64 = 8000.0;

/// (time rate, angular harmonic, amplitude) of each component.
const COMPONENTS: [(f64, f64, f64); 3] = [(1.0, 2.0, 40.0), (0.5, 4.0, 20.0), (0.2, 6.0, 10.0)];

/// One tick's raw amplitudes, index `i` sitting at angle fraction `i / POINTS`.
pub type SampleFrame = [f64; POINTS];

/// Smoothed running frame, same layout as [`SampleFrame`].
pub type SmoothedFrame = [f64; POINTS];

/// Synthesizes the frame for `now_ms` (milliseconds since the UNIX epoch).
pub fn generate(now_ms: f64) -> SampleFrame {
    let t = now_ms / TIME_SCALE_MS;
    std::array::from_fn(|i| {
        let position = i as f64 / POINTS as f64;
        BASELINE
            + COMPONENTS
                .iter()
                .map(|&(rate, harmonic, amplitude)| {
                    (t * rate + position * PI * harmonic).sin() * amplitude
                })
                .sum::<f64>()
    })
}
