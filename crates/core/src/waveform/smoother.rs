use super::{SampleFrame, SmoothedFrame};

/// Weight given to the incoming frame on each blend.
pub const SMOOTHING_FACTOR: f64 = 0.01;

/// Exponential blend of successive sample frames.
///
/// Starts empty; the first frame seeds it verbatim. Values are not clamped.
#[derive(Clone, Debug, Default)]
pub struct Smoother {
    previous: Option<SmoothedFrame>,
}

impl Smoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blends `current` into the running frame and returns the result.
    pub fn smooth(&mut self, current: &SampleFrame) -> SmoothedFrame {
        let next = match &self.previous {
            Some(previous) => blend(previous, current, SMOOTHING_FACTOR),
            None => *current,
        };
        self.previous = Some(next);
        next
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }

    pub fn is_seeded(&self) -> bool {
        self.previous.is_some()
    }

    pub fn current(&self) -> Option<&SmoothedFrame> {
        self.previous.as_ref()
    }
}

/// `previous + (current - previous) * alpha`, elementwise.
pub fn blend(previous: &SmoothedFrame, current: &SampleFrame, alpha: f64) -> SmoothedFrame {
    std::array::from_fn(|i| previous[i] + (current[i] - previous[i]) * alpha)
}
