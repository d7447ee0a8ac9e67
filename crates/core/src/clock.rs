use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock source in milliseconds since the UNIX epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> f64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// Clock that only moves when told to. Clones share the same reading.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(now_ms: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(now_ms.to_bits())),
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.bits.store(now_ms.to_bits(), Ordering::Relaxed);
    }

    pub fn advance(&self, delta_ms: f64) {
        self.set(self.now_ms() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(1_000.0);
        let other = clock.clone();
        clock.advance(80.0);
        assert_eq!(other.now_ms(), 1_080.0);
        other.set(0.0);
        assert_eq!(clock.now_ms(), 0.0);
    }

    #[test]
    fn default_manual_clock_starts_at_epoch() {
        assert_eq!(ManualClock::default().now_ms(), 0.0);
    }

    #[test]
    fn system_clock_is_past_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000.0);
    }
}
