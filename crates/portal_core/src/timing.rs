use std::{ops::Range, time::Duration};

use rand::Rng;

/// Source of the randomized durations and gauge drift.
pub trait DelaySource: Send + Sync {
    /// A duration drawn from `range` (half-open).
    fn login_delay(&self, range: Range<Duration>) -> Duration;
    /// A delta drawn from `[-magnitude, magnitude]`.
    fn drift(&self, magnitude: f64) -> f64;
}

pub struct RandomDelays;

impl DelaySource for RandomDelays {
    fn login_delay(&self, range: Range<Duration>) -> Duration {
        if range.is_empty() {
            return range.start;
        }
        rand::thread_rng().gen_range(range)
    }

    fn drift(&self, magnitude: f64) -> f64 {
        // false for NaN as well
        if !(magnitude > 0.0 && magnitude.is_finite()) {
            return 0.0;
        }
        rand::thread_rng().gen_range(-magnitude..=magnitude)
    }
}

/// Always returns the same values; drift is clamped into the allowed magnitude.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelays {
    pub login_delay: Duration,
    pub drift: f64,
}

impl DelaySource for FixedDelays {
    fn login_delay(&self, _range: Range<Duration>) -> Duration {
        self.login_delay
    }

    fn drift(&self, magnitude: f64) -> f64 {
        if magnitude.is_nan() {
            return 0.0;
        }
        self.drift.clamp(-magnitude.abs(), magnitude.abs())
    }
}
