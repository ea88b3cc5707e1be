use serde::{Deserialize, Serialize};

/// A timer that counts down in milliseconds and floors at zero.
///
/// Used for cooldowns and short protection windows. A countdown is running
/// only while `remaining > 0`; a finished countdown is indistinguishable
/// from one that was never started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f64,
}

impl Countdown {
    pub fn new(duration: f64) -> Self {
        let mut c = Self::default();
        c.start(duration);
        c
    }

    pub fn start(&mut self, duration: f64) {
        self.remaining = if duration.is_finite() {
            duration.max(0.0)
        } else {
            0.0
        };
    }

    pub fn tick(&mut self, delta: f64) {
        if delta > 0.0 {
            self.remaining = (self.remaining - delta).max(0.0);
        }
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn is_ready(&self) -> bool {
        !self.is_running()
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }
}
