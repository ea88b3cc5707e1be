use serde::{Deserialize, Serialize};

/// Timing for a single frame, in milliseconds since the session started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameTime {
    pub now: f64,
    pub delta: f64,
}

impl FrameTime {
    pub fn new(now: f64, delta: f64) -> Self {
        // Hosts occasionally report a negative or NaN delta after a tab
        // resume; treat those as an empty frame.
        let delta = if delta.is_finite() && delta > 0.0 {
            delta
        } else {
            0.0
        };
        Self { now, delta }
    }

    /// Milliseconds elapsed since `earlier`.
    pub fn since(&self, earlier: f64) -> f64 {
        self.now - earlier
    }
}

/// Fixed-step clock for headless hosts and tests.
#[derive(Debug, Clone)]
pub struct FrameClock {
    now: f64,
    step: f64,
}

impl FrameClock {
    /// 60 Hz, matching the rate the feel constants were tuned at.
    pub const DEFAULT_STEP_MS: f64 = 1000.0 / 60.0;

    pub fn new(step: f64) -> Self {
        Self { now: 0.0, step }
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Advance by one step and return the new frame.
    pub fn tick(&mut self) -> FrameTime {
        self.advance(self.step)
    }

    /// Advance by an arbitrary amount (for frame hitches).
    pub fn advance(&mut self, delta: f64) -> FrameTime {
        let frame = FrameTime::new(self.now + delta.max(0.0), delta);
        self.now = frame.now;
        frame
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP_MS)
    }
}
