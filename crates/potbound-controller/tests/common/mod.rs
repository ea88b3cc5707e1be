use potbound_controller::{ControllerConfig, ControllerEvent, PlayerController};
use potbound_controller::input::{KeyboardState, RawInput};
use potbound_core::test_helpers::{FakeBody, FakeLevel};
use potbound_core::time::FrameClock;

pub const FRAME: f64 = FrameClock::DEFAULT_STEP_MS;

/// A controller wired to fake engine collaborators and a 60 Hz clock.
pub struct Harness {
    pub ctrl: PlayerController,
    pub body: FakeBody,
    pub level: FakeLevel,
    pub clock: FrameClock,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        Self {
            ctrl: PlayerController::new(config),
            body: FakeBody::at(400.0, 500.0),
            level: FakeLevel::default(),
            clock: FrameClock::default(),
        }
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn step(&mut self, raw: RawInput) -> Vec<ControllerEvent> {
        let frame = self.clock.tick();
        self.ctrl
            .update(frame, &raw, &mut self.body, &mut self.level)
    }

    pub fn idle(&mut self) -> Vec<ControllerEvent> {
        self.step(RawInput::default())
    }

    /// Run `n` idle frames and collect every event.
    pub fn idle_for(&mut self, n: usize) -> Vec<ControllerEvent> {
        (0..n).flat_map(|_| self.idle()).collect()
    }

    /// Put the body on the floor and let the controller see it.
    pub fn settle_on_ground(&mut self) {
        self.body.land();
        self.idle();
        self.idle();
    }

    /// Walk off a ledge, fall for `frames`, then hit the floor at `speed`.
    pub fn fall_and_land(&mut self, frames: usize, speed: f32) -> Vec<ControllerEvent> {
        self.body.lift_off(100.0);
        self.idle_for(frames);
        self.body.touch_down_at(speed);
        let events = self.idle();
        self.body.land();
        events
    }
}

pub fn keys(f: impl FnOnce(&mut KeyboardState)) -> RawInput {
    let mut raw = RawInput::default();
    f(&mut raw.keys);
    raw
}

pub fn count(events: &[ControllerEvent], pred: impl Fn(&ControllerEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}
