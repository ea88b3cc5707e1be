//! Input aggregation: keyboard and on-screen touch buttons reduced to one
//! flat set of logical actions per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Keys currently held, already mapped from physical key codes by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardState {
    pub left: bool,
    pub right: bool,
    /// Up arrow: aims dashes upward and also counts as jump.
    pub up: bool,
    pub down: bool,
    pub space: bool,
    pub glide: bool,
    pub dash: bool,
    pub ground_pound: bool,
    pub grapple: bool,
}

/// Virtual buttons currently held on a touch screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchButtons {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub glide: bool,
    pub dash: bool,
    pub ground_pound: bool,
    pub grapple: bool,
}

/// Raw device state for one frame. `touch` is `None` until the host has
/// created its on-screen controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInput {
    pub keys: KeyboardState,
    pub touch: Option<TouchButtons>,
}

/// Resolved logical actions for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    /// Jump went down this frame. Touch jump counts every frame it is held.
    pub jump_just_pressed: bool,
    pub glide: bool,
    pub dash: bool,
    pub ground_pound: bool,
    pub grapple: bool,
}

impl InputState {
    /// Held directions as a raw (unnormalized) vector, y down. Right wins
    /// over left and down over up when both are held.
    pub fn aim(&self) -> Vec2 {
        let mut aim = Vec2::ZERO;
        if self.up {
            aim.y = -1.0;
        }
        if self.down {
            aim.y = 1.0;
        }
        if self.left {
            aim.x = -1.0;
        }
        if self.right {
            aim.x = 1.0;
        }
        aim
    }
}

/// Merges keyboard and touch sources, remembering last frame's jump state
/// for edge detection.
#[derive(Debug, Clone, Default)]
pub struct InputAggregator {
    jump_was_down: bool,
}

impl InputAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, raw: &RawInput) -> InputState {
        let touch = raw.touch.unwrap_or_default();
        let keys = &raw.keys;

        let key_jump = keys.up || keys.space;
        let jump = key_jump || touch.jump;
        let jump_just_pressed = (key_jump && !self.jump_was_down) || touch.jump;
        self.jump_was_down = jump;

        InputState {
            left: keys.left || touch.left,
            right: keys.right || touch.right,
            up: keys.up,
            down: keys.down,
            jump,
            jump_just_pressed,
            glide: keys.glide || touch.glide,
            dash: keys.dash || touch.dash,
            ground_pound: keys.ground_pound || touch.ground_pound,
            grapple: keys.grapple || touch.grapple,
        }
    }
}
