//! Variable-height jump with coyote time and jump buffering.
//!
//! A jump starts with a fixed upward velocity. Holding the button keeps
//! adding a small boost every frame while still rising, up to
//! `max_jump_frames`. Releasing ends the sustain without touching the
//! current velocity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::JumpConfig;
use crate::ground::GroundTransition;
use crate::input::InputState;

/// How a jump was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpKind {
    Ground,
    /// Shortly after walking off a ledge.
    Coyote,
    /// Pressed shortly before landing and released before touchdown.
    Buffered,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JumpState {
    /// Cleared by a jump, restored on every grounded frame.
    pub can_jump: bool,
    /// Sustain frame counter; 0 when no jump is being held.
    pub jump_frames: u32,
    /// When the entity last walked off the ground, until consumed.
    pub coyote_armed_at: Option<f64>,
    /// When jump was last pressed, until consumed.
    pub buffered_at: Option<f64>,
}

impl Default for JumpState {
    fn default() -> Self {
        Self {
            can_jump: true,
            jump_frames: 0,
            coyote_armed_at: None,
            buffered_at: None,
        }
    }
}

impl JumpState {
    pub fn in_coyote_window(&self, cfg: &JumpConfig, now: f64) -> bool {
        self.coyote_armed_at
            .is_some_and(|t| now - t <= cfg.coyote_time_ms)
    }

    pub fn has_buffered_jump(&self, cfg: &JumpConfig, now: f64) -> bool {
        self.buffered_at.is_some_and(|t| now - t <= cfg.jump_buffer_ms)
    }

    /// Run one frame of jump logic, possibly writing `velocity.y`.
    pub fn update(
        &mut self,
        cfg: &JumpConfig,
        now: f64,
        input: &InputState,
        grounded: bool,
        transition: GroundTransition,
        velocity: &mut Vec2,
    ) -> Option<JumpKind> {
        if grounded {
            self.can_jump = true;
            self.coyote_armed_at = None;
        } else if transition == GroundTransition::LeftGround {
            self.coyote_armed_at = Some(now);
        }

        let in_coyote = self.in_coyote_window(cfg, now);

        if input.jump_just_pressed {
            self.buffered_at = Some(now);
        }
        let buffered = self.has_buffered_jump(cfg, now);

        let mut started = None;
        if input.jump {
            if (grounded || in_coyote) && self.jump_frames == 0 && self.can_jump {
                self.start(cfg, velocity);
                started = Some(if grounded {
                    JumpKind::Ground
                } else {
                    JumpKind::Coyote
                });
            } else if self.jump_frames > 0 && self.jump_frames < cfg.max_jump_frames {
                self.jump_frames += 1;
                if velocity.y < 0.0 {
                    velocity.y -= cfg.sustain_boost;
                }
            }
        } else {
            self.jump_frames = 0;
        }

        if !input.jump && buffered && grounded && self.can_jump && self.jump_frames == 0 {
            self.start(cfg, velocity);
            started = Some(JumpKind::Buffered);
        }

        started
    }

    fn start(&mut self, cfg: &JumpConfig, velocity: &mut Vec2) {
        velocity.y = cfg.initial_velocity;
        self.jump_frames = 1;
        self.can_jump = false;
        self.coyote_armed_at = None;
        self.buffered_at = None;
    }
}
