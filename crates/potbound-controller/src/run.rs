//! Horizontal running, facing and wall sliding.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use potbound_core::engine::Contacts;

use crate::config::RunConfig;
use crate::input::InputState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallSide {
    Left,
    Right,
}

/// Which wall, if any, the entity is sliding down: airborne, falling, and
/// pressing into a wall it touches.
pub fn wall_slide_side(
    contacts: Contacts,
    input: &InputState,
    grounded: bool,
    velocity_y: f32,
) -> Option<WallSide> {
    if grounded || velocity_y <= 0.0 {
        return None;
    }
    if contacts.touching_left && input.left {
        Some(WallSide::Left)
    } else if contacts.touching_right && input.right {
        Some(WallSide::Right)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunState {
    pub facing: Facing,
    pub wall_slide: Option<WallSide>,
}

impl RunState {
    /// Apply wall slide and run control. `locked` suspends all of it while
    /// an active dash owns the velocity.
    pub fn update(
        &mut self,
        cfg: &RunConfig,
        input: &InputState,
        contacts: Contacts,
        grounded: bool,
        locked: bool,
        velocity: &mut Vec2,
    ) {
        let side = if locked {
            None
        } else {
            wall_slide_side(contacts, input, grounded, velocity.y)
        };
        if side != self.wall_slide {
            tracing::debug!(?side, "wall slide changed");
        }
        self.wall_slide = side;

        if locked {
            return;
        }
        if self.wall_slide.is_some() {
            velocity.y = velocity.y.min(cfg.wall_slide_max_fall);
            return;
        }

        if input.left {
            velocity.x = -cfg.speed;
            self.facing = Facing::Left;
        } else if input.right {
            velocity.x = cfg.speed;
            self.facing = Facing::Right;
        } else {
            velocity.x = 0.0;
        }
    }
}
