//! Timed special abilities sharing one locomotion slot.
//!
//! At most one ability drives velocity at a time. Activation precedence is
//! ground pound, dash, grapple, glide. Glide is held rather than committed,
//! so any other activation replaces it; the other three run until their own
//! end condition.

mod dash;
mod glide;
mod ground_pound;
mod grapple;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use potbound_core::countdown::Countdown;
use potbound_core::engine::{Level, PlatformId};
use potbound_core::scheduler::{Scheduler, TaskToken};
use potbound_core::time::FrameTime;

use crate::config::ControllerConfig;
use crate::events::ControllerEvent;
use crate::input::InputState;
use crate::resources::Resources;
use crate::run::Facing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    Glide,
    GroundPound,
    Dash,
    Grapple,
}

/// The single authoritative locomotion override.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Locomotion {
    #[default]
    Idle,
    Gliding,
    GroundPounding,
    Dashing { direction: Vec2, ends: TaskToken },
    Grappling { ends: TaskToken },
}

impl Locomotion {
    pub fn kind(&self) -> Option<AbilityKind> {
        match self {
            Locomotion::Idle => None,
            Locomotion::Gliding => Some(AbilityKind::Glide),
            Locomotion::GroundPounding => Some(AbilityKind::GroundPound),
            Locomotion::Dashing { .. } => Some(AbilityKind::Dash),
            Locomotion::Grappling { .. } => Some(AbilityKind::Grapple),
        }
    }

    /// Whether a new activation may take the slot.
    fn is_open(&self) -> bool {
        matches!(self, Locomotion::Idle | Locomotion::Gliding)
    }
}

/// One-shot effects that fire on a later frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    EndDash,
    EndGrapple,
    DespawnBridge(PlatformId),
}

/// Per-frame inputs to the ability step.
pub struct AbilityContext<'a> {
    pub cfg: &'a ControllerConfig,
    pub frame: FrameTime,
    pub input: &'a InputState,
    pub grounded: bool,
    pub wall_sliding: bool,
    pub facing: Facing,
    pub position: Vec2,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbilityState {
    pub locomotion: Locomotion,
    pub ground_pound_cooldown: Countdown,
    pub dash_cooldown: Countdown,
    pub grapple_cooldown: Countdown,
    /// Landing damage is ignored while this runs.
    pub invulnerability: Countdown,
    /// Dashes since the last grounded frame.
    pub dash_count: u8,
    /// Direction of the most recent dash.
    pub dash_direction: Vec2,
}

/// Unit direction from held inputs, falling back to facing.
pub fn aim_direction(input: &InputState, facing: Facing) -> Vec2 {
    let aim = input.aim();
    if aim == Vec2::ZERO {
        Vec2::new(facing.sign(), 0.0)
    } else {
        aim.normalize()
    }
}

impl AbilityState {
    pub fn is_active(&self, kind: AbilityKind) -> bool {
        self.locomotion.kind() == Some(kind)
    }

    pub fn is_dashing(&self) -> bool {
        self.is_active(AbilityKind::Dash)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability.is_running()
    }

    /// Run one frame: tick timers, end what should end, start what may start,
    /// then apply continuous effects.
    pub fn update<L: Level>(
        &mut self,
        ctx: &AbilityContext<'_>,
        velocity: &mut Vec2,
        resources: &mut Resources,
        scheduler: &mut Scheduler<DeferredTask>,
        level: &mut L,
        events: &mut Vec<ControllerEvent>,
    ) {
        let delta = ctx.frame.delta;
        self.ground_pound_cooldown.tick(delta);
        self.dash_cooldown.tick(delta);
        self.grapple_cooldown.tick(delta);
        self.invulnerability.tick(delta);

        if ctx.grounded {
            self.dash_count = 0;
        }

        ground_pound::settle(self, ctx, events);
        glide::settle(self, ctx, events);

        if self.locomotion.is_open() {
            let started = ground_pound::try_start(self, ctx, velocity, events)
                || dash::try_start(self, ctx, velocity, resources, scheduler, events)
                || grapple::try_start(self, ctx, resources, scheduler, level, events);
            if !started {
                glide::try_start(self, ctx, events);
            }
        }

        glide::apply(self, ctx, velocity, resources);
    }

    /// Replace a held glide with a committed ability.
    fn take_slot(&mut self, next: Locomotion, events: &mut Vec<ControllerEvent>) {
        if self.locomotion == Locomotion::Gliding {
            events.push(ControllerEvent::GlideStopped);
        }
        self.locomotion = next;
    }

    /// Handle a fired end-of-dash task. Ignores tokens that no longer match
    /// the running dash.
    pub fn end_dash(&mut self, token: TaskToken) -> bool {
        match self.locomotion {
            Locomotion::Dashing { ends, .. } if ends == token => {
                self.locomotion = Locomotion::Idle;
                tracing::debug!("dash ended");
                true
            },
            _ => false,
        }
    }

    pub fn end_grapple(&mut self, token: TaskToken) -> bool {
        match self.locomotion {
            Locomotion::Grappling { ends } if ends == token => {
                self.locomotion = Locomotion::Idle;
                true
            },
            _ => false,
        }
    }

    /// End a ground pound early (it struck something breakable).
    pub fn interrupt_ground_pound(&mut self) -> bool {
        if self.locomotion == Locomotion::GroundPounding {
            self.locomotion = Locomotion::Idle;
            true
        } else {
            false
        }
    }

    /// Whether the ability could start now, ignoring input and ground state.
    pub fn is_ready(&self, kind: AbilityKind, cfg: &ControllerConfig, resources: &Resources) -> bool {
        match kind {
            AbilityKind::Glide => resources.moisture() > 0.0,
            AbilityKind::GroundPound => self.ground_pound_cooldown.is_ready(),
            AbilityKind::Dash => {
                self.dash_cooldown.is_ready()
                    && resources.can_afford(cfg.dash.moisture_cost)
                    && self.dash_count < cfg.dash.max_per_airtime
            },
            AbilityKind::Grapple => {
                self.grapple_cooldown.is_ready()
                    && resources.can_afford(cfg.grapple.moisture_cost)
            },
        }
    }

    pub fn cooldown_remaining(&self, kind: AbilityKind) -> f64 {
        match kind {
            AbilityKind::Glide => 0.0,
            AbilityKind::GroundPound => self.ground_pound_cooldown.remaining(),
            AbilityKind::Dash => self.dash_cooldown.remaining(),
            AbilityKind::Grapple => self.grapple_cooldown.remaining(),
        }
    }
}
