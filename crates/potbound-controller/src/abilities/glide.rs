use glam::Vec2;

use super::{AbilityContext, AbilityState, Locomotion};
use crate::events::ControllerEvent;
use crate::resources::Resources;

/// Stop gliding once the button is released, the body lands, or it catches a wall.
pub(super) fn settle(
    state: &mut AbilityState,
    ctx: &AbilityContext<'_>,
    events: &mut Vec<ControllerEvent>,
) {
    if state.locomotion != Locomotion::Gliding {
        return;
    }
    if !ctx.input.glide || ctx.grounded || ctx.wall_sliding {
        state.locomotion = Locomotion::Idle;
        events.push(ControllerEvent::GlideStopped);
    }
}

pub(super) fn try_start(
    state: &mut AbilityState,
    ctx: &AbilityContext<'_>,
    events: &mut Vec<ControllerEvent>,
) {
    if state.locomotion != Locomotion::Idle
        || !ctx.input.glide
        || ctx.grounded
        || ctx.wall_sliding
    {
        return;
    }
    state.locomotion = Locomotion::Gliding;
    events.push(ControllerEvent::GlideStarted);
}

/// Damp downward speed and drain moisture for the frame.
pub(super) fn apply(
    state: &AbilityState,
    ctx: &AbilityContext<'_>,
    velocity: &mut Vec2,
    resources: &mut Resources,
) {
    if state.locomotion != Locomotion::Gliding {
        return;
    }
    if velocity.y > 0.0 {
        velocity.y *= ctx.cfg.glide.fall_damping;
    }
    resources.drain_for(ctx.cfg.glide.moisture_per_sec, ctx.frame.delta);
}
