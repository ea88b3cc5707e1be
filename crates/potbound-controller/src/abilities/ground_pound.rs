use glam::Vec2;

use super::{AbilityContext, AbilityState, Locomotion};
use crate::events::ControllerEvent;

/// A ground pound ends the instant the body is grounded.
pub(super) fn settle(
    state: &mut AbilityState,
    ctx: &AbilityContext<'_>,
    events: &mut Vec<ControllerEvent>,
) {
    if state.locomotion == Locomotion::GroundPounding && ctx.grounded {
        state.locomotion = Locomotion::Idle;
        events.push(ControllerEvent::GroundPoundLanded);
    }
}

pub(super) fn try_start(
    state: &mut AbilityState,
    ctx: &AbilityContext<'_>,
    velocity: &mut Vec2,
    events: &mut Vec<ControllerEvent>,
) -> bool {
    if !ctx.input.ground_pound || ctx.grounded || !state.ground_pound_cooldown.is_ready() {
        return false;
    }
    let cfg = &ctx.cfg.ground_pound;
    state.take_slot(Locomotion::GroundPounding, events);
    velocity.y = cfg.velocity;
    state.ground_pound_cooldown.start(cfg.cooldown_ms);
    tracing::debug!(velocity = cfg.velocity, "ground pound");
    events.push(ControllerEvent::GroundPoundStarted);
    true
}
