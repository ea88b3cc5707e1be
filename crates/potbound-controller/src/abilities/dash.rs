use glam::Vec2;

use potbound_core::scheduler::Scheduler;

use super::{AbilityContext, AbilityState, DeferredTask, Locomotion, aim_direction};
use crate::events::ControllerEvent;
use crate::resources::Resources;

pub(super) fn try_start(
    state: &mut AbilityState,
    ctx: &AbilityContext<'_>,
    velocity: &mut Vec2,
    resources: &mut Resources,
    scheduler: &mut Scheduler<DeferredTask>,
    events: &mut Vec<ControllerEvent>,
) -> bool {
    let cfg = &ctx.cfg.dash;
    if !ctx.input.dash
        || ctx.grounded
        || !state.dash_cooldown.is_ready()
        || state.dash_count >= cfg.max_per_airtime
    {
        return false;
    }
    if !resources.can_afford(cfg.moisture_cost) {
        tracing::debug!(moisture = resources.moisture(), "dash refused, too dry");
        return false;
    }

    let direction = aim_direction(ctx.input, ctx.facing);
    let speed = if direction.y < 0.0 {
        cfg.upward_speed
    } else {
        cfg.speed
    };
    *velocity = direction * speed;

    let ends = scheduler.schedule(ctx.frame.now + cfg.duration_ms, DeferredTask::EndDash);
    state.take_slot(Locomotion::Dashing { direction, ends }, events);
    state.dash_direction = direction;
    state.dash_count += 1;
    state.dash_cooldown.start(cfg.cooldown_ms);
    state.invulnerability.start(cfg.invulnerability_ms);
    resources.spend(cfg.moisture_cost);

    tracing::debug!(?direction, speed, "dash");
    events.push(ControllerEvent::DashStarted { direction });
    true
}
