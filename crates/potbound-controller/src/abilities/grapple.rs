use glam::Vec2;

use potbound_core::engine::Level;
use potbound_core::scheduler::Scheduler;

use super::{AbilityContext, AbilityState, DeferredTask, Locomotion, aim_direction};
use crate::events::ControllerEvent;
use crate::resources::Resources;

/// Fire the grapple and drop a bridge at the end of its reach.
///
/// The bridge outlives the grapple: the ability clears after `active_ms`
/// while the platform stays for `bridge_lifetime_ms`.
pub(super) fn try_start<L: Level>(
    state: &mut AbilityState,
    ctx: &AbilityContext<'_>,
    resources: &mut Resources,
    scheduler: &mut Scheduler<DeferredTask>,
    level: &mut L,
    events: &mut Vec<ControllerEvent>,
) -> bool {
    let cfg = &ctx.cfg.grapple;
    if !ctx.input.grapple || !state.grapple_cooldown.is_ready() {
        return false;
    }
    if !resources.can_afford(cfg.moisture_cost) {
        tracing::debug!(moisture = resources.moisture(), "grapple refused, too dry");
        return false;
    }

    let direction = aim_direction(ctx.input, ctx.facing);
    let target = ctx.position + direction * cfg.range;
    let bridge = level.spawn_bridge(target, Vec2::new(cfg.bridge_width, cfg.bridge_height));

    let now = ctx.frame.now;
    scheduler.schedule(now + cfg.bridge_lifetime_ms, DeferredTask::DespawnBridge(bridge));
    let ends = scheduler.schedule(now + cfg.active_ms, DeferredTask::EndGrapple);
    state.take_slot(Locomotion::Grappling { ends }, events);
    state.grapple_cooldown.start(cfg.cooldown_ms);
    resources.spend(cfg.moisture_cost);

    tracing::debug!(?target, ?bridge, "grapple bridge spawned");
    events.push(ControllerEvent::GrappleFired { target, bridge });
    true
}
