//! Hard landings, dry-out and shatter recoveries, and what a reset clears.

#[allow(dead_code)]
mod common;

use glam::Vec2;

use potbound_controller::ControllerEvent;
use potbound_controller::abilities::AbilityKind;
use potbound_controller::config::ControllerConfig;

use common::{Harness, count, keys};

fn is_damage(e: &ControllerEvent) -> bool {
    matches!(e, ControllerEvent::DurabilityLost { .. })
}

#[test]
fn hard_landing_cracks_exactly_one_pip() {
    let mut h = Harness::new();
    h.settle_on_ground();
    let events = h.fall_and_land(25, 600.0);
    assert_eq!(count(&events, is_damage), 1);
    assert!(events.contains(&ControllerEvent::DurabilityLost { remaining: 3 }));
    assert_eq!(h.ctrl.resources().durability(), 3);

    // Resting afterwards does nothing more.
    let events = h.idle_for(30);
    assert_eq!(count(&events, is_damage), 0);
    assert_eq!(h.ctrl.resources().durability(), 3);
}

#[test]
fn soft_or_short_landings_are_harmless() {
    let mut h = Harness::new();
    h.settle_on_ground();
    h.fall_and_land(25, 100.0);
    h.idle_for(30);
    h.fall_and_land(10, 900.0);
    assert_eq!(h.ctrl.resources().durability(), 4);
}

#[test]
fn upward_contact_never_damages() {
    let mut h = Harness::new();
    h.settle_on_ground();
    h.body.lift_off(100.0);
    h.idle_for(25);
    h.body.touch_down_at(-8.0);
    let events = h.idle();
    assert_eq!(
        count(&events, |e| matches!(e, ControllerEvent::Landed { .. })),
        0
    );
    assert_eq!(h.ctrl.resources().durability(), 4);
}

#[test]
fn impact_cooldown_spares_quick_second_landing() {
    let mut h = Harness::new();
    h.settle_on_ground();
    h.fall_and_land(25, 600.0);
    assert_eq!(h.ctrl.resources().durability(), 3);

    // 20 frames later: past the debounce and min airtime, inside the cooldown.
    let events = h.fall_and_land(19, 600.0);
    assert_eq!(
        count(&events, |e| matches!(e, ControllerEvent::Landed { .. })),
        1
    );
    assert_eq!(count(&events, is_damage), 0);
    assert_eq!(h.ctrl.resources().durability(), 3);
}

#[test]
fn dash_invulnerability_absorbs_impact() {
    let mut h = Harness::new();
    h.settle_on_ground();
    h.body.lift_off(100.0);
    h.idle_for(25);
    h.step(keys(|k| k.dash = true));
    h.body.touch_down_at(600.0);
    let events = h.idle();
    assert!(events.contains(&ControllerEvent::DamageBlocked));
    assert_eq!(count(&events, is_damage), 0);
    assert_eq!(h.ctrl.resources().durability(), 4);
}

#[test]
fn fourth_crack_shatters_and_respawns() {
    let mut h = Harness::new();
    h.settle_on_ground();
    for expected in [3, 2, 1] {
        h.fall_and_land(25, 600.0);
        assert_eq!(h.ctrl.resources().durability(), expected);
        h.idle_for(30);
    }
    h.body.position = Vec2::new(900.0, 400.0);
    let events = h.fall_and_land(25, 600.0);

    assert!(events.contains(&ControllerEvent::DurabilityLost { remaining: 0 }));
    assert!(events.contains(&ControllerEvent::Shattered));
    assert_eq!(h.ctrl.resources().durability(), 4);
    assert_eq!(h.ctrl.resources().moisture(), 50.0);
    assert_eq!(h.body.position, h.ctrl.spawn_point());
    assert_eq!(h.body.velocity, Vec2::ZERO);
}

#[test]
fn easier_difficulty_shatters_sooner() {
    let mut cfg = ControllerConfig::default();
    cfg.resources.max_durability = 2;
    let mut h = Harness::with_config(cfg);
    h.settle_on_ground();
    assert_eq!(h.ctrl.hud().max_durability, 2);

    h.fall_and_land(25, 600.0);
    assert_eq!(h.ctrl.resources().durability(), 1);
    h.idle_for(30);
    let events = h.fall_and_land(25, 600.0);
    assert!(events.contains(&ControllerEvent::Shattered));
    assert_eq!(h.ctrl.resources().durability(), 2);
}

#[test]
fn passive_drain_dries_out_without_touching_durability() {
    let mut cfg = ControllerConfig::default();
    cfg.resources.starting_moisture = 5.0;
    let mut h = Harness::with_config(cfg);
    h.settle_on_ground();
    h.fall_and_land(25, 600.0);
    assert_eq!(h.ctrl.resources().durability(), 3);

    h.body.position = Vec2::new(900.0, 400.0);
    let mut dried = false;
    for _ in 0..700 {
        if h.idle().contains(&ControllerEvent::DriedOut) {
            dried = true;
            break;
        }
    }
    assert!(dried);
    assert!(h.now() >= 10_000.0);
    assert_eq!(h.ctrl.resources().moisture(), 50.0);
    assert_eq!(h.ctrl.resources().durability(), 3);
    assert_eq!(h.body.position, h.ctrl.spawn_point());
}

#[test]
fn dash_cost_can_dry_out_and_reset_cancels_its_timer() {
    let mut cfg = ControllerConfig::default();
    cfg.resources.starting_moisture = 5.0;
    let mut h = Harness::with_config(cfg);
    h.body.lift_off(100.0);
    h.idle();

    let events = h.step(keys(|k| k.dash = true));
    assert!(events.contains(&ControllerEvent::DriedOut));
    assert_eq!(h.ctrl.resources().moisture(), 50.0);
    assert!(!h.ctrl.abilities().is_dashing());
    assert_eq!(h.ctrl.abilities().dash_count, 1);
    assert!(!h.ctrl.abilities().is_invulnerable());
    assert_eq!(h.ctrl.pending_tasks(), 0);
    assert_eq!(h.body.velocity, Vec2::ZERO);
    assert_eq!(h.body.position, h.ctrl.spawn_point());

    // Still the same airtime: the reset does not hand back the dash.
    h.body.lift_off(100.0);
    let events = h.step(keys(|k| k.dash = true));
    assert_eq!(count(&events, |e| matches!(e, ControllerEvent::DashStarted { .. })), 0);
    assert_eq!(h.ctrl.abilities().dash_count, 1);

    // Touching ground restores it, and the new dash runs its full window.
    h.body.land();
    h.idle();
    assert_eq!(h.ctrl.abilities().dash_count, 0);
    h.body.lift_off(100.0);
    h.idle();
    let events = h.step(keys(|k| k.dash = true));
    assert_eq!(count(&events, |e| matches!(e, ControllerEvent::DashStarted { .. })), 1);
    let started = h.now();
    assert!(h.ctrl.abilities().is_dashing());
    while h.now() - started < 140.0 {
        h.idle();
        assert!(h.ctrl.abilities().is_dashing());
    }
}

#[test]
fn glide_drain_dries_out() {
    let mut cfg = ControllerConfig::default();
    cfg.resources.starting_moisture = 0.05;
    let mut h = Harness::with_config(cfg);
    h.settle_on_ground();
    h.fall_and_land(25, 600.0);
    assert_eq!(h.ctrl.resources().durability(), 3);

    h.body.position = Vec2::new(900.0, 400.0);
    h.body.lift_off(100.0);
    h.idle();

    let mut events = Vec::new();
    for _ in 0..30 {
        events = h.step(keys(|k| k.glide = true));
        if events.contains(&ControllerEvent::DriedOut) {
            break;
        }
    }
    assert!(events.contains(&ControllerEvent::DriedOut), "{events:?}");
    assert_eq!(h.ctrl.resources().moisture(), 50.0);
    assert_eq!(h.ctrl.resources().durability(), 3);
    assert_eq!(h.body.position, h.ctrl.spawn_point());
    assert!(!h.ctrl.abilities().is_active(AbilityKind::Glide));
}

#[test]
fn reset_clears_live_bridges() {
    let mut cfg = ControllerConfig::default();
    cfg.resources.drain_amount = 100.0;
    cfg.resources.drain_interval_ms = 1000.0;
    let mut h = Harness::with_config(cfg);
    h.settle_on_ground();
    h.step(keys(|k| k.grapple = true));
    assert_eq!(h.level.bridges().len(), 1);

    let mut events = Vec::new();
    while !events.contains(&ControllerEvent::DriedOut) {
        assert!(h.now() < 1100.0, "expected a dry-out");
        events = h.idle();
    }
    assert!(
        events
            .iter()
            .any(|e| matches!(e, ControllerEvent::BridgeExpired { .. }))
    );
    assert!(h.level.bridges().is_empty());
    assert_eq!(h.ctrl.pending_tasks(), 0);
}

#[test]
fn hud_and_events_serialize_for_hosts() {
    let mut h = Harness::new();
    h.settle_on_ground();
    let hud = serde_json::to_value(h.ctrl.hud()).expect("hud serializes");
    assert_eq!(hud["moisture"], 100.0);
    assert_eq!(hud["durability"], 4);
    assert_eq!(hud["dash"]["ready"], true);
    assert_eq!(hud["facing"], "Right");
    assert_eq!(hud["grounded"], true);

    let event = serde_json::to_value(ControllerEvent::DurabilityLost { remaining: 2 })
        .expect("event serializes");
    assert_eq!(event["event"], "durability_lost");
    assert_eq!(event["remaining"], 2);
}
