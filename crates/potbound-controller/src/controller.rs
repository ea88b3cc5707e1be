//! The per-frame player controller.
//!
//! Frame order: deferred tasks, input, ground contact, jump, run and wall
//! slide, abilities, resources, impact, kill plane, velocity write-back.

use glam::Vec2;

use potbound_core::engine::{Body, Level, PlatformId};
use potbound_core::scheduler::Scheduler;
use potbound_core::time::FrameTime;

use crate::abilities::{AbilityContext, AbilityState, DeferredTask};
use crate::collision;
use crate::config::ControllerConfig;
use crate::events::ControllerEvent;
use crate::ground::{GroundContact, is_grounded};
use crate::hud::HudSnapshot;
use crate::impact::{ImpactDetector, LandingReport};
use crate::input::{InputAggregator, RawInput};
use crate::jump::JumpState;
use crate::resources::{Recovery, Resources};
use crate::run::RunState;

/// Owns all player state and advances it one frame at a time.
#[derive(Debug, Clone)]
pub struct PlayerController {
    config: ControllerConfig,
    input: InputAggregator,
    ground: GroundContact,
    jump: JumpState,
    run: RunState,
    abilities: AbilityState,
    resources: Resources,
    impact: ImpactDetector,
    scheduler: Scheduler<DeferredTask>,
}

impl PlayerController {
    pub fn new(config: ControllerConfig) -> Self {
        let resources = Resources::new(&config.resources);
        Self {
            config,
            input: InputAggregator::new(),
            ground: GroundContact::default(),
            jump: JumpState::default(),
            run: RunState::default(),
            abilities: AbilityState::default(),
            resources,
            impact: ImpactDetector::default(),
            scheduler: Scheduler::new(),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn abilities(&self) -> &AbilityState {
        &self.abilities
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn jump(&self) -> &JumpState {
        &self.jump
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn is_grounded(&self) -> bool {
        self.ground.on_ground
    }

    /// Deferred tasks still waiting to fire.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.config.world.spawn_x, self.config.world.spawn_y)
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::capture(
            &self.config,
            &self.abilities,
            &self.resources,
            &self.run,
            self.ground.on_ground,
        )
    }

    /// Advance one frame. `body` must already carry this frame's resolved
    /// contacts; its velocity is rewritten before returning.
    pub fn update<B: Body, L: Level>(
        &mut self,
        frame: FrameTime,
        raw: &RawInput,
        body: &mut B,
        level: &mut L,
    ) -> Vec<ControllerEvent> {
        self.update_touching(frame, raw, &[], body, level)
    }

    /// Advance one frame with the platforms the engine reported touching
    /// during it. Contacts are dispatched before abilities settle, so a
    /// ground pound that lands on a breakable platform still breaks it.
    pub fn update_touching<B: Body, L: Level>(
        &mut self,
        frame: FrameTime,
        raw: &RawInput,
        touched: &[PlatformId],
        body: &mut B,
        level: &mut L,
    ) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        self.fire_due_tasks(frame.now, level, &mut events);

        let cfg = &self.config;

        let input = self.input.resolve(raw);
        let contacts = body.contacts();
        let contact_velocity = body.velocity();
        let mut velocity = contact_velocity;

        let grounded = is_grounded(contacts, velocity.y, cfg.jump.grounded_velocity_tolerance);
        let transition = self.ground.update(grounded);

        if let Some(kind) = self.jump.update(
            &cfg.jump,
            frame.now,
            &input,
            grounded,
            transition,
            &mut velocity,
        ) {
            tracing::debug!(?kind, "jump");
            events.push(ControllerEvent::Jumped { kind });
        }

        self.run.update(
            &cfg.run,
            &input,
            contacts,
            grounded,
            self.abilities.is_dashing(),
            &mut velocity,
        );

        for &platform in touched {
            events.extend(collision::on_platform_contact(
                &mut self.abilities,
                platform,
                level,
            ));
        }

        let ctx = AbilityContext {
            cfg,
            frame,
            input: &input,
            grounded,
            wall_sliding: self.run.wall_slide.is_some(),
            facing: self.run.facing,
            position: body.position(),
        };
        self.abilities.update(
            &ctx,
            &mut velocity,
            &mut self.resources,
            &mut self.scheduler,
            level,
            &mut events,
        );

        let mut reset = false;
        if let Some(Recovery::DriedOut) = self.resources.update(&cfg.resources, frame.now) {
            events.push(ControllerEvent::DriedOut);
            reset = true;
        }

        if let Some(report) = self.impact.observe(
            &cfg.impact,
            frame.now,
            transition,
            contact_velocity.y,
        ) {
            reset |= self.apply_landing(report, &mut events);
        }

        if reset {
            self.full_reset(body, level, &mut events);
            velocity = Vec2::ZERO;
        } else if body.position().y > self.config.world.kill_plane_y {
            tracing::info!(y = body.position().y, "fell out of world");
            body.set_position(self.spawn_point());
            velocity = Vec2::ZERO;
            events.push(ControllerEvent::FellOutOfWorld);
        }

        body.set_velocity(velocity);
        events
    }

    /// Dispatch a platform contact outside the frame update. Hosts whose
    /// collision callbacks fire before the update should prefer
    /// [`Self::update_touching`].
    pub fn on_platform_contact<L: Level>(
        &mut self,
        platform: PlatformId,
        level: &mut L,
    ) -> Option<ControllerEvent> {
        collision::on_platform_contact(&mut self.abilities, platform, level)
    }

    /// Returns true when the landing shattered the pot.
    fn apply_landing(&mut self, report: LandingReport, events: &mut Vec<ControllerEvent>) -> bool {
        let LandingReport::Landed {
            speed,
            airtime,
            impact,
        } = report
        else {
            return false;
        };
        events.push(ControllerEvent::Landed { speed, airtime });
        if !impact {
            return false;
        }
        if self.abilities.is_invulnerable() {
            tracing::debug!(speed, "impact absorbed by dash invulnerability");
            events.push(ControllerEvent::DamageBlocked);
            return false;
        }
        let remaining = self.resources.durability().saturating_sub(1);
        events.push(ControllerEvent::DurabilityLost { remaining });
        match self.resources.crack(&self.config.resources) {
            Some(Recovery::Shattered) => {
                events.push(ControllerEvent::Shattered);
                true
            },
            _ => false,
        }
    }

    fn fire_due_tasks<L: Level>(&mut self, now: f64, level: &mut L, events: &mut Vec<ControllerEvent>) {
        for (token, task) in self.scheduler.take_due(now) {
            match task {
                DeferredTask::EndDash => {
                    if self.abilities.end_dash(token) {
                        events.push(ControllerEvent::DashEnded);
                    }
                },
                DeferredTask::EndGrapple => {
                    if self.abilities.end_grapple(token) {
                        events.push(ControllerEvent::GrappleEnded);
                    }
                },
                DeferredTask::DespawnBridge(bridge) => {
                    level.destroy_platform(bridge);
                    events.push(ControllerEvent::BridgeExpired { bridge });
                },
            }
        }
    }

    /// In-place recovery after dry-out or shatter. Resources were already
    /// refilled by the resource manager; everything else goes back to a
    /// fresh start at the spawn point.
    fn full_reset<B: Body, L: Level>(
        &mut self,
        body: &mut B,
        level: &mut L,
        events: &mut Vec<ControllerEvent>,
    ) {
        for (_, task) in self.scheduler.cancel_all() {
            if let DeferredTask::DespawnBridge(bridge) = task {
                level.destroy_platform(bridge);
                events.push(ControllerEvent::BridgeExpired { bridge });
            }
        }
        // Dash allowance is only restored by touching ground.
        self.abilities = AbilityState {
            dash_count: self.abilities.dash_count,
            ..AbilityState::default()
        };
        self.jump = JumpState::default();
        self.ground = GroundContact::default();
        self.impact = ImpactDetector::default();
        body.set_position(self.spawn_point());
        tracing::info!(
            moisture = self.resources.moisture(),
            durability = self.resources.durability(),
            "player reset to spawn"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use potbound_core::test_helpers::{FakeBody, FakeLevel};
    use potbound_core::time::FrameClock;

    use crate::abilities::AbilityKind;
    use crate::input::KeyboardState;

    fn keys(f: impl FnOnce(&mut KeyboardState)) -> RawInput {
        let mut raw = RawInput::default();
        f(&mut raw.keys);
        raw
    }

    struct Sim {
        ctrl: PlayerController,
        body: FakeBody,
        level: FakeLevel,
        clock: FrameClock,
    }

    impl Sim {
        fn new() -> Self {
            Self {
                ctrl: PlayerController::new(ControllerConfig::default()),
                body: FakeBody::at(400.0, 500.0),
                level: FakeLevel::default(),
                clock: FrameClock::default(),
            }
        }

        fn step(&mut self, raw: RawInput) -> Vec<ControllerEvent> {
            let frame = self.clock.tick();
            self.ctrl.update(frame, &raw, &mut self.body, &mut self.level)
        }

        fn step_touching(&mut self, raw: RawInput, touched: &[PlatformId]) -> Vec<ControllerEvent> {
            let frame = self.clock.tick();
            self.ctrl
                .update_touching(frame, &raw, touched, &mut self.body, &mut self.level)
        }
    }

    #[test]
    fn standing_still_is_grounded_and_quiet() {
        let mut sim = Sim::new();
        sim.body.land();
        let events = sim.step(RawInput::default());
        assert!(sim.ctrl.is_grounded());
        assert_eq!(sim.body.velocity, Vec2::ZERO);
        assert_eq!(
            events,
            vec![ControllerEvent::Landed {
                speed: 0.0,
                airtime: None
            }]
        );
        assert!(sim.step(RawInput::default()).is_empty());
    }

    #[test]
    fn ground_jump_writes_velocity() {
        let mut sim = Sim::new();
        sim.body.land();
        sim.step(RawInput::default());
        let events = sim.step(keys(|k| k.space = true));
        assert!(events.contains(&ControllerEvent::Jumped {
            kind: crate::jump::JumpKind::Ground
        }));
        assert_eq!(sim.body.velocity.y, -400.0);
    }

    #[test]
    fn dash_locks_run_control() {
        let mut sim = Sim::new();
        sim.body.lift_off(100.0);
        sim.step(keys(|k| {
            k.dash = true;
            k.right = true;
        }));
        assert_eq!(sim.body.velocity.x, 800.0);
        let _ = sim.step(keys(|k| k.left = true));
        assert_eq!(sim.body.velocity.x, 800.0, "dash owns velocity");
        assert_eq!(sim.ctrl.run().facing, crate::run::Facing::Right);
    }

    #[test]
    fn kill_plane_returns_to_spawn_without_reset() {
        let mut sim = Sim::new();
        sim.body.lift_off(300.0);
        sim.step(keys(|k| k.dash = true));
        sim.body.position.y = 1200.0;
        let events = sim.step(RawInput::default());
        assert!(events.contains(&ControllerEvent::FellOutOfWorld));
        assert_eq!(sim.body.position, sim.ctrl.spawn_point());
        assert_eq!(sim.body.velocity, Vec2::ZERO);
        assert_eq!(sim.ctrl.resources().moisture(), 95.0);
        assert_eq!(sim.ctrl.abilities().dash_count, 1);
    }

    #[test]
    fn hud_reflects_cooldowns() {
        let mut sim = Sim::new();
        sim.body.lift_off(100.0);
        sim.step(keys(|k| k.ground_pound = true));
        let hud = sim.ctrl.hud();
        assert!(hud.ground_pound.active);
        assert!(!hud.ground_pound.ready);
        assert!(hud.ground_pound.cooldown_remaining_ms > 0.0);
        assert!(hud.dash.ready);
        assert_eq!(hud.durability, 4);
        assert_eq!(hud.moisture_fraction(), 1.0);
        assert!(sim.ctrl.abilities().is_active(AbilityKind::GroundPound));
    }

    #[test]
    fn platform_contact_routes_to_ground_pound() {
        let mut sim = Sim::new();
        let id = sim.level.add_platform(Vec2::new(400.0, 600.0), true);
        sim.body.lift_off(100.0);
        sim.step(keys(|k| k.ground_pound = true));
        let event = sim.ctrl.on_platform_contact(id, &mut sim.level);
        assert_eq!(event, Some(ControllerEvent::PlatformBroken { platform: id }));
        assert!(!sim.level.contains(id));
        assert!(!sim.ctrl.abilities().is_active(AbilityKind::GroundPound));
    }

    #[test]
    fn ground_pound_landing_on_breakable_breaks_it() {
        let mut sim = Sim::new();
        let id = sim.level.add_platform(Vec2::new(400.0, 520.0), true);
        sim.body.lift_off(100.0);
        sim.step(keys(|k| k.ground_pound = true));

        sim.body.touch_down_at(1100.0);
        let events = sim.step_touching(RawInput::default(), &[id]);
        assert!(events.contains(&ControllerEvent::PlatformBroken { platform: id }));
        assert!(!events.contains(&ControllerEvent::GroundPoundLanded));
        assert!(!sim.level.contains(id));
        assert!(!sim.ctrl.abilities().is_active(AbilityKind::GroundPound));
    }

    #[test]
    fn landing_on_solid_platform_just_ends_pound() {
        let mut sim = Sim::new();
        let id = sim.level.add_platform(Vec2::new(400.0, 520.0), false);
        sim.body.lift_off(100.0);
        sim.step(keys(|k| k.ground_pound = true));

        sim.body.touch_down_at(1100.0);
        let events = sim.step_touching(RawInput::default(), &[id]);
        assert!(events.contains(&ControllerEvent::GroundPoundLanded));
        assert!(sim.level.contains(id));
    }

    mod proptests {
        use super::*;
        use potbound_core::engine::Contacts;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        struct FrameScript {
            keys: KeyboardState,
            contacts: Contacts,
            vy: f32,
            delta: f64,
        }

        fn keyboard() -> impl Strategy<Value = KeyboardState> {
            prop::array::uniform9(any::<bool>()).prop_map(|b| KeyboardState {
                left: b[0],
                right: b[1],
                up: b[2],
                down: b[3],
                space: b[4],
                glide: b[5],
                dash: b[6],
                ground_pound: b[7],
                grapple: b[8],
            })
        }

        fn frame_script(allow_ground: bool) -> impl Strategy<Value = FrameScript> {
            (
                keyboard(),
                any::<bool>(),
                any::<bool>(),
                any::<bool>(),
                -1200.0f32..1200.0,
                1.0f64..200.0,
            )
                .prop_map(move |(keys, down, left, right, vy, delta)| FrameScript {
                    keys,
                    contacts: Contacts {
                        touching_down: down && allow_ground,
                        touching_left: left,
                        touching_right: right,
                        blocked_down: false,
                    },
                    vy,
                    delta,
                })
        }

        proptest! {
            #[test]
            fn resources_stay_in_bounds(script in prop::collection::vec(frame_script(true), 1..200)) {
                let mut ctrl = PlayerController::new(ControllerConfig::default());
                let mut body = FakeBody::at(400.0, 500.0);
                let mut level = FakeLevel::default();
                let mut clock = FrameClock::default();
                for f in &script {
                    body.contacts = f.contacts;
                    body.velocity.y = f.vy;
                    let frame = clock.advance(f.delta);
                    let raw = RawInput { keys: f.keys, touch: None };
                    ctrl.update(frame, &raw, &mut body, &mut level);
                    let m = ctrl.resources().moisture();
                    prop_assert!((0.0..=100.0).contains(&m), "moisture {m}");
                    let d = ctrl.resources().durability();
                    let max = ctrl.resources().max_durability();
                    prop_assert!((1..=max).contains(&d), "durability {d} of {max}");
                    prop_assert!(body.velocity.is_finite());
                }
            }

            #[test]
            fn at_most_one_dash_per_airtime(script in prop::collection::vec(frame_script(false), 1..200)) {
                let mut ctrl = PlayerController::new(ControllerConfig::default());
                let mut body = FakeBody::at(400.0, 500.0);
                let mut level = FakeLevel::default();
                let mut clock = FrameClock::default();
                let mut dashes = 0;
                for f in &script {
                    body.contacts = f.contacts;
                    body.velocity.y = f.vy;
                    let frame = clock.advance(f.delta);
                    let raw = RawInput { keys: f.keys, touch: None };
                    let events = ctrl.update(frame, &raw, &mut body, &mut level);
                    dashes += events
                        .iter()
                        .filter(|e| matches!(e, ControllerEvent::DashStarted { .. }))
                        .count();
                    prop_assert!(dashes <= 1, "dashed {dashes} times without landing");
                }
            }
        }
    }
}
