//! Read-only view of controller state for the HUD.

use serde::{Deserialize, Serialize};

use crate::abilities::{AbilityKind, AbilityState};
use crate::config::ControllerConfig;
use crate::resources::Resources;
use crate::run::{Facing, RunState};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilityStatus {
    pub active: bool,
    pub cooldown_remaining_ms: f64,
    /// Off cooldown and affordable right now.
    pub ready: bool,
}

impl AbilityStatus {
    fn of(kind: AbilityKind, abilities: &AbilityState, cfg: &ControllerConfig, resources: &Resources) -> Self {
        Self {
            active: abilities.is_active(kind),
            cooldown_remaining_ms: abilities.cooldown_remaining(kind),
            ready: abilities.is_ready(kind, cfg, resources),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub moisture: f32,
    pub max_moisture: f32,
    pub durability: u8,
    pub max_durability: u8,
    pub glide: AbilityStatus,
    pub ground_pound: AbilityStatus,
    pub dash: AbilityStatus,
    pub grapple: AbilityStatus,
    pub dash_count: u8,
    pub invulnerable: bool,
    pub wall_sliding: bool,
    pub facing: Facing,
    pub grounded: bool,
}

impl HudSnapshot {
    pub(crate) fn capture(
        cfg: &ControllerConfig,
        abilities: &AbilityState,
        resources: &Resources,
        run: &RunState,
        grounded: bool,
    ) -> Self {
        let status = |kind| AbilityStatus::of(kind, abilities, cfg, resources);
        Self {
            moisture: resources.moisture(),
            max_moisture: crate::config::MAX_MOISTURE,
            durability: resources.durability(),
            max_durability: resources.max_durability(),
            glide: status(AbilityKind::Glide),
            ground_pound: status(AbilityKind::GroundPound),
            dash: status(AbilityKind::Dash),
            grapple: status(AbilityKind::Grapple),
            dash_count: abilities.dash_count,
            invulnerable: abilities.is_invulnerable(),
            wall_sliding: run.wall_slide.is_some(),
            facing: run.facing,
            grounded,
        }
    }

    /// Moisture as a 0..=1 fraction for gauge widgets.
    pub fn moisture_fraction(&self) -> f32 {
        if self.max_moisture <= 0.0 {
            return 0.0;
        }
        (self.moisture / self.max_moisture).clamp(0.0, 1.0)
    }
}
