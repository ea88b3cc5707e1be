//! Landing classification and hard-landing detection.

use crate::config::ImpactConfig;
use crate::ground::GroundTransition;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LandingReport {
    /// Ground contact while moving up: the start of a jump, never damage.
    UpwardContact { velocity_y: f32 },
    Landed {
        speed: f32,
        /// `None` when the entity had not been on the ground since spawning.
        airtime: Option<f64>,
        /// Hard enough to crack, before invulnerability is considered.
        impact: bool,
    },
}

/// Watches ground transitions and decides which landings hurt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImpactDetector {
    pub time_left_ground: Option<f64>,
    pub last_landing_at: Option<f64>,
    pub last_impact_at: Option<f64>,
}

impl ImpactDetector {
    /// `velocity_y` is the vertical velocity the engine reported at contact.
    pub fn observe(
        &mut self,
        cfg: &ImpactConfig,
        now: f64,
        transition: GroundTransition,
        velocity_y: f32,
    ) -> Option<LandingReport> {
        match transition {
            GroundTransition::LeftGround => {
                self.time_left_ground = Some(now);
                None
            },
            GroundTransition::Landed => self.classify(cfg, now, velocity_y),
            GroundTransition::StillGrounded | GroundTransition::StillAirborne => None,
        }
    }

    fn classify(&mut self, cfg: &ImpactConfig, now: f64, velocity_y: f32) -> Option<LandingReport> {
        let debounced = self
            .last_landing_at
            .is_some_and(|t| now - t <= cfg.landing_debounce_ms);
        if debounced {
            return None;
        }

        if velocity_y < 0.0 {
            tracing::debug!(velocity_y, "upward ground contact ignored");
            return Some(LandingReport::UpwardContact { velocity_y });
        }

        self.last_landing_at = Some(now);
        let speed = velocity_y.abs();
        let airtime = self.time_left_ground.map(|t| now - t);
        let cooled = self
            .last_impact_at
            .is_none_or(|t| now - t > cfg.cooldown_ms);
        let impact = airtime.is_some_and(|a| a > cfg.min_airtime_ms)
            && speed > cfg.min_speed
            && cooled;
        if impact {
            self.last_impact_at = Some(now);
        }
        tracing::debug!(speed, ?airtime, impact, "landed");
        Some(LandingReport::Landed {
            speed,
            airtime,
            impact,
        })
    }
}
