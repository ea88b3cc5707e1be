//! Moisture and durability, and the two in-place recoveries they trigger.

use serde::{Deserialize, Serialize};

use crate::config::{MAX_MOISTURE, ResourceConfig};

/// Recovery forced by an exhausted resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recovery {
    /// Moisture hit zero.
    DriedOut,
    /// Durability hit zero.
    Shattered,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resources {
    moisture: f32,
    durability: u8,
    max_durability: u8,
    last_drain_at: f64,
}

impl Resources {
    pub fn new(cfg: &ResourceConfig) -> Self {
        Self {
            moisture: cfg.starting_moisture.clamp(0.0, MAX_MOISTURE),
            durability: cfg.max_durability,
            max_durability: cfg.max_durability,
            last_drain_at: 0.0,
        }
    }

    pub fn moisture(&self) -> f32 {
        self.moisture
    }

    pub fn durability(&self) -> u8 {
        self.durability
    }

    pub fn max_durability(&self) -> u8 {
        self.max_durability
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        self.moisture >= cost
    }

    /// Spend moisture, never going below zero.
    pub fn spend(&mut self, amount: f32) {
        self.set_moisture(self.moisture - amount);
    }

    /// Continuous drain for `delta_ms` at `per_sec`.
    pub fn drain_for(&mut self, per_sec: f32, delta_ms: f64) {
        if self.moisture > 0.0 {
            self.spend(per_sec * (delta_ms / 1000.0) as f32);
        }
    }

    /// Apply the wall-clock drain and check for dry-out.
    pub fn update(&mut self, cfg: &ResourceConfig, now: f64) -> Option<Recovery> {
        if now - self.last_drain_at >= cfg.drain_interval_ms {
            self.spend(cfg.drain_amount);
            self.last_drain_at = now;
            tracing::debug!(moisture = self.moisture, "passive moisture drain");
        }
        if self.moisture <= 0.0 {
            self.dry_out(cfg);
            return Some(Recovery::DriedOut);
        }
        None
    }

    /// Lose one durability pip; shatters at zero.
    pub fn crack(&mut self, cfg: &ResourceConfig) -> Option<Recovery> {
        if self.durability == 0 {
            return None;
        }
        self.durability -= 1;
        tracing::info!(
            durability = self.durability,
            max = self.max_durability,
            "pot cracked"
        );
        if self.durability == 0 {
            self.shatter(cfg);
            return Some(Recovery::Shattered);
        }
        None
    }

    fn dry_out(&mut self, cfg: &ResourceConfig) {
        self.set_moisture(cfg.recovery_moisture);
        tracing::info!(moisture = self.moisture, "pot dried out");
    }

    fn shatter(&mut self, cfg: &ResourceConfig) {
        self.durability = self.max_durability;
        self.set_moisture(cfg.recovery_moisture);
        tracing::info!(
            moisture = self.moisture,
            durability = self.durability,
            "pot shattered"
        );
    }

    fn set_moisture(&mut self, value: f32) {
        self.moisture = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, MAX_MOISTURE)
        };
    }
}
