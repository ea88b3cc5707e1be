use serde::{Deserialize, Serialize};

/// Upper bound of the moisture meter.
pub const MAX_MOISTURE: f32 = 100.0;

/// Variable-height jump, coyote time and jump buffering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Grace period after walking off a ledge (ms).
    pub coyote_time_ms: f64,
    /// How long an early jump press stays live (ms).
    pub jump_buffer_ms: f64,
    /// Vertical velocity applied on jump start (px/s, negative is up).
    pub initial_velocity: f32,
    /// Extra upward speed added per held frame while rising (px/s).
    pub sustain_boost: f32,
    /// Frames the sustain boost may be applied for.
    pub max_jump_frames: u32,
    /// Upward speed still counted as "on the ground" (px/s).
    pub grounded_velocity_tolerance: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            coyote_time_ms: 40.0,
            jump_buffer_ms: 180.0,
            initial_velocity: -400.0,
            sustain_boost: 7.0,
            max_jump_frames: 30,
            grounded_velocity_tolerance: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub speed: f32,
    /// Maximum fall speed while sliding down a wall (px/s).
    pub wall_slide_max_fall: f32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            speed: 160.0,
            wall_slide_max_fall: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlideConfig {
    /// Multiplier applied to downward velocity every frame.
    pub fall_damping: f32,
    /// Moisture spent per second of gliding.
    pub moisture_per_sec: f32,
}

impl Default for GlideConfig {
    fn default() -> Self {
        Self {
            fall_damping: 0.85,
            moisture_per_sec: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundPoundConfig {
    /// Downward velocity set on activation (px/s).
    pub velocity: f32,
    pub cooldown_ms: f64,
}

impl Default for GroundPoundConfig {
    fn default() -> Self {
        Self {
            velocity: 1100.0,
            cooldown_ms: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// Speed for horizontal and downward dashes (px/s).
    pub speed: f32,
    /// Speed for any dash with an upward component (px/s).
    pub upward_speed: f32,
    pub duration_ms: f64,
    pub invulnerability_ms: f64,
    pub cooldown_ms: f64,
    pub moisture_cost: f32,
    /// Dashes allowed between ground contacts.
    pub max_per_airtime: u8,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            speed: 800.0,
            upward_speed: 500.0,
            duration_ms: 150.0,
            invulnerability_ms: 100.0,
            cooldown_ms: 1000.0,
            moisture_cost: 5.0,
            max_per_airtime: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrappleConfig {
    pub moisture_cost: f32,
    pub cooldown_ms: f64,
    /// Distance from the entity to the projected bridge centre (px).
    pub range: f32,
    /// How long the ability itself reports active (ms).
    pub active_ms: f64,
    /// How long the spawned bridge exists (ms).
    pub bridge_lifetime_ms: f64,
    pub bridge_width: f32,
    pub bridge_height: f32,
}

impl Default for GrappleConfig {
    fn default() -> Self {
        Self {
            moisture_cost: 10.0,
            cooldown_ms: 1500.0,
            range: 200.0,
            active_ms: 300.0,
            bridge_lifetime_ms: 3000.0,
            bridge_width: 96.0,
            bridge_height: 16.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub starting_moisture: f32,
    /// Moisture lost every drain interval.
    pub drain_amount: f32,
    pub drain_interval_ms: f64,
    /// Moisture restored by a dry-out or shatter.
    pub recovery_moisture: f32,
    /// Durability pips; also the value restored by a shatter (2..=4).
    pub max_durability: u8,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            starting_moisture: MAX_MOISTURE,
            drain_amount: 5.0,
            drain_interval_ms: 10_000.0,
            recovery_moisture: 50.0,
            max_durability: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactConfig {
    /// Minimum gap between two recorded landings (ms).
    pub landing_debounce_ms: f64,
    pub min_airtime_ms: f64,
    /// Landing speed that must be exceeded to crack (px/s).
    pub min_speed: f32,
    /// Minimum gap between two applied impacts (ms).
    pub cooldown_ms: f64,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            landing_debounce_ms: 300.0,
            min_airtime_ms: 300.0,
            min_speed: 150.0,
            cooldown_ms: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub spawn_x: f32,
    pub spawn_y: f32,
    /// Falling below this y (screen coordinates, down is positive) respawns.
    pub kill_plane_y: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            spawn_x: 200.0,
            spawn_y: 650.0,
            kill_plane_y: 1000.0,
        }
    }
}

/// All feel-tuning for the player core, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub jump: JumpConfig,
    pub run: RunConfig,
    pub glide: GlideConfig,
    pub ground_pound: GroundPoundConfig,
    pub dash: DashConfig,
    pub grapple: GrappleConfig,
    pub resources: ResourceConfig,
    pub impact: ImpactConfig,
    pub world: WorldConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    Invalid { field: &'static str, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(m) => write!(f, "config parse error: {m}"),
            Self::Invalid { field, reason } => write!(f, "invalid config `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a finite value >= 0, got {value}"),
        })
    }
}

fn moisture_amount(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=MAX_MOISTURE).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be within 0..={MAX_MOISTURE}, got {value}"),
        })
    }
}

impl ControllerConfig {
    /// Load config from the path in `POTBOUND_CONFIG`, then
    /// `config/potbound.toml`. Falls back to defaults if neither is readable
    /// or valid.
    pub fn load() -> Self {
        let path = std::env::var("POTBOUND_CONFIG")
            .unwrap_or_else(|_| "config/potbound.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to load {path}: {e}, using defaults");
                    Self::default()
                },
            },
            Err(_) => Self::default(),
        }
    }

    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("jump.coyote_time_ms", self.jump.coyote_time_ms)?;
        non_negative("jump.jump_buffer_ms", self.jump.jump_buffer_ms)?;
        non_negative(
            "jump.grounded_velocity_tolerance",
            self.jump.grounded_velocity_tolerance as f64,
        )?;
        if self.jump.initial_velocity.is_nan() || self.jump.initial_velocity >= 0.0 {
            return Err(ConfigError::Invalid {
                field: "jump.initial_velocity",
                reason: "must be negative (upward)".to_string(),
            });
        }
        non_negative("run.speed", self.run.speed as f64)?;
        non_negative("run.wall_slide_max_fall", self.run.wall_slide_max_fall as f64)?;
        if !(0.0..=1.0).contains(&self.glide.fall_damping) {
            return Err(ConfigError::Invalid {
                field: "glide.fall_damping",
                reason: format!("must be within 0..=1, got {}", self.glide.fall_damping),
            });
        }
        non_negative("glide.moisture_per_sec", self.glide.moisture_per_sec as f64)?;
        non_negative("ground_pound.velocity", self.ground_pound.velocity as f64)?;
        non_negative("ground_pound.cooldown_ms", self.ground_pound.cooldown_ms)?;
        non_negative("dash.speed", self.dash.speed as f64)?;
        non_negative("dash.upward_speed", self.dash.upward_speed as f64)?;
        non_negative("dash.duration_ms", self.dash.duration_ms)?;
        non_negative("dash.invulnerability_ms", self.dash.invulnerability_ms)?;
        non_negative("dash.cooldown_ms", self.dash.cooldown_ms)?;
        moisture_amount("dash.moisture_cost", self.dash.moisture_cost)?;
        if self.dash.max_per_airtime == 0 {
            return Err(ConfigError::Invalid {
                field: "dash.max_per_airtime",
                reason: "must allow at least one dash".to_string(),
            });
        }
        moisture_amount("grapple.moisture_cost", self.grapple.moisture_cost)?;
        non_negative("grapple.cooldown_ms", self.grapple.cooldown_ms)?;
        non_negative("grapple.range", self.grapple.range as f64)?;
        non_negative("grapple.active_ms", self.grapple.active_ms)?;
        non_negative("grapple.bridge_lifetime_ms", self.grapple.bridge_lifetime_ms)?;
        moisture_amount("resources.starting_moisture", self.resources.starting_moisture)?;
        moisture_amount("resources.drain_amount", self.resources.drain_amount)?;
        moisture_amount("resources.recovery_moisture", self.resources.recovery_moisture)?;
        if self.resources.recovery_moisture <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "resources.recovery_moisture",
                reason: "must be above zero or every dry-out would repeat".to_string(),
            });
        }
        if self.resources.drain_interval_ms <= 0.0 || !self.resources.drain_interval_ms.is_finite()
        {
            return Err(ConfigError::Invalid {
                field: "resources.drain_interval_ms",
                reason: format!("must be > 0, got {}", self.resources.drain_interval_ms),
            });
        }
        if !(2..=4).contains(&self.resources.max_durability) {
            return Err(ConfigError::Invalid {
                field: "resources.max_durability",
                reason: format!("must be within 2..=4, got {}", self.resources.max_durability),
            });
        }
        non_negative("impact.landing_debounce_ms", self.impact.landing_debounce_ms)?;
        non_negative("impact.min_airtime_ms", self.impact.min_airtime_ms)?;
        non_negative("impact.min_speed", self.impact.min_speed as f64)?;
        non_negative("impact.cooldown_ms", self.impact.cooldown_ms)?;
        Ok(())
    }
}
