//! Scripted replays: per-frame inputs and contact flags fed through the
//! controller against a minimal integrating body.
//!
//! A scenario is a TOML document made of `[[segment]]` tables, each holding
//! the input and contact state for a run of frames. Between controller
//! frames the body integrates gravity and its velocity, standing in for the
//! physics engine; contact flags are never inferred, only scripted.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use potbound_controller::input::{KeyboardState, RawInput, TouchButtons};
use potbound_controller::{
    ConfigError, ControllerConfig, ControllerEvent, HudSnapshot, PlayerController,
};
use potbound_core::engine::{Body, Contacts, Level, PlatformId};
use potbound_core::time::FrameClock;

#[derive(Debug)]
pub enum ScenarioError {
    Io(std::io::Error),
    Parse(String),
    Config(ConfigError),
    Invalid(String),
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read scenario: {e}"),
            Self::Parse(m) => write!(f, "scenario parse error: {m}"),
            Self::Config(e) => write!(f, "scenario config: {e}"),
            Self::Invalid(m) => write!(f, "invalid scenario: {m}"),
        }
    }
}

impl std::error::Error for ScenarioError {}

fn default_frame_ms() -> f64 {
    FrameClock::DEFAULT_STEP_MS
}

fn default_gravity() -> f32 {
    900.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Tuning for this run. Falls back to `ControllerConfig::load()`.
    #[serde(default)]
    pub config: Option<ControllerConfig>,
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f64,
    /// Downward acceleration in px/s², applied between frames.
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    /// Starting position. Defaults to the configured spawn point.
    #[serde(default)]
    pub start: Option<[f32; 2]>,
    #[serde(default, rename = "platform")]
    pub platforms: Vec<PlatformDef>,
    #[serde(rename = "segment")]
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformDef {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub breakable: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Segment {
    pub frames: u32,
    pub keys: KeyboardState,
    pub touch: Option<TouchButtons>,
    pub contacts: Contacts,
    /// Overrides the engine's vertical velocity on every frame of the segment.
    pub velocity_y: Option<f32>,
    /// Index into the platform list that the body touches each frame.
    pub touch_platform: Option<usize>,
}

/// One line of replay output.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub frame: u32,
    pub time_ms: f64,
    pub position: Vec2,
    pub velocity: Vec2,
    pub events: Vec<ControllerEvent>,
    pub hud: HudSnapshot,
}

impl Scenario {
    pub fn from_file(path: &str) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(ScenarioError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ScenarioError> {
        let scenario: Self =
            toml::from_str(content).map_err(|e| ScenarioError::Parse(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if let Some(cfg) = &self.config {
            cfg.validate().map_err(ScenarioError::Config)?;
        }
        if !(self.frame_ms.is_finite() && self.frame_ms > 0.0) {
            return Err(ScenarioError::Invalid(format!(
                "frame_ms must be positive, got {}",
                self.frame_ms
            )));
        }
        if self.segments.is_empty() {
            return Err(ScenarioError::Invalid("no segments".to_string()));
        }
        for (i, seg) in self.segments.iter().enumerate() {
            match seg.touch_platform {
                Some(p) if p >= self.platforms.len() => {
                    return Err(ScenarioError::Invalid(format!(
                        "segment {i} touches platform {p}, only {} defined",
                        self.platforms.len()
                    )));
                },
                _ => {},
            }
        }
        Ok(())
    }

    pub fn total_frames(&self) -> u32 {
        self.segments.iter().map(|s| s.frames).sum()
    }

    /// Run every segment, handing each frame's report to `sink`. Returns the
    /// HUD as it stood after the last frame.
    pub fn replay<F>(&self, mut sink: F) -> std::io::Result<HudSnapshot>
    where
        F: FnMut(&FrameReport) -> std::io::Result<()>,
    {
        let config = self.config.clone().unwrap_or_else(ControllerConfig::load);
        let mut ctrl = PlayerController::new(config);
        let start = self.start.map_or(ctrl.spawn_point(), Vec2::from);
        let mut body = ScriptedBody::at(start);
        let mut level = ReplayLevel::default();
        let platform_ids: Vec<PlatformId> = self
            .platforms
            .iter()
            .map(|p| level.add_platform(Vec2::new(p.x, p.y), p.breakable))
            .collect();
        let mut clock = FrameClock::new(self.frame_ms);
        let mut frame_no = 0;

        for seg in &self.segments {
            let raw = RawInput {
                keys: seg.keys,
                touch: seg.touch,
            };
            for _ in 0..seg.frames {
                body.contacts = seg.contacts;
                if let Some(vy) = seg.velocity_y {
                    body.velocity.y = vy;
                }

                let touched: Vec<PlatformId> = seg
                    .touch_platform
                    .and_then(|i| platform_ids.get(i).copied())
                    .into_iter()
                    .collect();

                let frame = clock.tick();
                let events = ctrl.update_touching(frame, &raw, &touched, &mut body, &mut level);

                frame_no += 1;
                sink(&FrameReport {
                    frame: frame_no,
                    time_ms: frame.now,
                    position: body.position,
                    velocity: body.velocity,
                    events,
                    hud: ctrl.hud(),
                })?;

                body.integrate(self.gravity, frame.delta);
            }
        }

        tracing::info!(frames = frame_no, platforms = level.len(), "replay finished");
        Ok(ctrl.hud())
    }
}

/// Stand-in for the engine body: integrates velocity and stops falling
/// when scripted contacts say something is underneath.
#[derive(Debug, Clone)]
struct ScriptedBody {
    position: Vec2,
    velocity: Vec2,
    contacts: Contacts,
}

impl ScriptedBody {
    fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            contacts: Contacts::default(),
        }
    }

    fn integrate(&mut self, gravity: f32, delta_ms: f64) {
        let dt = (delta_ms / 1000.0) as f32;
        self.velocity.y += gravity * dt;
        if self.contacts.supported_below() && self.velocity.y > 0.0 {
            self.velocity.y = 0.0;
        }
        self.position += self.velocity * dt;
    }
}

impl Body for ScriptedBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn contacts(&self) -> Contacts {
        self.contacts
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }
}

#[derive(Debug, Clone)]
struct Platform {
    center: Vec2,
    breakable: bool,
}

#[derive(Debug, Default)]
struct ReplayLevel {
    platforms: BTreeMap<PlatformId, Platform>,
    next_id: u32,
}

impl ReplayLevel {
    fn add_platform(&mut self, center: Vec2, breakable: bool) -> PlatformId {
        self.next_id += 1;
        let id = PlatformId(self.next_id);
        self.platforms.insert(id, Platform { center, breakable });
        id
    }

    fn len(&self) -> usize {
        self.platforms.len()
    }
}

impl Level for ReplayLevel {
    fn is_breakable(&self, platform: PlatformId) -> bool {
        self.platforms.get(&platform).is_some_and(|p| p.breakable)
    }

    fn destroy_platform(&mut self, platform: PlatformId) {
        if let Some(p) = self.platforms.remove(&platform) {
            tracing::debug!(?platform, center = ?p.center, "platform removed");
        }
    }

    fn spawn_bridge(&mut self, center: Vec2, size: Vec2) -> PlatformId {
        tracing::debug!(?center, ?size, "bridge spawned");
        self.add_platform(center, false)
    }
}
