//! Seams between the player core and the host engine.
//!
//! The physics engine owns bodies and resolves collisions; the level owns
//! platforms. The core only reads already-resolved contact state and writes
//! velocity/position back through these traits, once per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque handle to a platform owned by the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlatformId(pub u32);

/// Per-axis contact flags, resolved by the engine before the core runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contacts {
    /// Touching another body below.
    pub touching_down: bool,
    pub touching_left: bool,
    pub touching_right: bool,
    /// Blocked below by world bounds or a static tile.
    pub blocked_down: bool,
}

impl Contacts {
    /// Anything solid underneath, regardless of how the engine reports it.
    pub fn supported_below(&self) -> bool {
        self.touching_down || self.blocked_down
    }
}

/// Read/write access to the player's physics body.
///
/// Screen coordinates: `velocity.y < 0` is upward.
pub trait Body {
    fn position(&self) -> Vec2;
    fn velocity(&self) -> Vec2;
    fn contacts(&self) -> Contacts;
    fn set_position(&mut self, position: Vec2);
    fn set_velocity(&mut self, velocity: Vec2);
}

/// The level data the core is allowed to query and mutate.
pub trait Level {
    /// Whether the platform is flagged for destruction by a ground pound.
    /// Unknown ids are not breakable.
    fn is_breakable(&self, platform: PlatformId) -> bool;

    /// Remove a platform from the world. Removing an unknown id is a no-op.
    fn destroy_platform(&mut self, platform: PlatformId);

    /// Create a temporary traversable platform centred on `center`.
    fn spawn_bridge(&mut self, center: Vec2, size: Vec2) -> PlatformId;
}
