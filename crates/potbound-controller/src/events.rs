use glam::Vec2;
use serde::{Deserialize, Serialize};

use potbound_core::engine::PlatformId;

use crate::jump::JumpKind;

/// Things that happened during one controller frame, in the order they
/// happened. Hosts use these for sound, particles and camera shake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ControllerEvent {
    Jumped { kind: JumpKind },
    GlideStarted,
    GlideStopped,
    GroundPoundStarted,
    GroundPoundLanded,
    /// A ground pound destroyed a breakable platform.
    PlatformBroken { platform: PlatformId },
    DashStarted { direction: Vec2 },
    DashEnded,
    GrappleFired { target: Vec2, bridge: PlatformId },
    GrappleEnded,
    BridgeExpired { bridge: PlatformId },
    Landed { speed: f32, airtime: Option<f64> },
    /// A hard landing that invulnerability absorbed.
    DamageBlocked,
    DurabilityLost { remaining: u8 },
    Shattered,
    DriedOut,
    FellOutOfWorld,
}
