//! Ability-specific reactions to platform contact.

use potbound_core::engine::{Level, PlatformId};

use crate::abilities::AbilityState;
use crate::events::ControllerEvent;

/// React to the player body touching `platform`.
///
/// A ground pound breaks breakable platforms and stops on them. Every other
/// contact is left to the engine.
pub fn on_platform_contact<L: Level>(
    abilities: &mut AbilityState,
    platform: PlatformId,
    level: &mut L,
) -> Option<ControllerEvent> {
    if !level.is_breakable(platform) || !abilities.interrupt_ground_pound() {
        return None;
    }
    level.destroy_platform(platform);
    tracing::info!(?platform, "platform broken by ground pound");
    Some(ControllerEvent::PlatformBroken { platform })
}
