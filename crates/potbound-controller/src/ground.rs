use potbound_core::engine::Contacts;

/// The single ground predicate shared by jumping, abilities and impact
/// detection: something solid below and not already moving up faster
/// than `tolerance`.
pub fn is_grounded(contacts: Contacts, velocity_y: f32, tolerance: f32) -> bool {
    contacts.supported_below() && velocity_y >= -tolerance
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundTransition {
    Landed,
    LeftGround,
    StillGrounded,
    StillAirborne,
}

/// Ground state carried between frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroundContact {
    pub on_ground: bool,
    pub was_on_ground: bool,
}

impl GroundContact {
    pub fn update(&mut self, grounded: bool) -> GroundTransition {
        self.was_on_ground = self.on_ground;
        self.on_ground = grounded;
        match (self.was_on_ground, grounded) {
            (false, true) => GroundTransition::Landed,
            (true, false) => GroundTransition::LeftGround,
            (true, true) => GroundTransition::StillGrounded,
            (false, false) => GroundTransition::StillAirborne,
        }
    }
}
