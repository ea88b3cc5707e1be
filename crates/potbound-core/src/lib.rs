pub mod countdown;
pub mod engine;
pub mod scheduler;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::BTreeMap;

    use glam::Vec2;

    use crate::engine::{Body, Contacts, Level, PlatformId};

    /// In-memory stand-in for an engine physics body.
    ///
    /// Tests set `contacts` and `velocity` directly to play the role of the
    /// engine's collision resolution between frames.
    #[derive(Debug, Clone, Default)]
    pub struct FakeBody {
        pub position: Vec2,
        pub velocity: Vec2,
        pub contacts: Contacts,
    }

    impl FakeBody {
        pub fn at(x: f32, y: f32) -> Self {
            Self {
                position: Vec2::new(x, y),
                ..Default::default()
            }
        }

        /// Resting on the floor with no vertical motion.
        pub fn land(&mut self) {
            self.contacts.touching_down = true;
            self.contacts.blocked_down = true;
            self.velocity.y = 0.0;
        }

        /// Touching the floor while still carrying `vy` (the contact frame).
        pub fn touch_down_at(&mut self, vy: f32) {
            self.contacts.touching_down = true;
            self.velocity.y = vy;
        }

        /// No floor contact, moving vertically at `vy`.
        pub fn lift_off(&mut self, vy: f32) {
            self.contacts.touching_down = false;
            self.contacts.blocked_down = false;
            self.velocity.y = vy;
        }
    }

    impl Body for FakeBody {
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

    #[derive(Debug, Clone, PartialEq)]
    pub struct FakePlatform {
        pub center: Vec2,
        pub size: Vec2,
        pub breakable: bool,
        pub bridge: bool,
    }

    /// In-memory level that records every platform mutation.
    #[derive(Debug, Clone, Default)]
    pub struct FakeLevel {
        pub platforms: BTreeMap<PlatformId, FakePlatform>,
        pub destroyed: Vec<PlatformId>,
        next_id: u32,
    }

    impl FakeLevel {
        pub fn add_platform(&mut self, center: Vec2, breakable: bool) -> PlatformId {
            self.insert(FakePlatform {
                center,
                size: Vec2::new(200.0, 32.0),
                breakable,
                bridge: false,
            })
        }

        pub fn contains(&self, id: PlatformId) -> bool {
            self.platforms.contains_key(&id)
        }

        pub fn bridges(&self) -> Vec<(PlatformId, &FakePlatform)> {
            self.platforms
                .iter()
                .filter(|(_, p)| p.bridge)
                .map(|(id, p)| (*id, p))
                .collect()
        }

        fn insert(&mut self, platform: FakePlatform) -> PlatformId {
            self.next_id += 1;
            let id = PlatformId(self.next_id);
            self.platforms.insert(id, platform);
            id
        }
    }

    impl Level for FakeLevel {
        fn is_breakable(&self, platform: PlatformId) -> bool {
            self.platforms.get(&platform).is_some_and(|p| p.breakable)
        }

        fn destroy_platform(&mut self, platform: PlatformId) {
            if self.platforms.remove(&platform).is_some() {
                self.destroyed.push(platform);
            }
        }

        fn spawn_bridge(&mut self, center: Vec2, size: Vec2) -> PlatformId {
            self.insert(FakePlatform {
                center,
                size,
                breakable: false,
                bridge: true,
            })
        }
    }
}
