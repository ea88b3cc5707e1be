pub mod abilities;
pub mod collision;
pub mod config;
pub mod controller;
pub mod events;
pub mod ground;
pub mod hud;
pub mod impact;
pub mod input;
pub mod jump;
pub mod resources;
pub mod run;

pub use config::{ConfigError, ControllerConfig};
pub use controller::PlayerController;
pub use events::ControllerEvent;
pub use hud::HudSnapshot;
pub use input::{KeyboardState, RawInput, TouchButtons};
