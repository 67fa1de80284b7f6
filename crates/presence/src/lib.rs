pub mod camera;
pub mod config;
pub mod manager;
pub mod map2d;
pub mod panel;
pub mod points;
pub mod profile;
pub mod renderer;
pub mod selection;
pub mod sequencer;
pub mod strobe;
pub mod texture;

pub use config::PresenceConfig;
pub use manager::*;
