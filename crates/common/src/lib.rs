//! Shared vocabulary for the tilehop workspace.
//!
//! Every other crate speaks in these types: the input layer produces
//! [`Intent`]s, the kernel consumes them, and all world constants come from
//! one immutable [`GameConfig`] handed to the kernel at startup.

pub mod config;
pub mod types;

pub use config::{
    AudioConfig, CameraConfig, ConfigError, ControlsConfig, GameConfig, JumpConfig,
    OscillationConfig, WindowConfig, WorldConfig,
};
pub use types::{CameraMode, Direction, Intent};
