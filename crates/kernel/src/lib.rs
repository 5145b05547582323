//! Game kernel: authoritative player and world state, stepped once per frame.
//!
//! # Invariants
//! - Input reaches the kernel only as [`Intent`](tilehop_common::Intent)s, applied inside [`World::step`].
//! - Exactly one camera mode is active at any time.
//! - The oscillation height never leaves its configured range.
//! - After every step the player is inside the containment bounds, or was
//!   reset to spawn during that step.
//! - The kernel never owns GPU or audio resources; it only emits draw requests.

pub mod camera;
pub mod frame;
pub mod layout;
pub mod oscillation;
pub mod player;
pub mod world;

pub use camera::{CameraRig, CameraView};
pub use frame::{DrawRequest, Frame, FrameStatus, PeriodicTimer, SceneObject};
pub use layout::{Obstacle, SceneLayout, TileCoord, is_on_movable_floor};
pub use oscillation::{Oscillation, PhaseDirection};
pub use player::{JumpPhase, PlayerState};
pub use world::{ResetCause, World, WorldEvent, WorldSummary};
