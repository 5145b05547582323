use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four grid-aligned travel directions.
///
/// `Up`/`Down` run along z (away from / towards the spawn row), `Left`/`Right`
/// along x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit displacement on the ground plane.
    pub fn unit(self) -> Vec3 {
        match self {
            Self::Up => Vec3::NEG_Z,
            Self::Down => Vec3::Z,
            Self::Left => Vec3::NEG_X,
            Self::Right => Vec3::X,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The camera rig currently driving the view. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CameraMode {
    /// Trails above and behind the player.
    #[default]
    Follow,
    /// Fixed overhead point looking straight down.
    Top,
    /// Fixed distant point looking at the player.
    Tower,
    /// Near the player, looking along the last direction travelled.
    Adventure,
}

impl CameraMode {
    pub const ALL: [CameraMode; 4] = [Self::Follow, Self::Top, Self::Tower, Self::Adventure];

    pub fn label(self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Top => "top",
            Self::Tower => "tower",
            Self::Adventure => "adventure",
        }
    }
}

impl fmt::Display for CameraMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A discrete request derived from input, applied by the frame loop.
///
/// Input handlers only ever produce intents; they never touch world or render
/// state directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Nudge the player one step. `repeat` marks key auto-repeat, which moves
    /// without updating the facing.
    Move { direction: Direction, repeat: bool },
    /// Start a jump if grounded.
    Jump,
    /// Make the given camera mode the only active one.
    SwitchCamera(CameraMode),
    /// Leave the frame loop.
    Quit,
    /// Unbound input.
    Noop,
}

impl Intent {
    /// A key-release step in `direction`.
    pub fn step(direction: Direction) -> Self {
        Self::Move {
            direction,
            repeat: false,
        }
    }

    /// A key-repeat step in `direction`.
    pub fn repeat(direction: Direction) -> Self {
        Self::Move {
            direction,
            repeat: true,
        }
    }
}
