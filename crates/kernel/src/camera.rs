use glam::Vec3;
use serde::{Deserialize, Serialize};
use tilehop_common::{CameraConfig, CameraMode, Direction};

use crate::player::PlayerState;

/// Look-at parameters handed to the renderer each frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

/// Camera state machine. Holds exactly one active [`CameraMode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraRig {
    mode: CameraMode,
}

impl CameraRig {
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Make `mode` the active rig. Returns the previous mode when it changed.
    pub fn switch(&mut self, mode: CameraMode) -> Option<CameraMode> {
        if self.mode == mode {
            return None;
        }
        let previous = std::mem::replace(&mut self.mode, mode);
        tracing::debug!(from = %previous, to = %mode, "camera switched");
        Some(previous)
    }

    /// Derive the view for the active mode.
    pub fn view(&self, player: &PlayerState, config: &CameraConfig) -> CameraView {
        view_for(self.mode, player, config)
    }
}

/// Pure mapping from mode and player state to a look-at view.
pub fn view_for(mode: CameraMode, player: &PlayerState, config: &CameraConfig) -> CameraView {
    let p = player.position;
    match mode {
        CameraMode::Follow => CameraView {
            eye: p + config.follow_offset,
            target: p,
            up: Vec3::Y,
        },
        CameraMode::Top => CameraView {
            eye: config.top_eye,
            target: p,
            up: Vec3::NEG_Z,
        },
        CameraMode::Tower => CameraView {
            eye: config.tower_eye,
            target: p,
            up: Vec3::Y,
        },
        CameraMode::Adventure => {
            // Pin one axis to the far edge of the board in the facing direction.
            let target = match player.facing {
                Direction::Right => Vec3::new(config.adventure_far_x, p.y, p.z),
                Direction::Left => Vec3::new(config.adventure_near_x, p.y, p.z),
                Direction::Up => Vec3::new(p.x, p.y, config.adventure_near_z),
                Direction::Down => Vec3::new(p.x, p.y, config.adventure_far_z),
            };
            CameraView {
                eye: p + config.adventure_offset,
                target,
                up: Vec3::Y,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f32, y: f32, z: f32, facing: Direction) -> PlayerState {
        PlayerState {
            facing,
            ..PlayerState::at(Vec3::new(x, y, z))
        }
    }

    #[test]
    fn follow_trails_player() {
        let cfg = CameraConfig::default();
        let p = player_at(4.0, 0.0, 10.0, Direction::Up);
        let v = view_for(CameraMode::Follow, &p, &cfg);
        assert_eq!(v.eye, Vec3::new(4.0, 3.0, 13.0));
        assert_eq!(v.target, p.position);
        assert_eq!(v.up, Vec3::Y);
    }

    #[test]
    fn top_looks_down_from_fixed_point() {
        let cfg = CameraConfig::default();
        let p = player_at(3.0, 0.0, 7.0, Direction::Up);
        let v = view_for(CameraMode::Top, &p, &cfg);
        assert_eq!(v.eye, Vec3::new(10.0, 15.0, 10.0));
        assert_eq!(v.up, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(v.target, p.position);
    }

    #[test]
    fn tower_is_fixed_and_upright() {
        let cfg = CameraConfig::default();
        let p = player_at(8.0, 0.5, 2.0, Direction::Down);
        let v = view_for(CameraMode::Tower, &p, &cfg);
        assert_eq!(v.eye, cfg.tower_eye);
        assert_eq!(v.up, Vec3::Y);
        assert_eq!(v.target, p.position);
    }

    #[test]
    fn adventure_pins_target_by_facing() {
        let cfg = CameraConfig::default();
        let cases = [
            (Direction::Right, Vec3::new(20.0, 0.0, 6.0)),
            (Direction::Left, Vec3::new(0.0, 0.0, 6.0)),
            (Direction::Up, Vec3::new(5.0, 0.0, 0.0)),
            (Direction::Down, Vec3::new(5.0, 0.0, 20.0)),
        ];
        for (facing, expected) in cases {
            let p = player_at(5.0, 0.0, 6.0, facing);
            let v = view_for(CameraMode::Adventure, &p, &cfg);
            assert_eq!(v.target, expected, "facing {facing}");
            assert_eq!(v.eye, Vec3::new(5.5, 1.5, 6.5));
        }
    }

    #[test]
    fn switching_is_exclusive_and_edge_triggered() {
        let mut rig = CameraRig::default();
        assert_eq!(rig.mode(), CameraMode::Follow);
        assert_eq!(rig.switch(CameraMode::Top), Some(CameraMode::Follow));
        assert_eq!(rig.mode(), CameraMode::Top);
        assert_eq!(rig.switch(CameraMode::Top), None);
        for mode in CameraMode::ALL {
            rig.switch(mode);
            assert_eq!(rig.mode(), mode);
        }
    }
}
