use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tilehop_common::{Direction, JumpConfig};

/// Vertical state of the player cuboid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpPhase {
    /// Resting on the tile below; y follows the ground every frame.
    #[default]
    Grounded,
    Ascending,
    Descending,
}

/// The player cuboid. Owned by the world, mutated only inside a frame step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec3,
    /// Last direction moved on a key release; steers the adventure camera.
    pub facing: Direction,
    pub jump: JumpPhase,
}

impl PlayerState {
    /// A grounded player at `position`, facing up the board.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            facing: Direction::Up,
            jump: JumpPhase::Grounded,
        }
    }

    pub fn is_jumping(&self) -> bool {
        self.jump != JumpPhase::Grounded
    }

    /// Ground-plane projection `(x, z)` used for containment tests.
    pub fn footprint(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }

    /// Move one step. Repeats keep the current facing.
    pub fn nudge(&mut self, direction: Direction, step: f32, repeat: bool) {
        self.position += direction.unit() * step;
        if !repeat {
            self.facing = direction;
        }
    }

    /// Begin a jump. Returns `false` (and changes nothing) when already airborne.
    pub fn start_jump(&mut self) -> bool {
        if self.is_jumping() {
            return false;
        }
        self.jump = JumpPhase::Ascending;
        true
    }

    /// Advance the jump arc by one frame against the ground height below the
    /// player, or track the ground when not jumping.
    ///
    /// Returns `true` on the frame the player lands.
    pub fn settle(&mut self, ground: f32, jump: &JumpConfig) -> bool {
        match self.jump {
            JumpPhase::Grounded => {
                self.position.y = ground;
                false
            }
            JumpPhase::Ascending => {
                let peak = ground + jump.height;
                self.position.y = (self.position.y.max(ground) + jump.speed).min(peak);
                if self.position.y >= peak {
                    self.jump = JumpPhase::Descending;
                }
                false
            }
            JumpPhase::Descending => {
                self.position.y -= jump.speed;
                if self.position.y <= ground {
                    self.position.y = ground;
                    self.jump = JumpPhase::Grounded;
                    return true;
                }
                false
            }
        }
    }

    /// Put the player back on the spawn point, cancelling any jump.
    pub fn respawn(&mut self, spawn: Vec3) {
        self.position = spawn;
        self.jump = JumpPhase::Grounded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn footprint_ignores_height() {
        let mut p = PlayerState::at(Vec3::new(3.5, 0.0, 7.25));
        p.position.y = 1.8;
        assert_eq!(p.footprint(), Vec2::new(3.5, 7.25));
    }

    #[test]
    fn release_nudge_updates_facing() {
        let mut p = PlayerState::at(Vec3::new(0.0, 0.0, 19.0));
        p.nudge(Direction::Right, 0.2, false);
        assert!((p.position.x - 0.2).abs() < EPS);
        assert_eq!(p.position.z, 19.0);
        assert_eq!(p.facing, Direction::Right);
    }

    #[test]
    fn repeat_nudge_keeps_facing() {
        let mut p = PlayerState::at(Vec3::new(5.0, 0.0, 5.0));
        p.nudge(Direction::Left, 0.2, false);
        p.nudge(Direction::Down, 0.2, true);
        assert_eq!(p.facing, Direction::Left);
        assert!((p.position.z - 5.2).abs() < EPS);
    }

    #[test]
    fn jump_is_idempotent_while_airborne() {
        let mut p = PlayerState::at(Vec3::ZERO);
        assert!(p.start_jump());
        let cfg = JumpConfig::default();
        p.settle(0.0, &cfg);
        let before = p;
        assert!(!p.start_jump());
        assert_eq!(p, before);
    }

    #[test]
    fn jump_reaches_peak_and_lands() {
        let cfg = JumpConfig::default();
        let mut p = PlayerState::at(Vec3::ZERO);
        p.start_jump();
        let mut peak = 0.0_f32;
        let mut frames = 0;
        loop {
            frames += 1;
            let landed = p.settle(0.0, &cfg);
            peak = peak.max(p.position.y);
            if landed {
                break;
            }
            assert!(frames < 1000, "jump never landed");
        }
        assert!((peak - cfg.height).abs() < EPS);
        assert_eq!(p.position.y, 0.0);
        assert_eq!(p.jump, JumpPhase::Grounded);
        // 10 frames up, 10 frames down at the default rate (+/- float rounding).
        assert!((19..=22).contains(&frames), "took {frames} frames");
    }

    #[test]
    fn grounded_player_tracks_ground() {
        let cfg = JumpConfig::default();
        let mut p = PlayerState::at(Vec3::ZERO);
        assert!(!p.settle(-2.5, &cfg));
        assert_eq!(p.position.y, -2.5);
        p.settle(1.25, &cfg);
        assert_eq!(p.position.y, 1.25);
    }

    #[test]
    fn ascending_player_is_lifted_by_rising_ground() {
        let cfg = JumpConfig::default();
        let mut p = PlayerState::at(Vec3::ZERO);
        p.start_jump();
        p.settle(2.0, &cfg);
        assert!(p.position.y >= 2.0);
    }

    #[test]
    fn respawn_cancels_jump() {
        let mut p = PlayerState::at(Vec3::ZERO);
        p.start_jump();
        p.facing = Direction::Left;
        p.respawn(Vec3::new(0.0, 0.0, 19.0));
        assert!(!p.is_jumping());
        assert_eq!(p.position, Vec3::new(0.0, 0.0, 19.0));
        assert_eq!(p.facing, Direction::Left);
    }
}
