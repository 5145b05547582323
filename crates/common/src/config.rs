//! Immutable game configuration.
//!
//! Loaded once at startup (YAML, every section optional) and validated before
//! the kernel sees it. Nothing in here changes while the frame loop runs.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Complete configuration for one game session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub oscillation: OscillationConfig,
    pub jump: JumpConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub window: WindowConfig,
    pub audio: AudioConfig,
}

/// Floor grid, containment bounds, spawn point and scene population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Floor tiles along x.
    pub grid_width: i32,
    /// Floor tiles along z.
    pub grid_depth: i32,
    /// Containment is half-open: `min_x <= x < max_x`, same on z.
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
    pub spawn_x: f32,
    pub spawn_z: f32,
    /// Distance moved per movement intent.
    pub step: f32,
    /// Base height of static floor tiles.
    pub floor_level: f32,
    pub tile_height: f32,
    pub water_level: f32,
    /// Water tiles cover `water_min..water_max` on both axes.
    pub water_min: i32,
    pub water_max: i32,
    pub obstacle_count: usize,
    pub movable_tile_count: usize,
    /// Seed for obstacle and movable-tile placement.
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_width: 17,
            grid_depth: 20,
            min_x: -1.0,
            max_x: 18.0,
            min_z: -1.0,
            max_z: 20.0,
            spawn_x: 0.0,
            spawn_z: 19.0,
            step: 0.2,
            floor_level: -1.0,
            tile_height: 1.0,
            water_level: -3.0,
            water_min: -20,
            water_max: 40,
            obstacle_count: 17,
            movable_tile_count: 20,
            seed: 42,
        }
    }
}

impl WorldConfig {
    /// Height of a static tile's top face, where a grounded player rests.
    pub fn rest_height(&self) -> f32 {
        self.floor_level + self.tile_height
    }

    /// Whether `(x, z)` lies inside the containment rectangle.
    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.min_x && x < self.max_x && z >= self.min_z && z < self.max_z
    }

    pub fn tile_count(&self) -> usize {
        (self.grid_width.max(0) as usize) * (self.grid_depth.max(0) as usize)
    }

    pub fn water_tile_count(&self) -> usize {
        let side = (self.water_max - self.water_min).max(0) as usize;
        side * side
    }
}

/// Triangle-wave animation of the movable floor tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillationConfig {
    pub min: f32,
    pub max: f32,
    /// Height change per frame.
    pub delta: f32,
    pub start: f32,
    pub start_rising: bool,
}

impl Default for OscillationConfig {
    fn default() -> Self {
        Self {
            min: -4.0,
            max: 2.0,
            delta: 0.005,
            start: -4.0,
            start_rising: true,
        }
    }
}

/// Fixed-rate jump arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Peak height above the ground.
    pub height: f32,
    /// Vertical distance per frame, both up and down.
    pub speed: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            height: 1.0,
            speed: 0.1,
        }
    }
}

/// Constants for the four camera rigs plus the perspective projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub follow_offset: Vec3,
    pub top_eye: Vec3,
    pub tower_eye: Vec3,
    pub adventure_offset: Vec3,
    /// Adventure target x when facing right.
    pub adventure_far_x: f32,
    /// Adventure target x when facing left.
    pub adventure_near_x: f32,
    /// Adventure target z when facing up.
    pub adventure_near_z: f32,
    /// Adventure target z when facing down.
    pub adventure_far_z: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            follow_offset: Vec3::new(0.0, 3.0, 3.0),
            top_eye: Vec3::new(10.0, 15.0, 10.0),
            tower_eye: Vec3::new(0.0, 5.0, 20.0),
            adventure_offset: Vec3::new(0.5, 1.5, 0.5),
            adventure_far_x: 20.0,
            adventure_near_x: 0.0,
            adventure_near_z: 0.0,
            adventure_far_z: 20.0,
            fov_degrees: 90.0,
            near: 0.1,
            far: 500.0,
        }
    }
}

/// Letter keys bound to the camera modes. Arrows, space and escape are fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub follow: char,
    pub top: char,
    pub tower: char,
    pub adventure: char,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            follow: 'F',
            top: 'P',
            tower: 'T',
            adventure: 'A',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            title: "tilehop".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Background track played once at startup.
    pub track: PathBuf,
    pub volume: f32,
    pub looped: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            track: PathBuf::from("assets/bg.ogg"),
            volume: 1.0,
            looped: false,
        }
    }
}

impl GameConfig {
    /// Read, parse and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate YAML text. Missing sections and fields keep defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the frame loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        if w.grid_width <= 0 || w.grid_depth <= 0 {
            return Err(invalid("world.grid_width/grid_depth", "grid must be non-empty"));
        }
        if w.min_x >= w.max_x || w.min_z >= w.max_z {
            return Err(invalid("world.min/max", "bounds must have min < max"));
        }
        if !w.contains(w.spawn_x, w.spawn_z) {
            return Err(invalid("world.spawn", "spawn point lies outside the bounds"));
        }
        if !(w.step > 0.0) {
            return Err(invalid("world.step", "must be positive"));
        }
        if !(w.tile_height > 0.0) {
            return Err(invalid("world.tile_height", "must be positive"));
        }
        if w.water_min >= w.water_max {
            return Err(invalid("world.water_min/water_max", "water extent is empty"));
        }
        // One cell is always kept free for the spawn point.
        if w.obstacle_count + w.movable_tile_count >= w.tile_count() {
            return Err(invalid(
                "world.obstacle_count/movable_tile_count",
                format!("more than {} cells requested", w.tile_count().saturating_sub(1)),
            ));
        }

        let o = &self.oscillation;
        if o.min >= o.max {
            return Err(invalid("oscillation.min/max", "min must be below max"));
        }
        if !(o.delta > 0.0) {
            return Err(invalid("oscillation.delta", "must be positive"));
        }
        if o.start < o.min || o.start > o.max {
            return Err(invalid("oscillation.start", "outside [min, max]"));
        }

        let j = &self.jump;
        if !(j.height > 0.0) {
            return Err(invalid("jump.height", "must be positive"));
        }
        // A jump over a rising tile only lands if the player falls faster.
        if j.speed <= o.delta {
            return Err(invalid("jump.speed", "must exceed oscillation.delta"));
        }

        let c = &self.camera;
        if !(c.fov_degrees > 0.0 && c.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees", "must be in (0, 180)"));
        }
        if !(c.near > 0.0) || c.far <= c.near {
            return Err(invalid("camera.near/far", "need 0 < near < far"));
        }

        let keys = [
            self.controls.follow,
            self.controls.top,
            self.controls.tower,
            self.controls.adventure,
        ];
        for (i, key) in keys.iter().enumerate() {
            if !key.is_ascii_alphabetic() || key.eq_ignore_ascii_case(&'q') {
                return Err(invalid("controls", format!("`{key}` cannot be a camera key")));
            }
            if keys[..i].iter().any(|k| k.eq_ignore_ascii_case(key)) {
                return Err(invalid("controls", format!("`{key}` is bound twice")));
            }
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid("window.width/height", "must be non-zero"));
        }
        if !(self.audio.volume >= 0.0) {
            return Err(invalid("audio.volume", "must not be negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        config.validate().unwrap();
        assert_eq!(config.world.rest_height(), 0.0);
        assert_eq!(config.world.tile_count(), 340);
        assert_eq!(config.world.water_tile_count(), 3600);
    }

    #[test]
    fn containment_is_half_open() {
        let w = WorldConfig::default();
        assert!(w.contains(-1.0, -1.0));
        assert!(w.contains(17.99, 19.99));
        assert!(!w.contains(18.0, 10.0));
        assert!(!w.contains(5.0, 20.0));
        assert!(!w.contains(-1.01, 5.0));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = GameConfig::from_yaml_str(
            "world:\n  seed: 7\n  step: 0.5\ncamera:\n  top_eye: [1.0, 2.0, 3.0]\n",
        )
        .unwrap();
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.step, 0.5);
        assert_eq!(config.world.grid_width, 17);
        assert_eq!(config.camera.top_eye, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.oscillation, OscillationConfig::default());
    }

    #[test]
    fn yaml_round_trip_preserves_defaults() {
        let text = GameConfig::default().to_yaml().unwrap();
        let back = GameConfig::from_yaml_str(&text).unwrap();
        assert_eq!(back, GameConfig::default());
    }

    #[test]
    fn rejects_inverted_oscillation() {
        let err = GameConfig::from_yaml_str("oscillation:\n  min: 3.0\n  max: 2.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field, .. } if field == "oscillation.min/max"));
    }

    #[test]
    fn rejects_slow_jump() {
        let mut config = GameConfig::default();
        config.jump.speed = 0.001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_spawn_outside_bounds() {
        let mut config = GameConfig::default();
        config.world.spawn_x = 40.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_overfull_grid() {
        let mut config = GameConfig::default();
        config.world.obstacle_count = 330;
        config.world.movable_tile_count = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_step() {
        let mut config = GameConfig::default();
        config.world.step = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_clashing_camera_keys() {
        let mut config = GameConfig::default();
        config.controls.top = 'f';
        assert!(config.validate().is_err());
        config.controls.top = 'q';
        assert!(config.validate().is_err());
        config.controls.top = 'O';
        config.validate().unwrap();
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "window:\n  width: 800\n  title: test").unwrap();
        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.window.title, "test");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = GameConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn malformed_yaml_is_yaml_error() {
        let err = GameConfig::from_yaml_str("world: [not, a, map").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
