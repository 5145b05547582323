use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::camera::CameraView;

/// Kinds of object the rendering collaborator knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SceneObject {
    Player,
    Floor,
    Water,
    Obstacle,
}

impl SceneObject {
    pub const ALL: [SceneObject; 4] = [Self::Player, Self::Floor, Self::Water, Self::Obstacle];

    /// Stable index for per-object tables.
    pub fn index(self) -> usize {
        match self {
            Self::Player => 0,
            Self::Floor => 1,
            Self::Water => 2,
            Self::Obstacle => 3,
        }
    }
}

/// One draw call: an object and its model transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRequest {
    pub object: SceneObject,
    pub model: Mat4,
}

impl DrawRequest {
    pub fn at(object: SceneObject, translation: Vec3) -> Self {
        Self {
            object,
            model: Mat4::from_translation(translation),
        }
    }

    pub fn translation(&self) -> Vec3 {
        self.model.w_axis.truncate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Running,
    /// A quit intent was applied; the caller should tear down and exit.
    Quit,
}

/// Everything the renderer needs for one frame, in draw order.
#[derive(Debug, Clone)]
pub struct Frame {
    pub index: u64,
    pub view: CameraView,
    pub draws: Vec<DrawRequest>,
    pub status: FrameStatus,
}

impl Frame {
    pub fn should_quit(&self) -> bool {
        self.status == FrameStatus::Quit
    }

    pub fn count(&self, object: SceneObject) -> usize {
        self.draws.iter().filter(|d| d.object == object).count()
    }

    pub fn player(&self) -> Option<&DrawRequest> {
        self.draws.iter().find(|d| d.object == SceneObject::Player)
    }
}

/// Fires at most once per `interval` seconds of caller-supplied time.
///
/// Not used by gameplay; the desktop app hangs frame-rate logging off it.
#[derive(Debug, Clone, Copy)]
pub struct PeriodicTimer {
    interval: f64,
    last: f64,
}

impl PeriodicTimer {
    pub fn new(interval: f64, now: f64) -> Self {
        Self {
            interval,
            last: now,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Returns `true` when at least `interval` has elapsed since the last fire.
    pub fn poll(&mut self, now: f64) -> bool {
        if now - self.last >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }
}
