use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use tilehop_common::{CameraMode, ConfigError, Direction, GameConfig, Intent};

use crate::camera::{CameraRig, CameraView};
use crate::frame::{DrawRequest, Frame, FrameStatus, SceneObject};
use crate::layout::{SceneLayout, TileCoord};
use crate::oscillation::{Oscillation, PhaseDirection};
use crate::player::{JumpPhase, PlayerState};

/// Why the player was sent back to spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetCause {
    /// Left the containment rectangle.
    OutOfBounds,
    /// Stepped onto an obstacle footprint.
    Obstacle,
}

/// A record of every state change made by a frame step.
///
/// The log is append-only until drained; tools use it for reporting and tests
/// use it to observe what a step did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    CameraSwitched {
        frame: u64,
        from: CameraMode,
        to: CameraMode,
    },
    Moved {
        frame: u64,
        direction: Direction,
        repeat: bool,
        position: Vec3,
    },
    JumpStarted {
        frame: u64,
    },
    Landed {
        frame: u64,
        height: f32,
    },
    Reset {
        frame: u64,
        cause: ResetCause,
        from: Vec3,
    },
    PhaseFlipped {
        frame: u64,
        direction: PhaseDirection,
        height: f32,
    },
    /// Frame completed.
    Stepped { frame: u64 },
}

/// The authoritative game state.
///
/// All mutation happens in [`World::step`]; the layout and config are fixed
/// at construction.
#[derive(Debug, Clone)]
pub struct World {
    config: GameConfig,
    layout: SceneLayout,
    player: PlayerState,
    oscillation: Oscillation,
    camera: CameraRig,
    frame: u64,
    resets: u64,
    event_log: Vec<WorldEvent>,
}

impl World {
    /// Validate `config` and generate the layout from `config.world.seed`.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let seed = config.world.seed;
        Self::with_seed(config, seed)
    }

    /// Like [`World::new`] with an explicit layout seed.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let layout = SceneLayout::generate(&config.world, seed);
        Ok(Self::assemble(config, layout))
    }

    /// Validate `config` and use a caller-supplied layout.
    pub fn with_layout(config: GameConfig, layout: SceneLayout) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config, layout))
    }

    fn assemble(config: GameConfig, layout: SceneLayout) -> Self {
        let oscillation = Oscillation::new(&config.oscillation);
        let mut world = Self {
            player: PlayerState::at(Vec3::ZERO),
            config,
            layout,
            oscillation,
            camera: CameraRig::default(),
            frame: 0,
            resets: 0,
            event_log: Vec::new(),
        };
        world.player.position = world.spawn_point();
        tracing::debug!(
            obstacles = world.layout.obstacles().len(),
            spawn = ?world.player.position,
            "world assembled"
        );
        world
    }

    /// The validated configuration this world was built from.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Obstacles and movable tiles, fixed at construction.
    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    /// Current player state.
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Movable floor phase.
    pub fn oscillation(&self) -> &Oscillation {
        &self.oscillation
    }

    /// Active camera mode.
    pub fn camera_mode(&self) -> CameraMode {
        self.camera.mode()
    }

    /// Number of completed frames.
    pub fn frame_index(&self) -> u64 {
        self.frame
    }

    /// Resets to spawn since the world was created.
    pub fn reset_count(&self) -> u64 {
        self.resets
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Drain and return the event log. Long-running callers should do this
    /// every frame.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Teleport the player, keeping facing and cancelling any jump. No
    /// containment check happens until the next step.
    pub fn place_player(&mut self, position: Vec3) {
        self.player.position = position;
        self.player.jump = JumpPhase::Grounded;
    }

    /// Height of the tile top below `(x, z)`. Movable tiles follow the
    /// oscillation; everything else, including off-grid points, is static.
    pub fn ground_height(&self, x: f32, z: f32) -> f32 {
        let w = &self.config.world;
        match self.layout.movable_under(x, z) {
            Some(_) => self.oscillation.height() + w.tile_height,
            None => w.rest_height(),
        }
    }

    /// Where resets put the player: the configured spawn, resting on the ground there.
    pub fn spawn_point(&self) -> Vec3 {
        let w = &self.config.world;
        Vec3::new(w.spawn_x, self.ground_height(w.spawn_x, w.spawn_z), w.spawn_z)
    }

    /// Current look-at view for the active camera mode.
    pub fn view(&self) -> CameraView {
        self.camera.view(&self.player, &self.config.camera)
    }

    /// Run one frame with the intents gathered since the previous frame.
    ///
    /// Order: floor animation, camera mode, movement and jump, containment,
    /// then draw requests for player, floor grid, water and obstacles.
    pub fn step(&mut self, intents: &[Intent]) -> Frame {
        self.frame += 1;
        let frame = self.frame;
        let _span = tracing::debug_span!("world_step", frame).entered();

        if self.oscillation.advance() {
            self.event_log.push(WorldEvent::PhaseFlipped {
                frame,
                direction: self.oscillation.direction(),
                height: self.oscillation.height(),
            });
        }

        for intent in intents {
            if let Intent::SwitchCamera(mode) = *intent {
                if let Some(from) = self.camera.switch(mode) {
                    self.event_log.push(WorldEvent::CameraSwitched {
                        frame,
                        from,
                        to: mode,
                    });
                }
            }
        }

        let mut status = FrameStatus::Running;
        for intent in intents {
            match *intent {
                Intent::Move { direction, repeat } => {
                    self.player.nudge(direction, self.config.world.step, repeat);
                    self.event_log.push(WorldEvent::Moved {
                        frame,
                        direction,
                        repeat,
                        position: self.player.position,
                    });
                }
                Intent::Jump => {
                    if self.player.start_jump() {
                        self.event_log.push(WorldEvent::JumpStarted { frame });
                    } else {
                        tracing::trace!("jump ignored, already airborne");
                    }
                }
                Intent::Quit => status = FrameStatus::Quit,
                Intent::SwitchCamera(_) | Intent::Noop => {}
            }
        }

        let p = self.player.position;
        let ground = self.ground_height(p.x, p.z);
        if self.player.settle(ground, &self.config.jump) {
            self.event_log.push(WorldEvent::Landed {
                frame,
                height: self.player.position.y,
            });
        }

        self.enforce_containment();

        let draws = self.draw_requests();
        self.event_log.push(WorldEvent::Stepped { frame });
        tracing::trace!(draws = draws.len(), "frame stepped");

        Frame {
            index: frame,
            view: self.view(),
            draws,
            status,
        }
    }

    fn enforce_containment(&mut self) {
        let p = self.player.position;
        let foot = self.player.footprint();
        let cause = if !self.config.world.contains(foot.x, foot.y) {
            Some(ResetCause::OutOfBounds)
        } else if self.layout.obstacle_at(foot.x, foot.y).is_some() {
            Some(ResetCause::Obstacle)
        } else {
            None
        };

        if let Some(cause) = cause {
            let spawn = self.spawn_point();
            self.player.respawn(spawn);
            self.resets += 1;
            self.event_log.push(WorldEvent::Reset {
                frame: self.frame,
                cause,
                from: p,
            });
            tracing::info!(?cause, from = ?p, "player reset to spawn");
        }
    }

    /// Draw requests in fixed order: player, floor grid, water, obstacles.
    fn draw_requests(&self) -> Vec<DrawRequest> {
        let w = &self.config.world;
        let mut draws =
            Vec::with_capacity(1 + w.tile_count() + w.water_tile_count() + self.layout.obstacles().len());

        draws.push(DrawRequest::at(SceneObject::Player, self.player.position));

        let phase = self.oscillation.height();
        for i in 0..w.grid_width {
            for k in 0..w.grid_depth {
                let y = if self.layout.is_movable(TileCoord::new(i, k)) {
                    phase
                } else {
                    w.floor_level
                };
                draws.push(DrawRequest::at(
                    SceneObject::Floor,
                    Vec3::new(i as f32, y, k as f32),
                ));
            }
        }

        for i in w.water_min..w.water_max {
            for k in w.water_min..w.water_max {
                draws.push(DrawRequest::at(
                    SceneObject::Water,
                    Vec3::new(i as f32, w.water_level, k as f32),
                ));
            }
        }

        let obstacle_y = w.rest_height();
        for o in self.layout.obstacles() {
            draws.push(DrawRequest::at(
                SceneObject::Obstacle,
                Vec3::new(o.cell.x as f32, obstacle_y, o.cell.z as f32),
            ));
        }

        draws
    }

    /// Deterministic FNV-1a hash over the mutable state, for replay checks.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.frame.to_le_bytes());
        mix(&mut h, &self.resets.to_le_bytes());
        mix(&mut h, &self.oscillation.height().to_le_bytes());
        mix(&mut h, &[self.oscillation.direction() as u8]);
        let p = self.player.position;
        mix(&mut h, &p.x.to_le_bytes());
        mix(&mut h, &p.y.to_le_bytes());
        mix(&mut h, &p.z.to_le_bytes());
        mix(&mut h, &[self.player.facing as u8, self.player.jump as u8]);
        mix(&mut h, &[self.camera.mode() as u8]);
        h
    }

    pub fn summary(&self) -> WorldSummary {
        WorldSummary {
            frame: self.frame,
            camera: self.camera.mode(),
            position: self.player.position,
            facing: self.player.facing,
            jumping: self.player.is_jumping(),
            phase: self.oscillation.height(),
            resets: self.resets,
            obstacles: self.layout.obstacles().len(),
            pending_events: self.event_log.len(),
        }
    }
}

/// Read-only snapshot of the world for HUDs and CLI output.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSummary {
    pub frame: u64,
    pub camera: CameraMode,
    pub position: Vec3,
    pub facing: Direction,
    pub jumping: bool,
    pub phase: f32,
    pub resets: u64,
    pub obstacles: usize,
    pub pending_events: usize,
}

impl fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame={} camera={} pos=({:.2}, {:.2}, {:.2}) facing={} jumping={} phase={:.3} resets={}",
            self.frame,
            self.camera,
            self.position.x,
            self.position.y,
            self.position.z,
            self.facing,
            self.jumping,
            self.phase,
            self.resets,
        )
    }
}
