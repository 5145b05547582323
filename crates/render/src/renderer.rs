use std::fmt::Write as _;
use tilehop_kernel::{Frame, SceneObject};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer consumes the frame the kernel produced and turns it into
/// output. It never sees the world itself, so it cannot mutate game state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Draw one frame: view first, then every draw request in order.
    fn render(&mut self, frame: &Frame) -> Self::Output;
}

/// Per-object draw counts for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawTally {
    counts: [usize; 4],
}

impl DrawTally {
    pub fn of(frame: &Frame) -> Self {
        let mut tally = Self::default();
        for d in &frame.draws {
            tally.counts[d.object.index()] += 1;
        }
        tally
    }

    pub fn get(&self, object: SceneObject) -> usize {
        self.counts[object.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Debug text renderer.
///
/// Produces a human-readable summary of a frame: the camera view, draw counts
/// and the player transform. With `verbose` every draw request is listed.
/// Used by the CLI and by tests of the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    verbose: bool,
    frames_rendered: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self {
            verbose: true,
            ..Self::default()
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, frame: &Frame) -> String {
        self.frames_rendered += 1;
        let tally = DrawTally::of(frame);
        let v = &frame.view;

        let mut out = String::new();
        let _ = writeln!(out, "=== Frame {} ({:?}) ===", frame.index, frame.status);
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) up=({:.0}, {:.0}, {:.0})",
            v.eye.x, v.eye.y, v.eye.z, v.target.x, v.target.y, v.target.z, v.up.x, v.up.y, v.up.z
        );
        let _ = writeln!(
            out,
            "Draws: {} (player={}, floor={}, water={}, obstacles={})",
            tally.total(),
            tally.get(SceneObject::Player),
            tally.get(SceneObject::Floor),
            tally.get(SceneObject::Water),
            tally.get(SceneObject::Obstacle),
        );
        if let Some(player) = frame.player() {
            let p = player.translation();
            let _ = writeln!(out, "Player: pos=({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
        }

        if self.verbose {
            for d in &frame.draws {
                let t = d.translation();
                let _ = writeln!(out, "  {:?} at ({:.2}, {:.2}, {:.2})", d.object, t.x, t.y, t.z);
            }
        }

        out
    }
}
