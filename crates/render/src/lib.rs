//! Rendering adapter: renderer-agnostic interface over kernel frames.
//!
//! # Invariants
//! - Renderers only read [`Frame`](tilehop_kernel::Frame)s; they never see or mutate the world.
//! - Draw requests are consumed in the order the kernel emitted them.
//!
//! The GPU backend lives in `tilehop-render-wgpu`; the text renderer here
//! serves the CLI and tests.

mod renderer;

pub use renderer::{DebugTextRenderer, DrawTally, Renderer};
