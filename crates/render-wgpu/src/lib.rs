//! wgpu render backend for tilehop.
//!
//! Draws every kernel [`Frame`](tilehop_kernel::Frame) as instanced unit
//! cuboids (player, floor tiles, water, obstacles) with per-vertex colours.
//!
//! # Invariants
//! - The renderer only reads frames; game state stays in the kernel.
//! - GPU resources are owned here and released on drop.
//! - The view comes from the kernel; only the projection aspect is local.

mod camera;
mod context;
mod gpu;
mod meshes;
mod shaders;

pub use camera::{Projection, view_matrix};
pub use context::GpuContext;
pub use gpu::{DrawStats, FrameTarget, WgpuRenderer};

/// Errors from GPU setup and presentation.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface creation failed: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("surface error: {0}")]
    Surface(String),
    #[error("shader validation failed: {0}")]
    Shader(String),
}
