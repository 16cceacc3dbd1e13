//! Rendering: the 2D camera/viewport and the per-frame draw pass.
//!
//! # Invariants
//! - A camera's border and pixel scale are recomputed together, and the
//!   stale flag is cleared only once both are consistent.
//! - The renderer reads entity state; it never mutates it.
//! - Each frame runs in exactly one mode: camera-driven or pass-through.

mod camera;
mod cameras;
mod canvas;
mod pass;

pub use camera::{Camera, CameraError, PixelScale, RenderStats};
pub use cameras::CameraSet;
pub use canvas::Canvas;
pub use pass::{DrawMode, FrameStats, draw_frame};

pub fn crate_info() -> &'static str {
    "canvasloop-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
