//! Shared types for the canvasloop runtime: identities, rectangles, and the
//! drawing-surface interface every renderer targets.
//!
//! # Invariants
//! - Identities are plain integers assigned by their owning collection.
//! - The core only ever calls `clear` and `draw_image` on a surface.

mod surface;
mod types;

pub use surface::{DrawCall, RecordingSurface, Surface};
pub use types::{Axis, CameraId, DeviceSize, EntityId, Rect, SpriteHandle};

pub fn crate_info() -> &'static str {
    "canvasloop-common v0.1.0"
}
