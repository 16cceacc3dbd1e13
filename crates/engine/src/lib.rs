//! Runtime session: one explicit object owning the entity registry, the
//! cameras, the frame scheduler and the drawing surface.
//!
//! # Invariants
//! - All state lives in the session; nothing is global.
//! - The canvas size is read from the surface once, at construction.
//! - Setup and control calls fail fast; the per-frame passes never fail.

mod config;
mod runtime;

pub use config::{ConfigError, RuntimeConfig};
pub use runtime::{Runtime, RuntimeError, SessionSummary};

pub use canvasloop_common::{
    CameraId, DeviceSize, DrawCall, EntityId, RecordingSurface, Rect, SpriteHandle, Surface,
};
pub use canvasloop_kernel::{
    EntityError, EntityKind, EntityOptions, EntityState, IntervalTimer, Pass, SchedulerError,
    Timer,
};
pub use canvasloop_render::{CameraError, DrawMode, FrameStats, PixelScale};

pub fn crate_info() -> &'static str {
    "canvasloop-engine v0.1.0"
}
