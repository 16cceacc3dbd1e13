use glam::DVec2;

use crate::types::{DeviceSize, Rect, SpriteHandle};

/// Drawing surface the runtime renders into.
///
/// The size is fixed for the lifetime of a session; the runtime queries it
/// once at startup. Only `clear` and `draw_image` are ever issued per frame.
pub trait Surface {
    /// Device size in pixels.
    fn size(&self) -> DeviceSize;

    /// Clear a device-space region.
    fn clear(&mut self, region: Rect);

    /// Draw an image at a device-space position. With `size` absent the image
    /// is drawn at its natural size.
    fn draw_image(&mut self, sprite: SpriteHandle, at: DVec2, size: Option<DVec2>);
}

/// A single call issued against a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Rect),
    Image {
        sprite: SpriteHandle,
        at: DVec2,
        size: Option<DVec2>,
    },
}

/// In-memory surface that records every call.
///
/// Useful for CLI output, logging, and testing the draw pass without a
/// windowing backend.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    size: DeviceSize,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(size: DeviceSize) -> Self {
        Self {
            size,
            calls: Vec::new(),
        }
    }

    /// Every call recorded so far, oldest first.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Drain and return the recorded calls.
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Calls issued since the most recent `clear`, including that clear.
    pub fn last_frame(&self) -> &[DrawCall] {
        let start = self
            .calls
            .iter()
            .rposition(|c| matches!(c, DrawCall::Clear(_)))
            .unwrap_or(0);
        &self.calls[start..]
    }

    /// Image draws within the last frame.
    pub fn last_frame_images(&self) -> Vec<&DrawCall> {
        self.last_frame()
            .iter()
            .filter(|c| matches!(c, DrawCall::Image { .. }))
            .collect()
    }

    /// Human-readable listing of the last frame.
    pub fn dump_last_frame(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame ({}x{}) ===\n",
            self.size.width, self.size.height
        ));
        for call in self.last_frame() {
            match call {
                DrawCall::Clear(region) => {
                    out.push_str(&format!("  clear {region}\n"));
                }
                DrawCall::Image { sprite, at, size } => match size {
                    Some(s) => out.push_str(&format!(
                        "  draw {sprite} at=({:.1}, {:.1}) size=({:.0}, {:.0})\n",
                        at.x, at.y, s.x, s.y
                    )),
                    None => out.push_str(&format!(
                        "  draw {sprite} at=({:.1}, {:.1}) natural\n",
                        at.x, at.y
                    )),
                },
            }
        }
        out
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> DeviceSize {
        self.size
    }

    fn clear(&mut self, region: Rect) {
        self.calls.push(DrawCall::Clear(region));
    }

    fn draw_image(&mut self, sprite: SpriteHandle, at: DVec2, size: Option<DVec2>) {
        self.calls.push(DrawCall::Image { sprite, at, size });
    }
}
