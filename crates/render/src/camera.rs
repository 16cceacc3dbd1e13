use canvasloop_common::{CameraId, Rect, SpriteHandle};
use glam::DVec2;

use crate::canvas::Canvas;

/// Errors from camera construction, movement and lookup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CameraError {
    #[error("invalid {axis} coordinate: {value}")]
    InvalidCoordinate { axis: &'static str, value: f64 },
    #[error("unknown camera: {0}")]
    UnknownCamera(CameraId),
    #[error("canvas {width}x{height} has no area")]
    EmptyCanvas { width: u32, height: u32 },
}

/// Device pixels per world unit, rounded to whole pixels on each axis.
///
/// The two axes are rounded independently, so `x` and `y` can differ by a
/// pixel even though the border matches the device aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelScale {
    pub x: u32,
    pub y: u32,
}

impl PixelScale {
    pub fn as_dvec2(self) -> DVec2 {
        DVec2::new(f64::from(self.x), f64::from(self.y))
    }
}

/// Counts from one camera render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub drawn: usize,
    pub culled: usize,
}

/// A movable 2D viewport.
///
/// Holds a world position and a depth `z` (the half-extent of the visible
/// world along the canvas's minor axis). The visible `border` and the
/// `pixel_scale` are derived from both and cached; `move_to` marks them
/// stale and the next read recomputes the pair together.
#[derive(Debug, Clone)]
pub struct Camera {
    id: CameraId,
    canvas: Canvas,
    position: DVec2,
    depth: f64,
    moved: bool,
    border: Rect,
    pixel_scale: PixelScale,
    recomputes: u64,
}

impl Camera {
    /// Create a camera and compute its border and scale immediately.
    pub fn new(id: CameraId, canvas: Canvas, x: f64, y: f64, z: f64) -> Result<Self, CameraError> {
        check_axis("x", x)?;
        check_axis("y", y)?;
        check_depth(&canvas, z)?;
        let mut camera = Self {
            id,
            canvas,
            position: DVec2::new(x, y),
            depth: z,
            moved: true,
            border: Rect::default(),
            pixel_scale: PixelScale::default(),
            recomputes: 0,
        };
        camera.refresh();
        Ok(camera)
    }

    pub fn id(&self) -> CameraId {
        self.id
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// Whether the cached border and scale are stale.
    pub fn is_moved(&self) -> bool {
        self.moved
    }

    /// How many times border and scale have been recomputed.
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    /// Update any subset of the axes. `None` leaves an axis as it is; any
    /// provided value, zero included, is applied.
    ///
    /// Every provided value is validated before anything changes, so a
    /// rejected move leaves the camera untouched.
    pub fn move_to(&mut self, x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Result<(), CameraError> {
        if let Some(x) = x {
            check_axis("x", x)?;
        }
        if let Some(y) = y {
            check_axis("y", y)?;
        }
        if let Some(z) = z {
            check_depth(&self.canvas, z)?;
        }

        if let Some(x) = x {
            self.position.x = x;
        }
        if let Some(y) = y {
            self.position.y = y;
        }
        if let Some(z) = z {
            self.depth = z;
        }
        self.moved = true;
        tracing::debug!(id = %self.id, x = self.position.x, y = self.position.y, z = self.depth, "camera moved");
        Ok(())
    }

    /// World rectangle currently in view.
    pub fn border(&mut self) -> Rect {
        if self.moved {
            self.refresh();
        }
        self.border
    }

    /// Device pixels per world unit.
    pub fn pixel_scale(&mut self) -> PixelScale {
        if self.moved {
            self.refresh();
        }
        self.pixel_scale
    }

    /// Whether `rect` overlaps the border. Edge contact counts as visible.
    pub fn is_visible(&mut self, rect: Rect) -> bool {
        rect.overlaps(self.border())
    }

    /// Map a world rectangle to device pixels: translate into camera-local
    /// coordinates and scale; each axis of the size is rounded on its own.
    pub fn world_to_device(&mut self, rect: Rect) -> Rect {
        let border = self.border();
        let scale = self.pixel_scale().as_dvec2();
        Rect::from_origin_size(
            (rect.origin - border.origin) * scale,
            (rect.size * scale).round(),
        )
    }

    /// Draw every visible item through `draw` in device space. Items outside
    /// the border, or with non-finite bounds, are skipped without being
    /// transformed.
    pub fn render<I, F>(&mut self, items: I, mut draw: F) -> RenderStats
    where
        I: IntoIterator<Item = (Rect, SpriteHandle)>,
        F: FnMut(Rect, SpriteHandle),
    {
        let mut stats = RenderStats::default();
        for (bounds, sprite) in items {
            if !bounds.is_finite() || !self.is_visible(bounds) {
                stats.culled += 1;
                continue;
            }
            draw(self.world_to_device(bounds), sprite);
            stats.drawn += 1;
        }
        stats
    }

    /// Recompute border and scale as one unit and only then clear the flag.
    fn refresh(&mut self) {
        let half = self.canvas.half_extents(self.depth);
        let border = Rect::from_origin_size(self.position - half, half * 2.0);
        let device = self.canvas.size().as_dvec2();
        let scale = (device / border.size).round();
        self.border = border;
        self.pixel_scale = PixelScale {
            x: scale.x as u32,
            y: scale.y as u32,
        };
        self.moved = false;
        self.recomputes += 1;
        tracing::trace!(id = %self.id, border = %border, scale_x = self.pixel_scale.x, scale_y = self.pixel_scale.y, "camera border recomputed");
    }
}

fn check_axis(axis: &'static str, value: f64) -> Result<(), CameraError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CameraError::InvalidCoordinate { axis, value })
    }
}

/// Depth must be finite, positive, and wide enough that the rounded major
/// half-extent is non-zero; anything less leaves no visible world.
fn check_depth(canvas: &Canvas, value: f64) -> Result<(), CameraError> {
    if value.is_finite() && value > 0.0 && canvas.half_extents(value).min_element() > 0.0 {
        Ok(())
    } else {
        Err(CameraError::InvalidCoordinate { axis: "z", value })
    }
}
