use canvasloop_common::{Axis, DeviceSize};
use glam::DVec2;

use crate::camera::CameraError;

/// Fixed device canvas geometry shared by every camera in a session.
///
/// `ratio` is `min(width, height) / max(width, height)` and `minor` names the
/// shorter device axis. A square canvas reports `Axis::Y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    size: DeviceSize,
    ratio: f64,
    minor: Axis,
}

impl Canvas {
    pub fn new(size: DeviceSize) -> Result<Self, CameraError> {
        if size.is_empty() {
            return Err(CameraError::EmptyCanvas {
                width: size.width,
                height: size.height,
            });
        }
        let (w, h) = (f64::from(size.width), f64::from(size.height));
        let minor = if size.width < size.height {
            Axis::X
        } else {
            Axis::Y
        };
        Ok(Self {
            size,
            ratio: w.min(h) / w.max(h),
            minor,
        })
    }

    pub fn size(&self) -> DeviceSize {
        self.size
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn minor_axis(&self) -> Axis {
        self.minor
    }

    /// World half-extents seen at depth `z`.
    ///
    /// `z` is the half-extent along the minor axis; the major axis gets
    /// `round(z / ratio)` so the visible world keeps the device aspect ratio.
    pub fn half_extents(&self, z: f64) -> DVec2 {
        let major = (z / self.ratio).round();
        match self.minor {
            Axis::X => DVec2::new(z, major),
            Axis::Y => DVec2::new(major, z),
        }
    }
}
