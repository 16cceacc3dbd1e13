use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a registered entity.
///
/// Assigned sequentially by the registry and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Unique identifier for a camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CameraId(pub u64);

/// Opaque reference to a drawable image.
///
/// The runtime never looks inside; it only forwards the handle to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteHandle(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "camera#{}", self.0)
    }
}

impl fmt::Display for SpriteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sprite#{}", self.0)
    }
}

/// One of the two screen axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
        }
    }
}

/// Size of the device canvas in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceSize {
    pub width: u32,
    pub height: u32,
}

impl DeviceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_dvec2(self) -> DVec2 {
        DVec2::new(f64::from(self.width), f64::from(self.height))
    }

    /// The whole canvas as a rectangle anchored at the origin.
    pub fn full_rect(self) -> Rect {
        Rect::from_origin_size(DVec2::ZERO, self.as_dvec2())
    }
}

/// Axis-aligned rectangle with a top-left origin.
///
/// Used for world-space entity bounds, camera borders, and device-space
/// draw targets alike; the coordinate space is given by context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: DVec2,
    pub size: DVec2,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: DVec2::new(x, y),
            size: DVec2::new(width, height),
        }
    }

    pub const fn from_origin_size(origin: DVec2, size: DVec2) -> Self {
        Self { origin, size }
    }

    pub fn x(self) -> f64 {
        self.origin.x
    }

    pub fn y(self) -> f64 {
        self.origin.y
    }

    pub fn width(self) -> f64 {
        self.size.x
    }

    pub fn height(self) -> f64 {
        self.size.y
    }

    /// Bottom-right corner.
    pub fn max(self) -> DVec2 {
        self.origin + self.size
    }

    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Closed-interval overlap on both axes: rectangles that merely touch
    /// along an edge or at a corner still overlap.
    pub fn overlaps(self, other: Rect) -> bool {
        let (a_min, a_max) = (self.origin, self.max());
        let (b_min, b_max) = (other.origin, other.max());
        a_min.x <= b_max.x && b_min.x <= a_max.x && a_min.y <= b_max.y && b_min.y <= a_max.y
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.origin.x, self.origin.y, self.size.x, self.size.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, w, h)
    }

    #[test]
    fn rect_accessors() {
        let rect = r(1.0, 2.0, 10.0, 20.0);
        assert_eq!(rect.x(), 1.0);
        assert_eq!(rect.y(), 2.0);
        assert_eq!(rect.width(), 10.0);
        assert_eq!(rect.height(), 20.0);
        assert_eq!(rect.max(), DVec2::new(11.0, 22.0));
    }

    #[test]
    fn overlapping_rects() {
        assert!(r(0.0, 0.0, 10.0, 10.0).overlaps(r(5.0, 5.0, 10.0, 10.0)));
        assert!(r(0.0, 0.0, 100.0, 100.0).overlaps(r(10.0, 10.0, 1.0, 1.0)));
    }

    #[test]
    fn touching_edge_counts_as_overlap() {
        let a = r(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(r(10.0, 0.0, 5.0, 5.0)));
        assert!(a.overlaps(r(0.0, -5.0, 5.0, 5.0)));
        // Corner contact only.
        assert!(a.overlaps(r(10.0, 10.0, 1.0, 1.0)));
    }

    #[test]
    fn disjoint_rects() {
        let a = r(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(r(10.5, 0.0, 5.0, 5.0)));
        assert!(!a.overlaps(r(0.0, -6.0, 5.0, 5.0)));
    }

    #[test]
    fn non_finite_rect_detected() {
        assert!(r(0.0, 0.0, 1.0, 1.0).is_finite());
        assert!(!r(f64::NAN, 0.0, 1.0, 1.0).is_finite());
        assert!(!r(0.0, 0.0, f64::INFINITY, 1.0).is_finite());
    }

    #[test]
    fn device_size_full_rect() {
        let size = DeviceSize::new(800, 400);
        assert_eq!(size.full_rect(), r(0.0, 0.0, 800.0, 400.0));
        assert!(!size.is_empty());
        assert!(DeviceSize::new(0, 400).is_empty());
    }

    #[test]
    fn ids_display() {
        assert_eq!(EntityId(3).to_string(), "entity#3");
        assert_eq!(CameraId(0).to_string(), "camera#0");
        assert_eq!(SpriteHandle(9).to_string(), "sprite#9");
    }
}
