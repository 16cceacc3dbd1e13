use canvasloop_common::CameraId;

use crate::camera::{Camera, CameraError};
use crate::canvas::Canvas;

/// Owns every camera in a session and tracks which one, if any, is active.
///
/// Cameras are never removed. At most one camera drives the draw pass; with
/// none selected the pass runs in pass-through mode.
#[derive(Debug, Clone)]
pub struct CameraSet {
    canvas: Canvas,
    cameras: Vec<Camera>,
    next_id: u64,
    active: Option<CameraId>,
}

impl CameraSet {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            cameras: Vec::new(),
            next_id: 0,
            active: None,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Camera> {
        self.cameras.iter()
    }

    /// Create a camera at `(x, y)` with depth `z`. The identity is only
    /// consumed when construction succeeds.
    pub fn create(&mut self, x: f64, y: f64, z: f64) -> Result<CameraId, CameraError> {
        let id = CameraId(self.next_id);
        let camera = Camera::new(id, self.canvas, x, y, z)?;
        self.next_id += 1;
        self.cameras.push(camera);
        tracing::debug!(%id, x, y, z, "camera created");
        Ok(id)
    }

    pub fn find(&self, id: CameraId) -> Result<&Camera, CameraError> {
        self.cameras
            .iter()
            .find(|c| c.id() == id)
            .ok_or(CameraError::UnknownCamera(id))
    }

    pub fn find_mut(&mut self, id: CameraId) -> Result<&mut Camera, CameraError> {
        self.cameras
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or(CameraError::UnknownCamera(id))
    }

    /// Partial move of a camera; see [`Camera::move_to`].
    pub fn move_camera(
        &mut self,
        id: CameraId,
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
    ) -> Result<(), CameraError> {
        self.find_mut(id)?.move_to(x, y, z)
    }

    /// Make `id` the camera that drives the draw pass.
    pub fn set_active(&mut self, id: CameraId) -> Result<(), CameraError> {
        self.find(id)?;
        self.active = Some(id);
        tracing::debug!(%id, "camera selected");
        Ok(())
    }

    /// Return to pass-through drawing.
    pub fn unset_active(&mut self) {
        if let Some(id) = self.active.take() {
            tracing::debug!(%id, "camera deselected");
        }
    }

    pub fn active_id(&self) -> Option<CameraId> {
        self.active
    }

    pub fn active_mut(&mut self) -> Option<&mut Camera> {
        let id = self.active?;
        self.find_mut(id).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvasloop_common::{DeviceSize, Rect};

    fn set() -> CameraSet {
        CameraSet::new(Canvas::new(DeviceSize::new(800, 400)).unwrap())
    }

    #[test]
    fn ids_are_sequential() {
        let mut s = set();
        assert_eq!(s.create(0.0, 0.0, 10.0).unwrap(), CameraId(0));
        assert_eq!(s.create(5.0, 5.0, 10.0).unwrap(), CameraId(1));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn failed_create_does_not_consume_an_id() {
        let mut s = set();
        assert!(s.create(f64::NAN, 0.0, 10.0).is_err());
        assert!(s.is_empty());
        assert_eq!(s.create(0.0, 0.0, 10.0).unwrap(), CameraId(0));
    }

    #[test]
    fn unknown_camera_lookup_fails() {
        let mut s = set();
        assert_eq!(
            s.find(CameraId(999)).unwrap_err(),
            CameraError::UnknownCamera(CameraId(999))
        );
        assert_eq!(
            s.set_active(CameraId(999)),
            Err(CameraError::UnknownCamera(CameraId(999)))
        );
        assert_eq!(
            s.move_camera(CameraId(999), Some(1.0), None, None),
            Err(CameraError::UnknownCamera(CameraId(999)))
        );
        assert_eq!(s.active_id(), None);
    }

    #[test]
    fn move_camera_updates_border() {
        let mut s = set();
        let id = s.create(100.0, 50.0, 50.0).unwrap();
        s.move_camera(id, Some(200.0), None, None).unwrap();
        let cam = s.find_mut(id).unwrap();
        assert_eq!(cam.border(), Rect::new(100.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn select_and_deselect() {
        let mut s = set();
        let a = s.create(0.0, 0.0, 10.0).unwrap();
        let b = s.create(0.0, 0.0, 20.0).unwrap();
        assert!(s.active_mut().is_none());

        s.set_active(a).unwrap();
        assert_eq!(s.active_mut().unwrap().id(), a);
        s.set_active(b).unwrap();
        assert_eq!(s.active_id(), Some(b));

        s.unset_active();
        assert_eq!(s.active_id(), None);
        assert!(s.active_mut().is_none());
        // Deselecting twice is harmless.
        s.unset_active();
    }
}
