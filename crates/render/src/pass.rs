use canvasloop_common::{CameraId, Surface};
use canvasloop_kernel::Registry;

use crate::cameras::CameraSet;

/// Which mode a draw pass ran in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// No active camera: raw positions, per-entity render hooks.
    PassThrough,
    /// Culled and transformed through the given camera.
    Camera(CameraId),
}

/// Summary of one draw pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub mode: DrawMode,
    /// Entities that produced output (sprite draws or render hook calls).
    pub drawn: usize,
    /// Entities skipped by camera culling.
    pub culled: usize,
}

/// Clear the surface and draw every entity for one frame.
///
/// With an active camera, every visible entity's sprite is drawn at its
/// camera-transformed device rectangle and render hooks are not called.
/// Without one, entities are visited in registration order: `auto_render`
/// entities have their sprite drawn at the raw `(x, y)` with no scaling,
/// the rest get their own render hook.
pub fn draw_frame(
    surface: &mut dyn Surface,
    registry: &Registry,
    cameras: &mut CameraSet,
) -> FrameStats {
    let _span = tracing::debug_span!("draw_pass").entered();
    surface.clear(cameras.canvas().size().full_rect());

    let stats = match cameras.active_mut() {
        Some(camera) => {
            let id = camera.id();
            let items = registry.iter().map(|e| (e.bounds(), e.sprite()));
            let rendered = camera.render(items, |rect, sprite| {
                surface.draw_image(sprite, rect.origin, Some(rect.size));
            });
            FrameStats {
                mode: DrawMode::Camera(id),
                drawn: rendered.drawn,
                culled: rendered.culled,
            }
        }
        None => {
            for entity in registry {
                if entity.options().auto_render {
                    surface.draw_image(entity.sprite(), entity.bounds().origin, None);
                } else {
                    entity.render(surface);
                }
            }
            FrameStats {
                mode: DrawMode::PassThrough,
                drawn: registry.len(),
                culled: 0,
            }
        }
    };

    tracing::trace!(mode = ?stats.mode, drawn = stats.drawn, culled = stats.culled, "draw pass complete");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use canvasloop_common::{DeviceSize, DrawCall, RecordingSurface, SpriteHandle};
    use canvasloop_kernel::{EntityKind, EntityOptions, EntityState};
    use glam::DVec2;

    const SIZE: DeviceSize = DeviceSize::new(800, 400);

    fn sprite_kind(x: f64, y: f64, sprite: u64) -> EntityKind<()> {
        EntityKind::builder("sprite")
            .update(|_| {})
            .render(|s: &EntityState<()>, surface: &mut dyn Surface| {
                // Custom hook draws at twice the position with an explicit size.
                surface.draw_image(s.sprite, s.bounds().origin * 2.0, Some(DVec2::ONE));
            })
            .create(move || EntityState::new(x, y, 10.0, 10.0, SpriteHandle(sprite), ()))
            .build()
            .unwrap()
    }

    fn setup() -> (RecordingSurface, Registry, CameraSet) {
        let surface = RecordingSurface::new(SIZE);
        let cameras = CameraSet::new(Canvas::new(SIZE).unwrap());
        (surface, Registry::new(), cameras)
    }

    #[test]
    fn pass_through_draws_auto_render_at_raw_position() {
        let (mut surface, mut registry, mut cameras) = setup();
        registry.register(&sprite_kind(30.0, 40.0, 1), EntityOptions::auto_render());

        let stats = draw_frame(&mut surface, &registry, &mut cameras);

        assert_eq!(stats.mode, DrawMode::PassThrough);
        assert_eq!(
            surface.calls(),
            &[
                DrawCall::Clear(SIZE.full_rect()),
                DrawCall::Image {
                    sprite: SpriteHandle(1),
                    at: DVec2::new(30.0, 40.0),
                    size: None,
                },
            ]
        );
    }

    #[test]
    fn pass_through_calls_render_hooks_in_registration_order() {
        let (mut surface, mut registry, mut cameras) = setup();
        registry.register(&sprite_kind(1.0, 1.0, 1), EntityOptions::default());
        registry.register(&sprite_kind(2.0, 2.0, 2), EntityOptions::auto_render());
        registry.register(&sprite_kind(3.0, 3.0, 3), EntityOptions::default());

        let stats = draw_frame(&mut surface, &registry, &mut cameras);
        assert_eq!(stats.drawn, 3);

        let images: Vec<_> = surface
            .last_frame_images()
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(
            images,
            vec![
                DrawCall::Image {
                    sprite: SpriteHandle(1),
                    at: DVec2::new(2.0, 2.0),
                    size: Some(DVec2::ONE),
                },
                DrawCall::Image {
                    sprite: SpriteHandle(2),
                    at: DVec2::new(2.0, 2.0),
                    size: None,
                },
                DrawCall::Image {
                    sprite: SpriteHandle(3),
                    at: DVec2::new(6.0, 6.0),
                    size: Some(DVec2::ONE),
                },
            ]
        );
    }

    #[test]
    fn active_camera_transforms_instead() {
        let (mut surface, mut registry, mut cameras) = setup();
        registry.register(&sprite_kind(30.0, 40.0, 1), EntityOptions::auto_render());
        let cam = cameras.create(100.0, 50.0, 50.0).unwrap();
        cameras.set_active(cam).unwrap();

        let stats = draw_frame(&mut surface, &registry, &mut cameras);

        assert_eq!(stats.mode, DrawMode::Camera(cam));
        assert_eq!(
            surface.last_frame_images(),
            vec![&DrawCall::Image {
                sprite: SpriteHandle(1),
                at: DVec2::new(120.0, 160.0),
                size: Some(DVec2::new(40.0, 40.0)),
            }]
        );
    }

    #[test]
    fn camera_mode_skips_render_hooks_and_culls() {
        let (mut surface, mut registry, mut cameras) = setup();
        // Non-auto entity: its hook would draw at double position; camera mode ignores it.
        registry.register(&sprite_kind(0.0, 0.0, 1), EntityOptions::default());
        registry.register(&sprite_kind(5000.0, 0.0, 2), EntityOptions::default());
        let cam = cameras.create(100.0, 50.0, 50.0).unwrap();
        cameras.set_active(cam).unwrap();

        let stats = draw_frame(&mut surface, &registry, &mut cameras);

        assert_eq!(stats.drawn, 1);
        assert_eq!(stats.culled, 1);
        assert_eq!(
            surface.last_frame_images(),
            vec![&DrawCall::Image {
                sprite: SpriteHandle(1),
                at: DVec2::ZERO,
                size: Some(DVec2::new(40.0, 40.0)),
            }]
        );
    }

    #[test]
    fn unset_camera_returns_to_pass_through() {
        let (mut surface, mut registry, mut cameras) = setup();
        registry.register(&sprite_kind(30.0, 40.0, 1), EntityOptions::auto_render());
        let cam = cameras.create(100.0, 50.0, 50.0).unwrap();
        cameras.set_active(cam).unwrap();
        draw_frame(&mut surface, &registry, &mut cameras);

        cameras.unset_active();
        let stats = draw_frame(&mut surface, &registry, &mut cameras);

        assert_eq!(stats.mode, DrawMode::PassThrough);
        assert_eq!(
            surface.last_frame_images(),
            vec![&DrawCall::Image {
                sprite: SpriteHandle(1),
                at: DVec2::new(30.0, 40.0),
                size: None,
            }]
        );
    }

    #[test]
    fn every_frame_starts_with_a_full_clear() {
        let (mut surface, registry, mut cameras) = setup();
        draw_frame(&mut surface, &registry, &mut cameras);
        draw_frame(&mut surface, &registry, &mut cameras);
        assert_eq!(
            surface.calls(),
            &[DrawCall::Clear(SIZE.full_rect()), DrawCall::Clear(SIZE.full_rect())]
        );
    }
}
