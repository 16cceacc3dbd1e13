use std::fmt;
use std::time::Duration;

use canvasloop_common::{CameraId, EntityId, Surface};
use canvasloop_kernel::{
    EntityError, EntityKind, EntityOptions, FrameScheduler, IntervalTimer, Pass, Registry,
    SchedulerError, Timer,
};
use canvasloop_render::{CameraError, CameraSet, Canvas, FrameStats, draw_frame};

use crate::config::{ConfigError, RuntimeConfig};

/// Errors surfaced by the runtime session.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    #[error(transparent)]
    Entity(#[from] EntityError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Counters reported when a session is torn down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub update_passes: u64,
    pub draw_passes: u64,
    pub entities: usize,
    pub cameras: usize,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Session: updates={} draws={} entities={} cameras={}",
            self.update_passes, self.draw_passes, self.entities, self.cameras
        )
    }
}

/// A rendering session.
///
/// Owns the entities, the cameras, the scheduler and the surface. The host
/// moves time forward with [`Runtime::advance`]; every pass that fires runs
/// to completion on the caller's thread before the next one starts.
pub struct Runtime<S: Surface, T: Timer = IntervalTimer> {
    surface: S,
    registry: Registry,
    cameras: CameraSet,
    scheduler: FrameScheduler<T>,
    update_passes: u64,
    draw_passes: u64,
    last_frame: Option<FrameStats>,
}

impl<S: Surface> Runtime<S, IntervalTimer> {
    /// Session on the bundled virtual-time interval timer.
    pub fn new(config: &RuntimeConfig, surface: S) -> Result<Self, RuntimeError> {
        Self::with_timer(config, surface, IntervalTimer::new())
    }
}

impl<S: Surface, T: Timer> Runtime<S, T> {
    pub fn with_timer(config: &RuntimeConfig, surface: S, timer: T) -> Result<Self, RuntimeError> {
        if config.frame_period_ms == 0 {
            return Err(ConfigError::InvalidPeriod.into());
        }
        let size = surface.size();
        let canvas = Canvas::new(size)?;
        let mut scheduler = FrameScheduler::with_timer(timer, config.frame_period());
        if !config.strict_stop {
            scheduler = scheduler.lenient_stop();
        }
        tracing::debug!(
            width = size.width,
            height = size.height,
            ratio = canvas.ratio(),
            minor = %canvas.minor_axis(),
            "runtime created"
        );
        Ok(Self {
            surface,
            registry: Registry::new(),
            cameras: CameraSet::new(canvas),
            scheduler,
            update_passes: 0,
            draw_passes: 0,
            last_frame: None,
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn cameras(&self) -> &CameraSet {
        &self.cameras
    }

    pub fn cameras_mut(&mut self) -> &mut CameraSet {
        &mut self.cameras
    }

    /// Instantiate an entity of `kind` and add it to the session.
    pub fn register<D: 'static>(&mut self, kind: &EntityKind<D>, options: EntityOptions) -> EntityId {
        self.registry.register(kind, options)
    }

    pub fn create_camera(&mut self, x: f64, y: f64, z: f64) -> Result<CameraId, RuntimeError> {
        Ok(self.cameras.create(x, y, z)?)
    }

    /// Move any subset of a camera's axes; `None` leaves an axis unchanged.
    pub fn move_camera(
        &mut self,
        id: CameraId,
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
    ) -> Result<(), RuntimeError> {
        Ok(self.cameras.move_camera(id, x, y, z)?)
    }

    pub fn set_camera(&mut self, id: CameraId) -> Result<(), RuntimeError> {
        Ok(self.cameras.set_active(id)?)
    }

    pub fn unset_camera(&mut self) {
        self.cameras.unset_active();
    }

    pub fn active_camera(&self) -> Option<CameraId> {
        self.cameras.active_id()
    }

    pub fn start(&mut self) -> Result<(), RuntimeError> {
        self.scheduler.start()?;
        tracing::info!(entities = self.registry.len(), "runtime started");
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), RuntimeError> {
        let was_running = self.scheduler.is_running();
        self.scheduler.stop()?;
        if was_running {
            tracing::info!(
                updates = self.update_passes,
                draws = self.draw_passes,
                "runtime stopped"
            );
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Move time forward and dispatch every pass that fired.
    /// Returns the number of passes run.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let passes = self.scheduler.poll(elapsed);
        for pass in &passes {
            match pass {
                Pass::Update => {
                    self.update_pass();
                }
                Pass::Draw => {
                    self.draw_pass();
                }
            }
        }
        passes.len()
    }

    /// Run every entity's update hook once.
    pub fn update_pass(&mut self) -> usize {
        let _span = tracing::debug_span!("update_pass").entered();
        self.update_passes += 1;
        self.registry.update_all()
    }

    /// Draw one frame to the surface.
    pub fn draw_pass(&mut self) -> FrameStats {
        let stats = draw_frame(&mut self.surface, &self.registry, &mut self.cameras);
        self.draw_passes += 1;
        self.last_frame = Some(stats);
        stats
    }

    /// Stats of the most recent draw pass.
    pub fn last_frame(&self) -> Option<FrameStats> {
        self.last_frame
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            update_passes: self.update_passes,
            draw_passes: self.draw_passes,
            entities: self.registry.len(),
            cameras: self.cameras.len(),
        }
    }

    /// End the session, stopping the scheduler if it is running, and hand
    /// back the surface.
    pub fn shutdown(mut self) -> (SessionSummary, S) {
        self.scheduler.halt();
        let summary = self.summary();
        tracing::debug!(%summary, "runtime shut down");
        (summary, self.surface)
    }
}
