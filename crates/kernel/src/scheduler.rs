use std::time::Duration;

/// Fixed period between firings of each pass.
pub const DEFAULT_FRAME_PERIOD: Duration = Duration::from_millis(50);

/// The two periodic passes the scheduler drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    /// Run every entity's update hook.
    Update,
    /// Clear the surface and draw every entity.
    Draw,
}

/// Handle returned by [`Timer::schedule`], used to cancel the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// Host timer facility.
///
/// A schedule fires repeatedly at its period until cancelled. Time only moves
/// when the host calls `advance`, so all firings are dispatched on the
/// caller's thread.
pub trait Timer {
    fn schedule(&mut self, pass: Pass, period: Duration) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
    /// Move time forward and return the passes that fired, in firing order.
    fn advance(&mut self, elapsed: Duration) -> Vec<Pass>;
}

#[derive(Debug, Clone)]
struct Schedule {
    handle: TimerHandle,
    pass: Pass,
    period: Duration,
    next_due: Duration,
}

/// Interval timer over virtual time.
///
/// Each schedule first fires one period after it was created. Firings from
/// different schedules are ordered by due time; ties go to the schedule
/// created first. A zero period never fires.
#[derive(Debug, Clone, Default)]
pub struct IntervalTimer {
    now: Duration,
    next_handle: u64,
    schedules: Vec<Schedule>,
}

impl IntervalTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since construction.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of live (uncancelled) schedules.
    pub fn active(&self) -> usize {
        self.schedules.len()
    }
}

impl Timer for IntervalTimer {
    fn schedule(&mut self, pass: Pass, period: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.schedules.push(Schedule {
            handle,
            pass,
            period,
            next_due: self.now + period,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.schedules.retain(|s| s.handle != handle);
    }

    fn advance(&mut self, elapsed: Duration) -> Vec<Pass> {
        self.now += elapsed;
        let mut fired: Vec<(Duration, TimerHandle, Pass)> = Vec::new();
        for s in &mut self.schedules {
            if s.period.is_zero() {
                continue;
            }
            while s.next_due <= self.now {
                fired.push((s.next_due, s.handle, s.pass));
                s.next_due += s.period;
            }
        }
        fired.sort_by_key(|&(due, handle, _)| (due, handle));
        fired.into_iter().map(|(_, _, pass)| pass).collect()
    }
}

/// Scheduler lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// Errors from scheduler misuse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    #[error("scheduler is already running")]
    AlreadyRunning,
    #[error("scheduler is already stopped")]
    AlreadyStopped,
}

/// Drives the update and draw passes at a fixed period.
///
/// The two passes are independent schedules on the host timer: neither waits
/// for the other, and no ordering between them is promised.
#[derive(Debug)]
pub struct FrameScheduler<T: Timer = IntervalTimer> {
    timer: T,
    period: Duration,
    state: SchedulerState,
    handles: Vec<TimerHandle>,
    /// Reject `stop` while already stopped.
    strict_stop: bool,
}

impl FrameScheduler<IntervalTimer> {
    pub fn new(period: Duration) -> Self {
        Self::with_timer(IntervalTimer::new(), period)
    }
}

impl<T: Timer> FrameScheduler<T> {
    pub fn with_timer(timer: T, period: Duration) -> Self {
        Self {
            timer,
            period,
            state: SchedulerState::Stopped,
            handles: Vec::with_capacity(2),
            strict_stop: true,
        }
    }

    /// Accept a redundant `stop` silently instead of failing.
    pub fn lenient_stop(mut self) -> Self {
        self.strict_stop = false;
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Schedule both passes. Fails if already running.
    pub fn start(&mut self) -> Result<(), SchedulerError> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }
        self.handles.push(self.timer.schedule(Pass::Update, self.period));
        self.handles.push(self.timer.schedule(Pass::Draw, self.period));
        self.state = SchedulerState::Running;
        tracing::debug!(period_ms = self.period.as_millis() as u64, "scheduler started");
        Ok(())
    }

    /// Cancel both passes. Future firings are suppressed; a pass already
    /// being dispatched is not interrupted.
    pub fn stop(&mut self) -> Result<(), SchedulerError> {
        if !self.is_running() {
            if self.strict_stop {
                return Err(SchedulerError::AlreadyStopped);
            }
            tracing::trace!("redundant stop ignored");
            return Ok(());
        }
        self.halt();
        Ok(())
    }

    /// Cancel any scheduled passes and mark the scheduler stopped, whatever
    /// its current state. Used for teardown.
    pub fn halt(&mut self) {
        if !self.is_running() {
            return;
        }
        for handle in self.handles.drain(..) {
            self.timer.cancel(handle);
        }
        self.state = SchedulerState::Stopped;
        tracing::debug!("scheduler stopped");
    }

    /// Advance the timer and return the passes due, in firing order.
    pub fn poll(&mut self, elapsed: Duration) -> Vec<Pass> {
        self.timer.advance(elapsed)
    }
}
