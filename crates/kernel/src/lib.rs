//! Runtime kernel: entity registry, entity kinds, and frame scheduling.
//!
//! # Invariants
//! - Entity identity is assigned exactly once, sequentially, and never reused.
//! - Registry iteration order is registration order.
//! - The scheduler is either stopped or running; both periodic passes are
//!   scheduled and cancelled together.

pub mod entity;
pub mod registry;
pub mod scheduler;

pub use entity::{
    Component, Entity, EntityError, EntityKind, EntityKindBuilder, EntityOptions, EntityState,
    Slot,
};
pub use registry::Registry;
pub use scheduler::{
    DEFAULT_FRAME_PERIOD, FrameScheduler, IntervalTimer, Pass, SchedulerError, SchedulerState,
    Timer, TimerHandle,
};

pub fn crate_info() -> &'static str {
    "canvasloop-kernel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("kernel"));
    }
}
