//! Progress notifications at coarse checkpoints.
//!
//! Observers never influence results: every hook takes `&self` and returns
//! nothing. Hooks fire around symbolic resolution and around construction of
//! the decision structure, never inside an evaluation loop.

use std::cell::Cell;
use std::time::Instant;

use log::info;

/// A coarse stage of a query.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Stage {
    /// Symbolic resolution of a hypothesis (QS, SP or the contradiction).
    Resolution,
    /// Construction of the decision structure for a DNF.
    Construction,
}

pub trait Observer {
    /// Called before a stage starts; `size` is the number of input elements.
    fn started(&self, _stage: Stage, _size: usize) {}

    /// Called after a stage finished; `size` is the number of output
    /// elements (terms for resolution, nodes for construction).
    fn finished(&self, _stage: Stage, _size: usize) {}
}

/// Ignores every notification.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Forwards notifications to `log::info!`, with the time elapsed since the
/// matching `started` call.
#[derive(Debug)]
pub struct LogObserver {
    start: Cell<Option<Instant>>,
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl LogObserver {
    pub fn new() -> Self {
        Self { start: Cell::new(None) }
    }
}

impl Observer for LogObserver {
    fn started(&self, stage: Stage, size: usize) {
        self.start.set(Some(Instant::now()));
        info!("{:?} started on {} elements", stage, size);
    }

    fn finished(&self, stage: Stage, size: usize) {
        match self.start.take() {
            Some(start) => info!(
                "{:?} finished with {} elements in {:.3} s",
                stage,
                size,
                start.elapsed().as_secs_f64()
            ),
            None => info!("{:?} finished with {} elements", stage, size),
        }
    }
}
