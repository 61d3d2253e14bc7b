//! Observe - lifecycle hooks for every stage transition.
//!
//! The dispatcher reports each router decision, filter pass/reject,
//! enrichment, handler completion, dead-letter capture and wire-tap
//! observation as a [`StageEvent`]. What happens to those events is up to the
//! registered [`Observer`]s; delivery never depends on them.
//!
//! Provided observers:
//! - [`TracingObserver`] - structured `tracing` log lines
//! - [`RecordingObserver`] - keeps events in a shared buffer (tests, inspection)
//! - [`EmitterObserver`] - re-emits events through an `EventEmitter` (requires `emitter` feature)
//!
//! Any `Fn(&StageEvent) + Send + Sync` closure is an observer as well.

mod event;
mod recording;
mod tracing_observer;

#[cfg(feature = "emitter")]
mod emitter;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::warn;

pub use event::{EventOutcome, StageEvent};
pub use recording::RecordingObserver;
pub use tracing_observer::TracingObserver;

#[cfg(feature = "emitter")]
pub use emitter::{EmitterObserver, ALL_EVENTS};

/// Receives stage transitions.
pub trait Observer: Send + Sync {
    fn observe(&self, event: &StageEvent);
}

impl<F> Observer for F
where
    F: Fn(&StageEvent) + Send + Sync,
{
    fn observe(&self, event: &StageEvent) {
        self(event)
    }
}

/// The observers attached to a registry.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    list: Vec<Arc<dyn Observer>>,
}

impl Observers {
    pub(crate) fn push(&mut self, observer: Arc<dyn Observer>) {
        self.list.push(observer);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }

    /// Deliver an event to every observer; a panicking observer is skipped.
    pub(crate) fn notify(&self, event: &StageEvent) {
        for observer in &self.list {
            if catch_unwind(AssertUnwindSafe(|| observer.observe(event))).is_err() {
                warn!(stage = %event.stage, channel = %event.channel, "observer panicked");
            }
        }
    }
}
