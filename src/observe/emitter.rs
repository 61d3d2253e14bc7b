use std::sync::Mutex;

use event_emitter_rs::EventEmitter;
use tracing::warn;

use super::{Observer, StageEvent};

/// Emitter event name that receives every stage transition.
pub const ALL_EVENTS: &str = "stage";

/// Observer that re-emits stage events through an [`EventEmitter`].
///
/// Each event is emitted twice as a JSON string: once under [`ALL_EVENTS`]
/// and once under its stage kind (`"route"`, `"filter"`, `"dead_letter"`, ...).
/// Listeners run on the emitter's own threads, so they never hold up
/// delivery.
///
/// ## Example
///
/// ```ignore
/// let emitter = EmitterObserver::new();
/// emitter.on("dead_letter", |json| println!("dead letter: {}", json));
/// let registry = RegistryBuilder::new().observer(emitter).build()?;
/// ```
pub struct EmitterObserver {
    emitter: Mutex<EventEmitter>,
}

impl Default for EmitterObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl EmitterObserver {
    pub fn new() -> Self {
        Self {
            emitter: Mutex::new(EventEmitter::new()),
        }
    }

    /// Register a listener for [`ALL_EVENTS`] or a stage kind name.
    ///
    /// The listener receives the event serialized as JSON; parse it back
    /// with `serde_json::from_str::<StageEvent>`.
    pub fn on<F>(&self, event: &str, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        match self.emitter.lock() {
            Ok(mut emitter) => {
                emitter.on(event, listener);
            }
            Err(poisoned) => {
                poisoned.into_inner().on(event, listener);
            }
        }
    }
}

impl Observer for EmitterObserver {
    fn observe(&self, event: &StageEvent) {
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(err) => {
                warn!(stage = %event.stage, error = %err, "stage event not serializable");
                return;
            }
        };

        let mut emitter = match self.emitter.lock() {
            Ok(emitter) => emitter,
            Err(poisoned) => poisoned.into_inner(),
        };
        emitter.emit(ALL_EVENTS, json.clone());
        emitter.emit(event.kind.as_str(), json);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use crate::observe::EventOutcome;
    use crate::stage::StageKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn listeners_receive_json_events() {
        let observer = EmitterObserver::new();
        let all = Arc::new(AtomicUsize::new(0));
        let dead = Arc::new(AtomicUsize::new(0));

        let all_count = Arc::clone(&all);
        observer.on(ALL_EVENTS, move |json| {
            let event: StageEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(event.channel, "dead-letter");
            all_count.fetch_add(1, Ordering::SeqCst);
        });
        let dead_count = Arc::clone(&dead);
        observer.on("dead_letter", move |_| {
            dead_count.fetch_add(1, Ordering::SeqCst);
        });

        observer.observe(&StageEvent::new(
            "dead-letter-sink",
            StageKind::DeadLetter,
            "dead-letter",
            &Message::new(16_i64),
            EventOutcome::Completed,
        ));

        // EventEmitter is async, give it time
        thread::sleep(Duration::from_millis(50));
        assert_eq!(all.load(Ordering::SeqCst), 1);
        assert_eq!(dead.load(Ordering::SeqCst), 1);
    }
}
