use std::sync::{Arc, Mutex};

use super::{Observer, StageEvent};
use crate::stage::StageKind;

/// Observer that keeps every event in a shared buffer.
///
/// Cloning shares the buffer, so one clone can be registered while another
/// is kept for inspection.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<StageEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> Vec<StageEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Events recorded for one stage kind.
    pub fn of_kind(&self, kind: StageKind) -> Vec<StageEvent> {
        self.events().into_iter().filter(|e| e.kind == kind).collect()
    }

    /// Events recorded on one channel.
    pub fn on_channel(&self, channel: &str) -> Vec<StageEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.channel == channel)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        match self.events.lock() {
            Ok(mut events) => events.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl Observer for RecordingObserver {
    fn observe(&self, event: &StageEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
